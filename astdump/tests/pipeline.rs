use astdump::associate::{associate, AnchoredComment};
use astdump::diagnostics::Diagnostics;
use astdump::frontend::dump::DumpUnit;
use astdump::kind::DeclarationKind;
use astdump::model::{Entity, EntityRef, EntityTree};
use astdump::render::json::JsonRenderer;
use astdump::render::xml::XmlRenderer;
use astdump::render::Renderer;
use astdump::{document_files, document_path, document_unit};
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::path::{Path, PathBuf};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn nested() -> EntityTree {
    let mut a = Entity::new("A", "c:@S@A", 0, 100, DeclarationKind::DeclStruct);
    a.add_child(Entity::new("B", "c:@S@A@FI@B", 10, 20, DeclarationKind::DeclVarInstance));
    let mut tree = EntityTree::new("A.h");
    tree.entities.push(a);
    tree
}

#[test]
fn comment_attaches_to_innermost_entity() {
    let mut tree = nested();
    let mut diag = Diagnostics::default();
    associate(
        &mut tree,
        vec![AnchoredComment {
            offset: 15,
            length: 1,
            text: "Inner.".into(),
        }],
        &mut diag,
    );

    let xml = XmlRenderer.render(&tree);
    let docs_at = xml.find("<docs>Inner.</docs>").unwrap();
    assert!(xml.find(r#"name="B""#).unwrap() < docs_at);
    assert_eq!(xml.matches("<docs>").count(), 1);
}

#[test]
fn comment_outside_every_entity_is_dropped() {
    let mut tree = nested();
    let mut diag = Diagnostics::default();
    associate(
        &mut tree,
        vec![AnchoredComment {
            offset: 200,
            length: 4,
            text: "Nowhere.".into(),
        }],
        &mut diag,
    );

    let xml = XmlRenderer.render(&tree);
    assert!(!xml.contains("Nowhere."));
    assert!(!xml.contains("<docs>"));
    assert_eq!(diag.unanchored_docs, 1);
}

#[test]
fn documented_function_round_trip() {
    let json = std::fs::read_to_string(fixture("foo.json")).unwrap();
    let unit = DumpUnit::from_json(Path::new("foo.json"), &json).unwrap();
    let docs = document_unit(Path::new("Foo.h"), &unit);
    let xml = XmlRenderer.render(&docs.tree);

    assert_eq!(xml.matches("<entity").count(), 1);
    assert!(xml.contains(r#"name="foo""#));
    assert!(xml.contains(r#"kind="source.lang.swift.decl.function.free""#));
    assert!(xml.contains("<docs>Does foo things.</docs>"));
    assert!(docs.diagnostics.is_clean());
}

#[test]
fn declaration_keeps_docs_over_leading_reference() {
    let docs = document_path(&fixture("refs.json"), &[]).unwrap();
    let docs_of = |name: &str| {
        docs.tree
            .walk()
            .into_iter()
            .find(|(_, e)| e.name == name)
            .and_then(|(_, e)| e.docs.clone())
    };
    assert_eq!(docs_of("foo").as_deref(), Some("Does foo things."));
    assert_eq!(docs_of("size_t"), None);
    assert_eq!(
        docs_of("bar").as_deref(),
        Some("The shared bar.<rawHTML><![CDATA[<br>]]></rawHTML>Never nil.")
    );
    assert_eq!(docs_of("NSString"), None);
    assert!(docs.diagnostics.is_clean());
}

#[test]
fn duplicate_conformance_is_serialized_twice() {
    let mut class = Entity::new("C", "c:objc(cs)C", 0, 50, DeclarationKind::DeclClass);
    let target = EntityRef {
        name: "P".into(),
        usr: "c:objc(pl)P".into(),
    };
    class.add_conformance(target.clone());
    class.add_conformance(target);
    let mut tree = EntityTree::new("C.h");
    tree.entities.push(class);

    let xml = XmlRenderer.render(&tree);
    assert_eq!(xml.matches(r#"<conforms name="P""#).count(), 2);
    let json = JsonRenderer.render(&tree);
    assert_eq!(json.matches(r#""key.name": "P""#).count(), 2);
}

#[test]
fn top_level_order_is_source_order() {
    let docs = document_path(&fixture("order.json"), &[]).unwrap();
    let names: Vec<_> = docs.tree.entities.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["A", "B", "C"]);
    assert_eq!(docs.tree.path, PathBuf::from("Order.h"));
}

#[test]
fn conformance_targets_resolve_or_dangle() {
    let docs = document_path(&fixture("conformance.json"), &[]).unwrap();
    let runner = &docs.tree.entities[1];
    assert_eq!(runner.conforms.len(), 3);
    assert_eq!(
        docs.tree.resolve(&runner.conforms[0]).map(|e| e.name.as_str()),
        Some("Runnable")
    );
    assert!(docs.tree.resolve(&runner.conforms[2]).is_none());
    assert_eq!(docs.diagnostics.dangling_conformances, 1);
}

#[test]
fn c_header_entities_and_docs() {
    let docs = document_path(&fixture("shapes.h"), &[]).unwrap();
    let outline: Vec<_> = docs
        .tree
        .walk()
        .into_iter()
        .map(|(depth, e)| (depth, e.name.as_str(), e.kind))
        .collect();
    assert_eq!(
        outline,
        vec![
            (1, "point", DeclarationKind::DeclStruct),
            (2, "x", DeclarationKind::DeclVarInstance),
            (2, "y", DeclarationKind::DeclVarInstance),
            (1, "color", DeclarationKind::DeclEnum),
            (2, "RED", DeclarationKind::DeclEnumElement),
            (2, "GREEN", DeclarationKind::DeclEnumElement),
            (2, "BLUE", DeclarationKind::DeclEnumElement),
            (1, "point_t", DeclarationKind::DeclTypeAlias),
            (2, "struct point", DeclarationKind::RefTypeAlias),
            (1, "point_move", DeclarationKind::DeclFunctionFree),
            (2, "p", DeclarationKind::DeclVarLocal),
            (2, "dx", DeclarationKind::DeclVarLocal),
            (1, "shape_count", DeclarationKind::DeclVarGlobal),
        ]
    );

    let docs_of = |name: &str| {
        docs.tree
            .walk()
            .into_iter()
            .find(|(_, e)| e.name == name)
            .and_then(|(_, e)| e.docs.clone())
    };
    assert_eq!(docs_of("point").as_deref(), Some("A point on the plane."));
    assert_eq!(docs_of("x").as_deref(), Some("Horizontal position."));
    assert_eq!(docs_of("RED").as_deref(), Some("Warm."));
    assert_eq!(docs_of("GREEN"), None);
    assert_eq!(docs_of("point_t").as_deref(), Some("Shorthand for a point."));
    assert_eq!(
        docs_of("point_move").as_deref(),
        Some(
            "Moves a point.\n\
             <param name=\"p\">The point to move.</param>\n\
             <param name=\"dx\">Horizontal offset.</param>\n\
             <return>Zero on success.</return>"
        )
    );
    assert_eq!(docs_of("shape_count"), None);
    assert!(docs.diagnostics.is_clean());
}

#[rstest]
#[case("broken.json")]
#[case("broken.h")]
fn parse_failures_produce_no_tree(#[case] name: &str) {
    assert!(document_path(&fixture(name), &[]).is_err());
}

#[test]
fn parallel_results_keep_input_order() {
    let paths = vec![
        fixture("order.json"),
        fixture("broken.json"),
        fixture("foo.json"),
        fixture("shapes.h"),
    ];
    let results = document_files(&paths, &[]);
    assert_eq!(results.len(), 4);
    assert_eq!(results[0].as_ref().unwrap().tree.path, PathBuf::from("Order.h"));
    assert!(results[1].is_err());
    assert_eq!(results[2].as_ref().unwrap().tree.path, PathBuf::from("Foo.h"));
    assert_eq!(results[3].as_ref().unwrap().tree.path, fixture("shapes.h"));
}
