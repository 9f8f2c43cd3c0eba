use predicates::prelude::*;
use std::process::Command;
use tempfile::TempDir;

fn cmd() -> assert_cmd::Command {
    assert_cmd::Command::from(Command::new(env!("CARGO_BIN_EXE_astdump")))
}

fn fixture_path(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

// -- stdout mode --

#[test]
fn stdout_mode_produces_xml() {
    let expected = std::fs::read_to_string(fixture_path("foo.expected.xml")).unwrap();

    let assert = cmd().arg(fixture_path("foo.json")).assert().success();
    let output = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert_eq!(output, expected);
}

#[test]
fn stdout_mode_docs_skip_leading_references() {
    let expected = std::fs::read_to_string(fixture_path("refs.expected.xml")).unwrap();

    let assert = cmd().arg(fixture_path("refs.json")).assert().success();
    let output = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert_eq!(output, expected);
    assert!(!output.contains("<br>N"));
}

#[test]
fn stdout_mode_c_header() {
    cmd()
        .arg(fixture_path("shapes.h"))
        .assert()
        .success()
        .stdout(predicate::str::starts_with("<?xml version=\"1.0\"?>\n<jazz>"))
        .stdout(predicate::str::contains(
            r#"name="point" kind="source.lang.swift.decl.struct" usr="c:@S@point""#,
        ))
        .stdout(predicate::str::contains("<docs>A point on the plane.</docs>"))
        .stdout(predicate::str::contains("<docs>Horizontal position.</docs>"))
        .stdout(predicate::str::contains(
            r#"name="point_move" kind="source.lang.swift.decl.function.free""#,
        ))
        .stdout(predicate::str::contains(
            r#"<param name="dx">Horizontal offset.</param>"#,
        ))
        .stdout(predicate::str::contains("Not documentation").not());
}

#[test]
fn stdout_mode_keeps_source_order() {
    let assert = cmd().arg(fixture_path("order.json")).assert().success();
    let output = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let a = output.find(r#"name="A""#).unwrap();
    let b = output.find(r#"name="B""#).unwrap();
    let c = output.find(r#"name="C""#).unwrap();
    assert!(a < b && b < c);
}

#[test]
fn duplicate_conformances_survive() {
    let assert = cmd().arg(fixture_path("conformance.json")).assert().success();
    let output = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert_eq!(
        output
            .matches(r#"<conforms name="Runnable" usr="c:objc(pl)Runnable"/>"#)
            .count(),
        2
    );
    assert!(output.contains(r#"<conforms name="Stoppable""#));
    assert!(output.contains("<docs>Runs things &amp; stuff.</docs>"));
    assert!(!output.contains("source.lang.swift.ref.protocol"));
}

#[test]
fn stdout_json_format() {
    cmd()
        .args(["-f", "json"])
        .arg(fixture_path("foo.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""key.filepath": "Foo.h""#))
        .stdout(predicate::str::contains(
            r#""key.doc.full_as_xml": "Does foo things.""#,
        ));
}

#[test]
fn compiler_args_are_accepted() {
    cmd()
        .arg(fixture_path("shapes.h"))
        .args(["--", "-x", "c", "-DSHAPES=1"])
        .assert()
        .success();
}

// -- failures --

#[test]
fn reported_errors_fail() {
    cmd()
        .arg(fixture_path("broken.json"))
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("expected ';'"));
}

#[test]
fn c_syntax_error_fails() {
    cmd()
        .arg(fixture_path("broken.h"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("syntax error"));
}

#[test]
fn unsupported_extension_fails() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("Foo.swift");
    std::fs::write(&input, "struct Foo {}").unwrap();

    cmd()
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported file type"));
}

#[test]
fn invalid_format_fails() {
    cmd()
        .args(["-f", "markdown"])
        .arg(fixture_path("foo.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown format"));
}

#[test]
fn missing_files_argument_fails() {
    cmd().assert().failure();
}

// -- file mode --

#[test]
fn file_mode_requires_output() {
    cmd()
        .args([fixture_path("foo.json"), fixture_path("order.json")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--output is required"));
}

#[test]
fn file_mode_multiple_files() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("docs");

    cmd()
        .arg("-o")
        .arg(&out)
        .arg(fixture_path("foo.json"))
        .arg(fixture_path("shapes.h"))
        .assert()
        .success();

    let expected = std::fs::read_to_string(fixture_path("foo.expected.xml")).unwrap();
    assert_eq!(std::fs::read_to_string(out.join("foo.xml")).unwrap(), expected);
    let shapes = std::fs::read_to_string(out.join("shapes.xml")).unwrap();
    assert!(shapes.contains(r#"name="shape_count""#));
}

#[test]
fn file_mode_json_format() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-f", "json", "-o"])
        .arg(dir.path())
        .arg(fixture_path("order.json"))
        .assert()
        .success();

    let content = std::fs::read_to_string(dir.path().join("order.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&content).unwrap();
    let names: Vec<_> = value["key.substructure"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["key.name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["A", "B", "C"]);
}

#[test]
fn file_mode_continues_past_failures() {
    let dir = TempDir::new().unwrap();

    cmd()
        .arg("-o")
        .arg(dir.path())
        .arg(fixture_path("broken.json"))
        .arg(fixture_path("foo.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("1 of 2 files failed"));

    assert!(dir.path().join("foo.xml").exists());
    assert!(!dir.path().join("broken.xml").exists());
}

#[test]
fn file_mode_glob_pattern() {
    let dir = TempDir::new().unwrap();
    let pattern = fixture_path("*der*.json");

    cmd()
        .arg("-o")
        .arg(dir.path())
        .arg(&pattern)
        .assert()
        .success();

    assert!(dir.path().join("order.xml").exists());
}

// -- usrs mode --

#[test]
fn usrs_mode_lists_in_order() {
    cmd()
        .arg("--usrs")
        .arg(fixture_path("order.json"))
        .assert()
        .success()
        .stdout("c:@A\nc:@S@B\nc:@F@C\n");
}

#[test]
fn usrs_mode_c_header() {
    cmd()
        .arg("--usrs")
        .arg(fixture_path("shapes.h"))
        .assert()
        .success()
        .stdout(predicate::str::contains("c:@S@point\nc:@S@point@FI@x\nc:@S@point@FI@y\n"))
        .stdout(predicate::str::contains("c:@E@color@RED\n"))
        .stdout(predicate::str::contains("c:shapes.h@T@point_t\n"))
        .stdout(predicate::str::contains("c:@F@point_move\n"))
        .stdout(predicate::str::contains("c:@shape_count\n"));
}
