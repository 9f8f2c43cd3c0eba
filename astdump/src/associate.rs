//! Attach rendered documentation to the entities whose ranges contain it.

use crate::diagnostics::Diagnostics;
use crate::model::{range_contains, Entity, EntityTree};
use std::cmp::Reverse;
use tracing::{debug, warn};

/// Rendered documentation anchored at a source range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchoredComment {
    pub offset: usize,
    pub length: usize,
    pub text: String,
}

/// Flattened entity range with the child-index path leading to it.
struct Span {
    offset: usize,
    length: usize,
    depth: usize,
    order: usize,
    path: Vec<usize>,
}

impl Span {
    fn contains(&self, offset: usize) -> bool {
        range_contains(self.offset, self.length, offset)
    }
}

fn flatten(entities: &[Entity], prefix: &[usize], spans: &mut Vec<Span>) {
    for (i, entity) in entities.iter().enumerate() {
        let mut path = prefix.to_vec();
        path.push(i);
        spans.push(Span {
            offset: entity.offset,
            length: entity.length,
            depth: path.len(),
            order: spans.len(),
            path: path.clone(),
        });
        flatten(&entity.entities, &path, spans);
    }
}

fn entity_mut<'a>(entities: &'a mut [Entity], path: &[usize]) -> Option<&'a mut Entity> {
    let (first, rest) = path.split_first()?;
    let entity = entities.get_mut(*first)?;
    if rest.is_empty() {
        Some(entity)
    } else {
        entity_mut(&mut entity.entities, rest)
    }
}

/// Attach each comment to the entity whose range it was anchored at, else to
/// the innermost entity containing its anchor offset.
///
/// An exact `(offset, length)` match wins outright, so a declaration keeps its
/// comment over a reference child starting at the same offset. Otherwise the
/// deepest entity wins, then the shorter range, then the earlier entity.
/// Comments with no containing entity are dropped.
pub fn associate(tree: &mut EntityTree, comments: Vec<AnchoredComment>, diag: &mut Diagnostics) {
    let mut spans = Vec::new();
    flatten(&tree.entities, &[], &mut spans);
    spans.sort_by_key(|s| s.offset);

    for comment in comments {
        let anchor = comment.offset;
        let upto = spans.partition_point(|s| s.offset <= anchor);
        let best = spans[..upto]
            .iter()
            .filter(|s| s.contains(anchor))
            .min_by_key(|s| {
                let exact = s.offset == comment.offset && s.length == comment.length;
                (!exact, Reverse(s.depth), s.length, s.order)
            });

        let Some(span) = best else {
            debug!(offset = anchor, "no entity contains documentation; dropping");
            diag.unanchored_docs += 1;
            continue;
        };
        let Some(entity) = entity_mut(&mut tree.entities, &span.path) else {
            diag.unanchored_docs += 1;
            continue;
        };
        if entity.set_documentation(comment.text).is_some() {
            warn!(
                entity = %entity.name,
                usr = %entity.usr,
                "entity documented twice; keeping the later comment"
            );
            diag.overwritten_docs += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::DeclarationKind;
    use pretty_assertions::assert_eq;

    fn entity(name: &str, offset: usize, length: usize) -> Entity {
        Entity::new(name, "", offset, length, DeclarationKind::DeclStruct)
    }

    fn comment(offset: usize, length: usize, text: &str) -> AnchoredComment {
        AnchoredComment {
            offset,
            length,
            text: text.to_string(),
        }
    }

    fn nested_tree() -> EntityTree {
        let mut a = entity("A", 0, 100);
        a.add_child(entity("B", 10, 20));
        let mut tree = EntityTree::new("t.h");
        tree.entities.push(a);
        tree
    }

    #[test]
    fn innermost_entity_wins() {
        let mut tree = nested_tree();
        let mut diag = Diagnostics::default();
        associate(&mut tree, vec![comment(15, 1, "inner")], &mut diag);
        assert_eq!(tree.entities[0].docs, None);
        assert_eq!(tree.entities[0].entities[0].docs.as_deref(), Some("inner"));
        assert!(diag.is_clean());
    }

    #[test]
    fn outside_every_range_is_dropped() {
        let mut tree = nested_tree();
        let mut diag = Diagnostics::default();
        associate(&mut tree, vec![comment(200, 5, "lost")], &mut diag);
        assert!(tree.walk().iter().all(|(_, e)| e.docs.is_none()));
        assert_eq!(diag.unanchored_docs, 1);
    }

    #[test]
    fn exact_range_beats_nested_reference() {
        let mut function = Entity::new("foo", "c:@F@foo", 0, 16, DeclarationKind::DeclFunctionFree);
        function.add_child(Entity::new("size_t", "c:@T@size_t", 0, 6, DeclarationKind::RefTypeAlias));
        let mut tree = EntityTree::new("t.h");
        tree.entities.push(function);
        let mut diag = Diagnostics::default();
        associate(&mut tree, vec![comment(0, 16, "Does foo things.")], &mut diag);
        assert_eq!(tree.entities[0].docs.as_deref(), Some("Does foo things."));
        assert_eq!(tree.entities[0].entities[0].docs, None);
        assert!(diag.is_clean());
    }

    #[test]
    fn range_end_is_exclusive() {
        let mut tree = nested_tree();
        let mut diag = Diagnostics::default();
        associate(&mut tree, vec![comment(30, 1, "after B")], &mut diag);
        assert_eq!(tree.entities[0].docs.as_deref(), Some("after B"));
        assert_eq!(tree.entities[0].entities[0].docs, None);
    }

    #[test]
    fn siblings_prefer_exact_range() {
        let mut tree = EntityTree::new("t.h");
        tree.entities.push(entity("typedef", 0, 30));
        tree.entities.push(entity("record", 0, 20));
        let mut diag = Diagnostics::default();
        associate(&mut tree, vec![comment(0, 30, "doc")], &mut diag);
        assert_eq!(tree.entities[0].docs.as_deref(), Some("doc"));
        assert_eq!(tree.entities[1].docs, None);
    }

    #[test]
    fn siblings_prefer_shorter_range() {
        let mut tree = EntityTree::new("t.h");
        tree.entities.push(entity("wide", 0, 30));
        tree.entities.push(entity("narrow", 0, 20));
        let mut diag = Diagnostics::default();
        associate(&mut tree, vec![comment(5, 1, "doc")], &mut diag);
        assert_eq!(tree.entities[1].docs.as_deref(), Some("doc"));
    }

    #[test]
    fn zero_length_entity_matches_its_offset() {
        let mut tree = EntityTree::new("t.h");
        tree.entities.push(entity("empty", 42, 0));
        let mut diag = Diagnostics::default();
        associate(
            &mut tree,
            vec![comment(42, 0, "here"), comment(43, 0, "nowhere")],
            &mut diag,
        );
        assert_eq!(tree.entities[0].docs.as_deref(), Some("here"));
        assert_eq!(diag.unanchored_docs, 1);
    }

    #[test]
    fn second_comment_overwrites_and_is_counted() {
        let mut tree = nested_tree();
        let mut diag = Diagnostics::default();
        associate(
            &mut tree,
            vec![comment(12, 1, "first"), comment(14, 1, "second")],
            &mut diag,
        );
        assert_eq!(tree.entities[0].entities[0].docs.as_deref(), Some("second"));
        assert_eq!(diag.overwritten_docs, 1);
    }
}
