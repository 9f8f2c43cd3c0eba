//! Rebuild the entity hierarchy from a pre-order visit stream.

use crate::associate::AnchoredComment;
use crate::diagnostics::Diagnostics;
use crate::kind::DeclarationKind;
use crate::model::{Entity, EntityRef, EntityTree};
use crate::traverse::Visit;
use std::path::Path;
use tracing::{debug, warn};

/// Output of [`build`]: the tree without documentation, plus the rendered
/// comments still to be associated.
#[derive(Debug)]
pub struct Built {
    pub tree: EntityTree,
    pub comments: Vec<AnchoredComment>,
}

/// Turn visits into entities, nesting each under the nearest shallower visit.
///
/// A `ref.protocol` cursor directly under a declaration that accepts
/// conformances becomes a conformance on that declaration instead of an
/// entity; its subtree is dropped.
pub fn build(path: &Path, visits: Vec<Visit>, diag: &mut Diagnostics) -> Built {
    let mut tree = EntityTree::new(path);
    let mut comments = Vec::new();
    let mut stack: Vec<(usize, Entity)> = Vec::new();
    let mut skip_below: Option<usize> = None;

    for visit in visits {
        if let Some(depth) = skip_below {
            if visit.depth > depth {
                continue;
            }
            skip_below = None;
        }
        while stack.last().is_some_and(|(depth, _)| *depth >= visit.depth) {
            close(&mut stack, &mut tree);
        }

        let info = visit.info;
        let kind = info.kind.resolve().unwrap_or_else(|err| {
            warn!(spelling = %info.spelling, offset = info.offset, "{}", err);
            diag.unknown_kinds += 1;
            DeclarationKind::Unknown
        });
        let usr = info.usr.unwrap_or_default();

        if kind == DeclarationKind::RefProtocol {
            if let Some((depth, parent)) = stack.last_mut() {
                if *depth + 1 == visit.depth && parent.kind.accepts_conformances() {
                    parent.add_conformance(EntityRef {
                        name: info.spelling,
                        usr,
                    });
                    skip_below = Some(visit.depth);
                    continue;
                }
            }
        }

        if let Some(text) = visit.documentation {
            comments.push(AnchoredComment {
                offset: info.offset,
                length: info.length,
                text,
            });
        }
        stack.push((
            visit.depth,
            Entity::new(info.spelling, usr, info.offset, info.length, kind),
        ));
    }
    while !stack.is_empty() {
        close(&mut stack, &mut tree);
    }

    let dangling = tree.dangling_conformances();
    for target in &dangling {
        debug!(name = %target.name, usr = %target.usr, "conformance target not in file");
    }
    diag.dangling_conformances += dangling.len();

    Built { tree, comments }
}

fn close(stack: &mut Vec<(usize, Entity)>, tree: &mut EntityTree) {
    if let Some((_, entity)) = stack.pop() {
        match stack.last_mut() {
            Some((_, parent)) => parent.add_child(entity),
            None => tree.entities.push(entity),
        }
    }
}
