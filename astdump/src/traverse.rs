//! Depth-first walk over a translation unit's cursors.

use crate::comment::{self, CommentKind};
use crate::diagnostics::Diagnostics;
use crate::frontend::{CursorInfo, TranslationUnit};
use tracing::debug;

/// One visited cursor, in pre-order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Visit {
    /// 1 for the translation unit's direct children.
    pub depth: usize,
    pub info: CursorInfo,
    /// Rendered full comment, if the cursor has one.
    pub documentation: Option<String>,
}

/// Visit every descendant of the unit's root cursor, pre-order.
///
/// The root is the container and is not itself visited. Cursors without
/// info are skipped with their whole subtree.
pub fn traverse<U: TranslationUnit>(unit: &U, diag: &mut Diagnostics) -> Vec<Visit> {
    let mut visits = Vec::new();
    for child in unit.children(&unit.root()) {
        visit(unit, &child, 1, &mut visits, diag);
    }
    visits
}

fn visit<U: TranslationUnit>(
    unit: &U,
    cursor: &U::Cursor,
    depth: usize,
    visits: &mut Vec<Visit>,
    diag: &mut Diagnostics,
) {
    let Some(info) = unit.info(cursor) else {
        debug!(depth, "skipping malformed cursor");
        diag.skipped_cursors += 1;
        return;
    };

    let documentation = unit
        .full_comment(cursor)
        .filter(|c| c.kind == CommentKind::FullComment)
        .map(|c| comment::render(&c));

    visits.push(Visit {
        depth,
        info,
        documentation,
    });
    for child in unit.children(cursor) {
        visit(unit, &child, depth + 1, visits, diag);
    }
}

/// Non-empty USRs of every cursor, in traversal order.
pub fn usrs<U: TranslationUnit>(unit: &U) -> Vec<String> {
    fn collect<U: TranslationUnit>(unit: &U, cursor: &U::Cursor, out: &mut Vec<String>) {
        if unit.info(cursor).is_none() {
            return;
        }
        if let Some(usr) = unit.usr(cursor).filter(|u| !u.is_empty()) {
            out.push(usr);
        }
        for child in unit.children(cursor) {
            collect(unit, &child, out);
        }
    }

    let mut out = Vec::new();
    for child in unit.children(&unit.root()) {
        collect(unit, &child, &mut out);
    }
    out
}
