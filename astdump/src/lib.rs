//! astdump — dump documented declarations from compiler cursor trees.
//!
//! Pipeline per file: a [`frontend::FrontEnd`] produces a translation unit,
//! [`traverse`] walks its cursors and renders comments, [`builder`] rebuilds
//! the entity hierarchy, [`associate`] attaches documentation by source range
//! and a [`render::Renderer`] serializes the result.

pub mod associate;
pub mod builder;
pub mod comment;
pub mod diagnostics;
pub mod error;
pub mod escape;
pub mod frontend;
pub mod kind;
pub mod model;
pub mod render;
pub mod traverse;

use crate::diagnostics::Diagnostics;
use crate::error::ParseError;
use crate::frontend::c::CFrontEnd;
use crate::frontend::dump::DumpFrontEnd;
use crate::frontend::{FrontEnd, FrontEndKind, TranslationUnit};
use crate::model::EntityTree;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Documentation extracted from one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDocs {
    pub tree: EntityTree,
    pub diagnostics: Diagnostics,
}

/// Run traversal, building and association over an already parsed unit.
pub fn document_unit<U: TranslationUnit>(path: &Path, unit: &U) -> FileDocs {
    let mut diagnostics = Diagnostics::default();
    let visits = traverse::traverse(unit, &mut diagnostics);
    debug!(path = %path.display(), cursors = visits.len(), "traversed");

    let built = builder::build(path, visits, &mut diagnostics);
    let mut tree = built.tree;
    associate::associate(&mut tree, built.comments, &mut diagnostics);

    diagnostics.log(path);
    FileDocs { tree, diagnostics }
}

/// Parse `path` with `front_end` and document it. The unit is dropped before returning.
pub fn document_file<F: FrontEnd>(
    front_end: &F,
    path: &Path,
    args: &[String],
) -> Result<FileDocs, ParseError> {
    let unit = front_end.parse(path, args)?;
    Ok(document_unit(path, &unit))
}

/// Document `path` with the front end its extension calls for.
pub fn document_path(path: &Path, args: &[String]) -> Result<FileDocs, ParseError> {
    match FrontEndKind::for_path(path)? {
        FrontEndKind::Dump => {
            let unit = DumpFrontEnd.parse(path, args)?;
            // Name the tree after the source file the dump describes.
            let source = unit.file().map(PathBuf::from);
            Ok(document_unit(source.as_deref().unwrap_or(path), &unit))
        }
        FrontEndKind::C => document_file(&CFrontEnd, path, args),
    }
}

/// USRs of every cursor in `path`, in traversal order.
pub fn list_usrs(path: &Path, args: &[String]) -> Result<Vec<String>, ParseError> {
    match FrontEndKind::for_path(path)? {
        FrontEndKind::Dump => Ok(traverse::usrs(&DumpFrontEnd.parse(path, args)?)),
        FrontEndKind::C => Ok(traverse::usrs(&CFrontEnd.parse(path, args)?)),
    }
}

/// Document several files in parallel. Results are in input order.
pub fn document_files(paths: &[PathBuf], args: &[String]) -> Vec<Result<FileDocs, ParseError>> {
    paths
        .par_iter()
        .map(|path| document_path(path, args))
        .collect()
}
