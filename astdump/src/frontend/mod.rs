//! Compiler front ends: the capability the pipeline consumes.
//!
//! A [`FrontEnd`] turns a file into a [`TranslationUnit`]; the unit exposes a
//! cursor tree with spellings, USRs, ranges and attached parsed comments.
//! Units own whatever the front end allocated and release it on drop.

pub mod c;
pub mod dump;

use crate::comment::CommentNode;
use crate::error::{ParseError, UnknownKind};
use crate::kind::DeclarationKind;
use std::path::Path;

/// Kind as reported by a front end, before taxonomy lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawKind {
    /// Numeric `CXCursorKind`.
    Code(u32),
    /// Textual kind name.
    Name(String),
}

impl RawKind {
    pub fn resolve(&self) -> Result<DeclarationKind, UnknownKind> {
        match self {
            RawKind::Code(code) => DeclarationKind::from_raw_code(*code),
            RawKind::Name(name) => DeclarationKind::from_name(name),
        }
    }
}

/// What the front end knows about one cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorInfo {
    pub spelling: String,
    pub usr: Option<String>,
    pub kind: RawKind,
    pub offset: usize,
    pub length: usize,
}

/// A parsed file exposing its cursor tree.
pub trait TranslationUnit {
    type Cursor: Clone;

    /// The translation-unit cursor; its descendants are the file's cursors.
    fn root(&self) -> Self::Cursor;

    fn children(&self, cursor: &Self::Cursor) -> Vec<Self::Cursor>;

    /// `None` for null or malformed cursors.
    fn info(&self, cursor: &Self::Cursor) -> Option<CursorInfo>;

    fn usr(&self, cursor: &Self::Cursor) -> Option<String> {
        self.info(cursor).and_then(|info| info.usr)
    }

    /// The parsed comment attached to the cursor, if any.
    fn full_comment(&self, cursor: &Self::Cursor) -> Option<CommentNode>;
}

/// Produces translation units from files.
pub trait FrontEnd {
    type Unit: TranslationUnit;

    fn parse(&self, path: &Path, args: &[String]) -> Result<Self::Unit, ParseError>;
}

/// Front end responsible for `path`, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontEndKind {
    Dump,
    C,
}

impl FrontEndKind {
    pub fn for_path(path: &Path) -> Result<Self, ParseError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Ok(FrontEndKind::Dump),
            Some("h" | "c") => Ok(FrontEndKind::C),
            _ => Err(ParseError::UnsupportedFile(path.to_path_buf())),
        }
    }
}
