//! JSON cursor dump front end.
//!
//! A privileged helper that owns the real compiler serializes each file's
//! cursor tree into one self-describing message:
//!
//! ```json
//! { "file": "Foo.h", "errors": [],
//!   "cursors": [ { "kind": 8, "spelling": "foo", "usr": "c:@F@foo",
//!                  "offset": 0, "length": 10,
//!                  "comment": { "kind": "full-comment", "children": [] },
//!                  "children": [] } ] }
//! ```
//!
//! Kinds may be numeric codes or textual names. A non-empty `errors` list is
//! the helper reporting that the compiler failed to parse the file.

use super::{CursorInfo, FrontEnd, RawKind, TranslationUnit};
use crate::comment::{CommentKind, CommentNode};
use crate::error::ParseError;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct UnitDump {
    #[serde(default)]
    file: Option<String>,
    #[serde(default)]
    errors: Vec<String>,
    #[serde(default)]
    cursors: Vec<CursorDump>,
}

#[derive(Debug, Deserialize)]
struct CursorDump {
    #[serde(default)]
    kind: Option<KindField>,
    #[serde(default, alias = "name")]
    spelling: String,
    #[serde(default)]
    usr: Option<String>,
    #[serde(default)]
    offset: Option<usize>,
    #[serde(default)]
    length: Option<usize>,
    #[serde(default)]
    comment: Option<CommentDump>,
    #[serde(default)]
    children: Vec<CursorDump>,
}

#[derive(Debug, Deserialize)]
struct CommentDump {
    kind: KindField,
    #[serde(default, alias = "text", alias = "name")]
    payload: Option<String>,
    #[serde(default)]
    children: Vec<CommentDump>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum KindField {
    Code(u32),
    Name(String),
}

impl From<KindField> for RawKind {
    fn from(field: KindField) -> Self {
        match field {
            KindField::Code(code) => RawKind::Code(code),
            KindField::Name(name) => RawKind::Name(name),
        }
    }
}

impl From<CommentDump> for CommentNode {
    fn from(dump: CommentDump) -> Self {
        let kind = match dump.kind {
            KindField::Code(code) => CommentKind::from_raw(code),
            KindField::Name(name) => CommentKind::from_name(&name).unwrap_or_else(|| {
                tracing::debug!(kind = %name, "unrecognized comment kind");
                CommentKind::Unknown(u32::MAX)
            }),
        };
        CommentNode::new(
            kind,
            dump.payload,
            dump.children.into_iter().map(CommentNode::from).collect(),
        )
    }
}

struct Node {
    info: Option<CursorInfo>,
    comment: Option<CommentNode>,
    children: Vec<usize>,
}

/// Cursor tree loaded from a dump. Cursor `0` is the translation unit.
pub struct DumpUnit {
    file: Option<String>,
    nodes: Vec<Node>,
}

impl DumpUnit {
    /// Load a unit from dump text. `path` is only used for error messages.
    pub fn from_json(path: &Path, json: &str) -> Result<Self, ParseError> {
        let dump: UnitDump = serde_json::from_str(json).map_err(|source| ParseError::Dump {
            path: path.to_path_buf(),
            source,
        })?;

        if !dump.errors.is_empty() {
            return Err(ParseError::FrontEnd {
                path: path.to_path_buf(),
                message: dump.errors.join("; "),
            });
        }

        let mut unit = DumpUnit {
            file: dump.file,
            nodes: vec![Node {
                info: None,
                comment: None,
                children: Vec::new(),
            }],
        };
        for cursor in dump.cursors {
            let id = unit.insert(cursor);
            unit.nodes[0].children.push(id);
        }
        Ok(unit)
    }

    /// The source file the dump describes, when the helper recorded it.
    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }

    fn insert(&mut self, cursor: CursorDump) -> usize {
        let info = match (cursor.kind, cursor.offset, cursor.length) {
            (Some(kind), Some(offset), Some(length)) => Some(CursorInfo {
                spelling: cursor.spelling,
                usr: cursor.usr.filter(|usr| !usr.is_empty()),
                kind: kind.into(),
                offset,
                length,
            }),
            _ => None,
        };
        let id = self.nodes.len();
        self.nodes.push(Node {
            info,
            comment: cursor.comment.map(CommentNode::from),
            children: Vec::new(),
        });
        for child in cursor.children {
            let child_id = self.insert(child);
            self.nodes[id].children.push(child_id);
        }
        id
    }
}

impl TranslationUnit for DumpUnit {
    type Cursor = usize;

    fn root(&self) -> usize {
        0
    }

    fn children(&self, cursor: &usize) -> Vec<usize> {
        self.nodes
            .get(*cursor)
            .map(|node| node.children.clone())
            .unwrap_or_default()
    }

    fn info(&self, cursor: &usize) -> Option<CursorInfo> {
        self.nodes.get(*cursor).and_then(|node| node.info.clone())
    }

    fn full_comment(&self, cursor: &usize) -> Option<CommentNode> {
        self.nodes.get(*cursor).and_then(|node| node.comment.clone())
    }
}

/// Reads `.json` cursor dumps from disk. Compiler arguments were already
/// applied by the helper that produced the dump.
#[derive(Debug, Default, Clone, Copy)]
pub struct DumpFrontEnd;

impl FrontEnd for DumpFrontEnd {
    type Unit = DumpUnit;

    fn parse(&self, path: &Path, _args: &[String]) -> Result<DumpUnit, ParseError> {
        let json = fs::read_to_string(path).map_err(|source| ParseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        DumpUnit::from_json(path, &json)
    }
}
