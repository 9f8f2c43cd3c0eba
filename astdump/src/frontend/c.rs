//! tree-sitter-c front end for C headers and sources.
//!
//! Produces the same cursor shapes libclang reports for declarations:
//! functions with their parameters, globals, records with fields, enums with
//! constants and typedefs with a type reference. Preprocessor conditionals are
//! transparent so include guards don't hide the header's contents.

use super::{CursorInfo, FrontEnd, RawKind, TranslationUnit};
use crate::comment::{doxygen, CommentNode};
use crate::error::ParseError;
use crate::kind::raw;
use std::fs;
use std::path::Path;
use tracing::debug;
use tree_sitter::{Node as TsNode, Parser};

struct CNode {
    info: Option<CursorInfo>,
    comment: Option<CommentNode>,
    children: Vec<usize>,
}

/// Cursor tree extracted from one C file. Cursor `0` is the translation unit.
pub struct CUnit {
    nodes: Vec<CNode>,
}

impl CUnit {
    /// Parse C source text. Any syntax error fails the whole file.
    pub fn parse(path: &Path, source: &str) -> Result<Self, ParseError> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_c::language())
            .map_err(|e| ParseError::FrontEnd {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        let tree = parser
            .parse(source.as_bytes(), None)
            .ok_or_else(|| ParseError::FrontEnd {
                path: path.to_path_buf(),
                message: "parser produced no tree".to_string(),
            })?;

        let root = tree.root_node();
        if root.has_error() {
            let (line, column) = first_error(root)
                .map(|node| node.start_position())
                .map_or((1, 1), |p| (p.row + 1, p.column + 1));
            return Err(ParseError::Syntax {
                path: path.to_path_buf(),
                line,
                column,
            });
        }

        let file = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();
        let mut builder = Builder {
            source,
            file,
            nodes: vec![CNode {
                info: None,
                comment: None,
                children: Vec::new(),
            }],
        };
        builder.container(root, 0, None);
        debug!(
            path = %path.display(),
            cursors = builder.nodes.len() - 1,
            "extracted C cursors"
        );
        Ok(CUnit {
            nodes: builder.nodes,
        })
    }
}

impl TranslationUnit for CUnit {
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

/// Parses `.h` and `.c` files with tree-sitter-c.
#[derive(Debug, Default, Clone, Copy)]
pub struct CFrontEnd;

impl FrontEnd for CFrontEnd {
    type Unit = CUnit;

    fn parse(&self, path: &Path, args: &[String]) -> Result<CUnit, ParseError> {
        if !args.is_empty() {
            debug!(?args, "compiler arguments have no effect on the C front end");
        }
        let source = fs::read_to_string(path).map_err(|source| ParseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        CUnit::parse(path, &source)
    }
}

fn first_error(node: TsNode<'_>) -> Option<TsNode<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let children: Vec<_> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .filter(|child| child.has_error() || child.is_missing())
        .find_map(first_error)
}

/// Doc comment text waiting for the declaration that follows it.
struct Pending {
    text: String,
    end: usize,
}

enum Declarator<'t> {
    Function {
        name: String,
        params: Option<TsNode<'t>>,
    },
    Variable {
        name: String,
    },
}

impl Declarator<'_> {
    fn name(&self) -> &str {
        match self {
            Declarator::Function { name, .. } | Declarator::Variable { name } => name,
        }
    }
}

struct Builder<'s> {
    source: &'s str,
    file: String,
    nodes: Vec<CNode>,
}

impl<'s> Builder<'s> {
    fn text(&self, node: TsNode<'_>) -> &'s str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }

    fn push(&mut self, parent: usize, spelling: &str, usr: String, code: u32, start: usize, end: usize) -> usize {
        let id = self.nodes.len();
        self.nodes.push(CNode {
            info: Some(CursorInfo {
                spelling: spelling.to_string(),
                usr: Some(usr),
                kind: RawKind::Code(code),
                offset: start,
                length: end.saturating_sub(start),
            }),
            comment: None,
            children: Vec::new(),
        });
        self.nodes[parent].children.push(id);
        id
    }

    /// Walk the items of a translation unit, record body or enumerator list.
    fn container(&mut self, node: TsNode<'_>, parent: usize, parent_usr: Option<&str>) {
        let mut cursor = node.walk();
        let items: Vec<_> = node.named_children(&mut cursor).collect();

        let mut pending: Option<Pending> = None;
        let mut last: Option<usize> = None;
        for item in items {
            match item.kind() {
                "comment" => {
                    let raw = self.text(item);
                    if doxygen::is_trailing_comment(raw) {
                        if let Some(id) = last {
                            self.nodes[id].comment = Some(doxygen::parse(raw));
                        }
                        pending = None;
                    } else if doxygen::is_doc_comment(raw) {
                        pending = Some(match pending.take() {
                            Some(prev) if self.only_whitespace(prev.end, item.start_byte()) => Pending {
                                text: format!("{}\n{}", prev.text, raw),
                                end: item.end_byte(),
                            },
                            _ => Pending {
                                text: raw.to_string(),
                                end: item.end_byte(),
                            },
                        });
                    } else {
                        pending = None;
                    }
                }
                "preproc_ifdef" | "preproc_if" | "preproc_else" | "preproc_elif" | "preproc_elifdef" => {
                    self.container(item, parent, parent_usr);
                    pending = None;
                    last = None;
                }
                _ => {
                    let doc = pending
                        .take()
                        .filter(|p| self.only_whitespace(p.end, item.start_byte()))
                        .map(|p| doxygen::parse(&p.text));
                    last = self.declaration(item, parent, parent_usr, doc);
                }
            }
        }
    }

    fn only_whitespace(&self, from: usize, to: usize) -> bool {
        self.source
            .get(from..to)
            .is_some_and(|gap| gap.trim().is_empty())
    }

    /// Emit cursors for one item; returns the cursor a trailing comment would document.
    fn declaration(
        &mut self,
        node: TsNode<'_>,
        parent: usize,
        parent_usr: Option<&str>,
        doc: Option<CommentNode>,
    ) -> Option<usize> {
        let mut ids: Vec<usize> = Vec::new();
        let mut spec_id = None;

        match node.kind() {
            "struct_specifier" | "union_specifier" | "enum_specifier" => {
                spec_id = self.specifier(node, parent, parent_usr);
            }
            "function_definition" => {
                if let Some(Declarator::Function { name, params }) = node
                    .child_by_field_name("declarator")
                    .and_then(|d| self.classify(d))
                {
                    ids.push(self.function(parent, &name, params, node.start_byte(), node.end_byte()));
                }
            }
            "declaration" | "field_declaration" => {
                if let Some(spec) = node.child_by_field_name("type") {
                    spec_id = self.specifier(spec, parent, parent_usr);
                }
                let mut cursor = node.walk();
                let declarators: Vec<_> = node.children_by_field_name("declarator", &mut cursor).collect();
                for declarator in declarators {
                    let Some(decl) = self.classify(declarator) else { continue };
                    let (start, end) = (node.start_byte(), declarator.end_byte());
                    let id = match (node.kind(), decl) {
                        ("field_declaration", decl) => {
                            let usr = format!("{}@FI@{}", parent_usr.unwrap_or("c:"), decl.name());
                            self.push(parent, decl.name(), usr, raw::FIELD_DECL, start, end)
                        }
                        (_, Declarator::Function { name, params }) => {
                            self.function(parent, &name, params, start, end)
                        }
                        (_, Declarator::Variable { name }) => {
                            let usr = format!("c:@{}", name);
                            self.push(parent, &name, usr, raw::VAR_DECL, start, end)
                        }
                    };
                    ids.push(id);
                }
            }
            "type_definition" => {
                let ty = node.child_by_field_name("type");
                if let Some(spec) = ty {
                    spec_id = self.specifier(spec, parent, parent_usr);
                }
                let mut cursor = node.walk();
                let declarators: Vec<_> = node.children_by_field_name("declarator", &mut cursor).collect();
                for declarator in declarators {
                    let Some(decl) = self.classify(declarator) else { continue };
                    let usr = format!("c:{}@T@{}", self.file, decl.name());
                    let id = self.push(
                        parent,
                        decl.name(),
                        usr,
                        raw::TYPEDEF_DECL,
                        node.start_byte(),
                        declarator.end_byte(),
                    );
                    if let Some(ty) = ty {
                        self.type_ref(id, ty);
                    }
                    ids.push(id);
                }
            }
            "enumerator" => {
                if let Some(name) = node.child_by_field_name("name") {
                    let name = self.text(name);
                    let usr = format!("{}@{}", parent_usr.unwrap_or("c:"), name);
                    ids.push(self.push(
                        parent,
                        name,
                        usr,
                        raw::ENUM_CONSTANT_DECL,
                        node.start_byte(),
                        node.end_byte(),
                    ));
                }
            }
            _ => {}
        }

        let target = ids.first().copied().or(spec_id);
        if let (Some(id), Some(doc)) = (target, doc) {
            self.nodes[id].comment = Some(doc);
        }
        ids.last().copied().or(spec_id)
    }

    /// Emit a struct, union or enum definition; forward references emit nothing.
    fn specifier(&mut self, spec: TsNode<'_>, parent: usize, parent_usr: Option<&str>) -> Option<usize> {
        let (code, tag) = match spec.kind() {
            "struct_specifier" => (raw::STRUCT_DECL, "S"),
            "union_specifier" => (raw::UNION_DECL, "U"),
            "enum_specifier" => (raw::ENUM_DECL, "E"),
            _ => return None,
        };
        let body = spec.child_by_field_name("body")?;
        let name = spec
            .child_by_field_name("name")
            .map(|n| self.text(n))
            .unwrap_or("");

        let usr = match (name.is_empty(), parent_usr) {
            (true, _) => format!("c:{}@{}", self.file, spec.start_byte()),
            (false, Some(outer)) if code != raw::ENUM_DECL => format!("{}@{}@{}", outer, tag, name),
            (false, _) => format!("c:@{}@{}", tag, name),
        };
        let id = self.push(parent, name, usr.clone(), code, spec.start_byte(), spec.end_byte());
        self.container(body, id, Some(&usr));
        Some(id)
    }

    fn function(&mut self, parent: usize, name: &str, params: Option<TsNode<'_>>, start: usize, end: usize) -> usize {
        let id = self.push(parent, name, format!("c:@F@{}", name), raw::FUNCTION_DECL, start, end);
        let Some(params) = params else { return id };

        let mut cursor = params.walk();
        let list: Vec<_> = params.named_children(&mut cursor).collect();
        for param in list {
            if param.kind() != "parameter_declaration" {
                continue;
            }
            let Some(decl) = param
                .child_by_field_name("declarator")
                .and_then(|d| self.classify(d))
            else {
                continue;
            };
            let usr = format!("c:{}@{}@F@{}@{}", self.file, param.start_byte(), name, decl.name());
            self.push(
                id,
                decl.name(),
                usr,
                raw::PARM_DECL,
                param.start_byte(),
                param.end_byte(),
            );
        }
        id
    }

    /// Reference from a typedef to the named type it aliases.
    fn type_ref(&mut self, typedef: usize, ty: TsNode<'_>) {
        let (spelling, usr) = match ty.kind() {
            "type_identifier" => {
                let name = self.text(ty);
                (name.to_string(), format!("c:{}@T@{}", self.file, name))
            }
            "struct_specifier" | "union_specifier" | "enum_specifier" => {
                let Some(name) = ty.child_by_field_name("name").map(|n| self.text(n)) else {
                    return;
                };
                let (keyword, tag) = match ty.kind() {
                    "struct_specifier" => ("struct", "S"),
                    "union_specifier" => ("union", "U"),
                    _ => ("enum", "E"),
                };
                (format!("{} {}", keyword, name), format!("c:@{}@{}", tag, name))
            }
            _ => return,
        };
        self.push(typedef, &spelling, usr, raw::TYPE_REF, ty.start_byte(), ty.end_byte());
    }

    fn classify<'t>(&self, node: TsNode<'t>) -> Option<Declarator<'t>> {
        match node.kind() {
            "identifier" | "field_identifier" | "type_identifier" => Some(Declarator::Variable {
                name: self.text(node).to_string(),
            }),
            "function_declarator" => {
                let inner = node.child_by_field_name("declarator")?;
                match inner.kind() {
                    "identifier" | "field_identifier" => Some(Declarator::Function {
                        name: self.text(inner).to_string(),
                        params: node.child_by_field_name("parameters"),
                    }),
                    // `int (*fp)(int)` declares a pointer, not a function
                    _ => self.classify(inner).map(|d| Declarator::Variable {
                        name: d.name().to_string(),
                    }),
                }
            }
            "pointer_declarator" | "array_declarator" | "init_declarator" | "attributed_declarator"
            | "parenthesized_declarator" => {
                let inner = node
                    .child_by_field_name("declarator")
                    .or_else(|| node.named_child(0))?;
                self.classify(inner)
            }
            _ => None,
        }
    }
}
