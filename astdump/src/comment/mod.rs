//! Documentation comment trees as exposed by a compiler front end.

pub mod doxygen;
pub mod render;

pub use render::render;

/// Kind of a comment node. Raw codes follow libclang's `CXCommentKind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommentKind {
    Null,
    Text,
    InlineCommand,
    HtmlStartTag,
    HtmlEndTag,
    Paragraph,
    BlockCommand,
    ParamCommand,
    TParamCommand,
    VerbatimBlockCommand,
    VerbatimBlockLine,
    VerbatimLine,
    FullComment,
    /// A kind newer than this crate; renders as nothing.
    Unknown(u32),
}

impl CommentKind {
    const NAMED: [(CommentKind, &'static str); 13] = [
        (Self::Null, "null"),
        (Self::Text, "text"),
        (Self::InlineCommand, "inline-command"),
        (Self::HtmlStartTag, "html-start-tag"),
        (Self::HtmlEndTag, "html-end-tag"),
        (Self::Paragraph, "paragraph"),
        (Self::BlockCommand, "block-command"),
        (Self::ParamCommand, "param-command"),
        (Self::TParamCommand, "tparam-command"),
        (Self::VerbatimBlockCommand, "verbatim-block-command"),
        (Self::VerbatimBlockLine, "verbatim-block-line"),
        (Self::VerbatimLine, "verbatim-line"),
        (Self::FullComment, "full-comment"),
    ];

    pub fn from_raw(code: u32) -> Self {
        Self::NAMED
            .get(code as usize)
            .map(|(kind, _)| *kind)
            .unwrap_or(Self::Unknown(code))
    }

    /// Look up a kebab-case kind name; `None` for names this crate does not know.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::NAMED
            .iter()
            .find(|(_, n)| *n == name)
            .map(|(kind, _)| *kind)
    }
}

/// One node of a parsed documentation comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentNode {
    pub kind: CommentKind,
    /// Literal text, command name, tag name or parameter name depending on `kind`.
    pub payload: Option<String>,
    pub children: Vec<CommentNode>,
}

impl CommentNode {
    pub fn new(kind: CommentKind, payload: Option<String>, children: Vec<CommentNode>) -> Self {
        Self {
            kind,
            payload,
            children,
        }
    }

    pub fn null() -> Self {
        Self::new(CommentKind::Null, None, Vec::new())
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new(CommentKind::Text, Some(text.into()), Vec::new())
    }

    pub fn paragraph(children: Vec<CommentNode>) -> Self {
        Self::new(CommentKind::Paragraph, None, children)
    }

    pub fn full(children: Vec<CommentNode>) -> Self {
        Self::new(CommentKind::FullComment, None, children)
    }

    pub fn inline_command(name: impl Into<String>, children: Vec<CommentNode>) -> Self {
        Self::new(CommentKind::InlineCommand, Some(name.into()), children)
    }

    pub fn block_command(name: impl Into<String>, children: Vec<CommentNode>) -> Self {
        Self::new(CommentKind::BlockCommand, Some(name.into()), children)
    }

    pub fn param(name: impl Into<String>, children: Vec<CommentNode>) -> Self {
        Self::new(CommentKind::ParamCommand, Some(name.into()), children)
    }

    pub fn tparam(name: impl Into<String>, children: Vec<CommentNode>) -> Self {
        Self::new(CommentKind::TParamCommand, Some(name.into()), children)
    }

    pub fn html_start(tag: impl Into<String>) -> Self {
        Self::new(CommentKind::HtmlStartTag, Some(tag.into()), Vec::new())
    }

    pub fn html_end(tag: impl Into<String>) -> Self {
        Self::new(CommentKind::HtmlEndTag, Some(tag.into()), Vec::new())
    }

    pub fn verbatim_block(name: impl Into<String>, children: Vec<CommentNode>) -> Self {
        Self::new(CommentKind::VerbatimBlockCommand, Some(name.into()), children)
    }

    pub fn verbatim_block_line(text: impl Into<String>) -> Self {
        Self::new(CommentKind::VerbatimBlockLine, Some(text.into()), Vec::new())
    }

    pub fn verbatim_line(text: impl Into<String>) -> Self {
        Self::new(CommentKind::VerbatimLine, Some(text.into()), Vec::new())
    }

    pub fn payload(&self) -> &str {
        self.payload.as_deref().unwrap_or("")
    }
}
