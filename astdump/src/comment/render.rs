//! Comment tree → normalized XML text.

use super::{CommentKind, CommentNode};
use crate::escape::{element_name, escape_attr, escape_text};

/// Render a comment tree. Pure: the same tree always renders the same text.
pub fn render(node: &CommentNode) -> String {
    let mut out = String::new();
    render_into(node, &mut out);
    out
}

fn render_into(node: &CommentNode, out: &mut String) {
    match node.kind {
        CommentKind::Null | CommentKind::Unknown(_) => {}
        CommentKind::Text => out.push_str(&escape_text(node.payload())),
        CommentKind::Paragraph | CommentKind::FullComment => render_children(node, out),
        CommentKind::InlineCommand | CommentKind::BlockCommand => {
            match element_name(node.payload()) {
                Some(name) => wrap(&name, None, node, out),
                None => render_children(node, out),
            }
        }
        CommentKind::ParamCommand => wrap("param", Some(node.payload()), node, out),
        CommentKind::TParamCommand => wrap("tparam", Some(node.payload()), node, out),
        CommentKind::HtmlStartTag => {
            if let Some(tag) = element_name(node.payload()) {
                raw_html(&format!("<{}>", tag), out);
            }
        }
        CommentKind::HtmlEndTag => {
            if let Some(tag) = element_name(node.payload()) {
                raw_html(&format!("</{}>", tag), out);
            }
        }
        CommentKind::VerbatimBlockCommand => {
            for child in &node.children {
                if child.kind == CommentKind::Paragraph {
                    render_children(child, out);
                } else {
                    render_into(child, out);
                }
            }
        }
        CommentKind::VerbatimBlockLine | CommentKind::VerbatimLine => {
            out.push_str(&escape_text(node.payload()));
            out.push('\n');
        }
    }
}

fn render_children(node: &CommentNode, out: &mut String) {
    for child in &node.children {
        render_into(child, out);
    }
}

/// HTML in comments need not balance (`<br>`, a stray `</p>`), so each tag is
/// carried as character data instead of markup.
fn raw_html(tag: &str, out: &mut String) {
    out.push_str("<rawHTML><![CDATA[");
    out.push_str(tag);
    out.push_str("]]></rawHTML>");
}

/// Emit `<name attrs>children</name>`, or `<name attrs/>` when there are no children.
fn wrap(name: &str, param: Option<&str>, node: &CommentNode, out: &mut String) {
    out.push('<');
    out.push_str(name);
    if let Some(param) = param {
        out.push_str(&format!(" name=\"{}\"", escape_attr(param)));
    }
    if node.children.is_empty() {
        out.push_str("/>");
        return;
    }
    out.push('>');
    render_children(node, out);
    out.push_str(&format!("</{}>", name));
}
