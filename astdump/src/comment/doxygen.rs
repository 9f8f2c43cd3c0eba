//! Doxygen-style comment parser.
//!
//! Turns raw `/** ... */` or `///` comment text into the same [`CommentNode`]
//! structure a compiler's parsed-comment API reports:
//! - blank-line separated text → paragraphs
//! - `@param name ...` / `\param[in] name ...` → param commands
//! - `@tparam T ...` → type-param commands
//! - `@code` ... `@endcode`, `@verbatim` ... `@endverbatim` → verbatim blocks
//! - `@fn`, `@var`, `@typedef`, ... → verbatim lines
//! - any other line-leading `@word` → block commands
//! - `@c word`, `\p word`, `<b>`, `</b>` inside text → inline commands and HTML tags

use super::CommentNode;
use regex::Regex;
use std::sync::LazyLock;

static RE_COMMAND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[@\\]([A-Za-z]+)(\[[A-Za-z, ]*\])?(?:\s+(.*))?$").unwrap());

static RE_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\[[A-Za-z, ]*\]\s*)?([A-Za-z_][A-Za-z0-9_]*)\s*(.*)$").unwrap());

static RE_INLINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[@\\](em|c|p|a|e|b)\s+([^\s<]+)|<(/?)([A-Za-z][A-Za-z0-9]*)(?:\s[^>]*)?/?>")
        .unwrap()
});

const INLINE_COMMANDS: &[&str] = &["em", "c", "p", "a", "e", "b"];

const VERBATIM_LINE_COMMANDS: &[&str] = &[
    "fn", "var", "typedef", "property", "def", "name", "defgroup", "ingroup", "addtogroup",
];

const COMMENT_OPENERS: &[&str] = &["///<", "//!<", "///", "//!", "/**<", "/*!<", "/**", "/*!"];

/// Closing command for a verbatim block opener.
fn verbatim_end(name: &str) -> Option<&'static str> {
    match name {
        "code" => Some("endcode"),
        "verbatim" => Some("endverbatim"),
        _ => None,
    }
}

/// Whether raw comment text is a documentation comment at all.
pub fn is_doc_comment(raw: &str) -> bool {
    let raw = raw.trim_start();
    if raw.starts_with("/**/") || raw.starts_with("////") {
        return false;
    }
    COMMENT_OPENERS.iter().any(|opener| raw.starts_with(opener))
}

/// Whether the comment documents the declaration before it (`///<`, `/**<`).
pub fn is_trailing_comment(raw: &str) -> bool {
    let raw = raw.trim_start();
    ["///<", "//!<", "/**<", "/*!<"]
        .iter()
        .any(|opener| raw.starts_with(opener))
}

/// Parse raw comment text into a full-comment node.
pub fn parse(raw: &str) -> CommentNode {
    let lines = content_lines(raw);
    let mut blocks: Vec<CommentNode> = Vec::new();
    let mut current: Option<Block> = None;

    let mut i = 0;
    while i < lines.len() {
        let trimmed = lines[i].trim();
        i += 1;

        if trimmed.is_empty() {
            flush(&mut current, &mut blocks);
            continue;
        }

        if let Some(caps) = RE_COMMAND.captures(trimmed) {
            let name = caps[1].to_string();
            let rest = caps.get(3).map_or("", |m| m.as_str()).trim();

            if let Some(end) = verbatim_end(&name) {
                flush(&mut current, &mut blocks);
                let mut body = Vec::new();
                if !rest.is_empty() {
                    body.push(CommentNode::verbatim_block_line(rest));
                }
                while i < lines.len() {
                    let line = &lines[i];
                    i += 1;
                    let t = line.trim();
                    if t.len() > 1 && (t.starts_with('@') || t.starts_with('\\')) && &t[1..] == end {
                        break;
                    }
                    body.push(CommentNode::verbatim_block_line(line.as_str()));
                }
                push_block(&mut blocks, CommentNode::verbatim_block(name, body));
                continue;
            }

            if VERBATIM_LINE_COMMANDS.contains(&name.as_str()) {
                flush(&mut current, &mut blocks);
                push_block(&mut blocks, CommentNode::verbatim_line(rest));
                continue;
            }

            if !INLINE_COMMANDS.contains(&name.as_str()) {
                flush(&mut current, &mut blocks);
                current = Some(Block::command(&name, rest));
                continue;
            }
        }

        match current.as_mut() {
            Some(block) => block.lines.push(trimmed.to_string()),
            None => current = Some(Block::paragraph(trimmed)),
        }
    }
    flush(&mut current, &mut blocks);

    CommentNode::full(blocks)
}

enum Head {
    Paragraph,
    Command(String),
    Param(String),
    TParam(String),
}

struct Block {
    head: Head,
    lines: Vec<String>,
}

impl Block {
    fn paragraph(first: &str) -> Self {
        Self {
            head: Head::Paragraph,
            lines: vec![first.to_string()],
        }
    }

    fn command(name: &str, rest: &str) -> Self {
        let (head, text) = match name {
            "param" | "tparam" => match RE_PARAM.captures(rest) {
                Some(caps) => {
                    let param = caps[1].to_string();
                    let text = caps.get(2).map_or("", |m| m.as_str()).to_string();
                    if name == "param" {
                        (Head::Param(param), text)
                    } else {
                        (Head::TParam(param), text)
                    }
                }
                None => (Head::Command(name.to_string()), rest.to_string()),
            },
            _ => (Head::Command(name.to_string()), rest.to_string()),
        };
        let lines = if text.is_empty() { Vec::new() } else { vec![text] };
        Self { head, lines }
    }

    fn into_node(self) -> CommentNode {
        let text = self.lines.join("\n");
        let body = if text.is_empty() {
            Vec::new()
        } else {
            vec![CommentNode::paragraph(inline_nodes(&text))]
        };
        match self.head {
            Head::Paragraph => CommentNode::paragraph(inline_nodes(&text)),
            Head::Command(name) => CommentNode::block_command(name, body),
            Head::Param(name) => CommentNode::param(name, body),
            Head::TParam(name) => CommentNode::tparam(name, body),
        }
    }
}

fn flush(current: &mut Option<Block>, blocks: &mut Vec<CommentNode>) {
    if let Some(block) = current.take() {
        push_block(blocks, block.into_node());
    }
}

/// Blocks after the first are preceded by a line break so rendered text keeps them apart.
fn push_block(blocks: &mut Vec<CommentNode>, node: CommentNode) {
    if !blocks.is_empty() {
        blocks.push(CommentNode::paragraph(vec![CommentNode::text("\n")]));
    }
    blocks.push(node);
}

fn inline_nodes(text: &str) -> Vec<CommentNode> {
    let mut nodes = Vec::new();
    let mut last = 0;
    for caps in RE_INLINE.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        if whole.start() > last {
            nodes.push(CommentNode::text(&text[last..whole.start()]));
        }
        if let (Some(command), Some(word)) = (caps.get(1), caps.get(2)) {
            nodes.push(CommentNode::inline_command(
                command.as_str(),
                vec![CommentNode::text(word.as_str())],
            ));
        } else if let Some(tag) = caps.get(4) {
            let closing = caps.get(3).is_some_and(|m| !m.as_str().is_empty());
            nodes.push(if closing {
                CommentNode::html_end(tag.as_str())
            } else {
                CommentNode::html_start(tag.as_str())
            });
        }
        last = whole.end();
    }
    if last < text.len() {
        nodes.push(CommentNode::text(&text[last..]));
    }
    nodes
}

/// Strip comment markers and `*` decoration, dropping leading/trailing blank lines.
fn content_lines(raw: &str) -> Vec<String> {
    let mut lines: Vec<String> = raw
        .lines()
        .map(|line| {
            let mut l = line.trim_start();
            for opener in COMMENT_OPENERS {
                if let Some(rest) = l.strip_prefix(opener) {
                    l = rest;
                    break;
                }
            }
            let l = l.trim_end();
            let l = l.strip_suffix("*/").unwrap_or(l);
            let l = match l.trim_start().strip_prefix('*') {
                Some(rest) => rest,
                None => l,
            };
            l.strip_prefix(' ').unwrap_or(l).trim_end().to_string()
        })
        .collect();

    while lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }
    let leading = lines.iter().take_while(|l| l.trim().is_empty()).count();
    lines.drain(..leading);
    lines
}
