//! XML renderer — the `<jazz>` document consumed by the site generator.

use crate::escape::escape_attr;
use crate::model::{Entity, EntityTree};
use crate::render::Renderer;

pub struct XmlRenderer;

impl Renderer for XmlRenderer {
    fn render(&self, tree: &EntityTree) -> String {
        let mut out = String::new();
        out.push_str("<?xml version=\"1.0\"?>\n");
        if tree.entities.is_empty() {
            out.push_str("<jazz/>\n");
            return out;
        }
        out.push_str("<jazz>\n");
        for entity in &tree.entities {
            render_entity(entity, 1, &mut out);
        }
        out.push_str("</jazz>\n");
        out
    }

    fn file_extension(&self) -> &str {
        "xml"
    }
}

fn render_entity(entity: &Entity, level: usize, out: &mut String) {
    let indent = "  ".repeat(level);
    out.push_str(&format!(
        "{}<entity name=\"{}\" kind=\"{}\" usr=\"{}\" offset=\"{}\" length=\"{}\"",
        indent,
        escape_attr(&entity.name),
        entity.kind.name(),
        escape_attr(&entity.usr),
        entity.offset,
        entity.length
    ));

    if entity.docs.is_none() && entity.conforms.is_empty() && entity.entities.is_empty() {
        out.push_str("/>\n");
        return;
    }
    out.push_str(">\n");

    // Already rendered XML, emitted as-is
    if let Some(ref docs) = entity.docs {
        out.push_str(&format!("{}  <docs>{}</docs>\n", indent, docs));
    }
    for target in &entity.conforms {
        out.push_str(&format!(
            "{}  <conforms name=\"{}\" usr=\"{}\"/>\n",
            indent,
            escape_attr(&target.name),
            escape_attr(&target.usr)
        ));
    }
    for child in &entity.entities {
        render_entity(child, level + 1, out);
    }
    out.push_str(&format!("{}</entity>\n", indent));
}
