//! Renderer module — trait-based format dispatch.

pub mod json;
pub mod xml;

use crate::model::EntityTree;
use anyhow::{anyhow, Result};

/// Trait for rendering an entity tree into a specific output format.
pub trait Renderer {
    fn render(&self, tree: &EntityTree) -> String;
    fn file_extension(&self) -> &str;
}

/// Create a renderer for the given format name.
pub fn create_renderer(format: &str) -> Result<Box<dyn Renderer>> {
    match format {
        "xml" => Ok(Box::new(xml::XmlRenderer)),
        "json" => Ok(Box::new(json::JsonRenderer)),
        _ => Err(anyhow!("unknown format: {}. Use xml or json", format)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_formats() {
        assert_eq!(create_renderer("xml").unwrap().file_extension(), "xml");
        assert_eq!(create_renderer("json").unwrap().file_extension(), "json");
        assert!(create_renderer("markdown").is_err());
    }
}
