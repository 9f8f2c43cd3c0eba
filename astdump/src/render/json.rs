//! JSON renderer — SourceKitten-style structure dictionaries.
//!
//! Keys use the `key.*` spelling so existing SourceKitten consumers can read
//! the output. Object keys come out sorted, which keeps output stable.

use crate::model::{Entity, EntityTree};
use crate::render::Renderer;
use serde_json::{json, Map, Value};

pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, tree: &EntityTree) -> String {
        let doc = json!({
            "key.diagnostic_stage": "",
            "key.filepath": tree.path.to_string_lossy(),
            "key.substructure": tree.entities.iter().map(entity_json).collect::<Vec<_>>(),
        });
        format!("{:#}\n", doc)
    }

    fn file_extension(&self) -> &str {
        "json"
    }
}

fn entity_json(entity: &Entity) -> Value {
    let mut obj = Map::new();
    obj.insert("key.name".into(), json!(entity.name));
    obj.insert("key.kind".into(), json!(entity.kind.name()));
    obj.insert("key.usr".into(), json!(entity.usr));
    obj.insert("key.offset".into(), json!(entity.offset));
    obj.insert("key.length".into(), json!(entity.length));
    if let Some(ref docs) = entity.docs {
        obj.insert("key.doc.full_as_xml".into(), json!(docs));
    }
    if !entity.conforms.is_empty() {
        let inherited: Vec<Value> = entity
            .conforms
            .iter()
            .map(|r| json!({ "key.name": r.name, "key.usr": r.usr }))
            .collect();
        obj.insert("key.inheritedtypes".into(), Value::Array(inherited));
    }
    if !entity.entities.is_empty() {
        let children: Vec<Value> = entity.entities.iter().map(entity_json).collect();
        obj.insert("key.substructure".into(), Value::Array(children));
    }
    Value::Object(obj)
}
