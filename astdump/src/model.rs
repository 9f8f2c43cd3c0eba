//! Entity tree: the format-agnostic result of documenting one file.

use crate::kind::DeclarationKind;
use std::collections::HashSet;
use std::path::PathBuf;

/// One declaration or reference found in the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    /// May be empty for anonymous declarations.
    pub name: String,
    pub usr: String,
    pub offset: usize,
    pub length: usize,
    pub kind: DeclarationKind,
    /// Owned children, in traversal order.
    pub entities: Vec<Entity>,
    /// Non-owning references to the types this entity conforms to.
    pub conforms: Vec<EntityRef>,
    /// Rendered XML documentation.
    pub docs: Option<String>,
}

/// Reference to another entity by name and USR. The target may not exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityRef {
    pub name: String,
    pub usr: String,
}

impl Entity {
    pub fn new(
        name: impl Into<String>,
        usr: impl Into<String>,
        offset: usize,
        length: usize,
        kind: DeclarationKind,
    ) -> Self {
        Self {
            name: name.into(),
            usr: usr.into(),
            offset,
            length,
            kind,
            entities: Vec::new(),
            conforms: Vec::new(),
            docs: None,
        }
    }

    pub fn add_child(&mut self, child: Entity) {
        self.entities.push(child);
    }

    /// Duplicates are kept.
    pub fn add_conformance(&mut self, target: EntityRef) {
        self.conforms.push(target);
    }

    /// Replace the documentation, returning what was there before.
    pub fn set_documentation(&mut self, docs: impl Into<String>) -> Option<String> {
        self.docs.replace(docs.into())
    }
}

/// Whether `offset` lies in `[start, start + length)`; a zero-length range
/// contains only its own start.
pub(crate) fn range_contains(start: usize, length: usize, offset: usize) -> bool {
    if length == 0 {
        offset == start
    } else {
        offset >= start && offset - start < length
    }
}

/// All entities documented from one source file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityTree {
    pub path: PathBuf,
    pub entities: Vec<Entity>,
}

impl EntityTree {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entities: Vec::new(),
        }
    }

    /// Every entity with its depth (1 for top level), pre-order.
    pub fn walk(&self) -> Vec<(usize, &Entity)> {
        fn push<'a>(entity: &'a Entity, depth: usize, out: &mut Vec<(usize, &'a Entity)>) {
            out.push((depth, entity));
            for child in &entity.entities {
                push(child, depth + 1, out);
            }
        }
        let mut out = Vec::new();
        for entity in &self.entities {
            push(entity, 1, &mut out);
        }
        out
    }

    /// Find the entity a conformance points at: by USR, then by name.
    pub fn resolve(&self, target: &EntityRef) -> Option<&Entity> {
        let all = self.walk();
        if !target.usr.is_empty() {
            if let Some((_, e)) = all.iter().find(|(_, e)| e.usr == target.usr) {
                return Some(e);
            }
        }
        if target.name.is_empty() {
            return None;
        }
        all.into_iter()
            .map(|(_, e)| e)
            .find(|e| e.name == target.name && !e.kind.is_reference())
    }

    /// Conformances whose target is not in this tree, using the same USR
    /// then name rules as [`EntityTree::resolve`].
    pub fn dangling_conformances(&self) -> Vec<&EntityRef> {
        let all = self.walk();
        let usrs: HashSet<&str> = all.iter().map(|&(_, e)| e.usr.as_str()).collect();
        let names: HashSet<&str> = all
            .iter()
            .filter(|(_, e)| !e.kind.is_reference())
            .map(|&(_, e)| e.name.as_str())
            .collect();

        all.iter()
            .flat_map(|&(_, e)| e.conforms.iter())
            .filter(|target| {
                let by_usr = !target.usr.is_empty() && usrs.contains(target.usr.as_str());
                let by_name = !target.name.is_empty() && names.contains(target.name.as_str());
                !by_usr && !by_name
            })
            .collect()
    }
}
