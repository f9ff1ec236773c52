//! Namespace hierarchy.
//!
//! Nodes live in an arena and refer to their parent by [`NamespaceId`], so
//! lookups can walk outward without owning back-references. Nodes are only
//! created by [`NamespaceTree::resolve_qualified_path`] and never removed.

use panda_ir::ast::Ident;
use rustc_hash::FxHashMap;

use crate::ids::{ClassId, EnumId, FuncId, InterfaceId, NamespaceId, VarId};

/// One table per declaration kind. Keys are unique within a table.
#[derive(Clone, Debug, Default)]
pub struct DeclTables {
    pub variables: FxHashMap<String, VarId>,
    pub functions: FxHashMap<String, FuncId>,
    pub enums: FxHashMap<String, EnumId>,
    pub interfaces: FxHashMap<String, InterfaceId>,
    pub classes: FxHashMap<String, ClassId>,
}

/// Insert `name -> id` unless `name` is taken.
///
/// On conflict the table is left unchanged and the id already registered
/// under `name` is returned.
pub fn insert_declaration<Id: Copy>(
    table: &mut FxHashMap<String, Id>,
    name: &Ident,
    id: Id,
) -> Result<(), Id> {
    if let Some(&existing) = table.get(&name.name) {
        return Err(existing);
    }
    table.insert(name.name.clone(), id);
    Ok(())
}

#[derive(Clone, Debug)]
pub struct NamespaceNode {
    /// Last path segment; empty for the root.
    pub name: String,
    /// Dotted path from the root; empty for the root.
    pub path: String,
    pub parent: Option<NamespaceId>,
    pub children: FxHashMap<String, NamespaceId>,
    pub tables: DeclTables,
}

#[derive(Clone, Debug)]
pub struct NamespaceTree {
    nodes: Vec<NamespaceNode>,
}

impl Default for NamespaceTree {
    fn default() -> Self {
        Self::new()
    }
}

impl NamespaceTree {
    /// Tree holding only the root.
    pub fn new() -> Self {
        NamespaceTree {
            nodes: vec![NamespaceNode {
                name: String::new(),
                path: String::new(),
                parent: None,
                children: FxHashMap::default(),
                tables: DeclTables::default(),
            }],
        }
    }

    /// Node for `segments`, creating missing intermediate nodes.
    pub fn resolve_qualified_path(&mut self, segments: &[Ident]) -> NamespaceId {
        let mut current = NamespaceId::ROOT;
        for segment in segments {
            current = match self.nodes[current.index()].children.get(&segment.name) {
                Some(&child) => child,
                None => {
                    let id = NamespaceId::from_len(self.nodes.len());
                    let path = self.qualify(current, &segment.name);
                    self.nodes.push(NamespaceNode {
                        name: segment.name.clone(),
                        path,
                        parent: Some(current),
                        children: FxHashMap::default(),
                        tables: DeclTables::default(),
                    });
                    self.nodes[current.index()]
                        .children
                        .insert(segment.name.clone(), id);
                    id
                }
            };
        }
        current
    }

    pub fn node(&self, id: NamespaceId) -> &NamespaceNode {
        &self.nodes[id.index()]
    }

    pub fn node_mut(&mut self, id: NamespaceId) -> &mut NamespaceNode {
        &mut self.nodes[id.index()]
    }

    pub fn parent(&self, id: NamespaceId) -> Option<NamespaceId> {
        self.node(id).parent
    }

    pub fn child(&self, id: NamespaceId, name: &str) -> Option<NamespaceId> {
        self.node(id).children.get(name).copied()
    }

    /// `id` followed by its ancestors up to the root.
    pub fn ancestors(&self, id: NamespaceId) -> impl Iterator<Item = NamespaceId> + '_ {
        std::iter::successors(Some(id), |&n| self.parent(n))
    }

    /// Dotted name of `name` declared in `id`.
    pub fn qualify(&self, id: NamespaceId, name: &str) -> String {
        let path = &self.node(id).path;
        if path.is_empty() {
            name.to_owned()
        } else {
            format!("{path}.{name}")
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests;
