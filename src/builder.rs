//! Declarative assembly of component hierarchies.

use std::collections::HashMap;

use generational_arena::Index;
use tracing::instrument;

use crate::arena::{ComponentArena, NodeData, NodeKind};
use crate::errors::{HierarchyError, HierarchyResult};

/// Assembles a [`ComponentArena`] from declared nodes and links.
///
/// Declaration order fixes arena insertion order; link call order fixes the
/// child order under each parent. Validation happens in
/// [`build`](Self::build): labels must be unique and declared before use,
/// link parents must be composites, every child gets at most one parent, and
/// link cycles are rejected.
#[derive(Debug)]
pub struct HierarchyBuilder {
    nodes: Vec<(String, NodeKind)>,
    links: Vec<(String, String)>,
}

impl Default for HierarchyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HierarchyBuilder {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            links: Vec::new(),
        }
    }

    /// Declares a leaf node.
    pub fn leaf(&mut self, label: impl Into<String>) -> &mut Self {
        self.nodes.push((label.into(), NodeKind::Leaf));
        self
    }

    /// Declares a composite node.
    pub fn composite(&mut self, label: impl Into<String>) -> &mut Self {
        self.nodes.push((label.into(), NodeKind::Composite));
        self
    }

    /// Declares a parent/child edge between two declared labels.
    pub fn link(&mut self, parent: impl Into<String>, child: impl Into<String>) -> &mut Self {
        self.links.push((parent.into(), child.into()));
        self
    }

    /// Validates the declarations and assembles a fresh arena.
    ///
    /// Building does not consume the builder: declarations can be extended
    /// and the hierarchy rebuilt.
    #[instrument(level = "debug", skip(self))]
    pub fn build(&self) -> HierarchyResult<ComponentArena> {
        let mut arena = ComponentArena::new();
        let mut handles: HashMap<&str, Index> = HashMap::new();

        for (label, kind) in &self.nodes {
            if handles.contains_key(label.as_str()) {
                return Err(HierarchyError::DuplicateLabel(label.clone()));
            }
            let idx = match kind {
                NodeKind::Leaf => arena.insert_leaf(NodeData::new(label.clone())),
                NodeKind::Composite => arena.insert_composite(NodeData::new(label.clone())),
            };
            handles.insert(label.as_str(), idx);
        }

        for (parent, child) in &self.links {
            let parent_idx = *handles
                .get(parent.as_str())
                .ok_or_else(|| HierarchyError::UnknownLabel(parent.clone()))?;
            let child_idx = *handles
                .get(child.as_str())
                .ok_or_else(|| HierarchyError::UnknownLabel(child.clone()))?;
            arena.attach(parent_idx, child_idx)?;
        }

        Ok(arena)
    }
}
