use generational_arena::{Arena, Index};
use itertools::Itertools;
use std::fmt;
use tracing::instrument;

use crate::errors::{HierarchyError, HierarchyResult};

/// Separator between sibling descriptions in an aggregated result.
const BRANCH_SEPARATOR: &str = "+";
/// Wrapper label marking the aggregated result of a composite.
const BRANCH_LABEL: &str = "Branch";

/// Data payload for nodes in the component hierarchy.
#[derive(Debug, Clone)]
pub struct NodeData {
    /// Human-readable label; doubles as a leaf's fixed description
    pub label: String,
}

impl NodeData {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl fmt::Display for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// Variant tag separating childless leaves from container nodes.
///
/// The tag is fixed when a node is inserted and never changes afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Leaf,
    Composite,
}

impl NodeKind {
    pub fn is_composite(self) -> bool {
        matches!(self, NodeKind::Composite)
    }
}

/// Node slot in the arena-based component hierarchy.
#[derive(Debug)]
pub struct ComponentNode {
    /// Payload for this node
    pub data: NodeData,
    kind: NodeKind,
    /// Index of the containing composite, None for roots
    parent: Option<Index>,
    /// Ordered child indices, always empty for leaves
    children: Vec<Index>,
}

impl ComponentNode {
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn is_composite(&self) -> bool {
        self.kind.is_composite()
    }

    pub fn parent(&self) -> Option<Index> {
        self.parent
    }

    pub fn children(&self) -> &[Index] {
        &self.children
    }

    pub fn label(&self) -> &str {
        &self.data.label
    }
}

/// Arena-backed registry for part/whole component hierarchies.
///
/// Uses a generational arena for memory-safe node handles and O(1) lookups.
/// One arena holds a whole forest: every parentless node is a root, and
/// detaching a subtree simply creates another root. All structural mutation
/// goes through [`attach`](Self::attach) and [`detach`](Self::detach), which
/// keep child sequences and parent back-references consistent.
#[derive(Debug)]
pub struct ComponentArena {
    /// Arena storage for all nodes
    arena: Arena<ComponentNode>,
}

impl Default for ComponentArena {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentArena {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
        }
    }

    /// Number of live nodes in the arena.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Inserts a parentless leaf node and returns its handle.
    #[instrument(level = "trace", skip(self))]
    pub fn insert_leaf(&mut self, data: NodeData) -> Index {
        self.insert_node(data, NodeKind::Leaf)
    }

    /// Inserts a parentless composite node and returns its handle.
    #[instrument(level = "trace", skip(self))]
    pub fn insert_composite(&mut self, data: NodeData) -> Index {
        self.insert_node(data, NodeKind::Composite)
    }

    #[instrument(level = "trace", skip(self))]
    fn insert_node(&mut self, data: NodeData, kind: NodeKind) -> Index {
        self.arena.insert(ComponentNode {
            data,
            kind,
            parent: None,
            children: Vec::new(),
        })
    }

    #[instrument(level = "trace", skip(self))]
    pub fn get(&self, idx: Index) -> Option<&ComponentNode> {
        self.arena.get(idx)
    }

    /// Mutable access to a node. Only the payload is exposed for mutation;
    /// the structural fields stay private to the arena.
    #[instrument(level = "trace", skip(self))]
    pub fn get_mut(&mut self, idx: Index) -> Option<&mut ComponentNode> {
        self.arena.get_mut(idx)
    }

    /// Parent back-reference, `None` for roots and stale handles.
    #[instrument(level = "trace", skip(self))]
    pub fn parent(&self, idx: Index) -> Option<Index> {
        self.get(idx).and_then(|node| node.parent)
    }

    /// Whether the node can hold children. Stale handles report `false`.
    #[instrument(level = "trace", skip(self))]
    pub fn is_composite(&self, idx: Index) -> bool {
        self.get(idx).is_some_and(|node| node.is_composite())
    }

    /// First node whose label matches, in arena iteration order.
    #[instrument(level = "debug", skip(self))]
    pub fn find(&self, label: &str) -> Option<Index> {
        self.arena
            .iter()
            .find(|(_, node)| node.data.label == label)
            .map(|(idx, _)| idx)
    }

    /// All parentless nodes, in arena iteration order.
    #[instrument(level = "debug", skip(self))]
    pub fn roots(&self) -> Vec<Index> {
        self.arena
            .iter()
            .filter(|(_, node)| node.parent.is_none())
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Updates only the parent back-reference of `child`.
    ///
    /// No side effects beyond the reference update: the child sequence of any
    /// involved composite is left untouched, so callers that link nodes
    /// through [`attach`](Self::attach) and [`detach`](Self::detach) never
    /// need this. Pointing back-references in a loop leaves ancestor walks
    /// unbounded; the attach/detach pair never does.
    #[instrument(level = "debug", skip(self))]
    pub fn set_parent(&mut self, child: Index, parent: Option<Index>) -> HierarchyResult<()> {
        if let Some(parent_idx) = parent {
            if !self.arena.contains(parent_idx) {
                return Err(HierarchyError::NodeNotFound(parent_idx));
            }
        }
        let node = self
            .arena
            .get_mut(child)
            .ok_or(HierarchyError::NodeNotFound(child))?;
        node.parent = parent;
        Ok(())
    }

    /// Links `child` under `parent`, appending to the ordered child sequence
    /// and pointing the child's back-reference at the parent.
    ///
    /// The parent must be a composite and the child must be detached; moving
    /// a subtree is [`detach`](Self::detach) followed by `attach`. Links that
    /// would make a node its own descendant are rejected with
    /// [`HierarchyError::InvalidTopology`].
    #[instrument(level = "debug", skip(self))]
    pub fn attach(&mut self, parent: Index, child: Index) -> HierarchyResult<()> {
        let parent_node = self
            .get(parent)
            .ok_or(HierarchyError::NodeNotFound(parent))?;
        if !parent_node.is_composite() {
            return Err(HierarchyError::NotComposite(parent_node.label().to_string()));
        }
        let parent_label = parent_node.label().to_string();
        let child_node = self.get(child).ok_or(HierarchyError::NodeNotFound(child))?;
        let child_label = child_node.label().to_string();
        if child_node.parent.is_some() {
            return Err(HierarchyError::AlreadyAttached(child_label));
        }
        if parent == child || self.ancestors(parent).any(|ancestor| ancestor == child) {
            return Err(HierarchyError::InvalidTopology {
                parent: parent_label,
                child: child_label,
            });
        }
        if let Some(node) = self.arena.get_mut(parent) {
            node.children.push(child);
        }
        self.set_parent(child, Some(parent))
    }

    /// Unlinks `child` from `parent`'s ordered child sequence.
    ///
    /// Returns `Ok(true)` when the first matching entry was removed and the
    /// child's back-reference cleared, `Ok(false)` when the child was not
    /// present (the sequence is left untouched). The removed node is not
    /// deallocated: it becomes a root and keeps its own subtree.
    #[instrument(level = "debug", skip(self))]
    pub fn detach(&mut self, parent: Index, child: Index) -> HierarchyResult<bool> {
        let parent_node = self
            .get(parent)
            .ok_or(HierarchyError::NodeNotFound(parent))?;
        if !parent_node.is_composite() {
            return Err(HierarchyError::NotComposite(parent_node.label().to_string()));
        }
        let position = match parent_node.children.iter().position(|&entry| entry == child) {
            Some(position) => position,
            None => return Ok(false),
        };
        if let Some(node) = self.arena.get_mut(parent) {
            node.children.remove(position);
        }
        self.set_parent(child, None)?;
        Ok(true)
    }

    /// Aggregated description of the subtree rooted at `idx`.
    ///
    /// A leaf reports its label. A composite reports its children's
    /// descriptions in insertion order, joined by `+` and wrapped as
    /// `Branch(...)`; with no children that collapses to `Branch()`.
    #[instrument(level = "debug", skip(self))]
    pub fn describe(&self, idx: Index) -> HierarchyResult<String> {
        let node = self.get(idx).ok_or(HierarchyError::NodeNotFound(idx))?;
        Ok(self.describe_node(node))
    }

    #[instrument(level = "trace", skip(self))]
    fn describe_node(&self, node: &ComponentNode) -> String {
        match node.kind {
            NodeKind::Leaf => node.data.label.clone(),
            NodeKind::Composite => {
                let joined = node
                    .children
                    .iter()
                    .filter_map(|&child| self.get(child))
                    .map(|child| self.describe_node(child))
                    .join(BRANCH_SEPARATOR);
                format!("{}({})", BRANCH_LABEL, joined)
            }
        }
    }

    /// Height of the subtree rooted at `idx`; a lone node has depth 1 and a
    /// stale handle reports 0.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self, idx: Index) -> usize {
        self.calculate_depth(idx)
    }

    #[instrument(level = "trace", skip(self))]
    fn calculate_depth(&self, idx: Index) -> usize {
        if let Some(node) = self.get(idx) {
            1 + node
                .children
                .iter()
                .map(|&child| self.calculate_depth(child))
                .max()
                .unwrap_or(0)
        } else {
            0
        }
    }

    /// Collects the labels of the leaf frontier under `idx`.
    ///
    /// Children are visited left to right. A node with no children reports
    /// itself, including a childless composite: it is the frontier of its
    /// own subtree.
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_nodes(&self, idx: Index) -> Vec<String> {
        let mut leaves = Vec::new();
        self.collect_leaves(idx, &mut leaves);
        leaves
    }

    #[instrument(level = "trace", skip(self))]
    fn collect_leaves(&self, idx: Index, leaves: &mut Vec<String>) {
        if let Some(node) = self.get(idx) {
            if node.children.is_empty() {
                leaves.push(node.data.label.clone());
            } else {
                for &child in &node.children {
                    self.collect_leaves(child, leaves);
                }
            }
        }
    }

    /// Every leaf-to-root label chain in the forest, leaf first.
    ///
    /// Chains are grouped by root; within one root the leaves appear in
    /// left-to-right order.
    #[instrument(level = "debug", skip(self))]
    pub fn branches(&self) -> Vec<Vec<String>> {
        let mut branches = Vec::new();
        for root in self.roots() {
            for (idx, node) in self.iter_from(root) {
                if node.children.is_empty() {
                    let mut chain = vec![node.data.label.clone()];
                    chain.extend(
                        self.ancestors(idx)
                            .filter_map(|ancestor| self.get(ancestor))
                            .map(|ancestor| ancestor.data.label.clone()),
                    );
                    branches.push(chain);
                }
            }
        }
        branches
    }

    /// Removes `idx` and every descendant from the arena, unlinking the
    /// subtree from its parent's child sequence first. Returns the number of
    /// nodes removed.
    #[instrument(level = "debug", skip(self))]
    pub fn remove_subtree(&mut self, idx: Index) -> HierarchyResult<usize> {
        let parent = self
            .get(idx)
            .ok_or(HierarchyError::NodeNotFound(idx))?
            .parent;
        if let Some(parent_idx) = parent {
            if let Some(parent_node) = self.arena.get_mut(parent_idx) {
                parent_node.children.retain(|&child| child != idx);
            }
        }
        let doomed: Vec<Index> = self
            .iter_postorder_from(idx)
            .map(|(index, _)| index)
            .collect();
        let mut removed = 0;
        for index in doomed {
            if self.arena.remove(index).is_some() {
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Depth-first preorder over the subtree rooted at `start`.
    #[instrument(level = "trace", skip(self))]
    pub fn iter_from(&self, start: Index) -> PreorderIter<'_> {
        PreorderIter::new(self, start)
    }

    /// Postorder over the subtree rooted at `start`: children before parents.
    #[instrument(level = "trace", skip(self))]
    pub fn iter_postorder_from(&self, start: Index) -> PostorderIter<'_> {
        PostorderIter::new(self, start)
    }

    /// Proper ancestors of `start`, nearest first.
    #[instrument(level = "trace", skip(self))]
    pub fn ancestors(&self, start: Index) -> AncestorIter<'_> {
        AncestorIter {
            arena: self,
            cursor: self.parent(start),
        }
    }
}

pub struct PreorderIter<'a> {
    arena: &'a ComponentArena,
    stack: Vec<Index>,
}

impl<'a> PreorderIter<'a> {
    #[instrument(level = "trace")]
    fn new(arena: &'a ComponentArena, start: Index) -> Self {
        let mut stack = Vec::new();
        if arena.arena.contains(start) {
            stack.push(start);
        }
        Self { arena, stack }
    }
}

impl<'a> Iterator for PreorderIter<'a> {
    type Item = (Index, &'a ComponentNode);

    #[instrument(level = "trace", skip(self))]
    fn next(&mut self) -> Option<Self::Item> {
        if let Some(current) = self.stack.pop() {
            if let Some(node) = self.arena.get(current) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current, node));
            }
        }
        None
    }
}

pub struct PostorderIter<'a> {
    arena: &'a ComponentArena,
    stack: Vec<(Index, bool)>,
}

impl<'a> PostorderIter<'a> {
    #[instrument(level = "trace")]
    fn new(arena: &'a ComponentArena, start: Index) -> Self {
        let mut stack = Vec::new();
        if arena.arena.contains(start) {
            stack.push((start, false));
        }
        Self { arena, stack }
    }
}

impl<'a> Iterator for PostorderIter<'a> {
    type Item = (Index, &'a ComponentNode);

    #[instrument(level = "trace", skip(self))]
    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current, expanded)) = self.stack.pop() {
            if let Some(node) = self.arena.get(current) {
                if !expanded {
                    self.stack.push((current, true));
                    for &child in node.children.iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some((current, node));
                }
            }
        }
        None
    }
}

pub struct AncestorIter<'a> {
    arena: &'a ComponentArena,
    cursor: Option<Index>,
}

impl<'a> Iterator for AncestorIter<'a> {
    type Item = Index;

    #[instrument(level = "trace", skip(self))]
    fn next(&mut self) -> Option<Self::Item> {
        let current = self.cursor?;
        self.cursor = self.arena.parent(current);
        Some(current)
    }
}
