//! Arena-backed component trees with uniform part/whole aggregation.
//!
//! A [`ComponentArena`] stores a forest of labelled nodes, each either a leaf
//! or a composite. Clients link nodes with [`ComponentArena::attach`] and ask
//! any node for an aggregated description via [`ComponentArena::describe`]
//! without caring which variant it is: leaves report their label, composites
//! recursively fold their children into `Branch(...)` form.
//!
//! Nodes are addressed by generational [`generational_arena::Index`] handles;
//! the arena owns every node, so there is no manual memory management and a
//! detached subtree simply becomes another root. Mutation takes `&mut self`,
//! reads take `&self`; the borrow checker provides the external exclusion
//! the single-threaded design assumes.
//!
//! ```
//! use treereg::{ComponentArena, NodeData};
//!
//! let mut arena = ComponentArena::new();
//! let root = arena.insert_composite(NodeData::new("root"));
//! let leaf = arena.insert_leaf(NodeData::new("Leaf"));
//! arena.attach(root, leaf)?;
//! assert_eq!(arena.describe(root)?, "Branch(Leaf)");
//! # Ok::<(), treereg::HierarchyError>(())
//! ```

pub mod arena;
pub mod builder;
pub mod display;
pub mod errors;
pub mod util;

pub use arena::{
    AncestorIter, ComponentArena, ComponentNode, NodeData, NodeKind, PostorderIter, PreorderIter,
};
pub use builder::HierarchyBuilder;
pub use display::DisplayTree;
pub use errors::{HierarchyError, HierarchyResult};
