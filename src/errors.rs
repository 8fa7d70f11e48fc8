//! Typed errors for arena and builder operations.

use generational_arena::Index;
use thiserror::Error;

/// Errors raised by hierarchy mutations and by declarative assembly.
#[derive(Error, Debug)]
pub enum HierarchyError {
    #[error("node not found in arena: {0:?}")]
    NodeNotFound(Index),

    #[error("leaf node cannot hold children: {0}")]
    NotComposite(String),

    #[error("node is already attached to a parent: {0}")]
    AlreadyAttached(String),

    #[error("invalid topology: attaching {child} under {parent} would create a cycle")]
    InvalidTopology { parent: String, child: String },

    #[error("duplicate node label: {0}")]
    DuplicateLabel(String),

    #[error("unknown node label: {0}")]
    UnknownLabel(String),
}

/// Result type for hierarchy operations.
pub type HierarchyResult<T> = Result<T, HierarchyError>;
