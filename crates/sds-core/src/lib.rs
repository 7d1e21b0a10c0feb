#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Input boundary of the Safe-DS semantic core.
//!
//! The analyses in `sds-sema` never parse source text. They consume an
//! immutable, already-resolved syntax tree:
//! - `interner` - string interning for declaration names
//! - `ast` - the closed set of node kinds
//! - `tree` - the arena holding nodes, parent links, and JSON loading
//! - `builder` - programmatic construction for front ends and tests
//! - `visitor` - traversal helpers

pub mod ast;
pub mod builder;
pub mod interner;
pub mod tree;
pub mod visitor;

#[cfg(test)]
mod builder_tests;
#[cfg(test)]
mod dump;
#[cfg(test)]
mod interner_tests;

pub use ast::{InfixOperator, Node, NodeKind, PrefixOperator};
pub use builder::TreeBuilder;
pub use interner::{Interner, Symbol};
pub use tree::{NodeId, SyntaxTree};
pub use visitor::Visitor;

/// Errors raised while loading or building a syntax tree.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("malformed syntax tree: {0}")]
    Json(#[from] serde_json::Error),

    /// A node refers to an id that is not part of the tree.
    #[error("node {node} refers to missing node {target}")]
    DanglingNode { node: u32, target: u32 },

    /// A node is listed as the child of two different parents.
    #[error("node {node} has more than one parent")]
    SharedNode { node: u32 },

    /// A node's parent chain loops instead of ending at a root.
    #[error("node {node} is its own ancestor")]
    CyclicNode { node: u32 },

    /// A node names a symbol the name table does not hold.
    #[error("node {node} refers to missing name {symbol}")]
    UnknownSymbol { node: u32, symbol: u32 },

    #[error("invalid integer literal `{0}`")]
    InvalidInteger(String),
}

/// Result type for tree operations.
pub type Result<T> = std::result::Result<T, Error>;
