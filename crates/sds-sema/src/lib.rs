#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Semantic core of the Safe-DS compiler front end.
//!
//! Four mutually dependent analyses over a resolved `sds_core::SyntaxTree`:
//! - `typing` - type model, type computer, subtype checker, class hierarchy
//! - `flow` - call graphs with recursion detection
//! - `purity` - impurity reasons of callables and expressions
//! - `eval` - partial evaluation into compile-time constants
//!
//! `Analysis` owns the per-snapshot caches and is the entry point for
//! validators and code generators. The analyses never emit diagnostics.

pub mod analysis;
pub mod builtins;
pub mod checks;
pub mod config;
pub mod eval;
pub mod flow;
pub mod node_mapper;
pub mod purity;
pub mod typing;

#[cfg(test)]
mod analysis_tests;
#[cfg(test)]
mod builtins_tests;
#[cfg(test)]
mod dump;
#[cfg(test)]
mod node_mapper_tests;
#[cfg(test)]
pub mod test_utils;

pub use analysis::Analysis;
pub use builtins::{DeclaredImpurity, ImpurityTable, PurityDeclaration};
pub use config::AnalysisConfig;
pub use eval::Constant;
pub use flow::CallGraphNode;
pub use purity::{FilePath, ImpurityReason};
pub use typing::{NamedTupleEntry, Type};

use sds_core::NodeId;

/// Contract violations by the caller. Missing information is never an
/// error; it degrades to `Type::Unknown` or `Constant::NotEvaluated`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A call graph was requested for a node that cannot be called.
    #[error("{kind} node {node} is not a callable, call, or parameter")]
    NotCallable { node: NodeId, kind: &'static str },

    #[error("node {0} is not part of the analyzed tree")]
    UnknownNode(NodeId),

    #[error("invalid impurity table: {0}")]
    InvalidImpurityTable(String),

    #[error(transparent)]
    Tree(#[from] sds_core::Error),

    #[error("malformed impurity table: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for analysis queries.
pub type Result<T> = std::result::Result<T, Error>;
