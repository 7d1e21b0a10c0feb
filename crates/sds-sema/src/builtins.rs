//! Purity declarations of library functions.
//!
//! Functions have no analyzable body, so their purity comes from a side
//! table keyed by the function's `NodeId`. The table is loaded from JSON:
//!
//! ```json
//! [
//!   { "function": 12, "declaration": { "purity": "pure" } },
//!   { "function": 15, "declaration": {
//!       "purity": "impure",
//!       "reasons": [{ "kind": "file_read_from_parameterized_path", "parameter_name": "path" }]
//!   } }
//! ]
//! ```

use std::collections::HashMap;

use sds_core::{Node, NodeId, SyntaxTree};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Error, Result};

/// Impurity reason as written in a declaration. Parameters are named, not
/// resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DeclaredImpurity {
    FileReadFromConstantPath { path: String },
    FileReadFromParameterizedPath { parameter_name: String },
    FileWriteToConstantPath { path: String },
    FileWriteToParameterizedPath { parameter_name: String },
    Randomness,
    PotentiallyImpureParameterCall { parameter_name: String },
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "purity", content = "reasons", rename_all = "snake_case")]
pub enum PurityDeclaration {
    Pure,
    Impure(Vec<DeclaredImpurity>),
}

#[derive(Serialize, Deserialize)]
struct Entry {
    function: NodeId,
    declaration: PurityDeclaration,
}

#[derive(Debug, Clone, Default)]
pub struct ImpurityTable {
    entries: HashMap<NodeId, PurityDeclaration>,
}

impl ImpurityTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, function: NodeId, declaration: PurityDeclaration) {
        self.entries.insert(function, declaration);
    }

    pub fn get(&self, function: NodeId) -> Option<&PurityDeclaration> {
        self.entries.get(&function)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Loads a table and checks it against the tree it describes.
    pub fn from_json(json: &str, tree: &SyntaxTree) -> Result<Self> {
        let entries: Vec<Entry> = serde_json::from_str(json)?;
        let mut table = Self::new();
        for entry in entries {
            table.insert(entry.function, entry.declaration);
        }
        table.validate(tree)?;
        debug!(entries = table.len(), "impurity table loaded");
        Ok(table)
    }

    /// Every key must be a function, and every named parameter must exist.
    pub fn validate(&self, tree: &SyntaxTree) -> Result<()> {
        for (&function, declaration) in &self.entries {
            let Some(Node::Function { parameters, .. }) = tree.get(function) else {
                return Err(Error::InvalidImpurityTable(format!(
                    "node {function} is not a function"
                )));
            };
            let PurityDeclaration::Impure(reasons) = declaration else {
                continue;
            };

            for reason in reasons {
                let Some(name) = reason.parameter_name() else {
                    continue;
                };
                let declared = parameters.iter().any(|&it| tree.name(it) == Some(name));
                if !declared {
                    return Err(Error::InvalidImpurityTable(format!(
                        "function `{}` has no parameter `{name}`",
                        tree.qualified_name(function)
                    )));
                }
            }
        }
        Ok(())
    }
}

impl DeclaredImpurity {
    pub fn parameter_name(&self) -> Option<&str> {
        match self {
            DeclaredImpurity::FileReadFromParameterizedPath { parameter_name }
            | DeclaredImpurity::FileWriteToParameterizedPath { parameter_name }
            | DeclaredImpurity::PotentiallyImpureParameterCall { parameter_name } => {
                Some(parameter_name)
            }
            _ => None,
        }
    }
}
