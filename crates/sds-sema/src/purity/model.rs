use std::fmt;

use sds_core::{NodeId, SyntaxTree};

/// Path argument of a file access.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FilePath {
    Constant(String),
    /// Path given by a parameter of the annotated function.
    Parameter(NodeId),
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ImpurityReason {
    FileRead { path: FilePath },
    FileWrite { path: FilePath },
    Randomness,
    /// Call of a callable-typed parameter whose argument is not known here.
    PotentiallyImpureParameterCall { parameter: Option<NodeId> },
    UnknownCallableCall,
    EndlessRecursion,
    Other,
}

impl ImpurityReason {
    /// Whether the reason changes observable state. Reads and randomness
    /// only observe.
    pub fn is_side_effect(&self) -> bool {
        !matches!(self, ImpurityReason::FileRead { .. } | ImpurityReason::Randomness)
    }

    /// Whether performing `self` can change the outcome of a later `future`.
    pub fn can_affect_future_impurity_reason(&self, future: &ImpurityReason) -> bool {
        match self {
            ImpurityReason::FileRead { .. }
            | ImpurityReason::Randomness
            | ImpurityReason::EndlessRecursion => false,
            ImpurityReason::FileWrite {
                path: FilePath::Constant(written),
            } => match future {
                ImpurityReason::FileRead {
                    path: FilePath::Constant(other),
                }
                | ImpurityReason::FileWrite {
                    path: FilePath::Constant(other),
                } => written == other,
                ImpurityReason::EndlessRecursion => false,
                _ => true,
            },
            ImpurityReason::FileWrite { .. }
            | ImpurityReason::PotentiallyImpureParameterCall { .. }
            | ImpurityReason::UnknownCallableCall
            | ImpurityReason::Other => !matches!(future, ImpurityReason::EndlessRecursion),
        }
    }

    pub fn display<'a>(&'a self, tree: &'a SyntaxTree) -> ImpurityReasonDisplay<'a> {
        ImpurityReasonDisplay { reason: self, tree }
    }
}

pub struct ImpurityReasonDisplay<'a> {
    reason: &'a ImpurityReason,
    tree: &'a SyntaxTree,
}

impl ImpurityReasonDisplay<'_> {
    fn write_path(&self, f: &mut fmt::Formatter<'_>, path: &FilePath) -> fmt::Result {
        match path {
            FilePath::Constant(path) => write!(f, "{path:?}"),
            FilePath::Parameter(parameter) => f.write_str(&self.tree.qualified_name(*parameter)),
            FilePath::Unknown => f.write_str("?"),
        }
    }
}

impl fmt::Display for ImpurityReasonDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason {
            ImpurityReason::FileRead { path } => {
                f.write_str("File read from ")?;
                self.write_path(f, path)
            }
            ImpurityReason::FileWrite { path } => {
                f.write_str("File write to ")?;
                self.write_path(f, path)
            }
            ImpurityReason::Randomness => f.write_str("Randomness"),
            ImpurityReason::PotentiallyImpureParameterCall { parameter } => {
                let name = match parameter {
                    Some(parameter) => self.tree.qualified_name(*parameter),
                    None => "?".to_owned(),
                };
                write!(f, "Potentially impure call of {name}")
            }
            ImpurityReason::UnknownCallableCall => f.write_str("Unknown callable call"),
            ImpurityReason::EndlessRecursion => f.write_str("Endless recursion"),
            ImpurityReason::Other => f.write_str("Other"),
        }
    }
}
