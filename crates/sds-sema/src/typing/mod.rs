//! Type model, inference, and subtyping.

pub mod checker;
pub mod computer;
pub mod core_classes;
pub mod hierarchy;
pub mod model;

#[cfg(test)]
mod checker_tests;

pub use checker::TypeChecker;
pub use computer::TypeComputer;
pub use core_classes::CoreClasses;
pub use hierarchy::ClassHierarchy;
pub use model::{CallableType, NamedTupleEntry, NamedTupleType, Type};
