//! Purity analysis: why a callable or expression is impure.

pub mod computer;
pub mod model;


pub use computer::PurityComputer;
pub use model::{FilePath, ImpurityReason};
