//! Partial evaluation of expressions into compile-time constants.

pub mod constant;
pub mod evaluator;


pub use constant::Constant;
pub use evaluator::PartialEvaluator;
