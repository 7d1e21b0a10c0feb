//! Call graphs: which callables a callable or call may execute.

pub mod call_graph;

#[cfg(test)]
mod call_graph_tests;

pub use call_graph::{CallGraphComputer, CallGraphNode, contained_calls};
