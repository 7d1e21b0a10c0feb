//! Test utilities.

use sds_core::{NodeId, SyntaxTree, TreeBuilder};

use crate::purity::ImpurityReason;
use crate::typing::TypeComputer;

/// Builds a tree, failing the test on malformed input.
pub fn finish(b: TreeBuilder) -> SyntaxTree {
    b.finish().expect("tree should link")
}

/// `id: type` per line.
pub fn render_types(tree: &SyntaxTree, ids: &[NodeId]) -> String {
    let mut types = TypeComputer::new(tree);
    ids.iter()
        .map(|&id| {
            let ty = types.compute_type(id);
            format!("{}: {}", tree.node(id).kind_name(), ty.display(tree))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// One reason per line.
pub fn render_reasons(tree: &SyntaxTree, reasons: &[ImpurityReason]) -> String {
    reasons
        .iter()
        .map(|it| it.display(tree).to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Wraps `statements` in a pipeline named `main`.
pub fn pipeline(b: &mut TreeBuilder, statements: Vec<NodeId>) -> NodeId {
    let pipeline = b.pipeline("main");
    b.body(pipeline, statements);
    pipeline
}
