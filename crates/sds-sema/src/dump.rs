//! Test-only call graph outline.

use sds_core::SyntaxTree;

use crate::flow::CallGraphNode;

impl CallGraphNode {
    /// One line per node, children indented under their parent. Unresolved
    /// roots print as `?`.
    pub fn dump(&self, tree: &SyntaxTree) -> String {
        let mut lines = Vec::new();
        self.dump_node(tree, 0, &mut lines);
        lines.join("\n")
    }

    fn dump_node(&self, tree: &SyntaxTree, depth: usize, lines: &mut Vec<String>) {
        let mut line = "  ".repeat(depth);
        match self.root {
            Some(root) => {
                line.push_str(tree.node(root).kind_name());
                if tree.name(root).is_some() {
                    line.push(' ');
                    line.push_str(&tree.qualified_name(root));
                }
            }
            None => line.push('?'),
        }
        if self.is_recursive {
            line.push_str(" (recursive)");
        }
        lines.push(line);
        for child in &self.children {
            child.dump_node(tree, depth + 1, lines);
        }
    }
}
