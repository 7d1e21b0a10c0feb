//! Test-only tree outline.

use std::fmt::Write;

use crate::ast::Node;
use crate::tree::{NodeId, SyntaxTree};

impl SyntaxTree {
    /// One line per node, children indented under their parent.
    pub fn dump(&self) -> String {
        let mut lines = Vec::new();
        for &member in self.members() {
            self.dump_node(member, 0, &mut lines);
        }
        lines.join("\n")
    }

    fn dump_node(&self, id: NodeId, depth: usize, lines: &mut Vec<String>) {
        let node = self.node(id);
        let mut line = format!("{}{}", "  ".repeat(depth), node.kind_name());
        if let Some(name) = self.name(id) {
            let _ = write!(line, " {name}");
        }
        match node {
            Node::Int { value } => {
                let _ = write!(line, " {value}");
            }
            Node::Float { value } => {
                let _ = write!(line, " {value}");
            }
            Node::String { value } => {
                let _ = write!(line, " {value:?}");
            }
            Node::Boolean { value } => {
                let _ = write!(line, " {value}");
            }
            Node::Argument {
                name: Some(name), ..
            } => {
                let _ = write!(line, " {}", self.resolve(*name));
            }
            Node::Infix { operator, .. } => {
                let _ = write!(line, " {operator}");
            }
            Node::Prefix { operator, .. } => {
                let _ = write!(line, " {operator}");
            }
            Node::Reference { target: link }
            | Node::Yield { result: link }
            | Node::NamedType {
                declaration: link, ..
            } => {
                let target = link.and_then(|it| self.name(it)).unwrap_or("?");
                let _ = write!(line, " -> {target}");
                if let Node::NamedType { nullable: true, .. } = node {
                    line.push('?');
                }
            }
            _ => {}
        }
        lines.push(line);
        for child in node.children() {
            self.dump_node(child, depth + 1, lines);
        }
    }
}
