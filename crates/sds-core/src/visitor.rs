//! Syntax tree visitor.
//!
//! # Usage
//!
//! Implement `Visitor` for your struct. Override `visit_*` methods to add logic.
//! Call `walk_*` within your override to continue recursion (or omit it to stop).
//!
//! ```ignore
//! impl Visitor for CallCollector {
//!     fn visit_call(&mut self, tree: &SyntaxTree, id: NodeId) {
//!         self.calls.push(id);
//!         walk_children(self, tree, id);
//!     }
//! }
//! ```

use crate::ast::Node;
use crate::tree::{NodeId, SyntaxTree};

pub trait Visitor: Sized {
    fn visit_node(&mut self, tree: &SyntaxTree, id: NodeId) {
        walk_node(self, tree, id);
    }

    fn visit_call(&mut self, tree: &SyntaxTree, id: NodeId) {
        walk_children(self, tree, id);
    }

    fn visit_reference(&mut self, _tree: &SyntaxTree, _id: NodeId) {
        // Leaf node; the target is a cross-reference, not a child
    }

    fn visit_lambda(&mut self, tree: &SyntaxTree, id: NodeId) {
        walk_children(self, tree, id);
    }

    fn visit_declaration(&mut self, tree: &SyntaxTree, id: NodeId) {
        walk_children(self, tree, id);
    }
}

/// Dispatch `id` to the matching `visit_*` method.
pub fn walk_node<V: Visitor>(visitor: &mut V, tree: &SyntaxTree, id: NodeId) {
    match tree.node(id) {
        Node::Call { .. } => visitor.visit_call(tree, id),
        Node::Reference { .. } => visitor.visit_reference(tree, id),
        Node::BlockLambda { .. } | Node::ExpressionLambda { .. } => visitor.visit_lambda(tree, id),
        Node::Annotation { .. }
        | Node::Attribute { .. }
        | Node::Class { .. }
        | Node::Enum { .. }
        | Node::EnumVariant { .. }
        | Node::Function { .. }
        | Node::Parameter { .. }
        | Node::Pipeline { .. }
        | Node::Result { .. }
        | Node::Segment { .. } => visitor.visit_declaration(tree, id),
        _ => walk_children(visitor, tree, id),
    }
}

pub fn walk_children<V: Visitor>(visitor: &mut V, tree: &SyntaxTree, id: NodeId) {
    for child in tree.node(id).children() {
        visitor.visit_node(tree, child);
    }
}
