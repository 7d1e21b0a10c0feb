//! Call-graph construction with recursion detection.
//!
//! A graph node is rooted at a callable, a parameter (calls through a
//! callable-typed parameter), or nothing (the callee could not be
//! resolved). Parameters are leaves; their expansion belongs to the call
//! sites that bind them. Recursion is detected by tracking the roots on
//! the path from the top, so every graph is finite.

use std::collections::HashMap;
use std::rc::Rc;

use indexmap::IndexSet;
use sds_core::visitor::{Visitor, walk_children};
use sds_core::{Node, NodeId, SyntaxTree};
use tracing::debug;

use crate::typing::{Type, TypeComputer};
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct CallGraphNode {
    pub root: Option<NodeId>,
    pub children: Vec<CallGraphNode>,
    /// Set on the node that closes a cycle and on everything above it.
    pub is_recursive: bool,
}

impl CallGraphNode {
    fn leaf(root: Option<NodeId>) -> Self {
        Self {
            root,
            children: Vec::new(),
            is_recursive: false,
        }
    }

    /// Roots in depth-first pre-order. Unresolved roots are skipped,
    /// parameters are not.
    pub fn stream_called_callables(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_roots(&mut out);
        out
    }

    fn collect_roots(&self, out: &mut Vec<NodeId>) {
        out.extend(self.root);
        for child in &self.children {
            child.collect_roots(out);
        }
    }
}

#[derive(Default)]
pub struct CallGraphComputer {
    cache: HashMap<NodeId, Rc<CallGraphNode>>,
}

impl CallGraphComputer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Graph of a callable, a call, or a parameter.
    pub fn get_call_graph(
        &mut self,
        types: &mut TypeComputer<'_>,
        id: NodeId,
    ) -> Result<Rc<CallGraphNode>> {
        if let Some(graph) = self.cache.get(&id) {
            return Ok(graph.clone());
        }

        let tree = types.tree();
        let node = tree.get(id).ok_or(Error::UnknownNode(id))?;
        let graph = match node {
            Node::Call { .. } => {
                let children = match resolve_callee(types, id) {
                    Some(callee) => vec![build(types, callee, &mut IndexSet::new())],
                    None => Vec::new(),
                };
                CallGraphNode {
                    root: None,
                    is_recursive: children.iter().any(|it| it.is_recursive),
                    children,
                }
            }
            Node::Parameter { .. } => CallGraphNode::leaf(Some(id)),
            node if node.is_callable() => build(types, id, &mut IndexSet::new()),
            node => {
                return Err(Error::NotCallable {
                    node: id,
                    kind: node.kind_name(),
                });
            }
        };

        let graph = Rc::new(graph);
        self.cache.insert(id, graph.clone());
        Ok(graph)
    }

    /// Whether executing `call` can lead back to a callable already on the
    /// call path.
    pub fn is_recursive(&mut self, types: &mut TypeComputer<'_>, call: NodeId) -> Result<bool> {
        Ok(self.get_call_graph(types, call)?.is_recursive)
    }
}

fn build(
    types: &mut TypeComputer<'_>,
    root: NodeId,
    ancestors: &mut IndexSet<NodeId>,
) -> CallGraphNode {
    let tree = types.tree();
    if matches!(tree.node(root), Node::Parameter { .. }) {
        return CallGraphNode::leaf(Some(root));
    }
    if ancestors.contains(&root) {
        debug!(callable = %tree.qualified_name(root), depth = ancestors.len(), "recursive call");
        return CallGraphNode {
            root: Some(root),
            children: Vec::new(),
            is_recursive: true,
        };
    }

    ancestors.insert(root);
    let children: Vec<CallGraphNode> = executed_calls(tree, root)
        .into_iter()
        .map(|call| match resolve_callee(types, call) {
            Some(callee) => build(types, callee, ancestors),
            None => CallGraphNode::leaf(None),
        })
        .collect();
    ancestors.swap_remove(&root);

    CallGraphNode {
        root: Some(root),
        is_recursive: children.iter().any(|it| it.is_recursive),
        children,
    }
}

/// Callable or parameter a call dispatches to.
pub(crate) fn resolve_callee(types: &mut TypeComputer<'_>, call: NodeId) -> Option<NodeId> {
    let tree = types.tree();
    let Node::Call { receiver, .. } = tree.node(call) else {
        return None;
    };

    match types.compute_type(*receiver) {
        Type::Callable(callable) => {
            if callable.parameter.is_some() {
                return callable.parameter;
            }
            // Callable type syntax has no body to execute
            callable
                .callable
                .filter(|&it| !matches!(tree.node(it), Node::CallableType { .. }))
        }
        Type::Static(instance) => instance
            .declaration()
            .filter(|&it| matches!(tree.node(it), Node::Class { .. } | Node::EnumVariant { .. })),
        _ => None,
    }
}

/// Calls executed when `callable` runs: every call below it whose innermost
/// containing callable is `callable` itself. Parameter defaults count.
fn executed_calls(tree: &SyntaxTree, callable: NodeId) -> Vec<NodeId> {
    let mut collector = CallCollector::default();
    walk_children(&mut collector, tree, callable);
    collector.calls
}

/// Calls a node executes directly. For a declared callable these are the
/// calls of its own body. Calls inside lambdas an expression creates are
/// not executed by it.
pub fn contained_calls(tree: &SyntaxTree, node: NodeId) -> Vec<NodeId> {
    let mut collector = CallCollector::default();
    match tree.get(node) {
        Some(it) if it.is_callable() && !it.is_lambda() => {
            walk_children(&mut collector, tree, node)
        }
        Some(_) => collector.visit_node(tree, node),
        None => {}
    }
    collector.calls
}

#[derive(Default)]
struct CallCollector {
    calls: Vec<NodeId>,
}

impl Visitor for CallCollector {
    fn visit_call(&mut self, tree: &SyntaxTree, id: NodeId) {
        self.calls.push(id);
        walk_children(self, tree, id);
    }

    fn visit_lambda(&mut self, _tree: &SyntaxTree, _id: NodeId) {}

    fn visit_declaration(&mut self, tree: &SyntaxTree, id: NodeId) {
        if !tree.node(id).is_callable() {
            walk_children(self, tree, id);
        }
    }
}
