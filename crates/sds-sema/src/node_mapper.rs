//! Mappings between related nodes: arguments to parameters, assignees to
//! assigned values, nodes to their containing callable.

use sds_core::{Node, NodeId, SyntaxTree};

use crate::typing::{Type, TypeComputer};

/// Parameters of whatever the call's receiver resolves to. Unknown callees
/// have none.
pub fn callee_parameters(types: &mut TypeComputer<'_>, call: NodeId) -> Vec<NodeId> {
    let tree = types.tree();
    let Node::Call { receiver, .. } = tree.node(call) else {
        return Vec::new();
    };

    let callee = match types.compute_type(*receiver).with_nullability(false) {
        Type::Callable(callable) => match callable.callable {
            Some(declaration) => declaration,
            None => return Vec::new(),
        },
        Type::Static(instance) => match instance.declaration() {
            Some(declaration) => declaration,
            None => return Vec::new(),
        },
        _ => return Vec::new(),
    };
    tree.node(callee).parameters().to_vec()
}

/// Parameter an argument is bound to. Named arguments match by name.
/// Positional arguments match by index, and only while no named argument
/// precedes them.
pub fn argument_to_parameter(types: &mut TypeComputer<'_>, argument: NodeId) -> Option<NodeId> {
    let tree = types.tree();
    let Node::Argument { name, .. } = tree.node(argument) else {
        return None;
    };
    let call = tree.parent(argument)?;
    let Node::Call { arguments, .. } = tree.node(call) else {
        return None;
    };
    let parameters = callee_parameters(types, call);

    if let Some(name) = name {
        return parameters
            .into_iter()
            .find(|&it| tree.node(it).name() == Some(*name));
    }

    let index = arguments.iter().position(|&it| it == argument)?;
    let named_before = arguments[..index]
        .iter()
        .any(|&it| matches!(tree.node(it), Node::Argument { name: Some(_), .. }));
    if named_before {
        return None;
    }
    parameters.get(index).copied()
}

/// Argument-to-parameter pairs of a call. Arguments that bind to nothing are
/// left out.
pub fn arguments_to_parameters(
    types: &mut TypeComputer<'_>,
    call: NodeId,
) -> Vec<(NodeId, NodeId)> {
    let tree = types.tree();
    let Node::Call { arguments, .. } = tree.node(call) else {
        return Vec::new();
    };
    arguments
        .iter()
        .filter_map(|&argument| Some((argument, argument_to_parameter(types, argument)?)))
        .collect()
}

/// Innermost callable strictly containing `node`.
pub fn containing_callable(tree: &SyntaxTree, node: NodeId) -> Option<NodeId> {
    tree.container_of(node, Node::is_callable)
}

/// The expression assigned to `assignee` and the assignee's position among
/// its siblings.
pub fn assignee_to_value(tree: &SyntaxTree, assignee: NodeId) -> Option<(NodeId, usize)> {
    let assignment = tree.parent(assignee)?;
    let Node::Assignment {
        assignees,
        expression,
    } = tree.node(assignment)
    else {
        return None;
    };
    let position = assignees.iter().position(|&it| it == assignee)?;
    Some((*expression, position))
}
