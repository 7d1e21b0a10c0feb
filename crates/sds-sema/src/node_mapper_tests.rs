use sds_core::{Node, NodeId, SyntaxTree, TreeBuilder};

use crate::node_mapper::{
    argument_to_parameter, arguments_to_parameters, assignee_to_value, containing_callable,
};
use crate::test_utils::{finish, pipeline};
use crate::typing::TypeComputer;

fn arguments(tree: &SyntaxTree, call: NodeId) -> Vec<NodeId> {
    match tree.node(call) {
        Node::Call { arguments, .. } => arguments.clone(),
        _ => panic!("expected a call"),
    }
}

#[test]
fn positional_arguments_match_by_index() {
    let mut b = TreeBuilder::with_core_library();
    let x = b.parameter("x", None);
    let y = b.parameter("y", None);
    let f = b.function("f", vec![x, y], vec![]);
    let values = vec![b.int(1), b.int(2), b.int(3)];
    let call = b.call_to(f, values);
    let tree = finish(b);
    let mut types = TypeComputer::new(&tree);
    let args = arguments(&tree, call);

    assert_eq!(argument_to_parameter(&mut types, args[0]), Some(x));
    assert_eq!(argument_to_parameter(&mut types, args[1]), Some(y));
    assert_eq!(argument_to_parameter(&mut types, args[2]), None);
    assert_eq!(
        arguments_to_parameters(&mut types, call),
        vec![(args[0], x), (args[1], y)]
    );
}

#[test]
fn named_arguments_match_by_name() {
    let mut b = TreeBuilder::with_core_library();
    let x = b.parameter("x", None);
    let y = b.parameter("y", None);
    let f = b.function("f", vec![x, y], vec![]);
    let value = b.int(2);
    let named = b.named_argument("y", value);
    let positional = b.int(1);
    let call = b.call_to(f, vec![named, positional]);
    let value = b.int(1);
    let unknown = b.named_argument("z", value);
    let other_call = b.call_to(f, vec![unknown]);
    let tree = finish(b);
    let mut types = TypeComputer::new(&tree);
    let args = arguments(&tree, call);

    assert_eq!(argument_to_parameter(&mut types, args[0]), Some(y));
    // Positional after named binds to nothing
    assert_eq!(argument_to_parameter(&mut types, args[1]), None);
    assert_eq!(argument_to_parameter(&mut types, unknown), None);
    assert!(arguments_to_parameters(&mut types, other_call).is_empty());
}

#[test]
fn unresolved_callee_has_no_parameters() {
    let mut b = TreeBuilder::with_core_library();
    let receiver = b.unresolved_reference();
    let value = b.int(1);
    let call = b.call(receiver, vec![value]);
    let tree = finish(b);
    let mut types = TypeComputer::new(&tree);
    let args = arguments(&tree, call);

    assert_eq!(argument_to_parameter(&mut types, args[0]), None);
}

#[test]
fn containing_callable_is_innermost() {
    let mut b = TreeBuilder::with_core_library();
    let inner = b.int(1);
    let lambda = b.expression_lambda(vec![], inner);
    let x = b.placeholder("x");
    let assignment = b.assign(vec![x], lambda);
    let main = pipeline(&mut b, vec![assignment]);
    let tree = finish(b);

    assert_eq!(containing_callable(&tree, inner), Some(lambda));
    assert_eq!(containing_callable(&tree, lambda), Some(main));
    assert_eq!(containing_callable(&tree, main), None);
}

#[test]
fn assignees_map_to_value_and_position() {
    let mut b = TreeBuilder::with_core_library();
    let r = b.result("r", None);
    let s = b.segment("s", vec![], vec![r]);
    let first = b.placeholder("a");
    let second = b.placeholder("b");
    let call = b.call_to(s, vec![]);
    b.assign(vec![first, second], call);
    let tree = finish(b);

    assert_eq!(assignee_to_value(&tree, first), Some((call, 0)));
    assert_eq!(assignee_to_value(&tree, second), Some((call, 1)));
    assert_eq!(assignee_to_value(&tree, call), None);
}
