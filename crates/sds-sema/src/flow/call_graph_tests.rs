use sds_core::{NodeId, TreeBuilder};

use super::{CallGraphComputer, contained_calls};
use crate::Error;
use crate::test_utils::finish;
use crate::typing::TypeComputer;

/// `caller` gets a body that calls `callee`.
fn calls(b: &mut TreeBuilder, caller: NodeId, callee: NodeId) -> NodeId {
    let call = b.call_to(callee, vec![]);
    let statement = b.expression_statement(call);
    b.body(caller, vec![statement]);
    call
}

#[test]
fn chain_streams_callables_in_pre_order() {
    let mut b = TreeBuilder::with_core_library();
    let s1 = b.segment("s1", vec![], vec![]);
    let s2 = b.segment("s2", vec![], vec![]);
    let s3 = b.segment("s3", vec![], vec![]);
    calls(&mut b, s1, s2);
    calls(&mut b, s2, s3);
    let tree = finish(b);
    let mut types = TypeComputer::new(&tree);
    let mut graphs = CallGraphComputer::new();

    let graph = graphs.get_call_graph(&mut types, s1).unwrap();

    assert_eq!(graph.stream_called_callables(), vec![s1, s2, s3]);
    assert!(!graph.is_recursive);
    insta::assert_snapshot!(graph.dump(&tree), @r"
    Segment s1
      Segment s2
        Segment s3
    ");
}

#[test]
fn cycle_terminates_and_is_recursive() {
    let mut b = TreeBuilder::with_core_library();
    let s1 = b.segment("s1", vec![], vec![]);
    let s2 = b.segment("s2", vec![], vec![]);
    let s3 = b.segment("s3", vec![], vec![]);
    let into_s2 = calls(&mut b, s1, s2);
    calls(&mut b, s2, s3);
    calls(&mut b, s3, s1);
    let tree = finish(b);
    let mut types = TypeComputer::new(&tree);
    let mut graphs = CallGraphComputer::new();

    let graph = graphs.get_call_graph(&mut types, s1).unwrap();

    insta::assert_snapshot!(graph.dump(&tree), @r"
    Segment s1 (recursive)
      Segment s2 (recursive)
        Segment s3 (recursive)
          Segment s1 (recursive)
    ");
    assert!(graphs.is_recursive(&mut types, into_s2).unwrap());
}

#[test]
fn parameters_and_unresolved_callees_are_leaves() {
    let mut b = TreeBuilder::with_core_library();
    let callback_type = b.callable_type(vec![], vec![]);
    let callback = b.parameter("callback", Some(callback_type));
    let s = b.segment("s", vec![callback], vec![]);
    let through_parameter = b.call_to(callback, vec![]);
    let unresolved = b.unresolved_reference();
    let unknown = b.call(unresolved, vec![]);
    let first = b.expression_statement(through_parameter);
    let second = b.expression_statement(unknown);
    b.body(s, vec![first, second]);
    let tree = finish(b);
    let mut types = TypeComputer::new(&tree);
    let mut graphs = CallGraphComputer::new();

    let graph = graphs.get_call_graph(&mut types, s).unwrap();

    insta::assert_snapshot!(graph.dump(&tree), @r"
    Segment s
      Parameter s.callback
      ?
    ");
    assert_eq!(graph.stream_called_callables(), vec![s, callback]);
}

#[test]
fn lambdas_count_only_when_invoked_in_place() {
    let mut b = TreeBuilder::with_core_library();
    let g = b.function("g", vec![], vec![]);
    let h = b.function("h", vec![], vec![]);
    let callback_type = b.callable_type(vec![], vec![]);
    let callback = b.parameter("callback", Some(callback_type));
    let f = b.function("f", vec![callback], vec![]);
    let s = b.segment("s", vec![], vec![]);

    let call_g = b.call_to(g, vec![]);
    let invoked = b.expression_lambda(vec![], call_g);
    let invoked = b.parenthesized(invoked);
    let in_place = b.call(invoked, vec![]);
    let call_h = b.call_to(h, vec![]);
    let passed = b.expression_lambda(vec![], call_h);
    let call_f = b.call_to(f, vec![passed]);
    let first = b.expression_statement(in_place);
    let second = b.expression_statement(call_f);
    b.body(s, vec![first, second]);
    let tree = finish(b);
    let mut types = TypeComputer::new(&tree);
    let mut graphs = CallGraphComputer::new();

    let graph = graphs.get_call_graph(&mut types, s).unwrap();

    insta::assert_snapshot!(graph.dump(&tree), @r"
    Segment s
      ExpressionLambda
        Function g
      Function f
    ");
}

#[test]
fn call_roots_and_parameter_defaults() {
    let mut b = TreeBuilder::with_core_library();
    let g = b.function("g", vec![], vec![]);
    let default = b.call_to(g, vec![]);
    let p = b.parameter_with_default("p", None, default);
    let f = b.function("f", vec![p], vec![]);
    let call_f = b.call_to(f, vec![]);
    let tree = finish(b);
    let mut types = TypeComputer::new(&tree);
    let mut graphs = CallGraphComputer::new();

    let graph = graphs.get_call_graph(&mut types, call_f).unwrap();

    insta::assert_snapshot!(graph.dump(&tree), @r"
    ?
      Function f
        Function g
    ");
    assert_eq!(graph.stream_called_callables(), vec![f, g]);
}

#[test]
fn non_callable_is_rejected() {
    let mut b = TreeBuilder::with_core_library();
    let literal = b.int(1);
    let tree = finish(b);
    let mut types = TypeComputer::new(&tree);
    let mut graphs = CallGraphComputer::new();

    let err = graphs.get_call_graph(&mut types, literal).unwrap_err();

    assert!(matches!(err, Error::NotCallable { kind: "Int", .. }));
    assert_eq!(
        err.to_string(),
        format!("Int node {literal} is not a callable, call, or parameter")
    );
}

#[test]
fn contained_calls_skip_lambdas() {
    let mut b = TreeBuilder::with_core_library();
    let g = b.function("g", vec![], vec![]);
    let inner = b.call_to(g, vec![]);
    let hidden = b.call_to(g, vec![]);
    let lambda = b.expression_lambda(vec![], hidden);
    let outer = b.call_to(g, vec![inner, lambda]);
    let tree = finish(b);

    assert_eq!(contained_calls(&tree, outer), vec![outer, inner]);
}
