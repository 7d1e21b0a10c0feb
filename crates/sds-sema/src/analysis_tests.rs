use indoc::formatdoc;
use sds_core::{InfixOperator, TreeBuilder};

use crate::test_utils::{finish, pipeline, render_reasons};
use crate::{Analysis, AnalysisConfig, Constant, Error, ImpurityTable};

#[test]
fn queries_share_one_session() {
    let mut b = TreeBuilder::with_core_library();
    let path = b.parameter("path", None);
    let string_type = b.core_type("String");
    let content = b.result("content", Some(string_type));
    let read = b.function("read", vec![path], vec![content]);

    let file = b.string("in.txt");
    let call = b.call_to(read, vec![file]);
    let x = b.placeholder("x");
    let assignment = b.assign(vec![x], call);
    let (left, right) = (b.int(6), b.int(0));
    let division = b.infix(InfixOperator::DividedBy, left, right);
    let dead = b.expression_statement(division);
    let main = pipeline(&mut b, vec![assignment, dead]);
    let tree = finish(b);

    let json = formatdoc! {r#"
        [{{ "function": {read}, "declaration": {{
            "purity": "impure",
            "reasons": [{{ "kind": "file_read_from_parameterized_path", "parameter_name": "path" }}]
        }} }}]
        "#,
        read = read.as_u32(),
    };
    let table = ImpurityTable::from_json(&json, &tree).unwrap();
    let mut analysis = Analysis::new(&tree, table, AnalysisConfig::default());

    let ty = analysis.compute_type(call);
    insta::assert_snapshot!(ty.display(&tree), @"String");
    assert_eq!(analysis.evaluate(division), Constant::NotEvaluated);
    assert!(analysis.division_by_zero(division));
    assert_eq!(analysis.get_all_contained_calls(main), vec![call]);

    let reasons = analysis.get_impurity_reasons_for_callable(main).unwrap();
    insta::assert_snapshot!(render_reasons(&tree, &reasons), @"File read from read.path");
    assert!(!analysis.is_pure_callable(main).unwrap());
    assert!(!analysis.callable_has_side_effects(main).unwrap());
    assert!(!analysis.is_pure_expression(call).unwrap());
    assert!(!analysis.expression_has_side_effects(call).unwrap());

    assert!(analysis.statement_is_useless(assignment).unwrap());
    assert!(analysis.statement_is_useless(dead).unwrap());
    assert!(!analysis.is_recursive_call(call).unwrap());
}

#[test]
fn contract_violations_are_errors() {
    let mut b = TreeBuilder::new();
    let literal = b.int(1);
    let tree = finish(b);
    let mut analysis = Analysis::with_defaults(&tree);

    let err = analysis.get_call_graph(literal).unwrap_err();
    assert!(matches!(err, Error::NotCallable { node, .. } if node == literal));
    insta::assert_snapshot!(err, @"Int node #0 is not a callable, call, or parameter");
}

#[test]
fn subtyping_and_common_supertypes() {
    let mut b = TreeBuilder::with_core_library();
    let one = b.int(1);
    let half = b.float(0.5);
    let null = b.null();
    let tree = finish(b);
    let mut analysis = Analysis::with_defaults(&tree);

    let int = analysis.compute_type(one);
    let float = analysis.compute_type(half);
    let nothing = analysis.compute_type(null);

    assert!(analysis.is_subtype_of(&nothing, &int.with_nullability(true)));
    assert!(!analysis.is_subtype_of(&float, &int));
    let common = analysis.lowest_common_supertype(&[int, float, nothing]);
    insta::assert_snapshot!(common.display(&tree), @"Number?");
    assert!(analysis.can_be_value_of_constant_parameter(one));
}
