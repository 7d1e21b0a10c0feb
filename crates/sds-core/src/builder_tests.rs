use indoc::indoc;

use crate::{InfixOperator, Node, TreeBuilder};

#[test]
fn body_can_call_later_declaration() {
    let mut b = TreeBuilder::new();
    let s = b.segment("s", vec![], vec![]);
    let f = b.function("f", vec![], vec![]);
    let call = b.call_to(f, vec![]);
    let stmt = b.expression_statement(call);
    b.body(s, vec![stmt]);

    let tree = b.finish().unwrap();

    insta::assert_snapshot!(tree.dump(), @r"
    Segment s
      Block
        ExpressionStatement
          Call
            Reference -> f
    Function f
    ");
}

#[test]
fn call_wraps_positional_arguments() {
    let mut b = TreeBuilder::new();
    let p = b.parameter("p", None);
    let q = b.parameter("q", None);
    let f = b.function("f", vec![p, q], vec![]);
    let one = b.int(1);
    let two = b.int(2);
    let named = b.named_argument("q", two);
    let call = b.call_to(f, vec![one, named]);
    let pipeline = b.pipeline("main");
    let stmt = b.expression_statement(call);
    b.body(pipeline, vec![stmt]);

    let tree = b.finish().unwrap();

    insta::assert_snapshot!(tree.dump(), @r"
    Function f
      Parameter p
      Parameter q
    Pipeline main
      Block
        ExpressionStatement
          Call
            Reference -> f
            Argument
              Int 1
            Argument q
              Int 2
    ");
    assert!(matches!(tree.node(call), Node::Call { arguments, .. } if arguments.len() == 2));
}

#[test]
fn core_library_declares_number_hierarchy() {
    let mut b = TreeBuilder::with_core_library();
    let int_type = b.nullable_core_type("Int");
    let attribute = b.attribute("a", Some(int_type));
    let c = b.class("C");
    b.add_members(c, vec![attribute]);
    let tree = b.finish().unwrap();

    let int = tree.member_named("Int").unwrap();
    assert!(matches!(
        tree.node(int),
        Node::Class { parent_types, .. } if parent_types.len() == 1
    ));
    assert_eq!(tree.qualified_name(attribute), "C.a");
    assert!(tree.dump().ends_with(indoc! {"
        Class C
          Attribute a
            NamedType -> Int?"}));
}

#[test]
fn operators_render_in_dump() {
    let mut b = TreeBuilder::new();
    let one = b.float(1.5);
    let two = b.string("x");
    let sum = b.infix(InfixOperator::Plus, one, two);
    let lambda = b.expression_lambda(vec![], sum);
    let p = b.parameter_with_default("p", None, lambda);
    b.function("f", vec![p], vec![]);

    let tree = b.finish().unwrap();

    insta::assert_snapshot!(tree.dump(), @r#"
    Function f
      Parameter p
        ExpressionLambda
          Infix +
            Float 1.5
            String "x"
    "#);
}
