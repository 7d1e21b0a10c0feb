use indoc::formatdoc;
use sds_core::TreeBuilder;

use crate::Error;
use crate::builtins::{DeclaredImpurity, ImpurityTable, PurityDeclaration};
use crate::test_utils::finish;

#[test]
fn loads_declarations_from_json() {
    let mut b = TreeBuilder::new();
    let path = b.parameter("path", None);
    let read = b.function("read", vec![path], vec![]);
    let pure = b.function("pure", vec![], vec![]);
    let tree = finish(b);

    let json = formatdoc! {r#"
        [
          {{ "function": {pure}, "declaration": {{ "purity": "pure" }} }},
          {{ "function": {read}, "declaration": {{
              "purity": "impure",
              "reasons": [
                {{ "kind": "file_read_from_parameterized_path", "parameter_name": "path" }},
                {{ "kind": "randomness" }}
              ]
          }} }}
        ]
        "#,
        pure = pure.as_u32(),
        read = read.as_u32(),
    };
    let table = ImpurityTable::from_json(&json, &tree).unwrap();

    assert_eq!(table.len(), 2);
    assert_eq!(table.get(pure), Some(&PurityDeclaration::Pure));
    assert_eq!(
        table.get(read),
        Some(&PurityDeclaration::Impure(vec![
            DeclaredImpurity::FileReadFromParameterizedPath {
                parameter_name: "path".to_owned(),
            },
            DeclaredImpurity::Randomness,
        ]))
    );
}

#[test]
fn rejects_keys_that_are_not_functions() {
    let mut b = TreeBuilder::new();
    let class = b.class("C");
    let tree = finish(b);

    let json = format!(
        r#"[{{ "function": {}, "declaration": {{ "purity": "pure" }} }}]"#,
        class.as_u32()
    );
    let err = ImpurityTable::from_json(&json, &tree).unwrap_err();

    assert_eq!(
        err.to_string(),
        format!("invalid impurity table: node {class} is not a function")
    );
}

#[test]
fn rejects_unknown_parameter_names() {
    let mut b = TreeBuilder::new();
    let f = b.function("f", vec![], vec![]);
    let tree = finish(b);

    let mut table = ImpurityTable::new();
    table.insert(
        f,
        PurityDeclaration::Impure(vec![DeclaredImpurity::FileWriteToParameterizedPath {
            parameter_name: "missing".to_owned(),
        }]),
    );
    let err = table.validate(&tree).unwrap_err();

    insta::assert_snapshot!(
        err,
        @"invalid impurity table: function `f` has no parameter `missing`"
    );
}

#[test]
fn rejects_malformed_json() {
    let tree = finish(TreeBuilder::new());

    let err = ImpurityTable::from_json(r#"[{ "function": 0 }]"#, &tree).unwrap_err();

    assert!(matches!(err, Error::Json(_)));
}

#[test]
fn parameter_names_of_declared_reasons() {
    let call = DeclaredImpurity::PotentiallyImpureParameterCall {
        parameter_name: "f".to_owned(),
    };
    let write = DeclaredImpurity::FileWriteToConstantPath {
        path: "out.txt".to_owned(),
    };

    assert_eq!(call.parameter_name(), Some("f"));
    assert_eq!(write.parameter_name(), None);
    assert_eq!(DeclaredImpurity::Other.parameter_name(), None);
}
