use sds_core::TreeBuilder;

use super::{NamedTupleEntry, Type, TypeComputer};
use crate::test_utils::finish;

fn entry(ty: Type) -> NamedTupleEntry {
    NamedTupleEntry::new(None, "x", ty)
}

#[test]
fn classes_follow_hierarchy_and_nullability() {
    let tree = finish(TreeBuilder::with_core_library());
    let mut types = TypeComputer::new(&tree);
    let core = *types.core();
    let mut checker = types.checker();

    let int = core.int_type();
    let number = core.number_type();
    let nullable_int = int.with_nullability(true);

    assert!(checker.is_subtype_of(&int, &int));
    assert!(checker.is_subtype_of(&int, &number));
    assert!(checker.is_subtype_of(&int, &core.any_type(false)));
    assert!(checker.is_subtype_of(&int, &nullable_int));
    assert!(!checker.is_subtype_of(&nullable_int, &int));
    assert!(!checker.is_subtype_of(&number, &int));
    assert!(!checker.is_subtype_of(&core.string_type(), &number));
}

#[test]
fn nothing_is_bottom_and_unknown_absorbs() {
    let tree = finish(TreeBuilder::with_core_library());
    let mut types = TypeComputer::new(&tree);
    let core = *types.core();
    let mut checker = types.checker();

    assert!(checker.is_subtype_of(&core.nothing_type(false), &core.int_type()));
    assert!(checker.is_subtype_of(
        &core.nothing_type(true),
        &core.string_type().with_nullability(true)
    ));
    assert!(!checker.is_subtype_of(&core.nothing_type(true), &core.string_type()));
    assert!(checker.is_subtype_of(&Type::Unknown, &core.int_type()));
    assert!(checker.is_subtype_of(&core.int_type(), &Type::Unknown));
}

#[test]
fn unions_need_all_on_the_left_and_some_on_the_right() {
    let tree = finish(TreeBuilder::with_core_library());
    let mut types = TypeComputer::new(&tree);
    let core = *types.core();
    let mut checker = types.checker();

    let int_or_float = Type::union([core.int_type(), core.float_type()]);
    let int_or_string = Type::union([core.int_type(), core.string_type()]);

    assert!(checker.is_subtype_of(&int_or_float, &core.number_type()));
    assert!(!checker.is_subtype_of(&int_or_string, &core.number_type()));
    assert!(checker.is_subtype_of(&core.string_type(), &int_or_string));
    assert!(!checker.is_subtype_of(&core.float_type(), &int_or_string));
}

#[test]
fn callables_are_contravariant_in_parameters() {
    let tree = finish(TreeBuilder::with_core_library());
    let mut types = TypeComputer::new(&tree);
    let core = *types.core();
    let mut checker = types.checker();

    let number_to_int = Type::callable(
        None,
        None,
        vec![entry(core.number_type())],
        vec![entry(core.int_type())],
    );
    let int_to_number = Type::callable(
        None,
        None,
        vec![entry(core.int_type())],
        vec![entry(core.number_type())],
    );
    let nothing_to_number = Type::callable(None, None, vec![], vec![entry(core.number_type())]);

    assert!(checker.is_subtype_of(&number_to_int, &int_to_number));
    assert!(!checker.is_subtype_of(&int_to_number, &number_to_int));
    assert!(!checker.is_subtype_of(&number_to_int, &nothing_to_number));
    assert!(checker.is_subtype_of(&number_to_int, &core.any_type(false)));
}

#[test]
fn variants_are_subtypes_of_their_enum() {
    let mut b = TreeBuilder::with_core_library();
    let red = b.variant("Red", vec![]);
    let color = b.enumeration("Color", vec![red]);
    let circle = b.variant("Circle", vec![]);
    let shape = b.enumeration("Shape", vec![circle]);
    let tree = finish(b);
    let mut types = TypeComputer::new(&tree);
    let any = types.core().any_type(false);
    let mut checker = types.checker();

    let red = Type::EnumVariant {
        declaration: red,
        nullable: false,
    };
    let color = Type::Enum {
        declaration: color,
        nullable: false,
    };
    let shape = Type::Enum {
        declaration: shape,
        nullable: false,
    };

    assert!(checker.is_subtype_of(&red, &color));
    assert!(!checker.is_subtype_of(&red, &shape));
    assert!(!checker.is_subtype_of(&color, &red));
    assert!(checker.is_subtype_of(&color, &any));
}

#[test]
fn named_tuples_compare_entrywise() {
    let tree = finish(TreeBuilder::with_core_library());
    let mut types = TypeComputer::new(&tree);
    let core = *types.core();
    let mut checker = types.checker();

    let ints = Type::named_tuple(vec![entry(core.int_type()), entry(core.int_type())]);
    let numbers = Type::named_tuple(vec![entry(core.number_type()), entry(core.number_type())]);
    let short = Type::named_tuple(vec![]);

    assert!(checker.is_subtype_of(&ints, &numbers));
    assert!(!checker.is_subtype_of(&numbers, &ints));
    assert!(!checker.is_subtype_of(&ints, &short));
}

#[test]
fn static_class_with_constructor_compares_as_callable() {
    let mut b = TreeBuilder::with_core_library();
    let int_type = b.core_type("Int");
    let p = b.parameter("p", Some(int_type));
    let point = b.class_with_constructor("Point", vec![p]);
    let plain = b.class("Plain");
    let tree = finish(b);
    let mut types = TypeComputer::new(&tree);
    let core = *types.core();

    let point_instance = Type::Class {
        declaration: point,
        nullable: false,
    };
    let expected = Type::callable(
        None,
        None,
        vec![entry(core.int_type())],
        vec![entry(point_instance.clone())],
    );
    let point_static = Type::static_of(point_instance);
    let plain_static = Type::static_of(Type::Class {
        declaration: plain,
        nullable: false,
    });

    let mut checker = types.checker();
    assert!(checker.is_subtype_of(&point_static, &expected));
    assert!(!checker.is_subtype_of(&plain_static, &expected));
    assert!(checker.can_be_called(&point_static));
    assert!(!checker.can_be_called(&plain_static));
}

#[test]
fn container_and_numeric_predicates() {
    let tree = finish(TreeBuilder::with_core_library());
    let mut types = TypeComputer::new(&tree);
    let core = *types.core();
    let mut checker = types.checker();

    assert!(checker.is_list(&core.list_type(false)));
    assert!(checker.is_list(&core.list_type(true)));
    assert!(!checker.is_list(&core.nothing_type(false)));
    assert!(!checker.is_list(&Type::Unknown));
    assert!(checker.is_map(&core.map_type(false)));
    assert!(checker.can_be_accessed_by_index(&core.map_type(false)));
    assert!(!checker.can_be_accessed_by_index(&core.string_type()));
    assert!(checker.is_numeric(&core.float_type()));
    assert!(!checker.is_numeric(&core.boolean_type()));
    assert!(checker.can_be_null(&core.int_type().with_nullability(true)));
}

#[test]
fn constant_parameter_types() {
    let mut b = TreeBuilder::with_core_library();
    let int_type = b.core_type("Int");
    let value = b.parameter("value", Some(int_type));
    let some = b.variant("Some", vec![value]);
    let none = b.variant("None", vec![]);
    let option = b.enumeration("Option", vec![some, none]);
    let class = b.class("C");
    let tree = finish(b);
    let mut types = TypeComputer::new(&tree);
    let core = *types.core();
    let mut checker = types.checker();

    assert!(checker.can_be_type_of_constant_parameter(&core.int_type()));
    assert!(checker.can_be_type_of_constant_parameter(&core.string_type().with_nullability(true)));
    assert!(checker.can_be_type_of_constant_parameter(&Type::Enum {
        declaration: option,
        nullable: false,
    }));
    assert!(!checker.can_be_type_of_constant_parameter(&Type::Class {
        declaration: class,
        nullable: false,
    }));
}

#[test]
fn every_kind_of_type_is_reflexive_and_below_any() {
    let mut b = TreeBuilder::with_core_library();
    let variant = b.variant("V", vec![]);
    let enumeration = b.enumeration("E", vec![variant]);
    let point = b.class_with_constructor("Point", vec![]);
    let tree = finish(b);
    let mut types = TypeComputer::new(&tree);
    let core = *types.core();
    let mut checker = types.checker();

    let samples = [
        core.int_type(),
        core.int_type().with_nullability(true),
        Type::Enum {
            declaration: enumeration,
            nullable: false,
        },
        Type::EnumVariant {
            declaration: variant,
            nullable: true,
        },
        Type::callable(None, None, vec![entry(core.int_type())], vec![entry(core.string_type())]),
        Type::union([core.int_type(), core.string_type()]),
        Type::named_tuple(vec![
            NamedTupleEntry::new(None, "x", core.int_type()),
            NamedTupleEntry::new(None, "y", core.string_type()),
        ]),
        Type::static_of(Type::Class {
            declaration: point,
            nullable: false,
        }),
        Type::Unknown,
    ];
    let any = core.any_type(true);

    for ty in &samples {
        assert!(checker.is_subtype_of(ty, ty), "{} is not reflexive", ty.display(&tree));
        assert!(checker.is_subtype_of(ty, &any), "{} is not below Any?", ty.display(&tree));
    }
}

#[test]
fn subtyping_is_transitive_from_variant_to_any() {
    let mut b = TreeBuilder::with_core_library();
    let variant = b.variant("V", vec![]);
    let enumeration = b.enumeration("E", vec![variant]);
    let tree = finish(b);
    let mut types = TypeComputer::new(&tree);
    let core = *types.core();
    let mut checker = types.checker();

    let variant = Type::EnumVariant {
        declaration: variant,
        nullable: false,
    };
    let enumeration = Type::Enum {
        declaration: enumeration,
        nullable: false,
    };
    let any = core.any_type(false);

    assert!(checker.is_subtype_of(&variant, &enumeration));
    assert!(checker.is_subtype_of(&enumeration, &any));
    assert!(checker.is_subtype_of(&variant, &any));
    assert!(!checker.is_subtype_of(&any, &enumeration));
}
