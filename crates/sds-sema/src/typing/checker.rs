//! Subtype relation and type predicates.

use sds_core::{Node, NodeId};

use super::computer::TypeComputer;
use super::model::{CallableType, NamedTupleType, Type};

/// Borrows the type computer, because comparing static types needs the
/// callable type of constructors and variants.
pub struct TypeChecker<'c, 'a> {
    types: &'c mut TypeComputer<'a>,
}

impl<'c, 'a> TypeChecker<'c, 'a> {
    pub fn new(types: &'c mut TypeComputer<'a>) -> Self {
        Self { types }
    }

    /// Whether a value of type `ty` may be used where `other` is expected.
    /// `Unknown` on either side is accepted.
    pub fn is_subtype_of(&mut self, ty: &Type, other: &Type) -> bool {
        if ty.is_unknown() || other.is_unknown() {
            return true;
        }

        if let Type::Union(members) = ty {
            return members.iter().all(|it| self.is_subtype_of(it, other));
        }
        if let Type::Union(members) = other {
            return members.iter().any(|it| self.is_subtype_of(ty, it));
        }

        match ty {
            Type::Callable(callable) => self.callable_is_subtype_of(callable, other),
            Type::Class {
                declaration,
                nullable,
            } => self.class_is_subtype_of(*declaration, *nullable, other),
            Type::Enum {
                declaration,
                nullable,
            } => self.enum_is_subtype_of(*declaration, *nullable, other),
            Type::EnumVariant {
                declaration,
                nullable,
            } => self.variant_is_subtype_of(*declaration, *nullable, other),
            Type::NamedTuple(tuple) => match other {
                Type::Class { declaration, .. } => Some(*declaration) == self.types.core().any,
                Type::NamedTuple(other) => self.tuple_is_subtype_of(tuple, other),
                _ => false,
            },
            Type::Static(instance) => self.static_is_subtype_of(instance, other),
            Type::Union(_) | Type::Unknown => false,
        }
    }

    fn callable_is_subtype_of(&mut self, callable: &CallableType, other: &Type) -> bool {
        match other {
            Type::Class { declaration, .. } => Some(*declaration) == self.types.core().any,
            Type::Callable(other) => {
                if callable.parameters.len() != other.parameters.len()
                    || callable.results.len() != other.results.len()
                {
                    return false;
                }

                // Parameters are contravariant
                let parameters_ok = callable
                    .parameters
                    .entries
                    .iter()
                    .zip(&other.parameters.entries)
                    .all(|(mine, theirs)| self.is_subtype_of(&theirs.ty, &mine.ty));

                parameters_ok
                    && callable
                        .results
                        .entries
                        .iter()
                        .zip(&other.results.entries)
                        .all(|(mine, theirs)| self.is_subtype_of(&mine.ty, &theirs.ty))
            }
            _ => false,
        }
    }

    fn class_is_subtype_of(&mut self, class: NodeId, nullable: bool, other: &Type) -> bool {
        let Type::Class {
            declaration: other_class,
            nullable: other_nullable,
        } = other
        else {
            // `Nothing` fits anywhere its nullability does
            return Some(class) == self.types.core().nothing && (!nullable || other.is_nullable());
        };

        if nullable && !other_nullable {
            return false;
        }
        self.types
            .hierarchy()
            .is_equal_to_or_subclass_of(class, *other_class)
    }

    fn enum_is_subtype_of(&mut self, enumeration: NodeId, nullable: bool, other: &Type) -> bool {
        if nullable && !other.is_nullable() {
            return false;
        }
        match other {
            Type::Class { declaration, .. } => Some(*declaration) == self.types.core().any,
            Type::Enum { declaration, .. } => enumeration == *declaration,
            _ => false,
        }
    }

    fn variant_is_subtype_of(&mut self, variant: NodeId, nullable: bool, other: &Type) -> bool {
        if nullable && !other.is_nullable() {
            return false;
        }
        match other {
            Type::Class { declaration, .. } => Some(*declaration) == self.types.core().any,
            Type::Enum { declaration, .. } => {
                self.types.tree().parent(variant) == Some(*declaration)
            }
            Type::EnumVariant { declaration, .. } => variant == *declaration,
            _ => false,
        }
    }

    fn tuple_is_subtype_of(&mut self, tuple: &NamedTupleType, other: &NamedTupleType) -> bool {
        tuple.len() == other.len()
            && tuple
                .entries
                .iter()
                .zip(&other.entries)
                .all(|(mine, theirs)| {
                    mine.name == theirs.name && self.is_subtype_of(&mine.ty, &theirs.ty)
                })
    }

    fn static_is_subtype_of(&mut self, instance: &Type, other: &Type) -> bool {
        match other {
            Type::Callable(_) => {
                let callable = self.types.callable_type_for_static(instance);
                !callable.is_unknown() && self.is_subtype_of(&callable, other)
            }
            Type::Class { declaration, .. } => Some(*declaration) == self.types.core().any,
            Type::Static(other) => instance == other.as_ref(),
            _ => false,
        }
    }

    pub fn can_be_null(&self, ty: &Type) -> bool {
        ty.is_nullable()
    }

    /// Callable types and static types with a constructor.
    pub fn can_be_called(&self, ty: &Type) -> bool {
        match ty {
            Type::Callable(_) => true,
            Type::Static(instance) => {
                let tree = self.types.tree();
                matches!(
                    instance.declaration().map(|it| tree.node(it)),
                    Some(
                        Node::Class {
                            constructor: Some(_),
                            ..
                        } | Node::EnumVariant { .. }
                    )
                )
            }
            _ => false,
        }
    }

    pub fn can_be_accessed_by_index(&mut self, ty: &Type) -> bool {
        self.is_list(ty) || self.is_map(ty)
    }

    pub fn is_list(&mut self, ty: &Type) -> bool {
        let list = self.types.core().list_type(true);
        self.is_known_subtype_of(ty, &list)
    }

    pub fn is_map(&mut self, ty: &Type) -> bool {
        let map = self.types.core().map_type(true);
        self.is_known_subtype_of(ty, &map)
    }

    pub fn is_numeric(&mut self, ty: &Type) -> bool {
        let number = self.types.core().number_type();
        self.is_known_subtype_of(ty, &number)
    }

    /// Subtyping without `Unknown` absorption. `Nothing` is excluded as well,
    /// since it would trivially match.
    fn is_known_subtype_of(&mut self, ty: &Type, other: &Type) -> bool {
        if ty.is_unknown() || other.is_unknown() {
            return false;
        }
        let nothing = self.types.core().nothing;
        if nothing.is_some() && ty.declaration() == nothing {
            return false;
        }
        self.is_subtype_of(ty, other)
    }

    /// Constant parameters accept booleans, numbers, strings, enums with
    /// constant-capable variants, lists and maps, and their nullable forms.
    pub fn can_be_type_of_constant_parameter(&mut self, ty: &Type) -> bool {
        match ty {
            Type::Class { declaration, .. } => {
                let core = *self.types.core();
                let non_null = ty.with_nullability(false);
                [core.boolean, core.string]
                    .contains(&Some(*declaration))
                    || self.is_numeric(&non_null)
                    || self.is_list(&non_null)
                    || self.is_map(&non_null)
            }
            Type::Enum { declaration, .. } => {
                let tree = self.types.tree();
                let Node::Enum { variants, .. } = tree.node(*declaration) else {
                    return false;
                };
                variants.iter().all(|&variant| {
                    tree.node(variant).parameters().iter().all(|&parameter| {
                        let ty = self.types.compute_type(parameter);
                        self.can_be_type_of_constant_parameter(&ty)
                    })
                })
            }
            Type::EnumVariant { declaration, .. } => {
                let parameters = self.types.tree().node(*declaration).parameters().to_vec();
                parameters.into_iter().all(|parameter| {
                    let ty = self.types.compute_type(parameter);
                    self.can_be_type_of_constant_parameter(&ty)
                })
            }
            Type::Union(members) => members
                .iter()
                .all(|it| self.can_be_type_of_constant_parameter(it)),
            _ => false,
        }
    }
}
