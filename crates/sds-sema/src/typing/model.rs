//! Type values.
//!
//! Types are immutable values. Compound payloads sit behind `Rc` so that
//! cloning a cached type is cheap. Equality is structural:
//! - named types compare declaration and nullability
//! - callable types compare parameter and result types pairwise, ignoring
//!   names and the originating declaration
//! - unions compare as sets

use std::fmt;
use std::rc::Rc;

use sds_core::{NodeId, SyntaxTree};

#[derive(Debug, Clone)]
pub enum Type {
    Class { declaration: NodeId, nullable: bool },
    Enum { declaration: NodeId, nullable: bool },
    EnumVariant { declaration: NodeId, nullable: bool },
    Callable(Rc<CallableType>),
    Union(Rc<[Type]>),
    NamedTuple(Rc<NamedTupleType>),
    /// Meta type of a class, enum, or variant referenced by name.
    Static(Rc<Type>),
    Unknown,
}

#[derive(Debug, Clone)]
pub struct CallableType {
    /// Declaration the type was computed from, if any.
    pub callable: Option<NodeId>,
    /// Parameter whose declared type this is, if any.
    pub parameter: Option<NodeId>,
    pub parameters: NamedTupleType,
    pub results: NamedTupleType,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NamedTupleType {
    pub entries: Vec<NamedTupleEntry>,
}

#[derive(Debug, Clone)]
pub struct NamedTupleEntry {
    pub declaration: Option<NodeId>,
    pub name: String,
    pub ty: Type,
}

impl PartialEq for NamedTupleEntry {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.ty == other.ty
    }
}

impl NamedTupleEntry {
    pub fn new(declaration: Option<NodeId>, name: impl Into<String>, ty: Type) -> Self {
        Self {
            declaration,
            name: name.into(),
            ty,
        }
    }
}

impl NamedTupleType {
    pub fn new(entries: Vec<NamedTupleEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn type_of_entry(&self, index: usize) -> Type {
        self.entries
            .get(index)
            .map(|it| it.ty.clone())
            .unwrap_or(Type::Unknown)
    }

    /// The entry type of a 1-tuple, otherwise the tuple itself.
    pub fn unwrap(&self) -> Type {
        match self.entries.as_slice() {
            [single] => single.ty.clone(),
            _ => Type::NamedTuple(Rc::new(self.clone())),
        }
    }

    fn simplify(&self) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .map(|it| NamedTupleEntry {
                    declaration: it.declaration,
                    name: it.name.clone(),
                    ty: it.ty.simplify(),
                })
                .collect(),
        }
    }

    fn same_types(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .entries
                .iter()
                .zip(&other.entries)
                .all(|(a, b)| a.ty == b.ty)
    }
}

impl CallableType {
    pub fn parameter_type(&self, index: usize) -> Type {
        self.parameters.type_of_entry(index)
    }
}

impl Type {
    pub fn callable(
        callable: Option<NodeId>,
        parameter: Option<NodeId>,
        parameters: Vec<NamedTupleEntry>,
        results: Vec<NamedTupleEntry>,
    ) -> Type {
        Type::Callable(Rc::new(CallableType {
            callable,
            parameter,
            parameters: NamedTupleType::new(parameters),
            results: NamedTupleType::new(results),
        }))
    }

    pub fn named_tuple(entries: Vec<NamedTupleEntry>) -> Type {
        Type::NamedTuple(Rc::new(NamedTupleType::new(entries)))
    }

    pub fn static_of(instance: Type) -> Type {
        Type::Static(Rc::new(instance))
    }

    /// Union of `members`, flattened and deduplicated. A single member is
    /// returned as is; any unknown member makes the whole union unknown.
    pub fn union(members: impl IntoIterator<Item = Type>) -> Type {
        let mut flat: Vec<Type> = Vec::new();
        for member in members {
            match member.simplify() {
                Type::Unknown => return Type::Unknown,
                Type::Union(inner) => {
                    for it in inner.iter() {
                        if !flat.contains(it) {
                            flat.push(it.clone());
                        }
                    }
                }
                other => {
                    if !flat.contains(&other) {
                        flat.push(other);
                    }
                }
            }
        }

        if flat.len() == 1 {
            return flat.remove(0);
        }
        Type::Union(flat.into())
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Type::Unknown)
    }

    pub fn is_nullable(&self) -> bool {
        match self {
            Type::Class { nullable, .. }
            | Type::Enum { nullable, .. }
            | Type::EnumVariant { nullable, .. } => *nullable,
            Type::Union(members) => members.iter().any(Type::is_nullable),
            Type::Callable(_) | Type::NamedTuple(_) | Type::Static(_) | Type::Unknown => false,
        }
    }

    /// Copy of the type with the given nullability. Types without a
    /// nullability flag are returned unchanged.
    pub fn with_nullability(&self, nullable: bool) -> Type {
        match self {
            Type::Class { declaration, .. } => Type::Class {
                declaration: *declaration,
                nullable,
            },
            Type::Enum { declaration, .. } => Type::Enum {
                declaration: *declaration,
                nullable,
            },
            Type::EnumVariant { declaration, .. } => Type::EnumVariant {
                declaration: *declaration,
                nullable,
            },
            Type::Union(members) => {
                if self.is_nullable() == nullable {
                    return self.clone();
                }
                Type::union(members.iter().map(|it| it.with_nullability(nullable)))
            }
            Type::Callable(_) | Type::NamedTuple(_) | Type::Static(_) | Type::Unknown => {
                self.clone()
            }
        }
    }

    /// Declaration behind a class, enum, or variant type.
    pub fn declaration(&self) -> Option<NodeId> {
        match self {
            Type::Class { declaration, .. }
            | Type::Enum { declaration, .. }
            | Type::EnumVariant { declaration, .. } => Some(*declaration),
            _ => None,
        }
    }

    /// Normal form used for caching: unions flattened, 1-tuples unwrapped.
    pub fn simplify(&self) -> Type {
        match self {
            Type::Union(members) => Type::union(members.iter().cloned()),
            Type::NamedTuple(tuple) => match tuple.entries.as_slice() {
                [single] => single.ty.simplify(),
                _ => Type::NamedTuple(Rc::new(tuple.simplify())),
            },
            Type::Callable(callable) => Type::Callable(Rc::new(CallableType {
                callable: callable.callable,
                parameter: callable.parameter,
                parameters: callable.parameters.simplify(),
                results: callable.results.simplify(),
            })),
            Type::Static(instance) => Type::static_of(instance.simplify()),
            Type::Class { .. } | Type::Enum { .. } | Type::EnumVariant { .. } | Type::Unknown => {
                self.clone()
            }
        }
    }

    /// Canonical rendering, used verbatim in diagnostics.
    pub fn display<'a>(&'a self, tree: &'a SyntaxTree) -> TypeDisplay<'a> {
        TypeDisplay { ty: self, tree }
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Type::Class {
                    declaration: a,
                    nullable: an,
                },
                Type::Class {
                    declaration: b,
                    nullable: bn,
                },
            )
            | (
                Type::Enum {
                    declaration: a,
                    nullable: an,
                },
                Type::Enum {
                    declaration: b,
                    nullable: bn,
                },
            )
            | (
                Type::EnumVariant {
                    declaration: a,
                    nullable: an,
                },
                Type::EnumVariant {
                    declaration: b,
                    nullable: bn,
                },
            ) => a == b && an == bn,
            (Type::Callable(a), Type::Callable(b)) => {
                a.parameters.same_types(&b.parameters) && a.results.same_types(&b.results)
            }
            (Type::Union(a), Type::Union(b)) => {
                a.iter().all(|it| b.contains(it)) && b.iter().all(|it| a.contains(it))
            }
            (Type::NamedTuple(a), Type::NamedTuple(b)) => a == b,
            (Type::Static(a), Type::Static(b)) => a == b,
            (Type::Unknown, Type::Unknown) => true,
            _ => false,
        }
    }
}

pub struct TypeDisplay<'a> {
    ty: &'a Type,
    tree: &'a SyntaxTree,
}

impl TypeDisplay<'_> {
    fn write_name(
        &self,
        f: &mut fmt::Formatter<'_>,
        declaration: NodeId,
        nullable: bool,
    ) -> fmt::Result {
        f.write_str(self.tree.name(declaration).unwrap_or("?"))?;
        if nullable {
            f.write_str("?")?;
        }
        Ok(())
    }

    fn write_tuple(&self, f: &mut fmt::Formatter<'_>, tuple: &NamedTupleType) -> fmt::Result {
        f.write_str("(")?;
        for (i, entry) in tuple.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", entry.name, entry.ty.display(self.tree))?;
        }
        f.write_str(")")
    }
}

impl fmt::Display for TypeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ty {
            Type::Class {
                declaration,
                nullable,
            }
            | Type::Enum {
                declaration,
                nullable,
            }
            | Type::EnumVariant {
                declaration,
                nullable,
            } => self.write_name(f, *declaration, *nullable),
            Type::Callable(callable) => {
                self.write_tuple(f, &callable.parameters)?;
                f.write_str(" -> ")?;
                match callable.results.entries.as_slice() {
                    [single] => write!(f, "{}: {}", single.name, single.ty.display(self.tree)),
                    _ => self.write_tuple(f, &callable.results),
                }
            }
            Type::Union(members) => {
                if members.is_empty() {
                    return f.write_str("union<>");
                }
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    write!(f, "{}", member.display(self.tree))?;
                }
                Ok(())
            }
            Type::NamedTuple(tuple) => self.write_tuple(f, tuple),
            Type::Static(instance) => write!(f, "$type<{}>", instance.display(self.tree)),
            Type::Unknown => f.write_str("$unknown"),
        }
    }
}
