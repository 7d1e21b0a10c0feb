//! Type computer: infers the type of any node.
//!
//! `compute_type` is total. Missing information (unresolved references,
//! missing annotations, unsupported receivers) degrades to `Type::Unknown`.
//! Results are simplified and memoized per `NodeId` for the lifetime of
//! the computer, which is bound to one tree snapshot.

use std::collections::HashMap;

use indexmap::IndexSet;
use sds_core::{InfixOperator, Node, NodeId, PrefixOperator, SyntaxTree};
use tracing::trace;

use super::checker::TypeChecker;
use super::core_classes::CoreClasses;
use super::hierarchy::ClassHierarchy;
use super::model::{NamedTupleEntry, Type};
use crate::node_mapper;

pub struct TypeComputer<'a> {
    tree: &'a SyntaxTree,
    core: CoreClasses,
    cache: HashMap<NodeId, Type>,
    /// Nodes whose type is being computed; re-entering one yields `Unknown`.
    in_progress: IndexSet<NodeId>,
}

impl<'a> TypeComputer<'a> {
    pub fn new(tree: &'a SyntaxTree) -> Self {
        Self {
            tree,
            core: CoreClasses::discover(tree),
            cache: HashMap::new(),
            in_progress: IndexSet::new(),
        }
    }

    pub fn tree(&self) -> &'a SyntaxTree {
        self.tree
    }

    pub fn core(&self) -> &CoreClasses {
        &self.core
    }

    pub fn hierarchy(&self) -> ClassHierarchy<'a> {
        ClassHierarchy::new(self.tree, self.core)
    }

    pub fn checker(&mut self) -> TypeChecker<'_, 'a> {
        TypeChecker::new(self)
    }

    pub fn compute_type(&mut self, id: NodeId) -> Type {
        if let Some(ty) = self.cache.get(&id) {
            return ty.clone();
        }
        if !self.tree.contains(id) || !self.in_progress.insert(id) {
            return Type::Unknown;
        }

        let ty = self.do_compute_type(id).simplify();
        trace!(
            node = %id,
            kind = self.tree.node(id).kind_name(),
            ty = %ty.display(self.tree),
            "computed type"
        );

        self.in_progress.swap_remove(&id);
        self.cache.insert(id, ty.clone());
        ty
    }

    fn compute_optional(&mut self, id: Option<NodeId>) -> Type {
        match id {
            Some(id) => self.compute_type(id),
            None => Type::Unknown,
        }
    }

    pub fn compute_non_nullable_type(&self, ty: &Type) -> Type {
        ty.with_nullability(false)
    }

    fn do_compute_type(&mut self, id: NodeId) -> Type {
        let tree = self.tree;
        match tree.node(id) {
            // Assignees
            Node::Placeholder { .. }
            | Node::BlockLambdaResult { .. }
            | Node::Wildcard
            | Node::Yield { .. } => self.compute_type_of_assignee(id),

            // Declarations
            Node::Annotation { parameters, .. } => {
                let parameters = self.manifest_entries(parameters);
                Type::callable(Some(id), None, parameters, Vec::new())
            }
            Node::Attribute { ty, .. } | Node::Result { ty, .. } => self.compute_optional(*ty),
            Node::Class { .. } => Type::Class {
                declaration: id,
                nullable: false,
            },
            Node::Enum { .. } => Type::Enum {
                declaration: id,
                nullable: false,
            },
            Node::EnumVariant { .. } => Type::EnumVariant {
                declaration: id,
                nullable: false,
            },
            Node::Function {
                parameters,
                results,
                ..
            }
            | Node::Segment {
                parameters,
                results,
                ..
            }
            | Node::CallableType {
                parameters,
                results,
            } => {
                let parameters = self.manifest_entries(parameters);
                let results = self.manifest_entries(results);
                Type::callable(Some(id), None, parameters, results)
            }
            Node::Parameter { ty, .. } => self.compute_type_of_parameter(id, *ty),
            Node::Pipeline { .. } => Type::Unknown,

            // Statements have no type
            Node::Block { .. }
            | Node::Assignment { .. }
            | Node::ExpressionStatement { .. }
            | Node::OutputStatement { .. } => Type::Unknown,

            // Expressions
            Node::Int { .. } => self.core.int_type(),
            Node::Float { .. } => self.core.float_type(),
            Node::String { .. } | Node::TemplateString { .. } => self.core.string_type(),
            Node::Boolean { .. } => self.core.boolean_type(),
            Node::Null => self.core.nothing_type(true),
            Node::List { .. } => self.core.list_type(false),
            Node::Reference { target } => self.compute_type_of_reference(*target),
            Node::Argument { value, .. } => self.compute_type(*value),
            Node::Parenthesized { expression } => self.compute_type(*expression),
            Node::TypeCast { ty, .. } => self.compute_type(*ty),
            Node::Call {
                receiver,
                null_safe,
                ..
            } => self.compute_type_of_call(*receiver, *null_safe),
            Node::MemberAccess {
                receiver,
                member,
                null_safe,
            } => self.compute_type_of_member_access(id, *receiver, *member, *null_safe),
            Node::IndexedAccess { receiver, .. } => self.compute_type_of_indexed_access(*receiver),
            Node::Infix {
                operator,
                left,
                right,
            } => match operator {
                InfixOperator::Or
                | InfixOperator::And
                | InfixOperator::Equals
                | InfixOperator::NotEquals
                | InfixOperator::IdenticalTo
                | InfixOperator::NotIdenticalTo
                | InfixOperator::LessThan
                | InfixOperator::LessThanOrEquals
                | InfixOperator::GreaterThanOrEquals
                | InfixOperator::GreaterThan => self.core.boolean_type(),
                InfixOperator::Plus
                | InfixOperator::Minus
                | InfixOperator::Times
                | InfixOperator::DividedBy
                | InfixOperator::Modulo => {
                    let left = self.compute_type(*left);
                    let right = self.compute_type(*right);
                    self.arithmetic_type(&[left, right])
                }
                InfixOperator::Elvis => self.compute_type_of_elvis(*left, *right),
            },
            Node::Prefix { operator, operand } => match operator {
                PrefixOperator::Not => self.core.boolean_type(),
                PrefixOperator::Minus => {
                    let operand = self.compute_type(*operand);
                    self.arithmetic_type(&[operand])
                }
            },
            Node::BlockLambda { parameters, body } => {
                let parameters = self.inferred_entries(parameters);
                let results = self.block_lambda_results(*body);
                Type::callable(Some(id), None, parameters, results)
            }
            Node::ExpressionLambda { parameters, result } => {
                let parameters = self.inferred_entries(parameters);
                let result = NamedTupleEntry::new(None, "result", self.compute_type(*result));
                Type::callable(Some(id), None, parameters, vec![result])
            }

            // Type syntax
            Node::NamedType {
                declaration,
                nullable,
            } => match declaration.map(|it| (it, tree.node(it))) {
                Some((declaration, Node::Class { .. })) => Type::Class {
                    declaration,
                    nullable: *nullable,
                },
                Some((declaration, Node::Enum { .. })) => Type::Enum {
                    declaration,
                    nullable: *nullable,
                },
                Some((declaration, Node::EnumVariant { .. })) => Type::EnumVariant {
                    declaration,
                    nullable: *nullable,
                },
                _ => Type::Unknown,
            },
            Node::UnionType { members } => {
                let members: Vec<Type> = members.iter().map(|&it| self.compute_type(it)).collect();
                Type::union(members)
            }
        }
    }

    /// Entries typed by the declarations' manifest type syntax.
    fn manifest_entries(&mut self, declarations: &[NodeId]) -> Vec<NamedTupleEntry> {
        let tree = self.tree;
        declarations
            .iter()
            .map(|&it| {
                let ty = match tree.node(it) {
                    Node::Parameter { ty, .. } | Node::Result { ty, .. } => {
                        self.compute_optional(*ty)
                    }
                    _ => Type::Unknown,
                };
                NamedTupleEntry::new(Some(it), tree.name(it).unwrap_or_default(), ty)
            })
            .collect()
    }

    /// Entries typed by the declarations themselves, so lambda parameters
    /// pick up their inferred types.
    fn inferred_entries(&mut self, declarations: &[NodeId]) -> Vec<NamedTupleEntry> {
        declarations
            .iter()
            .map(|&it| {
                let ty = self.compute_type(it);
                NamedTupleEntry::new(Some(it), self.tree.name(it).unwrap_or_default(), ty)
            })
            .collect()
    }

    fn block_lambda_results(&mut self, body: NodeId) -> Vec<NamedTupleEntry> {
        let results: Vec<NodeId> = block_lambda_results(self.tree, body);
        self.inferred_entries(&results)
    }

    fn compute_type_of_assignee(&mut self, id: NodeId) -> Type {
        let Some((expression, position)) = node_mapper::assignee_to_value(self.tree, id) else {
            return Type::Unknown;
        };

        match self.compute_type(expression) {
            Type::NamedTuple(tuple) => tuple.type_of_entry(position),
            ty if position == 0 => ty,
            _ => Type::Unknown,
        }
    }

    fn compute_type_of_parameter(&mut self, id: NodeId, manifest: Option<NodeId>) -> Type {
        if let Some(manifest) = manifest {
            let ty = self.compute_type(manifest);
            return remember_parameter(id, ty);
        }

        let Type::Callable(context) = self.compute_type_of_parameter_context(id) else {
            return Type::Unknown;
        };
        let Some(lambda) = self.tree.parent(id) else {
            return Type::Unknown;
        };
        let position = self
            .tree
            .node(lambda)
            .parameters()
            .iter()
            .position(|&it| it == id);

        match position {
            Some(position) => remember_parameter(id, context.parameter_type(position)),
            None => Type::Unknown,
        }
    }

    /// Expected callable type of the lambda declaring `parameter`.
    fn compute_type_of_parameter_context(&mut self, parameter: NodeId) -> Type {
        let tree = self.tree;
        let Some(lambda) = tree.parent(parameter) else {
            return Type::Unknown;
        };
        if !tree.node(lambda).is_lambda() {
            return Type::Unknown;
        }
        let Some(container) = tree.parent(lambda) else {
            return Type::Unknown;
        };

        match tree.node(container) {
            // Lambda passed as argument
            Node::Argument { .. } => {
                match node_mapper::argument_to_parameter(self, container) {
                    Some(parameter) => match tree.node(parameter) {
                        Node::Parameter { ty, .. } => self.compute_optional(*ty),
                        _ => Type::Unknown,
                    },
                    None => Type::Unknown,
                }
            }
            // Lambda passed as default value
            Node::Parameter { .. } => self.compute_type(container),
            // Yielded lambda
            Node::Assignment { assignees, .. } => match assignees.first().map(|&it| tree.node(it)) {
                Some(Node::Yield {
                    result: Some(result),
                }) => self.compute_type(*result),
                _ => Type::Unknown,
            },
            _ => Type::Unknown,
        }
    }

    fn compute_type_of_reference(&mut self, target: Option<NodeId>) -> Type {
        let Some(target) = target else {
            return Type::Unknown;
        };
        let instance = self.compute_type(target);

        if self.tree.node(target).is_named_type_declaration() && instance.declaration().is_some() {
            Type::static_of(instance.with_nullability(false))
        } else {
            instance
        }
    }

    fn compute_type_of_call(&mut self, receiver: NodeId, null_safe: bool) -> Type {
        let receiver_type = self.compute_type(receiver);
        let result = match self.compute_non_nullable_type(&receiver_type) {
            Type::Callable(callable) => {
                let is_annotation = callable
                    .callable
                    .is_some_and(|it| matches!(self.tree.node(it), Node::Annotation { .. }));
                if is_annotation {
                    Type::Unknown
                } else {
                    callable.results.unwrap()
                }
            }
            Type::Static(instance) => match instance.declaration().map(|it| self.tree.node(it)) {
                Some(Node::Class { .. } | Node::EnumVariant { .. }) => (*instance).clone(),
                _ => Type::Unknown,
            },
            _ => Type::Unknown,
        };

        let nullable = (receiver_type.is_nullable() && null_safe) || result.is_nullable();
        result.with_nullability(nullable)
    }

    fn compute_type_of_member_access(
        &mut self,
        id: NodeId,
        receiver: NodeId,
        member: NodeId,
        null_safe: bool,
    ) -> Type {
        let member_type = self.compute_type(member);

        // A parameterless variant accessed outside a call is already an instance
        if let Type::Static(instance) = &member_type
            && let Type::EnumVariant { declaration, .. } = **instance
            && self.tree.node(declaration).parameters().is_empty()
            && !matches!(self.tree.parent(id).map(|it| self.tree.node(it)), Some(Node::Call { .. }))
        {
            return (**instance).clone();
        }

        let receiver_type = self.compute_type(receiver);
        let nullable = (receiver_type.is_nullable() && null_safe) || member_type.is_nullable();
        member_type.with_nullability(nullable)
    }

    /// Without generics, elements of lists and values of maps are `Any?`.
    fn compute_type_of_indexed_access(&mut self, receiver: NodeId) -> Type {
        let receiver_type = self.compute_type(receiver);
        if !matches!(receiver_type, Type::Class { .. }) {
            return Type::Unknown;
        }

        if self.checker().can_be_accessed_by_index(&receiver_type) {
            self.core.any_type(true)
        } else {
            Type::Unknown
        }
    }

    /// `Int` if every operand is an `Int`, otherwise `Float`.
    fn arithmetic_type(&mut self, operands: &[Type]) -> Type {
        let int = self.core.int_type();
        let all_int = operands
            .iter()
            .all(|it| {
                !it.is_unknown() && !int.is_unknown() && self.checker().is_subtype_of(it, &int)
            });

        if all_int { int } else { self.core.float_type() }
    }

    fn compute_type_of_elvis(&mut self, left: NodeId, right: NodeId) -> Type {
        let left_type = self.compute_type(left);
        if !left_type.is_nullable() {
            return left_type;
        }

        let right_type = self.compute_type(right);
        let left_type = self.compute_non_nullable_type(&left_type);
        self.lowest_common_supertype(&[left_type, right_type])
    }

    /// Smallest type that all `types` are assignable to.
    pub fn lowest_common_supertype(&mut self, types: &[Type]) -> Type {
        if types.iter().any(Type::is_unknown) {
            return Type::Unknown;
        }
        if types.is_empty() {
            return self.core.nothing_type(false);
        }

        let nullable = types.iter().any(Type::is_nullable);
        for candidate in types {
            let candidate = candidate.with_nullability(nullable);
            if types
                .iter()
                .all(|it| self.checker().is_subtype_of(it, &candidate))
            {
                return candidate;
            }
        }

        let non_null: Vec<Type> = types.iter().map(|it| it.with_nullability(false)).collect();

        // `Nothing` is below everything and never decides the result
        let nothing = self.core.nothing_type(false);
        let relevant: Vec<&Type> = non_null.iter().filter(|it| **it != nothing).collect();
        if relevant.is_empty() {
            return nothing.with_nullability(nullable);
        }

        let hierarchy = self.hierarchy();
        if relevant.iter().all(|it| matches!(it, Type::Class { .. })) {
            let classes: Vec<NodeId> = relevant.iter().filter_map(|it| it.declaration()).collect();
            let mut candidates = vec![classes[0]];
            candidates.extend(hierarchy.proper_superclasses(classes[0]));
            for candidate in candidates {
                if classes
                    .iter()
                    .all(|&it| hierarchy.is_equal_to_or_subclass_of(it, candidate))
                {
                    return Type::Class {
                        declaration: candidate,
                        nullable,
                    };
                }
            }
        }

        if relevant
            .iter()
            .all(|it| matches!(it, Type::Enum { .. } | Type::EnumVariant { .. }))
        {
            let enums: Vec<Option<NodeId>> = relevant
                .iter()
                .map(|it| match it {
                    Type::Enum { declaration, .. } => Some(*declaration),
                    Type::EnumVariant { declaration, .. } => self.tree.parent(*declaration),
                    _ => None,
                })
                .collect();
            if let Some(Some(first_enum)) = enums.first()
                && enums.iter().all(|it| *it == Some(*first_enum))
            {
                return Type::Enum {
                    declaration: *first_enum,
                    nullable,
                };
            }
        }

        self.core.any_type(nullable)
    }

    /// Callable view of a static type: the constructor of a class or the
    /// instantiation of a variant.
    pub fn callable_type_for_static(&mut self, instance: &Type) -> Type {
        let Some(declaration) = instance.declaration() else {
            return Type::Unknown;
        };
        let callable = match self.tree.node(declaration) {
            Node::Class {
                constructor: Some(_),
                ..
            }
            | Node::EnumVariant { .. } => declaration,
            _ => return Type::Unknown,
        };

        let parameters = self.tree.node(callable).parameters().to_vec();
        let parameters = self.inferred_entries(&parameters);
        let result = NamedTupleEntry::new(None, "instance", instance.with_nullability(false));
        Type::callable(Some(callable), None, parameters, vec![result])
    }
}

fn remember_parameter(parameter: NodeId, ty: Type) -> Type {
    match ty {
        Type::Callable(callable) => {
            let mut callable = (*callable).clone();
            callable.parameter = Some(parameter);
            Type::Callable(std::rc::Rc::new(callable))
        }
        other => other,
    }
}

/// Block-lambda results assigned directly in the lambda body, in order.
pub fn block_lambda_results(tree: &SyntaxTree, body: NodeId) -> Vec<NodeId> {
    let Node::Block { statements } = tree.node(body) else {
        return Vec::new();
    };
    statements
        .iter()
        .filter_map(|&it| match tree.node(it) {
            Node::Assignment { assignees, .. } => Some(assignees),
            _ => None,
        })
        .flatten()
        .copied()
        .filter(|&it| matches!(tree.node(it), Node::BlockLambdaResult { .. }))
        .collect()
}
