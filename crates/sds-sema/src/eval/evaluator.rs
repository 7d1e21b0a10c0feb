//! Folds expressions into constants.
//!
//! Evaluation never fails. Anything that cannot be folded is
//! `Constant::NotEvaluated`, and that poisons every expression built on
//! top of it. Only the type computer is consulted, to resolve the callee
//! of enum-variant instantiations.

use std::cmp::Ordering;
use std::collections::HashMap;

use indexmap::IndexSet;
use num_bigint::BigInt;
use sds_core::{InfixOperator, Node, NodeId, PrefixOperator, SyntaxTree};
use tracing::trace;

use super::constant::Constant;
use crate::node_mapper;
use crate::typing::{Type, TypeComputer};

/// Intermediate result. A variant with parameters is only a constant once
/// it has been called.
#[derive(Debug, Clone, PartialEq)]
enum Value {
    Constant(Constant),
    UninstantiatedVariant(NodeId),
}

const NOT_EVALUATED: Value = Value::Constant(Constant::NotEvaluated);

impl Value {
    fn into_constant(self) -> Constant {
        match self {
            Value::Constant(constant) => constant,
            Value::UninstantiatedVariant(_) => Constant::NotEvaluated,
        }
    }
}

#[derive(Default)]
pub struct PartialEvaluator {
    cache: HashMap<NodeId, Value>,
    /// Placeholders and defaults currently being folded.
    in_progress: IndexSet<NodeId>,
}

impl PartialEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn evaluate(&mut self, types: &mut TypeComputer<'_>, expression: NodeId) -> Constant {
        self.value_of(types, expression).into_constant()
    }

    /// Whether `expression` folds to a constant.
    pub fn can_be_value_of_constant_parameter(
        &mut self,
        types: &mut TypeComputer<'_>,
        expression: NodeId,
    ) -> bool {
        self.evaluate(types, expression).is_evaluated()
    }

    fn value_of(&mut self, types: &mut TypeComputer<'_>, id: NodeId) -> Value {
        if let Some(value) = self.cache.get(&id) {
            return value.clone();
        }
        if !types.tree().contains(id) || !self.in_progress.insert(id) {
            return NOT_EVALUATED;
        }

        let value = self.do_value_of(types, id);
        trace!(node = %id, ?value, "evaluated");

        self.in_progress.swap_remove(&id);
        self.cache.insert(id, value.clone());
        value
    }

    fn constant_of(&mut self, types: &mut TypeComputer<'_>, id: NodeId) -> Constant {
        self.value_of(types, id).into_constant()
    }

    fn do_value_of(&mut self, types: &mut TypeComputer<'_>, id: NodeId) -> Value {
        let tree = types.tree();
        let constant = match tree.node(id) {
            Node::Int { value } => Constant::Int(value.clone()),
            Node::Float { value } => Constant::Float(*value),
            Node::String { value } => Constant::String(value.clone()),
            Node::Boolean { value } => Constant::Boolean(*value),
            Node::Null => Constant::Null,
            Node::TemplateString { parts } => self.evaluate_template(types, parts),
            Node::Reference { target } => return self.evaluate_reference(types, *target),
            Node::Argument { value, .. } => return self.value_of(types, *value),
            Node::Parenthesized { expression } | Node::TypeCast { expression, .. } => {
                return self.value_of(types, *expression);
            }
            Node::Infix {
                operator,
                left,
                right,
            } => self.evaluate_infix(types, *operator, *left, *right),
            Node::Prefix { operator, operand } => {
                let operand = self.constant_of(types, *operand);
                evaluate_prefix(*operator, operand)
            }
            Node::Call { receiver, .. } => self.evaluate_call(types, id, *receiver),
            Node::MemberAccess {
                receiver,
                member,
                null_safe,
            } => return self.evaluate_member_access(types, *receiver, *member, *null_safe),
            Node::IndexedAccess {
                receiver,
                index,
                null_safe,
            } => self.evaluate_indexed_access(types, *receiver, *index, *null_safe),
            Node::List { elements } => {
                let mut folded = Vec::with_capacity(elements.len());
                for &element in elements {
                    let element = self.constant_of(types, element);
                    if !element.is_evaluated() {
                        return NOT_EVALUATED;
                    }
                    folded.push(element);
                }
                Constant::List(folded)
            }
            // Lambdas, declarations, statements, and type syntax
            _ => Constant::NotEvaluated,
        };
        Value::Constant(constant)
    }

    fn evaluate_template(&mut self, types: &mut TypeComputer<'_>, parts: &[NodeId]) -> Constant {
        let tree = types.tree();
        let mut out = String::new();
        for &part in parts {
            let part = self.constant_of(types, part);
            if !part.is_evaluated() {
                return Constant::NotEvaluated;
            }
            out.push_str(&part.to_interpolation_string(tree));
        }
        Constant::String(out)
    }

    fn evaluate_reference(
        &mut self,
        types: &mut TypeComputer<'_>,
        target: Option<NodeId>,
    ) -> Value {
        let tree = types.tree();
        let Some(target) = target else {
            return NOT_EVALUATED;
        };

        match tree.node(target) {
            Node::Parameter {
                is_const: true,
                default: Some(default),
                ..
            } => self.value_of(types, *default),
            Node::Placeholder { .. } => match node_mapper::assignee_to_value(tree, target) {
                Some((expression, 0)) => self.value_of(types, expression),
                _ => NOT_EVALUATED,
            },
            Node::EnumVariant { parameters, .. } => {
                if parameters.is_empty() {
                    Value::Constant(Constant::EnumVariant {
                        variant: target,
                        arguments: Vec::new(),
                    })
                } else {
                    Value::UninstantiatedVariant(target)
                }
            }
            _ => NOT_EVALUATED,
        }
    }

    fn evaluate_infix(
        &mut self,
        types: &mut TypeComputer<'_>,
        operator: InfixOperator,
        left: NodeId,
        right: NodeId,
    ) -> Constant {
        let left = self.constant_of(types, left);
        if !left.is_evaluated() {
            return Constant::NotEvaluated;
        }

        match (operator, &left) {
            (InfixOperator::Or, Constant::Boolean(true)) => return Constant::Boolean(true),
            (InfixOperator::And, Constant::Boolean(false)) => return Constant::Boolean(false),
            (InfixOperator::Or | InfixOperator::And, Constant::Boolean(_)) => {
                return match self.constant_of(types, right) {
                    Constant::Boolean(value) => Constant::Boolean(value),
                    _ => Constant::NotEvaluated,
                };
            }
            (InfixOperator::Or | InfixOperator::And, _) => return Constant::NotEvaluated,
            (InfixOperator::Elvis, Constant::Null) => return self.constant_of(types, right),
            (InfixOperator::Elvis, _) => return left.clone(),
            _ => {}
        }

        let right = self.constant_of(types, right);
        if !right.is_evaluated() {
            return Constant::NotEvaluated;
        }

        match operator {
            InfixOperator::Equals | InfixOperator::IdenticalTo => {
                Constant::Boolean(constants_equal(&left, &right))
            }
            InfixOperator::NotEquals | InfixOperator::NotIdenticalTo => {
                Constant::Boolean(!constants_equal(&left, &right))
            }
            InfixOperator::LessThan => compare(&left, &right, Ordering::is_lt),
            InfixOperator::LessThanOrEquals => compare(&left, &right, Ordering::is_le),
            InfixOperator::GreaterThanOrEquals => compare(&left, &right, Ordering::is_ge),
            InfixOperator::GreaterThan => compare(&left, &right, Ordering::is_gt),
            InfixOperator::Plus
            | InfixOperator::Minus
            | InfixOperator::Times
            | InfixOperator::DividedBy
            | InfixOperator::Modulo => arithmetic(operator, &left, &right),
            InfixOperator::Or | InfixOperator::And | InfixOperator::Elvis => Constant::NotEvaluated,
        }
    }

    /// A null-safe call on `null` is `null`. Otherwise only enum-variant
    /// instantiations fold: arguments are reordered into parameter order and
    /// missing ones take their defaults.
    fn evaluate_call(
        &mut self,
        types: &mut TypeComputer<'_>,
        call: NodeId,
        receiver: NodeId,
    ) -> Constant {
        let tree = types.tree();
        let Node::Call {
            arguments,
            null_safe,
            ..
        } = tree.node(call)
        else {
            return Constant::NotEvaluated;
        };
        if *null_safe && self.constant_of(types, receiver) == Constant::Null {
            return Constant::Null;
        }

        let variant = match types.compute_type(receiver) {
            Type::Static(instance) => match *instance {
                Type::EnumVariant { declaration, .. } => declaration,
                _ => return Constant::NotEvaluated,
            },
            _ => return Constant::NotEvaluated,
        };
        let bound = node_mapper::arguments_to_parameters(types, call);
        if bound.len() != arguments.len() {
            return Constant::NotEvaluated;
        }

        let mut folded = Vec::new();
        for &parameter in tree.node(variant).parameters() {
            let value = match bound.iter().find(|(_, it)| *it == parameter) {
                Some(&(argument, _)) => self.constant_of(types, argument),
                None => match tree.node(parameter) {
                    Node::Parameter {
                        default: Some(default),
                        ..
                    } => self.constant_of(types, *default),
                    _ => Constant::NotEvaluated,
                },
            };
            if !value.is_evaluated() {
                return Constant::NotEvaluated;
            }
            folded.push(value);
        }

        Constant::EnumVariant {
            variant,
            arguments: folded,
        }
    }

    fn evaluate_member_access(
        &mut self,
        types: &mut TypeComputer<'_>,
        receiver: NodeId,
        member: NodeId,
        null_safe: bool,
    ) -> Value {
        let tree = types.tree();
        let target = match tree.node(member) {
            Node::Reference {
                target: Some(target),
            } => *target,
            _ => return NOT_EVALUATED,
        };

        // `E.V` names the variant itself
        if matches!(tree.node(target), Node::EnumVariant { .. }) {
            return self.value_of(types, member);
        }

        match self.constant_of(types, receiver) {
            Constant::Null if null_safe => Value::Constant(Constant::Null),
            Constant::EnumVariant { variant, arguments } => {
                match variant_argument(tree, variant, &arguments, target) {
                    Some(argument) => Value::Constant(argument),
                    None => NOT_EVALUATED,
                }
            }
            _ => NOT_EVALUATED,
        }
    }

    fn evaluate_indexed_access(
        &mut self,
        types: &mut TypeComputer<'_>,
        receiver: NodeId,
        index: NodeId,
        null_safe: bool,
    ) -> Constant {
        let receiver = self.constant_of(types, receiver);
        if null_safe && receiver == Constant::Null {
            return Constant::Null;
        }
        let Constant::List(elements) = receiver else {
            return Constant::NotEvaluated;
        };

        let element = match self.constant_of(types, index) {
            Constant::Int(index) => usize::try_from(&index)
                .ok()
                .and_then(|it| elements.get(it).cloned()),
            _ => None,
        };
        element.unwrap_or(Constant::NotEvaluated)
    }
}

/// Argument of an instantiated variant bound to the parameter `parameter`.
fn variant_argument(
    tree: &SyntaxTree,
    variant: NodeId,
    arguments: &[Constant],
    parameter: NodeId,
) -> Option<Constant> {
    let position = tree
        .node(variant)
        .parameters()
        .iter()
        .position(|&it| it == parameter)?;
    arguments.get(position).cloned()
}

fn evaluate_prefix(operator: PrefixOperator, operand: Constant) -> Constant {
    match (operator, operand) {
        (PrefixOperator::Not, Constant::Boolean(value)) => Constant::Boolean(!value),
        (PrefixOperator::Minus, Constant::Int(value)) => Constant::Int(-value),
        (PrefixOperator::Minus, Constant::Float(value)) => Constant::Float(-value),
        _ => Constant::NotEvaluated,
    }
}

/// Numbers of different kinds compare by value.
fn constants_equal(left: &Constant, right: &Constant) -> bool {
    match (left, right) {
        (Constant::Int(_), Constant::Float(_)) | (Constant::Float(_), Constant::Int(_)) => {
            left.as_f64() == right.as_f64()
        }
        _ => left == right,
    }
}

fn compare(left: &Constant, right: &Constant, test: fn(Ordering) -> bool) -> Constant {
    let ordering = match (left, right) {
        (Constant::Int(left), Constant::Int(right)) => Some(left.cmp(right)),
        _ => match (left.as_f64(), right.as_f64()) {
            (Some(left), Some(right)) => left.partial_cmp(&right),
            _ => return Constant::NotEvaluated,
        },
    };
    // NaN compares false against everything
    Constant::Boolean(ordering.is_some_and(test))
}

fn arithmetic(operator: InfixOperator, left: &Constant, right: &Constant) -> Constant {
    if !left.is_numeric() || !right.is_numeric() {
        return Constant::NotEvaluated;
    }
    if matches!(operator, InfixOperator::DividedBy | InfixOperator::Modulo) && right.is_zero() {
        return Constant::NotEvaluated;
    }

    if let (Constant::Int(left), Constant::Int(right)) = (left, right) {
        return Constant::Int(int_arithmetic(operator, left, right));
    }

    let (Some(left), Some(right)) = (left.as_f64(), right.as_f64()) else {
        return Constant::NotEvaluated;
    };
    let value = match operator {
        InfixOperator::Plus => left + right,
        InfixOperator::Minus => left - right,
        InfixOperator::Times => left * right,
        InfixOperator::DividedBy => left / right,
        InfixOperator::Modulo => left % right,
        _ => return Constant::NotEvaluated,
    };
    Constant::Float(value)
}

/// Division truncates toward zero; the remainder takes the dividend's sign.
fn int_arithmetic(operator: InfixOperator, left: &BigInt, right: &BigInt) -> BigInt {
    match operator {
        InfixOperator::Plus => left + right,
        InfixOperator::Minus => left - right,
        InfixOperator::Times => left * right,
        InfixOperator::DividedBy => left / right,
        _ => left % right,
    }
}
