//! Node kinds of the resolved syntax tree.
//!
//! `Node` is a closed sum type: every analysis matches on it exhaustively,
//! so adding a kind forces each of them to decide how to handle it.
//!
//! Fields fall into two groups:
//! - **children**: nodes owned by this node (they get a parent link)
//! - **cross-references**: resolved links to declarations elsewhere in the
//!   tree (`Reference::target`, `NamedType::declaration`, `Yield::result`)

use std::fmt;

use num_bigint::BigInt;
use serde::{Deserialize, Serialize};

use crate::interner::Symbol;
use crate::tree::NodeId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Node {
    // Declarations
    Annotation {
        name: Symbol,
        #[serde(default)]
        parameters: Vec<NodeId>,
    },
    Attribute {
        name: Symbol,
        #[serde(default)]
        ty: Option<NodeId>,
        #[serde(default)]
        is_static: bool,
    },
    Class {
        name: Symbol,
        /// `None` for classes without a constructor (they cannot be called).
        #[serde(default)]
        constructor: Option<Vec<NodeId>>,
        #[serde(default)]
        parent_types: Vec<NodeId>,
        #[serde(default)]
        members: Vec<NodeId>,
    },
    Enum {
        name: Symbol,
        #[serde(default)]
        variants: Vec<NodeId>,
    },
    EnumVariant {
        name: Symbol,
        #[serde(default)]
        parameters: Vec<NodeId>,
    },
    Function {
        name: Symbol,
        #[serde(default)]
        parameters: Vec<NodeId>,
        #[serde(default)]
        results: Vec<NodeId>,
        #[serde(default)]
        is_static: bool,
    },
    Parameter {
        name: Symbol,
        #[serde(default)]
        ty: Option<NodeId>,
        #[serde(default)]
        default: Option<NodeId>,
        #[serde(default)]
        is_const: bool,
    },
    Pipeline {
        name: Symbol,
        body: NodeId,
    },
    Placeholder {
        name: Symbol,
    },
    Result {
        name: Symbol,
        #[serde(default)]
        ty: Option<NodeId>,
    },
    Segment {
        name: Symbol,
        #[serde(default)]
        parameters: Vec<NodeId>,
        #[serde(default)]
        results: Vec<NodeId>,
        body: NodeId,
    },
    BlockLambdaResult {
        name: Symbol,
    },

    // Assignees without a declaration
    Wildcard,
    Yield {
        #[serde(default)]
        result: Option<NodeId>,
    },

    // Statements
    Block {
        #[serde(default)]
        statements: Vec<NodeId>,
    },
    Assignment {
        assignees: Vec<NodeId>,
        expression: NodeId,
    },
    ExpressionStatement {
        expression: NodeId,
    },
    OutputStatement {
        expression: NodeId,
    },

    // Expressions
    Int {
        #[serde(with = "decimal")]
        value: BigInt,
    },
    Float {
        value: f64,
    },
    String {
        value: String,
    },
    Boolean {
        value: bool,
    },
    Null,
    TemplateString {
        parts: Vec<NodeId>,
    },
    Reference {
        /// `None` when name resolution failed.
        #[serde(default)]
        target: Option<NodeId>,
    },
    Argument {
        #[serde(default)]
        name: Option<Symbol>,
        value: NodeId,
    },
    Call {
        receiver: NodeId,
        #[serde(default)]
        arguments: Vec<NodeId>,
        #[serde(default)]
        null_safe: bool,
    },
    MemberAccess {
        receiver: NodeId,
        /// Always a `Reference` node.
        member: NodeId,
        #[serde(default)]
        null_safe: bool,
    },
    IndexedAccess {
        receiver: NodeId,
        index: NodeId,
        #[serde(default)]
        null_safe: bool,
    },
    Infix {
        operator: InfixOperator,
        left: NodeId,
        right: NodeId,
    },
    Prefix {
        operator: PrefixOperator,
        operand: NodeId,
    },
    List {
        #[serde(default)]
        elements: Vec<NodeId>,
    },
    Parenthesized {
        expression: NodeId,
    },
    TypeCast {
        expression: NodeId,
        ty: NodeId,
    },
    BlockLambda {
        #[serde(default)]
        parameters: Vec<NodeId>,
        body: NodeId,
    },
    ExpressionLambda {
        #[serde(default)]
        parameters: Vec<NodeId>,
        result: NodeId,
    },

    // Type syntax
    NamedType {
        #[serde(default)]
        declaration: Option<NodeId>,
        #[serde(default)]
        nullable: bool,
    },
    CallableType {
        #[serde(default)]
        parameters: Vec<NodeId>,
        #[serde(default)]
        results: Vec<NodeId>,
    },
    UnionType {
        members: Vec<NodeId>,
    },
}

/// Coarse classification of a node, used by the analyses to dispatch before
/// matching on the concrete variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Declaration,
    Assignee,
    Statement,
    Expression,
    Type,
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Annotation { .. }
            | Node::Attribute { .. }
            | Node::Class { .. }
            | Node::Enum { .. }
            | Node::EnumVariant { .. }
            | Node::Function { .. }
            | Node::Parameter { .. }
            | Node::Pipeline { .. }
            | Node::Result { .. }
            | Node::Segment { .. } => NodeKind::Declaration,
            Node::Placeholder { .. }
            | Node::BlockLambdaResult { .. }
            | Node::Wildcard
            | Node::Yield { .. } => NodeKind::Assignee,
            Node::Block { .. }
            | Node::Assignment { .. }
            | Node::ExpressionStatement { .. }
            | Node::OutputStatement { .. } => NodeKind::Statement,
            Node::Int { .. }
            | Node::Float { .. }
            | Node::String { .. }
            | Node::Boolean { .. }
            | Node::Null
            | Node::TemplateString { .. }
            | Node::Reference { .. }
            | Node::Argument { .. }
            | Node::Call { .. }
            | Node::MemberAccess { .. }
            | Node::IndexedAccess { .. }
            | Node::Infix { .. }
            | Node::Prefix { .. }
            | Node::List { .. }
            | Node::Parenthesized { .. }
            | Node::TypeCast { .. }
            | Node::BlockLambda { .. }
            | Node::ExpressionLambda { .. } => NodeKind::Expression,
            Node::NamedType { .. } | Node::CallableType { .. } | Node::UnionType { .. } => {
                NodeKind::Type
            }
        }
    }

    /// Name used in dumps and error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Annotation { .. } => "Annotation",
            Node::Attribute { .. } => "Attribute",
            Node::Class { .. } => "Class",
            Node::Enum { .. } => "Enum",
            Node::EnumVariant { .. } => "EnumVariant",
            Node::Function { .. } => "Function",
            Node::Parameter { .. } => "Parameter",
            Node::Pipeline { .. } => "Pipeline",
            Node::Placeholder { .. } => "Placeholder",
            Node::Result { .. } => "Result",
            Node::Segment { .. } => "Segment",
            Node::BlockLambdaResult { .. } => "BlockLambdaResult",
            Node::Wildcard => "Wildcard",
            Node::Yield { .. } => "Yield",
            Node::Block { .. } => "Block",
            Node::Assignment { .. } => "Assignment",
            Node::ExpressionStatement { .. } => "ExpressionStatement",
            Node::OutputStatement { .. } => "OutputStatement",
            Node::Int { .. } => "Int",
            Node::Float { .. } => "Float",
            Node::String { .. } => "String",
            Node::Boolean { .. } => "Boolean",
            Node::Null => "Null",
            Node::TemplateString { .. } => "TemplateString",
            Node::Reference { .. } => "Reference",
            Node::Argument { .. } => "Argument",
            Node::Call { .. } => "Call",
            Node::MemberAccess { .. } => "MemberAccess",
            Node::IndexedAccess { .. } => "IndexedAccess",
            Node::Infix { .. } => "Infix",
            Node::Prefix { .. } => "Prefix",
            Node::List { .. } => "List",
            Node::Parenthesized { .. } => "Parenthesized",
            Node::TypeCast { .. } => "TypeCast",
            Node::BlockLambda { .. } => "BlockLambda",
            Node::ExpressionLambda { .. } => "ExpressionLambda",
            Node::NamedType { .. } => "NamedType",
            Node::CallableType { .. } => "CallableType",
            Node::UnionType { .. } => "UnionType",
        }
    }

    /// Declared name, for declarations and named assignees.
    pub fn name(&self) -> Option<Symbol> {
        match self {
            Node::Annotation { name, .. }
            | Node::Attribute { name, .. }
            | Node::Class { name, .. }
            | Node::Enum { name, .. }
            | Node::EnumVariant { name, .. }
            | Node::Function { name, .. }
            | Node::Parameter { name, .. }
            | Node::Pipeline { name, .. }
            | Node::Placeholder { name }
            | Node::Result { name, .. }
            | Node::Segment { name, .. }
            | Node::BlockLambdaResult { name } => Some(*name),
            _ => None,
        }
    }

    /// Interned name the node carries, including argument names.
    pub fn symbol(&self) -> Option<Symbol> {
        match self {
            Node::Argument { name, .. } => *name,
            _ => self.name(),
        }
    }

    /// Whether the node introduces a callable scope with its own parameters
    /// or body.
    pub fn is_callable(&self) -> bool {
        matches!(
            self,
            Node::Annotation { .. }
                | Node::Class { .. }
                | Node::EnumVariant { .. }
                | Node::Function { .. }
                | Node::Pipeline { .. }
                | Node::Segment { .. }
                | Node::BlockLambda { .. }
                | Node::ExpressionLambda { .. }
                | Node::CallableType { .. }
        )
    }

    pub fn is_lambda(&self) -> bool {
        matches!(self, Node::BlockLambda { .. } | Node::ExpressionLambda { .. })
    }

    /// Declarations that introduce a named type (`Foo` used as a type or as
    /// a static reference).
    pub fn is_named_type_declaration(&self) -> bool {
        matches!(
            self,
            Node::Class { .. } | Node::Enum { .. } | Node::EnumVariant { .. }
        )
    }

    /// Parameter list of a callable. Classes without a constructor and
    /// pipelines have none.
    pub fn parameters(&self) -> &[NodeId] {
        match self {
            Node::Annotation { parameters, .. }
            | Node::EnumVariant { parameters, .. }
            | Node::Function { parameters, .. }
            | Node::Segment { parameters, .. }
            | Node::BlockLambda { parameters, .. }
            | Node::ExpressionLambda { parameters, .. }
            | Node::CallableType { parameters, .. } => parameters,
            Node::Class {
                constructor: Some(parameters),
                ..
            } => parameters,
            _ => &[],
        }
    }

    /// Declared results of functions, segments, and callable types.
    pub fn results(&self) -> &[NodeId] {
        match self {
            Node::Function { results, .. }
            | Node::Segment { results, .. }
            | Node::CallableType { results, .. } => results,
            _ => &[],
        }
    }

    /// Owned child nodes, in source order.
    pub fn children(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        match self {
            Node::Annotation { parameters, .. } | Node::EnumVariant { parameters, .. } => {
                out.extend(parameters)
            }
            Node::Attribute { ty, .. } | Node::Result { ty, .. } => out.extend(ty),
            Node::Class {
                constructor,
                parent_types,
                members,
                ..
            } => {
                out.extend(constructor.iter().flatten());
                out.extend(parent_types);
                out.extend(members);
            }
            Node::Enum { variants, .. } => out.extend(variants),
            Node::Function {
                parameters,
                results,
                ..
            }
            | Node::CallableType {
                parameters,
                results,
            } => {
                out.extend(parameters);
                out.extend(results);
            }
            Node::Parameter { ty, default, .. } => {
                out.extend(ty);
                out.extend(default);
            }
            Node::Pipeline { body, .. } => out.push(*body),
            Node::Segment {
                parameters,
                results,
                body,
                ..
            } => {
                out.extend(parameters);
                out.extend(results);
                out.push(*body);
            }
            Node::Block { statements } => out.extend(statements),
            Node::Assignment {
                assignees,
                expression,
            } => {
                out.extend(assignees);
                out.push(*expression);
            }
            Node::ExpressionStatement { expression }
            | Node::OutputStatement { expression }
            | Node::Parenthesized { expression } => out.push(*expression),
            Node::TemplateString { parts } => out.extend(parts),
            Node::Argument { value, .. } => out.push(*value),
            Node::Call {
                receiver,
                arguments,
                ..
            } => {
                out.push(*receiver);
                out.extend(arguments);
            }
            Node::MemberAccess {
                receiver, member, ..
            } => {
                out.push(*receiver);
                out.push(*member);
            }
            Node::IndexedAccess {
                receiver, index, ..
            } => {
                out.push(*receiver);
                out.push(*index);
            }
            Node::Infix { left, right, .. } => {
                out.push(*left);
                out.push(*right);
            }
            Node::Prefix { operand, .. } => out.push(*operand),
            Node::List { elements } => out.extend(elements),
            Node::TypeCast { expression, ty } => {
                out.push(*expression);
                out.push(*ty);
            }
            Node::BlockLambda { parameters, body } => {
                out.extend(parameters);
                out.push(*body);
            }
            Node::ExpressionLambda { parameters, result } => {
                out.extend(parameters);
                out.push(*result);
            }
            Node::UnionType { members } => out.extend(members),
            Node::Placeholder { .. }
            | Node::BlockLambdaResult { .. }
            | Node::Wildcard
            | Node::Yield { .. }
            | Node::Int { .. }
            | Node::Float { .. }
            | Node::String { .. }
            | Node::Boolean { .. }
            | Node::Null
            | Node::Reference { .. }
            | Node::NamedType { .. } => {}
        }
        out
    }

    /// Resolved link to a declaration that is not a child.
    pub fn cross_reference(&self) -> Option<NodeId> {
        match self {
            Node::Reference { target } => *target,
            Node::NamedType { declaration, .. } => *declaration,
            Node::Yield { result } => *result,
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InfixOperator {
    #[serde(rename = "or")]
    Or,
    #[serde(rename = "and")]
    And,
    #[serde(rename = "==")]
    Equals,
    #[serde(rename = "!=")]
    NotEquals,
    #[serde(rename = "===")]
    IdenticalTo,
    #[serde(rename = "!==")]
    NotIdenticalTo,
    #[serde(rename = "<")]
    LessThan,
    #[serde(rename = "<=")]
    LessThanOrEquals,
    #[serde(rename = ">=")]
    GreaterThanOrEquals,
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = "+")]
    Plus,
    #[serde(rename = "-")]
    Minus,
    #[serde(rename = "*")]
    Times,
    #[serde(rename = "/")]
    DividedBy,
    #[serde(rename = "%")]
    Modulo,
    #[serde(rename = "?:")]
    Elvis,
}

impl InfixOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            InfixOperator::Or => "or",
            InfixOperator::And => "and",
            InfixOperator::Equals => "==",
            InfixOperator::NotEquals => "!=",
            InfixOperator::IdenticalTo => "===",
            InfixOperator::NotIdenticalTo => "!==",
            InfixOperator::LessThan => "<",
            InfixOperator::LessThanOrEquals => "<=",
            InfixOperator::GreaterThanOrEquals => ">=",
            InfixOperator::GreaterThan => ">",
            InfixOperator::Plus => "+",
            InfixOperator::Minus => "-",
            InfixOperator::Times => "*",
            InfixOperator::DividedBy => "/",
            InfixOperator::Modulo => "%",
            InfixOperator::Elvis => "?:",
        }
    }

    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            InfixOperator::Plus
                | InfixOperator::Minus
                | InfixOperator::Times
                | InfixOperator::DividedBy
                | InfixOperator::Modulo
        )
    }
}

impl fmt::Display for InfixOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrefixOperator {
    #[serde(rename = "not")]
    Not,
    #[serde(rename = "-")]
    Minus,
}

impl fmt::Display for PrefixOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PrefixOperator::Not => "not",
            PrefixOperator::Minus => "-",
        })
    }
}

/// Integers travel as decimal strings so JSON never truncates them.
mod decimal {
    use std::str::FromStr;

    use num_bigint::BigInt;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(value: &BigInt, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigInt, D::Error> {
        let text = String::deserialize(deserializer)?;
        BigInt::from_str(&text)
            .map_err(|_| de::Error::custom(crate::Error::InvalidInteger(text.clone())))
    }
}
