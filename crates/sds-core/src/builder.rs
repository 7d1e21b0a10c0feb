//! Programmatic construction of resolved syntax trees.
//!
//! Every method appends one node (plus any wrapper it implies) and returns
//! its id. Callables with a body are created with an empty block that
//! `body` fills later, so bodies can refer to callables declared after
//! them.
//!
//! ```ignore
//! let mut b = TreeBuilder::with_core_library();
//! let f = b.function("f", vec![], vec![]);
//! let s = b.segment("s", vec![], vec![]);
//! let call = b.call_to(f, vec![]);
//! let stmt = b.expression_statement(call);
//! b.body(s, vec![stmt]);
//! let tree = b.finish()?;
//! ```

use indexmap::IndexMap;
use num_bigint::BigInt;

use crate::ast::{InfixOperator, Node, PrefixOperator};
use crate::interner::Interner;
use crate::tree::{NodeId, SyntaxTree};
use crate::Result;

/// Names of the classes the analyses treat as built in.
pub const CORE_CLASSES: [&str; 9] = [
    "Any", "Nothing", "Number", "Int", "Float", "Boolean", "String", "List", "Map",
];

#[derive(Debug, Default)]
pub struct TreeBuilder {
    interner: Interner,
    nodes: Vec<Node>,
    core: IndexMap<&'static str, NodeId>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A builder whose tree already declares the core classes.
    pub fn with_core_library() -> Self {
        let mut b = Self::new();
        for name in CORE_CLASSES {
            let id = b.class(name);
            b.core.insert(name, id);
        }
        for (child, parent) in [("Int", "Number"), ("Float", "Number")] {
            let parent_type = b.core_type(parent);
            if let Some(child) = b.core_class(child) {
                b.extend(child, parent_type);
            }
        }
        b
    }

    pub fn core_class(&self, name: &str) -> Option<NodeId> {
        self.core.get(name).copied()
    }

    /// Named type pointing at a core class. Unresolved if the builder was
    /// created without the core library.
    pub fn core_type(&mut self, name: &str) -> NodeId {
        let declaration = self.core_class(name);
        self.push(Node::NamedType {
            declaration,
            nullable: false,
        })
    }

    pub fn nullable_core_type(&mut self, name: &str) -> NodeId {
        let declaration = self.core_class(name);
        self.push(Node::NamedType {
            declaration,
            nullable: true,
        })
    }

    pub fn finish(self) -> Result<SyntaxTree> {
        SyntaxTree::new(self.interner, self.nodes)
    }

    /// Direct access for front ends that need a kind without a helper.
    pub fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId::from_raw(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    // ------------------------------------------------------------------
    // Declarations
    // ------------------------------------------------------------------

    pub fn annotation(&mut self, name: &str, parameters: Vec<NodeId>) -> NodeId {
        let name = self.interner.intern(name);
        self.push(Node::Annotation { name, parameters })
    }

    pub fn attribute(&mut self, name: &str, ty: Option<NodeId>) -> NodeId {
        let name = self.interner.intern(name);
        self.push(Node::Attribute {
            name,
            ty,
            is_static: false,
        })
    }

    pub fn static_attribute(&mut self, name: &str, ty: Option<NodeId>) -> NodeId {
        let name = self.interner.intern(name);
        self.push(Node::Attribute {
            name,
            ty,
            is_static: true,
        })
    }

    /// Class without a constructor.
    pub fn class(&mut self, name: &str) -> NodeId {
        let name = self.interner.intern(name);
        self.push(Node::Class {
            name,
            constructor: None,
            parent_types: Vec::new(),
            members: Vec::new(),
        })
    }

    pub fn class_with_constructor(&mut self, name: &str, parameters: Vec<NodeId>) -> NodeId {
        let name = self.interner.intern(name);
        self.push(Node::Class {
            name,
            constructor: Some(parameters),
            parent_types: Vec::new(),
            members: Vec::new(),
        })
    }

    /// Append a parent type to a class.
    pub fn extend(&mut self, class: NodeId, parent_type: NodeId) {
        if let Some(Node::Class { parent_types, .. }) = self.node_mut(class) {
            parent_types.push(parent_type);
        }
    }

    pub fn add_members(&mut self, class: NodeId, new_members: Vec<NodeId>) {
        if let Some(Node::Class { members, .. }) = self.node_mut(class) {
            members.extend(new_members);
        }
    }

    pub fn enumeration(&mut self, name: &str, variants: Vec<NodeId>) -> NodeId {
        let name = self.interner.intern(name);
        self.push(Node::Enum { name, variants })
    }

    pub fn variant(&mut self, name: &str, parameters: Vec<NodeId>) -> NodeId {
        let name = self.interner.intern(name);
        self.push(Node::EnumVariant { name, parameters })
    }

    pub fn function(
        &mut self,
        name: &str,
        parameters: Vec<NodeId>,
        results: Vec<NodeId>,
    ) -> NodeId {
        let name = self.interner.intern(name);
        self.push(Node::Function {
            name,
            parameters,
            results,
            is_static: false,
        })
    }

    pub fn static_function(
        &mut self,
        name: &str,
        parameters: Vec<NodeId>,
        results: Vec<NodeId>,
    ) -> NodeId {
        let name = self.interner.intern(name);
        self.push(Node::Function {
            name,
            parameters,
            results,
            is_static: true,
        })
    }

    pub fn parameter(&mut self, name: &str, ty: Option<NodeId>) -> NodeId {
        self.parameter_node(name, ty, None, false)
    }

    pub fn parameter_with_default(
        &mut self,
        name: &str,
        ty: Option<NodeId>,
        default: NodeId,
    ) -> NodeId {
        self.parameter_node(name, ty, Some(default), false)
    }

    pub fn const_parameter(
        &mut self,
        name: &str,
        ty: Option<NodeId>,
        default: Option<NodeId>,
    ) -> NodeId {
        self.parameter_node(name, ty, default, true)
    }

    fn parameter_node(
        &mut self,
        name: &str,
        ty: Option<NodeId>,
        default: Option<NodeId>,
        is_const: bool,
    ) -> NodeId {
        let name = self.interner.intern(name);
        self.push(Node::Parameter {
            name,
            ty,
            default,
            is_const,
        })
    }

    pub fn result(&mut self, name: &str, ty: Option<NodeId>) -> NodeId {
        let name = self.interner.intern(name);
        self.push(Node::Result { name, ty })
    }

    /// Segment with an empty body; fill it with `body`.
    pub fn segment(&mut self, name: &str, parameters: Vec<NodeId>, results: Vec<NodeId>) -> NodeId {
        let name = self.interner.intern(name);
        let body = self.block(Vec::new());
        self.push(Node::Segment {
            name,
            parameters,
            results,
            body,
        })
    }

    /// Pipeline with an empty body; fill it with `body`.
    pub fn pipeline(&mut self, name: &str) -> NodeId {
        let name = self.interner.intern(name);
        let body = self.block(Vec::new());
        self.push(Node::Pipeline { name, body })
    }

    /// Append statements to the body of a segment, pipeline, or block lambda.
    pub fn body(&mut self, callable: NodeId, new_statements: Vec<NodeId>) {
        let body = match self.nodes.get(callable.index()) {
            Some(Node::Segment { body, .. })
            | Some(Node::Pipeline { body, .. })
            | Some(Node::BlockLambda { body, .. }) => *body,
            _ => return,
        };
        if let Some(Node::Block { statements }) = self.node_mut(body) {
            statements.extend(new_statements);
        }
    }

    // ------------------------------------------------------------------
    // Statements and assignees
    // ------------------------------------------------------------------

    pub fn block(&mut self, statements: Vec<NodeId>) -> NodeId {
        self.push(Node::Block { statements })
    }

    pub fn assign(&mut self, assignees: Vec<NodeId>, expression: NodeId) -> NodeId {
        self.push(Node::Assignment {
            assignees,
            expression,
        })
    }

    pub fn expression_statement(&mut self, expression: NodeId) -> NodeId {
        self.push(Node::ExpressionStatement { expression })
    }

    pub fn output(&mut self, expression: NodeId) -> NodeId {
        self.push(Node::OutputStatement { expression })
    }

    pub fn placeholder(&mut self, name: &str) -> NodeId {
        let name = self.interner.intern(name);
        self.push(Node::Placeholder { name })
    }

    pub fn wildcard(&mut self) -> NodeId {
        self.push(Node::Wildcard)
    }

    /// `yield r`, assigning to a result of the containing segment.
    pub fn yield_to(&mut self, result: NodeId) -> NodeId {
        self.push(Node::Yield {
            result: Some(result),
        })
    }

    pub fn block_lambda_result(&mut self, name: &str) -> NodeId {
        let name = self.interner.intern(name);
        self.push(Node::BlockLambdaResult { name })
    }

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------

    pub fn int(&mut self, value: i64) -> NodeId {
        self.push(Node::Int {
            value: BigInt::from(value),
        })
    }

    pub fn big_int(&mut self, value: BigInt) -> NodeId {
        self.push(Node::Int { value })
    }

    pub fn float(&mut self, value: f64) -> NodeId {
        self.push(Node::Float { value })
    }

    pub fn string(&mut self, value: &str) -> NodeId {
        self.push(Node::String {
            value: value.to_owned(),
        })
    }

    pub fn boolean(&mut self, value: bool) -> NodeId {
        self.push(Node::Boolean { value })
    }

    pub fn null(&mut self) -> NodeId {
        self.push(Node::Null)
    }

    pub fn template(&mut self, parts: Vec<NodeId>) -> NodeId {
        self.push(Node::TemplateString { parts })
    }

    pub fn reference(&mut self, target: NodeId) -> NodeId {
        self.push(Node::Reference {
            target: Some(target),
        })
    }

    pub fn unresolved_reference(&mut self) -> NodeId {
        self.push(Node::Reference { target: None })
    }

    /// Call with the given arguments. Expressions that are not already
    /// `Argument` nodes become positional arguments.
    pub fn call(&mut self, receiver: NodeId, arguments: Vec<NodeId>) -> NodeId {
        let arguments = self.wrap_arguments(arguments);
        self.push(Node::Call {
            receiver,
            arguments,
            null_safe: false,
        })
    }

    pub fn null_safe_call(&mut self, receiver: NodeId, arguments: Vec<NodeId>) -> NodeId {
        let arguments = self.wrap_arguments(arguments);
        self.push(Node::Call {
            receiver,
            arguments,
            null_safe: true,
        })
    }

    /// Call whose receiver is a fresh reference to `callee`.
    pub fn call_to(&mut self, callee: NodeId, arguments: Vec<NodeId>) -> NodeId {
        let receiver = self.reference(callee);
        self.call(receiver, arguments)
    }

    fn wrap_arguments(&mut self, arguments: Vec<NodeId>) -> Vec<NodeId> {
        let mut wrapped = Vec::with_capacity(arguments.len());
        for it in arguments {
            if matches!(self.nodes.get(it.index()), Some(Node::Argument { .. })) {
                wrapped.push(it);
            } else {
                let argument = self.push(Node::Argument {
                    name: None,
                    value: it,
                });
                wrapped.push(argument);
            }
        }
        wrapped
    }

    pub fn named_argument(&mut self, name: &str, value: NodeId) -> NodeId {
        let name = self.interner.intern(name);
        self.push(Node::Argument {
            name: Some(name),
            value,
        })
    }

    /// `receiver.member`, where `member` is the accessed declaration.
    pub fn member_access(&mut self, receiver: NodeId, member: NodeId) -> NodeId {
        let member = self.reference(member);
        self.push(Node::MemberAccess {
            receiver,
            member,
            null_safe: false,
        })
    }

    pub fn null_safe_member_access(&mut self, receiver: NodeId, member: NodeId) -> NodeId {
        let member = self.reference(member);
        self.push(Node::MemberAccess {
            receiver,
            member,
            null_safe: true,
        })
    }

    pub fn indexed_access(&mut self, receiver: NodeId, index: NodeId) -> NodeId {
        self.push(Node::IndexedAccess {
            receiver,
            index,
            null_safe: false,
        })
    }

    pub fn infix(&mut self, operator: InfixOperator, left: NodeId, right: NodeId) -> NodeId {
        self.push(Node::Infix {
            operator,
            left,
            right,
        })
    }

    pub fn prefix(&mut self, operator: PrefixOperator, operand: NodeId) -> NodeId {
        self.push(Node::Prefix { operator, operand })
    }

    pub fn list(&mut self, elements: Vec<NodeId>) -> NodeId {
        self.push(Node::List { elements })
    }

    pub fn parenthesized(&mut self, expression: NodeId) -> NodeId {
        self.push(Node::Parenthesized { expression })
    }

    pub fn type_cast(&mut self, expression: NodeId, ty: NodeId) -> NodeId {
        self.push(Node::TypeCast { expression, ty })
    }

    pub fn block_lambda(&mut self, parameters: Vec<NodeId>, statements: Vec<NodeId>) -> NodeId {
        let body = self.block(statements);
        self.push(Node::BlockLambda { parameters, body })
    }

    pub fn expression_lambda(&mut self, parameters: Vec<NodeId>, result: NodeId) -> NodeId {
        self.push(Node::ExpressionLambda { parameters, result })
    }

    // ------------------------------------------------------------------
    // Type syntax
    // ------------------------------------------------------------------

    pub fn named_type(&mut self, declaration: NodeId) -> NodeId {
        self.push(Node::NamedType {
            declaration: Some(declaration),
            nullable: false,
        })
    }

    pub fn nullable_named_type(&mut self, declaration: NodeId) -> NodeId {
        self.push(Node::NamedType {
            declaration: Some(declaration),
            nullable: true,
        })
    }

    pub fn callable_type(&mut self, parameters: Vec<NodeId>, results: Vec<NodeId>) -> NodeId {
        self.push(Node::CallableType {
            parameters,
            results,
        })
    }

    pub fn union_type(&mut self, members: Vec<NodeId>) -> NodeId {
        self.push(Node::UnionType { members })
    }
}
