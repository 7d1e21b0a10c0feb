//! Class hierarchy queries.
//!
//! Only the first parent type of a class counts (single inheritance).
//! Every class except `Any` implicitly extends `Any`.

use indexmap::IndexSet;
use sds_core::{Node, NodeId, SyntaxTree};

use super::core_classes::CoreClasses;

#[derive(Clone, Copy)]
pub struct ClassHierarchy<'a> {
    tree: &'a SyntaxTree,
    core: CoreClasses,
}

impl<'a> ClassHierarchy<'a> {
    pub fn new(tree: &'a SyntaxTree, core: CoreClasses) -> Self {
        Self { tree, core }
    }

    /// `Nothing` is a subclass of everything.
    pub fn is_equal_to_or_subclass_of(&self, class: NodeId, other: NodeId) -> bool {
        if Some(class) == self.core.nothing {
            return true;
        }
        class == other || self.proper_superclasses(class).contains(&other)
    }

    /// Direct parent first, then its ancestors. Stops at the first repeated
    /// class, so a cyclic hierarchy still terminates.
    pub fn proper_superclasses(&self, class: NodeId) -> IndexSet<NodeId> {
        let mut visited = IndexSet::new();
        let mut current = self.parent_class(class);
        while let Some(it) = current {
            if !visited.insert(it) {
                break;
            }
            current = self.parent_class(it);
        }

        if let Some(any) = self.core.any
            && any != class
        {
            visited.insert(any);
        }
        visited
    }

    /// Members of all superclasses, nearest first.
    pub fn superclass_members(&self, class: NodeId) -> Vec<NodeId> {
        self.proper_superclasses(class)
            .into_iter()
            .flat_map(|it| self.members(it).to_vec())
            .collect()
    }

    /// Non-static members inherited from superclasses, nearest first.
    pub fn inherited_members(&self, class: NodeId) -> Vec<NodeId> {
        self.superclass_members(class)
            .into_iter()
            .filter(|&it| !self.is_static(it))
            .collect()
    }

    /// Member of a superclass that `member` overrides. Static members and
    /// members shadowed by an earlier member of the same name override
    /// nothing.
    pub fn overridden_member(&self, member: NodeId) -> Option<NodeId> {
        if self.is_static(member) {
            return None;
        }
        let name = self.tree.node(member).name()?;
        let class = self.tree.parent(member)?;
        if !matches!(self.tree.node(class), Node::Class { .. }) {
            return None;
        }

        let first_with_same_name = self
            .members(class)
            .iter()
            .copied()
            .find(|&it| !self.is_static(it) && self.tree.node(it).name() == Some(name))?;
        if first_with_same_name != member {
            return None;
        }

        self.inherited_members(class)
            .into_iter()
            .find(|&it| self.tree.node(it).name() == Some(name))
    }

    /// Classes whose first parent type is `class`.
    pub fn direct_subclasses(&self, class: NodeId) -> Vec<NodeId> {
        self.tree
            .ids()
            .filter(|&it| {
                matches!(self.tree.node(it), Node::Class { .. })
                    && self.parent_class(it) == Some(class)
            })
            .collect()
    }

    pub fn parent_class(&self, class: NodeId) -> Option<NodeId> {
        let Node::Class { parent_types, .. } = self.tree.node(class) else {
            return None;
        };
        let first = *parent_types.first()?;
        match self.tree.node(first) {
            Node::NamedType {
                declaration: Some(declaration),
                ..
            } if matches!(self.tree.node(*declaration), Node::Class { .. }) => Some(*declaration),
            _ => None,
        }
    }

    fn members(&self, class: NodeId) -> &'a [NodeId] {
        match self.tree.node(class) {
            Node::Class { members, .. } => members,
            _ => &[],
        }
    }

    fn is_static(&self, member: NodeId) -> bool {
        match self.tree.node(member) {
            Node::Attribute { is_static, .. } | Node::Function { is_static, .. } => *is_static,
            // Nested classes and enums belong to the class, not its instances
            _ => true,
        }
    }
}
