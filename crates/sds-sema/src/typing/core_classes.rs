//! Built-in classes the type rules refer to by name.

use sds_core::{Node, NodeId, SyntaxTree};

use super::Type;

/// Top-level classes with well-known names. A class the tree does not
/// declare stays `None`, and every type built from it is `Unknown`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoreClasses {
    pub any: Option<NodeId>,
    pub nothing: Option<NodeId>,
    pub number: Option<NodeId>,
    pub int: Option<NodeId>,
    pub float: Option<NodeId>,
    pub boolean: Option<NodeId>,
    pub string: Option<NodeId>,
    pub list: Option<NodeId>,
    pub map: Option<NodeId>,
}

impl CoreClasses {
    pub fn discover(tree: &SyntaxTree) -> Self {
        let mut core = Self::default();
        for &member in tree.members() {
            if !matches!(tree.node(member), Node::Class { .. }) {
                continue;
            }
            let slot = match tree.name(member) {
                Some("Any") => &mut core.any,
                Some("Nothing") => &mut core.nothing,
                Some("Number") => &mut core.number,
                Some("Int") => &mut core.int,
                Some("Float") => &mut core.float,
                Some("Boolean") => &mut core.boolean,
                Some("String") => &mut core.string,
                Some("List") => &mut core.list,
                Some("Map") => &mut core.map,
                _ => continue,
            };
            slot.get_or_insert(member);
        }
        core
    }

    fn class_type(declaration: Option<NodeId>, nullable: bool) -> Type {
        match declaration {
            Some(declaration) => Type::Class {
                declaration,
                nullable,
            },
            None => Type::Unknown,
        }
    }

    pub fn any_type(&self, nullable: bool) -> Type {
        Self::class_type(self.any, nullable)
    }

    pub fn nothing_type(&self, nullable: bool) -> Type {
        Self::class_type(self.nothing, nullable)
    }

    pub fn number_type(&self) -> Type {
        Self::class_type(self.number, false)
    }

    pub fn int_type(&self) -> Type {
        Self::class_type(self.int, false)
    }

    pub fn float_type(&self) -> Type {
        Self::class_type(self.float, false)
    }

    pub fn boolean_type(&self) -> Type {
        Self::class_type(self.boolean, false)
    }

    pub fn string_type(&self) -> Type {
        Self::class_type(self.string, false)
    }

    pub fn list_type(&self, nullable: bool) -> Type {
        Self::class_type(self.list, nullable)
    }

    pub fn map_type(&self, nullable: bool) -> Type {
        Self::class_type(self.map, nullable)
    }
}
