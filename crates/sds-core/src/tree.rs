//! Arena holding an immutable, resolved syntax tree.
//!
//! Nodes are addressed by `NodeId`, assigned in construction order. The
//! tree derives parent links from the children of each node, so a front
//! end only has to supply the nodes themselves.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::ast::Node;
use crate::interner::{Interner, Symbol};
use crate::{Error, Result};

/// Stable identity of a node within one tree snapshot.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(u32);

impl NodeId {
    /// Create a NodeId from a raw index. Use only for deserialization.
    #[inline]
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub fn as_u32(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct SyntaxTree {
    interner: Interner,
    nodes: Vec<Node>,
    parents: Vec<Option<NodeId>>,
    /// Parentless declarations, in id order.
    members: Vec<NodeId>,
}

/// On-disk shape: the name table followed by the node arena.
#[derive(Serialize, Deserialize)]
struct RawTree {
    names: Interner,
    nodes: Vec<Node>,
}

impl SyntaxTree {
    /// Link `nodes` into a tree.
    ///
    /// Fails if a child, cross-reference, or name points outside its table,
    /// if a node is owned by two parents, or if ownership forms a cycle.
    pub fn new(interner: Interner, nodes: Vec<Node>) -> Result<Self> {
        let len = nodes.len() as u32;
        let mut parents: Vec<Option<NodeId>> = vec![None; nodes.len()];

        for (index, node) in nodes.iter().enumerate() {
            let id = NodeId(index as u32);
            for child in node.children() {
                if child.0 >= len {
                    return Err(Error::DanglingNode {
                        node: id.0,
                        target: child.0,
                    });
                }
                let slot = &mut parents[child.index()];
                if slot.is_some() || child == id {
                    return Err(Error::SharedNode { node: child.0 });
                }
                *slot = Some(id);
            }
            if let Some(target) = node.cross_reference()
                && target.0 >= len
            {
                return Err(Error::DanglingNode {
                    node: id.0,
                    target: target.0,
                });
            }
            if let Some(symbol) = node.symbol()
                && interner.try_resolve(symbol).is_none()
            {
                return Err(Error::UnknownSymbol {
                    node: id.0,
                    symbol: symbol.as_u32(),
                });
            }
        }
        check_rooted(&parents)?;

        let members = nodes
            .iter()
            .enumerate()
            .filter(|(index, node)| {
                parents[*index].is_none() && node.kind() == crate::NodeKind::Declaration
            })
            .map(|(index, _)| NodeId(index as u32))
            .collect();

        Ok(Self {
            interner,
            nodes,
            parents,
            members,
        })
    }

    /// Load a tree from its JSON form: `{"names": [...], "nodes": [...]}`.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawTree = serde_json::from_str(json)?;
        Self::new(raw.names, raw.nodes)
    }

    pub fn to_json(&self) -> Result<String> {
        let raw = RawTree {
            names: self.interner.clone(),
            nodes: self.nodes.clone(),
        };
        Ok(serde_json::to_string(&raw)?)
    }

    /// # Panics
    /// Panics if `id` does not belong to this tree.
    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parents.get(id.index()).copied().flatten()
    }

    /// Proper ancestors, innermost first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&it| self.parent(it))
    }

    /// Innermost proper ancestor whose node satisfies `pred`.
    pub fn container_of(&self, id: NodeId, pred: impl Fn(&Node) -> bool) -> Option<NodeId> {
        self.ancestors(id).find(|&it| pred(self.node(it)))
    }

    /// Whether `id` is `ancestor` or lies below it.
    pub fn is_contained_in_or_equal(&self, id: NodeId, ancestor: NodeId) -> bool {
        id == ancestor || self.ancestors(id).any(|it| it == ancestor)
    }

    /// `id` and all nodes below it, pre-order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            out.push(current);
            let children = self.node(current).children();
            stack.extend(children.into_iter().rev());
        }
        out
    }

    /// Top-level declarations.
    pub fn members(&self) -> &[NodeId] {
        &self.members
    }

    /// Top-level declaration with the given name.
    pub fn member_named(&self, name: &str) -> Option<NodeId> {
        let sym = self.interner.get(name)?;
        self.members
            .iter()
            .copied()
            .find(|&it| self.node(it).name() == Some(sym))
    }

    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    pub fn resolve(&self, sym: Symbol) -> &str {
        self.interner.resolve(sym)
    }

    /// Declared name of a node, if it has one.
    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.node(id).name().map(|sym| self.interner.resolve(sym))
    }

    /// Dot-separated names of the node and its named ancestors, outermost
    /// first (`f.p` for parameter `p` of function `f`).
    pub fn qualified_name(&self, id: NodeId) -> String {
        let mut parts: Vec<&str> = self
            .ancestors(id)
            .filter_map(|it| self.name(it))
            .collect();
        parts.reverse();
        parts.extend(self.name(id));
        parts.join(".")
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len() as u32).map(NodeId)
    }
}

/// Every parent chain must end at a parentless node.
fn check_rooted(parents: &[Option<NodeId>]) -> Result<()> {
    let mut rooted = vec![false; parents.len()];
    let mut path = IndexSet::new();

    for start in 0..parents.len() {
        path.clear();
        let mut current = Some(NodeId(start as u32));
        while let Some(id) = current {
            if rooted[id.index()] {
                break;
            }
            if !path.insert(id) {
                return Err(Error::CyclicNode { node: id.0 });
            }
            current = parents[id.index()];
        }
        for id in &path {
            rooted[id.index()] = true;
        }
    }
    Ok(())
}
