//! Impurity reasons of callables and expressions.
//!
//! Reasons are gathered over the call graph:
//! - functions contribute what the impurity table declares for them
//! - calls through parameters are potentially impure
//! - calls whose callee cannot be resolved are unknown
//! - recursive graphs never terminate
//!
//! The combined list is deduplicated, keeping first appearances.

use std::collections::{HashMap, HashSet};

use indexmap::IndexSet;
use sds_core::{Node, NodeId, SyntaxTree};
use tracing::trace;

use super::model::{FilePath, ImpurityReason};
use crate::builtins::{DeclaredImpurity, ImpurityTable, PurityDeclaration};
use crate::config::AnalysisConfig;
use crate::flow::{CallGraphComputer, CallGraphNode, contained_calls};
use crate::typing::TypeComputer;
use crate::{Error, Result};

pub struct PurityComputer {
    table: ImpurityTable,
    config: AnalysisConfig,
    callables: HashMap<NodeId, Vec<ImpurityReason>>,
    expressions: HashMap<NodeId, Vec<ImpurityReason>>,
    /// Targets of all references in the tree, built on first use.
    referenced: Option<HashSet<NodeId>>,
}

impl PurityComputer {
    pub fn new(table: ImpurityTable, config: AnalysisConfig) -> Self {
        Self {
            table,
            config,
            callables: HashMap::new(),
            expressions: HashMap::new(),
            referenced: None,
        }
    }

    pub fn get_impurity_reasons_for_callable(
        &mut self,
        types: &mut TypeComputer<'_>,
        graphs: &mut CallGraphComputer,
        callable: NodeId,
    ) -> Result<Vec<ImpurityReason>> {
        if let Some(reasons) = self.callables.get(&callable) {
            return Ok(reasons.clone());
        }

        let graph = graphs.get_call_graph(types, callable)?;
        let mut reasons = IndexSet::new();
        self.collect(types.tree(), &graph, true, &mut reasons);

        let reasons: Vec<ImpurityReason> = reasons.into_iter().collect();
        trace!(
            callable = %types.tree().qualified_name(callable),
            reasons = reasons.len(),
            "impurity reasons"
        );
        self.callables.insert(callable, reasons.clone());
        Ok(reasons)
    }

    /// Reasons of the calls `expression` executes. Calls inside lambdas it
    /// creates are not executed by it and do not count.
    pub fn get_impurity_reasons_for_expression(
        &mut self,
        types: &mut TypeComputer<'_>,
        graphs: &mut CallGraphComputer,
        expression: NodeId,
    ) -> Result<Vec<ImpurityReason>> {
        if let Some(reasons) = self.expressions.get(&expression) {
            return Ok(reasons.clone());
        }

        let tree = types.tree();
        if !tree.contains(expression) {
            return Err(Error::UnknownNode(expression));
        }

        let mut reasons = IndexSet::new();
        for call in contained_calls(tree, expression) {
            let graph = graphs.get_call_graph(types, call)?;
            if graph.children.is_empty() {
                reasons.insert(ImpurityReason::UnknownCallableCall);
            }
            for child in &graph.children {
                self.collect(tree, child, false, &mut reasons);
            }
        }

        let reasons: Vec<ImpurityReason> = reasons.into_iter().collect();
        self.expressions.insert(expression, reasons.clone());
        Ok(reasons)
    }

    pub fn is_pure_callable(
        &mut self,
        types: &mut TypeComputer<'_>,
        graphs: &mut CallGraphComputer,
        callable: NodeId,
    ) -> Result<bool> {
        Ok(self
            .get_impurity_reasons_for_callable(types, graphs, callable)?
            .is_empty())
    }

    pub fn is_pure_expression(
        &mut self,
        types: &mut TypeComputer<'_>,
        graphs: &mut CallGraphComputer,
        expression: NodeId,
    ) -> Result<bool> {
        Ok(self
            .get_impurity_reasons_for_expression(types, graphs, expression)?
            .is_empty())
    }

    pub fn callable_has_side_effects(
        &mut self,
        types: &mut TypeComputer<'_>,
        graphs: &mut CallGraphComputer,
        callable: NodeId,
    ) -> Result<bool> {
        Ok(self
            .get_impurity_reasons_for_callable(types, graphs, callable)?
            .iter()
            .any(ImpurityReason::is_side_effect))
    }

    pub fn expression_has_side_effects(
        &mut self,
        types: &mut TypeComputer<'_>,
        graphs: &mut CallGraphComputer,
        expression: NodeId,
    ) -> Result<bool> {
        Ok(self
            .get_impurity_reasons_for_expression(types, graphs, expression)?
            .iter()
            .any(ImpurityReason::is_side_effect))
    }

    /// Whether removing `statement` could change the program. Outputs always
    /// matter; assignments matter if they feed something or have side
    /// effects.
    pub fn statement_does_something(
        &mut self,
        types: &mut TypeComputer<'_>,
        graphs: &mut CallGraphComputer,
        statement: NodeId,
    ) -> Result<bool> {
        let tree = types.tree();
        match tree.get(statement).ok_or(Error::UnknownNode(statement))? {
            Node::Assignment {
                assignees,
                expression,
            } => {
                let referenced = self.referenced_targets(tree);
                let feeds_something = assignees.iter().any(|&it| match tree.node(it) {
                    Node::Yield { .. } | Node::BlockLambdaResult { .. } => true,
                    Node::Placeholder { .. } => referenced.contains(&it),
                    _ => false,
                });
                if feeds_something {
                    return Ok(true);
                }
                self.expression_has_side_effects(types, graphs, *expression)
            }
            Node::ExpressionStatement { expression } => {
                self.expression_has_side_effects(types, graphs, *expression)
            }
            Node::OutputStatement { .. } => Ok(true),
            Node::Block { statements } => {
                for &it in statements {
                    if self.statement_does_something(types, graphs, it)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            _ => Ok(false),
        }
    }

    fn referenced_targets(&mut self, tree: &SyntaxTree) -> &HashSet<NodeId> {
        self.referenced.get_or_insert_with(|| {
            tree.ids()
                .filter_map(|it| match tree.node(it) {
                    Node::Reference { target } => *target,
                    _ => None,
                })
                .collect()
        })
    }

    fn collect(
        &self,
        tree: &SyntaxTree,
        node: &CallGraphNode,
        is_top: bool,
        out: &mut IndexSet<ImpurityReason>,
    ) {
        if node.is_recursive && node.children.is_empty() && self.config.track_recursion {
            out.insert(ImpurityReason::EndlessRecursion);
        }

        match node.root {
            None if !is_top => {
                out.insert(ImpurityReason::UnknownCallableCall);
            }
            None => {}
            Some(root) => match tree.node(root) {
                Node::Parameter { .. } => {
                    out.insert(ImpurityReason::PotentiallyImpureParameterCall {
                        parameter: Some(root),
                    });
                }
                Node::Function { .. } => out.extend(self.declared_reasons(tree, root)),
                _ => {}
            },
        }

        for child in &node.children {
            self.collect(tree, child, false, out);
        }
    }

    fn declared_reasons(&self, tree: &SyntaxTree, function: NodeId) -> Vec<ImpurityReason> {
        let declared = match self.table.get(function) {
            Some(PurityDeclaration::Pure) => return Vec::new(),
            Some(PurityDeclaration::Impure(declared)) => declared,
            None if self.config.assume_unannotated_functions_pure => return Vec::new(),
            None => return vec![ImpurityReason::Other],
        };

        let parameter = |name: &str| {
            tree.node(function)
                .parameters()
                .iter()
                .copied()
                .find(|&it| tree.name(it) == Some(name))
        };
        let path_of = |name: &str| parameter(name).map_or(FilePath::Unknown, FilePath::Parameter);

        declared
            .iter()
            .map(|it| match it {
                DeclaredImpurity::FileReadFromConstantPath { path } => ImpurityReason::FileRead {
                    path: FilePath::Constant(path.clone()),
                },
                DeclaredImpurity::FileReadFromParameterizedPath { parameter_name } => {
                    ImpurityReason::FileRead {
                        path: path_of(parameter_name),
                    }
                }
                DeclaredImpurity::FileWriteToConstantPath { path } => ImpurityReason::FileWrite {
                    path: FilePath::Constant(path.clone()),
                },
                DeclaredImpurity::FileWriteToParameterizedPath { parameter_name } => {
                    ImpurityReason::FileWrite {
                        path: path_of(parameter_name),
                    }
                }
                DeclaredImpurity::Randomness => ImpurityReason::Randomness,
                DeclaredImpurity::PotentiallyImpureParameterCall { parameter_name } => {
                    ImpurityReason::PotentiallyImpureParameterCall {
                        parameter: parameter(parameter_name),
                    }
                }
                DeclaredImpurity::Other => ImpurityReason::Other,
            })
            .collect()
    }
}
