//! Analysis session over one tree snapshot.
//!
//! The session owns every cache. The components reference each other only
//! through the arguments the session passes in:
//! - the type checker and node mapper borrow the type computer
//! - the call-graph computer borrows the type computer
//! - the purity computer borrows the type and call-graph computers
//! - the partial evaluator borrows only the type computer
//!
//! Dropping the session discards all derived information.

use std::rc::Rc;

use sds_core::{NodeId, SyntaxTree};

use crate::Result;
use crate::builtins::ImpurityTable;
use crate::checks;
use crate::config::AnalysisConfig;
use crate::eval::{Constant, PartialEvaluator};
use crate::flow::{CallGraphComputer, CallGraphNode, contained_calls};
use crate::purity::{ImpurityReason, PurityComputer};
use crate::typing::{Type, TypeComputer};

pub struct Analysis<'t> {
    tree: &'t SyntaxTree,
    types: TypeComputer<'t>,
    graphs: CallGraphComputer,
    purity: PurityComputer,
    evaluator: PartialEvaluator,
}

impl<'t> Analysis<'t> {
    pub fn new(tree: &'t SyntaxTree, table: ImpurityTable, config: AnalysisConfig) -> Self {
        Self {
            tree,
            types: TypeComputer::new(tree),
            graphs: CallGraphComputer::new(),
            purity: PurityComputer::new(table, config),
            evaluator: PartialEvaluator::new(),
        }
    }

    /// Session with an empty impurity table and default configuration.
    pub fn with_defaults(tree: &'t SyntaxTree) -> Self {
        Self::new(tree, ImpurityTable::new(), AnalysisConfig::default())
    }

    pub fn tree(&self) -> &'t SyntaxTree {
        self.tree
    }

    pub fn types(&mut self) -> &mut TypeComputer<'t> {
        &mut self.types
    }

    // Typing

    pub fn compute_type(&mut self, id: NodeId) -> Type {
        self.types.compute_type(id)
    }

    pub fn is_subtype_of(&mut self, ty: &Type, other: &Type) -> bool {
        self.types.checker().is_subtype_of(ty, other)
    }

    pub fn lowest_common_supertype(&mut self, types: &[Type]) -> Type {
        self.types.lowest_common_supertype(types)
    }

    // Partial evaluation

    pub fn evaluate(&mut self, expression: NodeId) -> Constant {
        self.evaluator.evaluate(&mut self.types, expression)
    }

    pub fn can_be_value_of_constant_parameter(&mut self, expression: NodeId) -> bool {
        self.evaluator
            .can_be_value_of_constant_parameter(&mut self.types, expression)
    }

    // Call graphs

    pub fn get_call_graph(&mut self, id: NodeId) -> Result<Rc<CallGraphNode>> {
        self.graphs.get_call_graph(&mut self.types, id)
    }

    pub fn get_all_contained_calls(&self, id: NodeId) -> Vec<NodeId> {
        contained_calls(self.tree, id)
    }

    pub fn is_recursive_call(&mut self, call: NodeId) -> Result<bool> {
        checks::is_recursive_call(&mut self.types, &mut self.graphs, call)
    }

    // Purity

    pub fn get_impurity_reasons_for_callable(
        &mut self,
        callable: NodeId,
    ) -> Result<Vec<ImpurityReason>> {
        self.purity
            .get_impurity_reasons_for_callable(&mut self.types, &mut self.graphs, callable)
    }

    pub fn get_impurity_reasons_for_expression(
        &mut self,
        expression: NodeId,
    ) -> Result<Vec<ImpurityReason>> {
        self.purity
            .get_impurity_reasons_for_expression(&mut self.types, &mut self.graphs, expression)
    }

    pub fn is_pure_callable(&mut self, callable: NodeId) -> Result<bool> {
        self.purity
            .is_pure_callable(&mut self.types, &mut self.graphs, callable)
    }

    pub fn is_pure_expression(&mut self, expression: NodeId) -> Result<bool> {
        self.purity
            .is_pure_expression(&mut self.types, &mut self.graphs, expression)
    }

    pub fn callable_has_side_effects(&mut self, callable: NodeId) -> Result<bool> {
        self.purity
            .callable_has_side_effects(&mut self.types, &mut self.graphs, callable)
    }

    pub fn expression_has_side_effects(&mut self, expression: NodeId) -> Result<bool> {
        self.purity
            .expression_has_side_effects(&mut self.types, &mut self.graphs, expression)
    }

    pub fn statement_does_something(&mut self, statement: NodeId) -> Result<bool> {
        self.purity
            .statement_does_something(&mut self.types, &mut self.graphs, statement)
    }

    // Validator-facing checks

    pub fn division_by_zero(&mut self, infix: NodeId) -> bool {
        checks::division_by_zero(&mut self.types, &mut self.evaluator, infix)
    }

    pub fn statement_is_useless(&mut self, statement: NodeId) -> Result<bool> {
        checks::statement_is_useless(&mut self.types, &mut self.graphs, &mut self.purity, statement)
    }
}
