//! Queries validators build their diagnostics on.

use sds_core::{InfixOperator, Node, NodeId};

use crate::Result;
use crate::eval::PartialEvaluator;
use crate::flow::CallGraphComputer;
use crate::purity::PurityComputer;
use crate::typing::TypeComputer;

/// Whether `infix` divides a number by a constant zero. The dividend must
/// be numeric, so `Unknown` operands are not reported.
pub fn division_by_zero(
    types: &mut TypeComputer<'_>,
    evaluator: &mut PartialEvaluator,
    infix: NodeId,
) -> bool {
    let Some(Node::Infix {
        operator: InfixOperator::DividedBy | InfixOperator::Modulo,
        left,
        right,
    }) = types.tree().get(infix)
    else {
        return false;
    };

    let dividend = types.compute_type(*left);
    if !types.checker().is_numeric(&dividend) {
        return false;
    }

    let divisor = evaluator.evaluate(types, *right);
    divisor.is_numeric() && divisor.is_zero()
}

/// Whether `call` can end up calling itself again.
pub fn is_recursive_call(
    types: &mut TypeComputer<'_>,
    graphs: &mut CallGraphComputer,
    call: NodeId,
) -> Result<bool> {
    graphs.is_recursive(types, call)
}

/// Whether `statement` could be removed without changing the program.
pub fn statement_is_useless(
    types: &mut TypeComputer<'_>,
    graphs: &mut CallGraphComputer,
    purity: &mut PurityComputer,
    statement: NodeId,
) -> Result<bool> {
    Ok(!purity.statement_does_something(types, graphs, statement)?)
}
