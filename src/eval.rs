//! Validation and evaluation of parsed expressions.
//!
//! Evaluation is split in two passes over the [`AstExpr`] tree:
//!
//! 1. [`validate`] resolves every identifier and call target against the
//!    builtin whitelist and checks arity, without computing anything.
//! 2. [`eval_ast`] reduces the tree depth-first, operands before operators,
//!    dispatching through the operator and builtin tables.
//!
//! A tree that passes validation can still fail evaluation with a domain
//! error (`sqrt(-1)`, `1/0`, overflow).

use crate::Real;
use crate::engine::MAX_RECURSION_DEPTH;
use crate::error::{ExprError, Result};
use crate::functions::{FUNCTION_ARITY, lookup_constant, lookup_function};
use crate::types::{AngleMode, AstExpr};

/// Check that every node of the tree is something the evaluator may run.
///
/// Rejects unknown constants, unknown functions, calls to constants, bare
/// function names and calls with the wrong number of arguments. Trees deeper
/// than the parser's nesting limit are rejected too.
pub fn validate(ast: &AstExpr) -> Result<()> {
    validate_node(ast, 0)
}

fn validate_node(ast: &AstExpr, depth: usize) -> Result<()> {
    if depth > MAX_RECURSION_DEPTH {
        return Err(ExprError::RecursionLimit(format!(
            "Expression too complex: exceeded maximum nesting depth of {}",
            MAX_RECURSION_DEPTH
        )));
    }

    match ast {
        AstExpr::Constant(_) => Ok(()),
        AstExpr::Variable(name) => {
            if lookup_constant(name).is_some() {
                Ok(())
            } else {
                Err(ExprError::UnknownVariable { name: name.clone() })
            }
        }
        AstExpr::Function { name, args } => {
            if lookup_function(name).is_none() {
                return Err(ExprError::UnknownFunction { name: name.clone() });
            }
            if args.len() != FUNCTION_ARITY {
                return Err(ExprError::InvalidFunctionCall {
                    name: name.clone(),
                    expected: FUNCTION_ARITY,
                    found: args.len(),
                });
            }
            args.iter().try_for_each(|arg| validate_node(arg, depth + 1))
        }
        AstExpr::Unary { operand, .. } => validate_node(operand, depth + 1),
        AstExpr::Binary { left, right, .. } => {
            validate_node(left, depth + 1)?;
            validate_node(right, depth + 1)
        }
    }
}

/// Evaluate a tree under the given angle mode.
///
/// Every intermediate and final value is finite; anything else is reported as
/// an overflow. Callers should [`validate`] first: names that fail to resolve
/// here are still errors, but the depth guard lives in validation.
pub fn eval_ast(ast: &AstExpr, mode: AngleMode) -> Result<Real> {
    let value = match ast {
        AstExpr::Constant(value) => {
            if !value.is_finite() {
                return Err(ExprError::Overflow("literal"));
            }
            *value
        }
        AstExpr::Variable(name) => {
            lookup_constant(name).ok_or_else(|| ExprError::UnknownVariable { name: name.clone() })?
        }
        AstExpr::Function { name, args } => {
            let function = lookup_function(name)
                .ok_or_else(|| ExprError::UnknownFunction { name: name.clone() })?;
            let [arg] = args.as_slice() else {
                return Err(ExprError::InvalidFunctionCall {
                    name: name.clone(),
                    expected: FUNCTION_ARITY,
                    found: args.len(),
                });
            };
            let arg = eval_ast(arg, mode)?;
            function.call(arg, mode)?
        }
        AstExpr::Unary { op, operand } => {
            let operand = eval_ast(operand, mode)?;
            (op.function())(operand)?
        }
        AstExpr::Binary { op, left, right } => {
            let left = eval_ast(left, mode)?;
            let right = eval_ast(right, mode)?;
            (op.function())(left, right)?
        }
    };

    if !value.is_finite() {
        return Err(ExprError::Overflow("result"));
    }
    Ok(value)
}
