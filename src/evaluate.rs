use std::collections::HashMap;

use crate::types::CompiledExpr;
use crate::{BinaryOp, EvalError, UnaryOp};

/// Evaluate a compiled expression against a name-to-value environment.
///
/// Logical operators and `if` short-circuit; a value is truthy when it is
/// non-zero and not NaN. The result is rejected if it is not finite.
pub(crate) fn evaluate(
    expr: &CompiledExpr,
    env: &HashMap<String, f64>,
) -> Result<f64, EvalError> {
    let value = eval_expr(expr, env)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EvalError::NonFinite { value })
    }
}

fn eval_expr(expr: &CompiledExpr, env: &HashMap<String, f64>) -> Result<f64, EvalError> {
    match expr {
        CompiledExpr::Number(n) => Ok(*n),
        CompiledExpr::Variable(name) => env
            .get(name)
            .copied()
            .ok_or_else(|| EvalError::UnknownVariable { name: name.clone() }),
        CompiledExpr::Unary { op, operand } => {
            let v = eval_expr(operand, env)?;
            Ok(match op {
                UnaryOp::Neg => -v,
                UnaryOp::Not => flag(!truthy(v)),
            })
        }
        CompiledExpr::Binary { op, lhs, rhs } => eval_binary(*op, lhs, rhs, env),
        CompiledExpr::Conditional {
            condition,
            then,
            otherwise,
        } => {
            if truthy(eval_expr(condition, env)?) {
                eval_expr(then, env)
            } else {
                eval_expr(otherwise, env)
            }
        }
        CompiledExpr::Call { function, args } => {
            let values = args
                .iter()
                .map(|arg| eval_expr(arg, env))
                .collect::<Result<Vec<f64>, _>>()?;
            Ok(function.apply(&values).unwrap_or(f64::NAN))
        }
    }
}

fn eval_binary(
    op: BinaryOp,
    lhs: &CompiledExpr,
    rhs: &CompiledExpr,
    env: &HashMap<String, f64>,
) -> Result<f64, EvalError> {
    match op {
        BinaryOp::And => {
            if !truthy(eval_expr(lhs, env)?) {
                return Ok(0.0);
            }
            Ok(flag(truthy(eval_expr(rhs, env)?)))
        }
        BinaryOp::Or => {
            if truthy(eval_expr(lhs, env)?) {
                return Ok(1.0);
            }
            Ok(flag(truthy(eval_expr(rhs, env)?)))
        }
        _ => {
            let a = eval_expr(lhs, env)?;
            let b = eval_expr(rhs, env)?;
            Ok(match op {
                BinaryOp::Add => a + b,
                BinaryOp::Sub => a - b,
                BinaryOp::Mul => a * b,
                BinaryOp::Div => {
                    if b == 0.0 {
                        return Err(EvalError::DivisionByZero);
                    }
                    a / b
                }
                BinaryOp::Rem => {
                    if b == 0.0 {
                        return Err(EvalError::DivisionByZero);
                    }
                    a % b
                }
                BinaryOp::Pow => a.powf(b),
                BinaryOp::Eq => flag(a == b),
                BinaryOp::Neq => flag(a != b),
                BinaryOp::Lt => flag(a < b),
                BinaryOp::Lte => flag(a <= b),
                BinaryOp::Gt => flag(a > b),
                BinaryOp::Gte => flag(a >= b),
                BinaryOp::And => flag(truthy(a) && truthy(b)),
                BinaryOp::Or => flag(truthy(a) || truthy(b)),
            })
        }
    }
}

fn truthy(v: f64) -> bool {
    v != 0.0 && !v.is_nan()
}

fn flag(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}
