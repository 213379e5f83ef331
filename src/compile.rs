use crate::types::CompiledExpr;
use crate::{CompileError, Expr, Function};

/// Resolve function names and check call arity throughout an expression tree.
pub(crate) fn compile(expr: &Expr) -> Result<CompiledExpr, CompileError> {
    match expr {
        Expr::Number(n) => Ok(CompiledExpr::Number(*n)),
        Expr::Variable(name) => Ok(CompiledExpr::Variable(name.clone())),
        Expr::Unary { op, operand } => Ok(CompiledExpr::Unary {
            op: *op,
            operand: Box::new(compile(operand)?),
        }),
        Expr::Binary { op, lhs, rhs } => Ok(CompiledExpr::Binary {
            op: *op,
            lhs: Box::new(compile(lhs)?),
            rhs: Box::new(compile(rhs)?),
        }),
        Expr::Conditional {
            condition,
            then,
            otherwise,
        } => Ok(CompiledExpr::Conditional {
            condition: Box::new(compile(condition)?),
            then: Box::new(compile(then)?),
            otherwise: Box::new(compile(otherwise)?),
        }),
        Expr::Call { function, args } => {
            let resolved =
                Function::lookup(function).ok_or_else(|| CompileError::UnknownFunction {
                    name: function.clone(),
                })?;
            let arity = resolved.arity();
            let mismatch = || CompileError::ArityMismatch {
                function: resolved.name().to_owned(),
                expected: arity,
                found: args.len(),
            };
            if !arity.accepts(args.len()) {
                return Err(mismatch());
            }
            let args = args.iter().map(compile).collect::<Result<Vec<_>, _>>()?;
            if resolved == Function::If {
                let [condition, then, otherwise]: [CompiledExpr; 3] =
                    args.try_into().map_err(|_| mismatch())?;
                return Ok(CompiledExpr::Conditional {
                    condition: Box::new(condition),
                    then: Box::new(then),
                    otherwise: Box::new(otherwise),
                });
            }
            Ok(CompiledExpr::Call {
                function: resolved,
                args,
            })
        }
    }
}
