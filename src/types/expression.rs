use std::collections::HashMap;
use std::fmt;

use super::error::{CompileError, EvalError};
use super::expr::{CompiledExpr, Expr};

/// A parsed and compiled arithmetic expression, ready to be evaluated
/// any number of times against different environments.
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
/// use rigmap::Expression;
///
/// let expr = Expression::compile("clamp(EyeBlinkLeft * 1.2, 0, 1)").unwrap();
/// let env = HashMap::from([("EyeBlinkLeft".to_owned(), 0.5)]);
/// assert!((expr.evaluate(&env).unwrap() - 0.6).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    ast: Expr,
    compiled: CompiledExpr,
    variables: Vec<String>,
}

impl Expression {
    /// Parse and compile expression text.
    ///
    /// # Errors
    ///
    /// Returns [`ExpressionError`](crate::ExpressionError) on a syntax error,
    /// an unknown function, or a call with the wrong number of arguments.
    pub fn compile(text: &str) -> Result<Self, crate::ExpressionError> {
        let ast = crate::parse::parse(text)?;
        Ok(Self::from_expr(ast)?)
    }

    /// Compile an expression tree built programmatically.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError`] on an unknown function or arity mismatch.
    pub fn from_expr(ast: Expr) -> Result<Self, CompileError> {
        let compiled = crate::compile::compile(&ast)?;
        let variables = ast.variables().into_iter().map(str::to_owned).collect();
        Ok(Self {
            ast,
            compiled,
            variables,
        })
    }

    /// Evaluate against a name-to-value environment.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError`] on a missing variable, division by zero, or a
    /// non-finite result.
    pub fn evaluate(&self, env: &HashMap<String, f64>) -> Result<f64, EvalError> {
        crate::evaluate::evaluate(&self.compiled, env)
    }

    /// Variable names referenced by this expression, in first-seen order.
    #[must_use]
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// The parsed expression tree.
    #[must_use]
    pub fn ast(&self) -> &Expr {
        &self.ast
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ast)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{call, num, var, ExpressionError};

    #[test]
    fn compile_collects_variables() {
        let expr = Expression::compile("a * b + max(a, c)").unwrap();
        assert_eq!(expr.variables(), &["a", "b", "c"]);
    }

    #[test]
    fn compile_reports_syntax_errors() {
        assert!(matches!(
            Expression::compile("a +"),
            Err(ExpressionError::Parse(_))
        ));
    }

    #[test]
    fn compile_reports_unknown_functions() {
        assert!(matches!(
            Expression::compile("wobble(a)"),
            Err(ExpressionError::Compile(CompileError::UnknownFunction { .. }))
        ));
    }

    #[test]
    fn from_expr_matches_parsed_text() {
        let built = Expression::from_expr(call("abs", vec![var("x") - num(1.0)])).unwrap();
        let parsed = Expression::compile("abs(x - 1.0)").unwrap();
        assert_eq!(built, parsed);
    }

    #[test]
    fn display_uses_ast() {
        let expr = Expression::compile("a+1").unwrap();
        assert_eq!(expr.to_string(), "(a + 1.0)");
    }
}
