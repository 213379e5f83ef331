use thiserror::Error;

use super::function::Arity;
use crate::parse::ParseError;

/// Errors produced while resolving a parsed expression into a
/// [`CompiledExpr`](super::expr::CompiledExpr).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    #[error("unknown function '{name}'")]
    UnknownFunction { name: String },

    #[error("function '{function}' expects {expected} argument(s), got {found}")]
    ArityMismatch {
        function: String,
        expected: Arity,
        found: usize,
    },
}

/// Runtime faults raised while evaluating a compiled expression.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("unknown variable '{name}'")]
    UnknownVariable { name: String },

    #[error("division by zero")]
    DivisionByZero,

    #[error("non-finite result ({value})")]
    NonFinite { value: f64 },
}

/// Shape violations in an interpolation curve definition.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CurveError {
    #[error("bezier curve needs at least {min} control points, got {count}")]
    TooFewPoints { count: usize, min: usize },

    #[error("bezier curve allows at most {max} control points, got {count}")]
    TooManyPoints { count: usize, max: usize },

    #[error("control point {index} ({x}, {y}) is outside the unit square")]
    CoordinateOutOfRange { index: usize, x: f64, y: f64 },

    #[error("first control point must be (0, 0), got ({x}, {y})")]
    StartPoint { x: f64, y: f64 },

    #[error("last control point must be (1, 1), got ({x}, {y})")]
    EndPoint { x: f64, y: f64 },
}

/// Why a raw rule definition could not become a
/// [`TransformationRule`](super::rule::TransformationRule).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("empty rule name")]
    EmptyName,

    #[error("empty expression")]
    EmptyExpression,

    #[error(transparent)]
    Syntax(#[from] ParseError),

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error("input_min ({min}) is greater than input_max ({max})")]
    InvalidBounds { min: f64, max: f64 },

    #[error("{field} must be finite, got {value}")]
    NonFiniteNumber { field: &'static str, value: f64 },

    #[error("invalid curve: {0}")]
    Curve(#[from] CurveError),

    #[error("duplicate rule name '{name}'")]
    DuplicateRule { name: String },

    #[error("malformed rule definition: {message}")]
    Malformed { message: String },
}
