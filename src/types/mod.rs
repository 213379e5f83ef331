mod curve;
mod diagnostic;
mod error;
mod evaluation;
mod expr;
mod expression;
mod frame;
mod function;
mod rule;
mod snapshot;

pub use curve::{ControlPoint, InterpolationDefinition};
pub use diagnostic::{DiagnosticKind, RuleDiagnostic};
pub use error::{CompileError, CurveError, EvalError, ValidationError};
pub use evaluation::Evaluation;
pub(crate) use expr::CompiledExpr;
pub use expr::{call, num, var, BinaryOp, Expr, UnaryOp};
pub use expression::Expression;
pub use frame::InputFrame;
pub use function::{Arity, Function};
pub use rule::{RuleDefinition, TransformationRule};
pub use snapshot::RuleSetSnapshot;
