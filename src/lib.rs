//! Turn raw face and body tracking signals into avatar parameters.
//!
//! Each output parameter is described by a rule: a small arithmetic
//! expression over tracking inputs (and other rules' outputs), an input
//! range, and an optional response curve. Rules are loaded from a JSON rule
//! file into an immutable [`RuleSetSnapshot`]; a bad rule becomes a
//! [`RuleDiagnostic`] instead of failing the whole file, and a bad file falls
//! back to the last good snapshot. [`Engine::evaluate`] then maps one
//! [`InputFrame`] to one value per rule.
//!
//! ```
//! use rigmap::{Engine, InputFrame, InterpolationDefinition, RuleDefinition, RuleSetSnapshot};
//!
//! let snapshot = RuleSetSnapshot::from_definitions(&[
//!     RuleDefinition::new("FaceAngleX", "HeadYaw * -1", -30.0, 30.0),
//!     RuleDefinition::new("MouthOpen", "JawOpen", 0.0, 1.0).with_curve(
//!         InterpolationDefinition::bezier([(0.0, 0.0), (0.7, 0.3), (0.9, 0.7), (1.0, 1.0)]),
//!     ),
//! ]);
//!
//! let frame = InputFrame::new().set("HeadYaw", 15.0).set("JawOpen", 0.5);
//! let result = Engine::default().evaluate(&snapshot, &frame);
//!
//! assert_eq!(result.output("FaceAngleX"), Some(-15.0));
//! assert!(result.output("MouthOpen").unwrap() < 0.5);
//! ```
//!
//! The library logs through [`tracing`] and installs no subscriber.

mod compile;
mod config;
pub mod curve;
mod engine;
mod error;
mod evaluate;
pub mod parse;
mod repository;
pub mod serial;
mod source;
mod types;
mod validate;

pub use config::{EngineConfig, DEFAULT_CONVERGENCE_TOLERANCE, DEFAULT_MAX_EVALUATION_ITERATIONS};
pub use engine::Engine;
pub use error::{ExpressionError, LoadError};
pub use parse::ParseError;
pub use repository::RuleRepository;
pub use source::{ChangeCallback, FsRuleSource, MemoryRuleSource, RuleSource};
pub use types::{
    call, num, var, Arity, BinaryOp, CompileError, ControlPoint, CurveError, DiagnosticKind,
    EvalError, Evaluation, Expr, Expression, Function, InputFrame, InterpolationDefinition,
    RuleDefinition, RuleDiagnostic, RuleSetSnapshot, TransformationRule, UnaryOp, ValidationError,
};
pub use validate::{validate_rule, validate_rules};
