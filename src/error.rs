use std::path::PathBuf;

use thiserror::Error;

use crate::parse::ParseError;
use crate::CompileError;

/// Unified error for turning expression text into an
/// [`Expression`](crate::Expression).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExpressionError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Compile(#[from] CompileError),
}

/// Failure to obtain a rule list from a rule source. Never escapes
/// [`RuleRepository::load`](crate::RuleRepository::load); it becomes a
/// fallback reason or a diagnostic instead.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read rule source '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed rule file: {0}")]
    Parse(#[from] serde_json::Error),
}
