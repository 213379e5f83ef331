use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use super::diagnostic::RuleDiagnostic;

/// The result of one [`Engine::evaluate()`](crate::Engine::evaluate) call.
///
/// Contains one output value per valid rule, the evaluation diagnostics
/// collected across all passes, how many passes ran, whether the values
/// settled before the iteration cap, and the wall-clock duration.
#[derive(Debug, Clone)]
#[must_use]
pub struct Evaluation {
    outputs: HashMap<String, f64>,
    diagnostics: Vec<RuleDiagnostic>,
    passes: usize,
    converged: bool,
    duration: Duration,
}

impl Evaluation {
    pub(crate) fn new(
        outputs: HashMap<String, f64>,
        diagnostics: Vec<RuleDiagnostic>,
        passes: usize,
        converged: bool,
        duration: Duration,
    ) -> Self {
        Self {
            outputs,
            diagnostics,
            passes,
            converged,
            duration,
        }
    }

    /// Output value per rule name.
    #[must_use]
    pub fn outputs(&self) -> &HashMap<String, f64> {
        &self.outputs
    }

    #[must_use]
    pub fn output(&self, rule_name: &str) -> Option<f64> {
        self.outputs.get(rule_name).copied()
    }

    /// Evaluation diagnostics, at most one per rule and message.
    #[must_use]
    pub fn diagnostics(&self) -> &[RuleDiagnostic] {
        &self.diagnostics
    }

    /// Number of full passes over the rule set.
    #[must_use]
    pub fn passes(&self) -> usize {
        self.passes
    }

    /// `false` when the iteration cap was reached while values were still
    /// changing (typically a reference cycle).
    #[must_use]
    pub fn converged(&self) -> bool {
        self.converged
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Split into the output map handed to the host and the diagnostics.
    #[must_use]
    pub fn into_parts(self) -> (HashMap<String, f64>, Vec<RuleDiagnostic>) {
        (self.outputs, self.diagnostics)
    }
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "outputs: {}, diagnostics: {}, passes: {}",
            self.outputs.len(),
            self.diagnostics.len(),
            self.passes
        )?;
        if !self.converged {
            write!(f, " (not converged)")?;
        }
        write!(f, ", duration: {:?}", self.duration)?;
        Ok(())
    }
}
