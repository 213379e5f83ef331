use std::fmt;

/// When a rule failure was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// At load time: syntax, bounds, curve shape, malformed definition.
    Validation,
    /// While computing a value for a live frame.
    Evaluation,
}

/// A structured record of one rule's failure.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct RuleDiagnostic {
    rule_name: String,
    expression_text: String,
    message: String,
    kind: DiagnosticKind,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::Validation => write!(f, "validation"),
            DiagnosticKind::Evaluation => write!(f, "evaluation"),
        }
    }
}

impl fmt::Display for RuleDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} error in '{}'", self.kind, self.rule_name)?;
        if !self.expression_text.is_empty() {
            write!(f, " [{}]", self.expression_text)?;
        }
        write!(f, ": {}", self.message)
    }
}

impl RuleDiagnostic {
    pub fn new(
        rule_name: impl Into<String>,
        expression_text: impl Into<String>,
        message: impl Into<String>,
        kind: DiagnosticKind,
    ) -> Self {
        Self {
            rule_name: rule_name.into(),
            expression_text: expression_text.into(),
            message: message.into(),
            kind,
        }
    }

    pub fn validation(
        rule_name: impl Into<String>,
        expression_text: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(rule_name, expression_text, message, DiagnosticKind::Validation)
    }

    pub fn evaluation(
        rule_name: impl Into<String>,
        expression_text: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(rule_name, expression_text, message, DiagnosticKind::Evaluation)
    }

    #[must_use]
    pub fn rule_name(&self) -> &str {
        &self.rule_name
    }

    #[must_use]
    pub fn expression_text(&self) -> &str {
        &self.expression_text
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn kind(&self) -> DiagnosticKind {
        self.kind
    }
}
