use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::diagnostic::RuleDiagnostic;
use super::rule::{RuleDefinition, TransformationRule};

/// An immutable bundle of valid rules and the diagnostics produced while
/// loading them. Thread-safe and designed to live behind `Arc`.
///
/// # Example
///
/// ```
/// use rigmap::{RuleDefinition, RuleSetSnapshot};
///
/// let snapshot = RuleSetSnapshot::from_definitions(&[
///     RuleDefinition::new("FaceAngleX", "HeadYaw * -1", -30.0, 30.0),
///     RuleDefinition::new("Broken", "HeadYaw *", 0.0, 1.0),
/// ]);
/// assert_eq!(snapshot.valid_count(), 1);
/// assert_eq!(snapshot.invalid_count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct RuleSetSnapshot {
    pub(crate) valid_rules: Arc<[TransformationRule]>,
    pub(crate) diagnostics: Vec<RuleDiagnostic>,
    pub(crate) loaded_from_fallback: bool,
    pub(crate) fallback_reason: Option<String>,
    pub(crate) source_path: Option<PathBuf>,
    pub(crate) source_digest: Option<[u8; 32]>,
}

impl Default for RuleSetSnapshot {
    fn default() -> Self {
        Self {
            valid_rules: Arc::from(Vec::new()),
            diagnostics: Vec::new(),
            loaded_from_fallback: false,
            fallback_reason: None,
            source_path: None,
            source_digest: None,
        }
    }
}

impl RuleSetSnapshot {
    /// Bundle already-validated rules with their diagnostics.
    #[must_use]
    pub fn new(valid_rules: Vec<TransformationRule>, diagnostics: Vec<RuleDiagnostic>) -> Self {
        Self {
            valid_rules: valid_rules.into(),
            diagnostics,
            ..Self::default()
        }
    }

    /// Validate raw definitions and partition them into rules and diagnostics.
    #[must_use]
    pub fn from_definitions(definitions: &[RuleDefinition]) -> Self {
        let (valid, diagnostics) = crate::validate::validate_rules(definitions);
        Self::new(valid, diagnostics)
    }

    /// The snapshot with no rules and a single diagnostic describing why
    /// nothing could be loaded.
    pub(crate) fn failed(diagnostic: RuleDiagnostic) -> Self {
        Self::new(Vec::new(), vec![diagnostic])
    }

    /// A copy of this snapshot marked as served from the fallback cache.
    pub(crate) fn as_fallback(&self, reason: impl Into<String>) -> Self {
        Self {
            loaded_from_fallback: true,
            fallback_reason: Some(reason.into()),
            ..self.clone()
        }
    }

    pub(crate) fn with_source(mut self, path: &Path, digest: [u8; 32]) -> Self {
        self.source_path = Some(path.to_path_buf());
        self.source_digest = Some(digest);
        self
    }

    /// Valid rules in evaluation order (the order they appear in the source).
    #[must_use]
    pub fn valid_rules(&self) -> &[TransformationRule] {
        &self.valid_rules
    }

    #[must_use]
    pub fn diagnostics(&self) -> &[RuleDiagnostic] {
        &self.diagnostics
    }

    #[must_use]
    pub fn loaded_from_fallback(&self) -> bool {
        self.loaded_from_fallback
    }

    #[must_use]
    pub fn fallback_reason(&self) -> Option<&str> {
        self.fallback_reason.as_deref()
    }

    /// Path of the rule source this snapshot was loaded from, if any.
    #[must_use]
    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    /// BLAKE3 digest of the rule source text this snapshot was built from.
    #[must_use]
    pub fn source_digest(&self) -> Option<&[u8; 32]> {
        self.source_digest.as_ref()
    }

    #[must_use]
    pub fn valid_count(&self) -> usize {
        self.valid_rules.len()
    }

    #[must_use]
    pub fn invalid_count(&self) -> usize {
        self.diagnostics.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.valid_rules.is_empty()
    }

    #[must_use]
    pub fn rule(&self, name: &str) -> Option<&TransformationRule> {
        self.valid_rules.iter().find(|r| r.name == name)
    }

    /// Names of the other rules in this snapshot that `rule_name` reads.
    ///
    /// Returns `None` if the rule name is not found.
    #[must_use]
    pub fn dependencies_of(&self, rule_name: &str) -> Option<Vec<&str>> {
        self.rule(rule_name).map(|rule| {
            rule.references()
                .iter()
                .filter_map(|name| self.rule(name).map(TransformationRule::name))
                .collect()
        })
    }
}

impl fmt::Display for RuleSetSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RuleSetSnapshot({} valid, {} invalid",
            self.valid_count(),
            self.invalid_count(),
        )?;
        if let Some(reason) = &self.fallback_reason {
            write!(f, ", fallback: {reason}")?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RuleSetSnapshot {
        RuleSetSnapshot::from_definitions(&[
            RuleDefinition::new("EyeOpenLeft", "EyeBlinkLeft * -1 + 1", 0.0, 1.0),
            RuleDefinition::new("EyeOpenRight", "EyeBlinkRight * -1 + 1", 0.0, 1.0),
            RuleDefinition::new("EyeOpen", "(EyeOpenLeft + EyeOpenRight) / 2", 0.0, 1.0),
            RuleDefinition::new("Bad", "", 0.0, 1.0),
        ])
    }

    #[test]
    fn from_definitions_partitions() {
        let s = sample();
        assert_eq!(s.valid_count(), 3);
        assert_eq!(s.invalid_count(), 1);
        assert!(!s.loaded_from_fallback());
        assert_eq!(s.fallback_reason(), None);
        assert_eq!(s.diagnostics()[0].rule_name(), "Bad");
    }

    #[test]
    fn valid_rules_keep_source_order() {
        let s = sample();
        let names: Vec<&str> = s.valid_rules().iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["EyeOpenLeft", "EyeOpenRight", "EyeOpen"]);
    }

    #[test]
    fn dependencies_only_list_rules() {
        let s = sample();
        assert_eq!(
            s.dependencies_of("EyeOpen"),
            Some(vec!["EyeOpenLeft", "EyeOpenRight"])
        );
        assert_eq!(s.dependencies_of("EyeOpenLeft"), Some(vec![]));
        assert_eq!(s.dependencies_of("Missing"), None);
    }

    #[test]
    fn as_fallback_keeps_rules_and_sets_reason() {
        let s = sample();
        let fb = s.as_fallback("malformed rule file");
        assert!(fb.loaded_from_fallback());
        assert_eq!(fb.fallback_reason(), Some("malformed rule file"));
        assert_eq!(fb.valid_count(), s.valid_count());
        assert_eq!(fb.diagnostics(), s.diagnostics());
    }

    #[test]
    fn display() {
        let s = sample();
        assert_eq!(s.to_string(), "RuleSetSnapshot(3 valid, 1 invalid)");
        assert_eq!(
            s.as_fallback("boom").to_string(),
            "RuleSetSnapshot(3 valid, 1 invalid, fallback: boom)"
        );
    }

    #[test]
    fn default_is_empty() {
        let s = RuleSetSnapshot::default();
        assert!(s.is_empty());
        assert_eq!(s.source_path(), None);
        assert_eq!(s.source_digest(), None);
    }
}
