use serde::{Deserialize, Serialize};

/// Default cap on evaluation passes per frame.
pub const DEFAULT_MAX_EVALUATION_ITERATIONS: usize = 10;
/// Default largest per-output change still treated as settled.
pub const DEFAULT_CONVERGENCE_TOLERANCE: f64 = 1e-6;

const ENV_MAX_ITERATIONS: &str = "RIGMAP_MAX_EVALUATION_ITERATIONS";
const ENV_TOLERANCE: &str = "RIGMAP_CONVERGENCE_TOLERANCE";

/// Tuning for [`Engine`](crate::Engine).
///
/// Deserializes with per-field defaults, so it can sit inside a host's own
/// config file with any subset of fields present.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Upper bound on passes over the rule set (default: `10`). Values below
    /// one are treated as one.
    pub max_evaluation_iterations: usize,
    /// Passes stop once no output moved by more than this (default: `1e-6`).
    pub convergence_tolerance: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_evaluation_iterations: DEFAULT_MAX_EVALUATION_ITERATIONS,
            convergence_tolerance: DEFAULT_CONVERGENCE_TOLERANCE,
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                            | Default |
    /// |------------------------------------|---------|
    /// | `RIGMAP_MAX_EVALUATION_ITERATIONS` | `10`    |
    /// | `RIGMAP_CONVERGENCE_TOLERANCE`     | `1e-6`  |
    ///
    /// Unparsable values are logged and replaced by the default.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let max_evaluation_iterations = match lookup(ENV_MAX_ITERATIONS) {
            None => defaults.max_evaluation_iterations,
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(n) => n.max(1),
                Err(e) => {
                    tracing::warn!(var = ENV_MAX_ITERATIONS, value = %raw, error = %e, "ignoring invalid setting");
                    defaults.max_evaluation_iterations
                }
            },
        };

        let convergence_tolerance = match lookup(ENV_TOLERANCE) {
            None => defaults.convergence_tolerance,
            Some(raw) => match raw.trim().parse::<f64>() {
                Ok(t) if t.is_finite() && t >= 0.0 => t,
                Ok(t) => {
                    tracing::warn!(var = ENV_TOLERANCE, value = t, "tolerance must be finite and non-negative");
                    defaults.convergence_tolerance
                }
                Err(e) => {
                    tracing::warn!(var = ENV_TOLERANCE, value = %raw, error = %e, "ignoring invalid setting");
                    defaults.convergence_tolerance
                }
            },
        };

        Self {
            max_evaluation_iterations,
            convergence_tolerance,
        }
    }

    #[must_use]
    pub fn with_max_evaluation_iterations(mut self, n: usize) -> Self {
        self.max_evaluation_iterations = n;
        self
    }

    #[must_use]
    pub fn with_convergence_tolerance(mut self, tolerance: f64) -> Self {
        self.convergence_tolerance = tolerance;
        self
    }

    /// The pass cap actually used: never less than one.
    #[must_use]
    pub fn effective_iterations(&self) -> usize {
        self.max_evaluation_iterations.max(1)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let c = EngineConfig::default();
        assert_eq!(c.max_evaluation_iterations, 10);
        assert_eq!(c.convergence_tolerance, 1e-6);
        assert_eq!(EngineConfig::from_lookup(lookup(&[])), c);
    }

    #[test]
    fn reads_overrides() {
        let c = EngineConfig::from_lookup(lookup(&[
            (ENV_MAX_ITERATIONS, " 25 "),
            (ENV_TOLERANCE, "0.001"),
        ]));
        assert_eq!(c.max_evaluation_iterations, 25);
        assert_eq!(c.convergence_tolerance, 0.001);
    }

    #[test]
    fn zero_iterations_become_one() {
        let c = EngineConfig::from_lookup(lookup(&[(ENV_MAX_ITERATIONS, "0")]));
        assert_eq!(c.max_evaluation_iterations, 1);
        assert_eq!(
            EngineConfig::default()
                .with_max_evaluation_iterations(0)
                .effective_iterations(),
            1
        );
    }

    #[test]
    fn invalid_values_fall_back() {
        let c = EngineConfig::from_lookup(lookup(&[
            (ENV_MAX_ITERATIONS, "lots"),
            (ENV_TOLERANCE, "-1"),
        ]));
        assert_eq!(c, EngineConfig::default());
        let c = EngineConfig::from_lookup(lookup(&[(ENV_TOLERANCE, "NaN")]));
        assert_eq!(c.convergence_tolerance, DEFAULT_CONVERGENCE_TOLERANCE);
    }

    #[test]
    fn deserializes_partial() {
        let c: EngineConfig = serde_json::from_str(r#"{"max_evaluation_iterations": 3}"#).unwrap();
        assert_eq!(c.max_evaluation_iterations, 3);
        assert_eq!(c.convergence_tolerance, DEFAULT_CONVERGENCE_TOLERANCE);
        let c: EngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(c, EngineConfig::default());
    }
}
