use std::collections::{HashMap, HashSet};
use std::time::Instant;

use crate::{EngineConfig, Evaluation, InputFrame, RuleDiagnostic, RuleSetSnapshot};

/// Computes output parameters from a snapshot and a frame of inputs.
///
/// Rules may read other rules' outputs by name. Instead of ordering rules by
/// dependency, the engine makes repeated passes over the snapshot in source
/// order until no output changes by more than the configured tolerance or the
/// pass cap is reached. Reference cycles therefore cost at most the cap and
/// still produce a value for every rule.
///
/// `Engine` holds only its configuration; it is `Copy`, `Send` and `Sync`,
/// and `evaluate` does no I/O and takes no locks.
///
/// # Example
///
/// ```
/// use rigmap::{Engine, InputFrame, RuleDefinition, RuleSetSnapshot};
///
/// let snapshot = RuleSetSnapshot::from_definitions(&[
///     RuleDefinition::new("MouthOpen", "JawOpen * 100", 0.0, 100.0),
///     RuleDefinition::new("MouthSmile", "MouthOpen / 2", 0.0, 100.0),
/// ]);
/// let frame = InputFrame::new().set("JawOpen", 0.5);
///
/// let result = Engine::default().evaluate(&snapshot, &frame);
/// assert_eq!(result.output("MouthOpen"), Some(50.0));
/// assert_eq!(result.output("MouthSmile"), Some(25.0));
/// assert!(result.converged());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// An engine configured from `RIGMAP_*` environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(EngineConfig::from_env())
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Evaluate every valid rule in `snapshot` against `frame`.
    ///
    /// The environment starts as the frame's inputs plus every rule name at
    /// its default value. A rule whose expression fails (unknown variable,
    /// division by zero, non-finite result) outputs its default value and
    /// contributes one evaluation diagnostic. Only failures in the final pass
    /// are reported: a rule that faulted on another rule's seeded default
    /// and succeeded once that value settled has no diagnostic.
    ///
    /// A snapshot in which no rule reads another rule finishes in one pass.
    pub fn evaluate(&self, snapshot: &RuleSetSnapshot, frame: &InputFrame) -> Evaluation {
        let start = Instant::now();
        let rules = snapshot.valid_rules();

        let mut env: HashMap<String, f64> = HashMap::with_capacity(frame.len() + rules.len());
        env.extend(frame.values().iter().map(|(k, v)| (k.clone(), *v)));
        for rule in rules {
            env.insert(rule.name.clone(), rule.default_value);
        }

        let names: HashSet<&str> = rules.iter().map(|r| r.name.as_str()).collect();
        let chained = rules
            .iter()
            .any(|r| r.references().iter().any(|v| names.contains(v.as_str())));
        let cap = if chained {
            self.config.effective_iterations()
        } else {
            1
        };
        let tolerance = self.config.convergence_tolerance;

        let mut previous: Vec<f64> = rules.iter().map(|r| r.default_value).collect();
        let mut current = previous.clone();
        let mut faults: Vec<Option<String>> = vec![None; rules.len()];
        let mut passes = 0;
        let mut converged = false;

        while passes < cap {
            passes += 1;
            for (index, rule) in rules.iter().enumerate() {
                let value = match rule.expression.evaluate(&env) {
                    Ok(raw) => {
                        faults[index] = None;
                        rule.shape(raw)
                    }
                    Err(err) => {
                        faults[index] = Some(err.to_string());
                        rule.default_value
                    }
                };
                current[index] = value;
                if let Some(slot) = env.get_mut(rule.name.as_str()) {
                    *slot = value;
                }
            }

            let settled = current
                .iter()
                .zip(&previous)
                .all(|(now, before)| (now - before).abs() <= tolerance);
            if !chained || settled {
                converged = true;
                break;
            }
            previous.copy_from_slice(&current);
        }

        if !converged {
            tracing::debug!(passes, rules = rules.len(), "rule outputs still changing at pass cap");
        }

        let diagnostics = rules
            .iter()
            .zip(faults)
            .filter_map(|(rule, fault)| {
                fault.map(|message| {
                    RuleDiagnostic::evaluation(&rule.name, &rule.expression_text, message)
                })
            })
            .collect();

        let outputs = rules
            .iter()
            .zip(current)
            .map(|(rule, value)| (rule.name.clone(), value))
            .collect();
        Evaluation::new(outputs, diagnostics, passes, converged, start.elapsed())
    }
}
