use serde::{Deserialize, Serialize};

use super::curve::InterpolationDefinition;
use super::expression::Expression;

/// A raw rule as written in a rule file, before validation.
///
/// Field aliases accept the short names used by hand-written rule files
/// (`func`, `min`, `max`, `default`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleDefinition {
    pub name: String,
    #[serde(alias = "func", alias = "formula")]
    pub expression: String,
    #[serde(alias = "min")]
    pub input_min: f64,
    #[serde(alias = "max")]
    pub input_max: f64,
    #[serde(alias = "default", default)]
    pub default_value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub curve: Option<InterpolationDefinition>,
}

impl RuleDefinition {
    /// A definition with no curve and a default value of zero.
    #[must_use]
    pub fn new(name: &str, expression: &str, input_min: f64, input_max: f64) -> Self {
        Self {
            name: name.to_owned(),
            expression: expression.to_owned(),
            input_min,
            input_max,
            default_value: 0.0,
            curve: None,
        }
    }

    #[must_use]
    pub fn with_default(mut self, default_value: f64) -> Self {
        self.default_value = default_value;
        self
    }

    #[must_use]
    pub fn with_curve(mut self, curve: InterpolationDefinition) -> Self {
        self.curve = Some(curve);
        self
    }
}

/// A validated, compiled transformation rule. Immutable once constructed;
/// only [`validate_rule`](crate::validate_rule) creates one.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformationRule {
    pub(crate) name: String,
    pub(crate) expression: Expression,
    pub(crate) expression_text: String,
    pub(crate) input_min: f64,
    pub(crate) input_max: f64,
    pub(crate) default_value: f64,
    pub(crate) curve: Option<InterpolationDefinition>,
}

impl TransformationRule {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn expression(&self) -> &Expression {
        &self.expression
    }

    #[must_use]
    pub fn expression_text(&self) -> &str {
        &self.expression_text
    }

    #[must_use]
    pub fn input_min(&self) -> f64 {
        self.input_min
    }

    #[must_use]
    pub fn input_max(&self) -> f64 {
        self.input_max
    }

    #[must_use]
    pub fn default_value(&self) -> f64 {
        self.default_value
    }

    #[must_use]
    pub fn curve(&self) -> Option<&InterpolationDefinition> {
        self.curve.as_ref()
    }

    /// Variable names the expression reads (tracking inputs or rule names).
    #[must_use]
    pub fn references(&self) -> &[String] {
        self.expression.variables()
    }

    /// Map a raw expression result to the rule's output value:
    /// normalize into [0, 1], apply the curve, scale back into
    /// `[input_min, input_max]`.
    ///
    /// A degenerate range (`input_min == input_max`) feeds `t = 0.5` to the
    /// curve.
    #[must_use]
    pub fn shape(&self, raw: f64) -> f64 {
        let span = self.input_max - self.input_min;
        let t = if span == 0.0 {
            0.5
        } else {
            ((raw - self.input_min) / span).clamp(0.0, 1.0)
        };
        let curved = match &self.curve {
            Some(curve) => crate::curve::evaluate(curve, t),
            None => t,
        };
        self.input_min + curved * span
    }

    /// The definition this rule was validated from.
    #[must_use]
    pub fn to_definition(&self) -> RuleDefinition {
        RuleDefinition {
            name: self.name.clone(),
            expression: self.expression_text.clone(),
            input_min: self.input_min,
            input_max: self.input_max,
            default_value: self.default_value,
            curve: self.curve.clone(),
        }
    }
}
