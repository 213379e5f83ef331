use std::collections::HashSet;

use crate::error::ExpressionError;
use crate::{Expression, RuleDefinition, RuleDiagnostic, TransformationRule, ValidationError};

/// Turn one raw definition into a compiled rule.
///
/// Checks run in order and stop at the first failure: rule name, empty
/// expression, expression syntax and function resolution, numeric fields and
/// bounds, then curve shape.
///
/// # Errors
///
/// Returns a [`Validation`](crate::DiagnosticKind::Validation) diagnostic
/// carrying the rule name, its expression text and the first violation found.
///
/// # Example
///
/// ```
/// use rigmap::{validate_rule, RuleDefinition};
///
/// let rule = validate_rule(&RuleDefinition::new("MouthOpen", "JawOpen * 1.5", 0.0, 1.0)).unwrap();
/// assert_eq!(rule.references(), &["JawOpen"]);
///
/// let diag = validate_rule(&RuleDefinition::new("Bad", "JawOpen", 5.0, 2.0)).unwrap_err();
/// assert_eq!(diag.message(), "input_min (5) is greater than input_max (2)");
/// ```
pub fn validate_rule(def: &RuleDefinition) -> Result<TransformationRule, RuleDiagnostic> {
    check(def).map_err(|err| {
        tracing::debug!(rule = %def.name, error = %err, "rule rejected");
        RuleDiagnostic::validation(&def.name, &def.expression, err.to_string())
    })
}

fn check(def: &RuleDefinition) -> Result<TransformationRule, ValidationError> {
    if def.name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if def.expression.trim().is_empty() {
        return Err(ValidationError::EmptyExpression);
    }

    let expression = Expression::compile(&def.expression).map_err(|err| match err {
        ExpressionError::Parse(e) => ValidationError::Syntax(e),
        ExpressionError::Compile(e) => ValidationError::Compile(e),
    })?;

    for (field, value) in [
        ("input_min", def.input_min),
        ("input_max", def.input_max),
        ("default_value", def.default_value),
    ] {
        if !value.is_finite() {
            return Err(ValidationError::NonFiniteNumber { field, value });
        }
    }
    if def.input_min > def.input_max {
        return Err(ValidationError::InvalidBounds {
            min: def.input_min,
            max: def.input_max,
        });
    }

    if let Some(curve) = &def.curve {
        crate::curve::validate(curve)?;
    }

    Ok(TransformationRule {
        name: def.name.clone(),
        expression,
        expression_text: def.expression.clone(),
        input_min: def.input_min,
        input_max: def.input_max,
        default_value: def.default_value,
        curve: def.curve.clone(),
    })
}

/// Validate a list of definitions, keeping source order.
///
/// A name that was already accepted earlier in the list is rejected; the
/// first occurrence wins.
#[must_use]
pub fn validate_rules(definitions: &[RuleDefinition]) -> (Vec<TransformationRule>, Vec<RuleDiagnostic>) {
    let mut valid = Vec::with_capacity(definitions.len());
    let mut diagnostics = Vec::new();
    let mut seen: HashSet<&str> = HashSet::with_capacity(definitions.len());

    for def in definitions {
        if seen.contains(def.name.as_str()) {
            let err = ValidationError::DuplicateRule {
                name: def.name.clone(),
            };
            tracing::debug!(rule = %def.name, "duplicate rule name");
            diagnostics.push(RuleDiagnostic::validation(
                &def.name,
                &def.expression,
                err.to_string(),
            ));
            continue;
        }
        match validate_rule(def) {
            Ok(rule) => {
                seen.insert(def.name.as_str());
                valid.push(rule);
            }
            Err(diag) => diagnostics.push(diag),
        }
    }

    (valid, diagnostics)
}
