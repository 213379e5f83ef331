//! JSON rule file format.
//!
//! A rule file is either a top-level array of rule definitions or an object
//! with a `rules` array:
//!
//! ```text
//! [
//!   { "name": "FaceAngleX", "expression": "HeadYaw * -1",
//!     "input_min": -30, "input_max": 30, "default_value": 0 },
//!   { "name": "MouthOpen", "expression": "JawOpen",
//!     "input_min": 0, "input_max": 1,
//!     "curve": { "type": "Bezier", "points": [[0,0],[0.7,0.3],[0.9,0.7],[1,1]] } }
//! ]
//! ```
//!
//! Decoding happens in two stages. The container is parsed first; if that
//! fails the whole file is rejected with [`LoadError::Parse`]. Each entry is
//! then decoded on its own, so one entry with a wrong field type becomes a
//! [`RuleDiagnostic`] while its siblings still load.

use serde::Serialize;
use serde_json::Value;

use crate::error::LoadError;
use crate::{RuleDefinition, RuleDiagnostic, ValidationError};

/// Entries of a rule file plus the diagnostics for entries that did not
/// decode.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedRules {
    pub definitions: Vec<RuleDefinition>,
    pub diagnostics: Vec<RuleDiagnostic>,
}

/// Parse rule file text into its raw entries.
///
/// # Errors
///
/// Returns [`LoadError::Parse`] when the text is not JSON, or is neither an
/// array nor an object holding a `rules` array.
pub fn parse_rule_file(text: &str) -> Result<Vec<Value>, LoadError> {
    match serde_json::from_str::<Value>(text)? {
        Value::Array(entries) => Ok(entries),
        Value::Object(mut map) => match map.remove("rules") {
            Some(Value::Array(entries)) => Ok(entries),
            Some(_) => Err(container_error("`rules` must be an array")),
            None => Err(container_error("expected an array or an object with a `rules` array")),
        },
        _ => Err(container_error("expected an array or an object with a `rules` array")),
    }
}

fn container_error(message: &str) -> LoadError {
    LoadError::Parse(<serde_json::Error as serde::de::Error>::custom(message))
}

/// Decode one raw entry. `index` names the entry in the diagnostic when it
/// has no readable `name`.
///
/// # Errors
///
/// Returns a validation diagnostic when the entry does not have the shape of
/// a [`RuleDefinition`].
pub fn decode_entry(index: usize, entry: Value) -> Result<RuleDefinition, RuleDiagnostic> {
    let name = entry
        .get("name")
        .and_then(Value::as_str)
        .map_or_else(|| format!("#{index}"), str::to_owned);
    let expression = ["expression", "func", "formula"]
        .iter()
        .find_map(|key| entry.get(*key).and_then(Value::as_str))
        .unwrap_or_default()
        .to_owned();

    serde_json::from_value::<RuleDefinition>(entry).map_err(|err| {
        let err = ValidationError::Malformed {
            message: err.to_string(),
        };
        tracing::debug!(rule = %name, error = %err, "malformed rule entry");
        RuleDiagnostic::validation(name, expression, err.to_string())
    })
}

/// Parse rule file text and decode every entry.
///
/// # Errors
///
/// Only a malformed container fails; see [`parse_rule_file`].
pub fn decode_rule_file(text: &str) -> Result<DecodedRules, LoadError> {
    let mut decoded = DecodedRules::default();
    for (index, entry) in parse_rule_file(text)?.into_iter().enumerate() {
        match decode_entry(index, entry) {
            Ok(def) => decoded.definitions.push(def),
            Err(diag) => decoded.diagnostics.push(diag),
        }
    }
    Ok(decoded)
}

#[derive(Serialize)]
struct RuleFileRef<'a> {
    rules: &'a [RuleDefinition],
}

/// Render definitions as a rule file (`{ "rules": [...] }`, pretty-printed).
///
/// # Errors
///
/// Propagates serializer errors. Non-finite numbers are written as `null`
/// and will not decode again.
pub fn to_rule_file(definitions: &[RuleDefinition]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&RuleFileRef { rules: definitions })
}

/// BLAKE3 digest of rule source text.
#[must_use]
pub fn source_digest(text: &str) -> [u8; 32] {
    *blake3::hash(text.as_bytes()).as_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InterpolationDefinition;

    #[test]
    fn accepts_top_level_array() {
        let entries = parse_rule_file(r#"[{"name":"a"},{"name":"b"}]"#).unwrap();
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn accepts_rules_object() {
        let entries = parse_rule_file(r#"{"version": 2, "rules": [{"name":"a"}]}"#).unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn rejects_bad_containers() {
        assert!(matches!(parse_rule_file("[{"), Err(LoadError::Parse(_))));
        assert!(matches!(parse_rule_file("42"), Err(LoadError::Parse(_))));
        assert!(matches!(parse_rule_file(r#"{"rules": 1}"#), Err(LoadError::Parse(_))));
        assert!(matches!(parse_rule_file(r#"{"other": []}"#), Err(LoadError::Parse(_))));
    }

    #[test]
    fn malformed_entry_is_isolated() {
        let text = r#"[
            {"name":"good","expression":"x","input_min":0,"input_max":1},
            {"name":"bad","expression":"x","input_min":"zero","input_max":1},
            {"expression":"y","input_min":0,"input_max":1}
        ]"#;
        let decoded = decode_rule_file(text).unwrap();
        assert_eq!(decoded.definitions.len(), 1);
        assert_eq!(decoded.definitions[0].name, "good");
        assert_eq!(decoded.diagnostics.len(), 2);
        assert_eq!(decoded.diagnostics[0].rule_name(), "bad");
        assert_eq!(decoded.diagnostics[0].expression_text(), "x");
        assert!(decoded.diagnostics[0]
            .message()
            .starts_with("malformed rule definition:"));
        assert_eq!(decoded.diagnostics[1].rule_name(), "#2");
    }

    #[test]
    fn curve_point_formats_decode_alike() {
        let text = r#"[
            {"name":"a","expression":"x","input_min":0,"input_max":1,
             "curve":{"type":"Bezier","points":[[0,0],[0.5,0.8],[1,1]]}},
            {"name":"b","expression":"x","input_min":0,"input_max":1,
             "curve":{"type":"Bezier","points":[{"x":0,"y":0},{"x":0.5,"y":0.8},{"x":1,"y":1}]}},
            {"name":"c","expression":"x","input_min":0,"input_max":1,
             "curve":{"type":"Bezier","points":[0,0,0.5,0.8,1,1]}}
        ]"#;
        let decoded = decode_rule_file(text).unwrap();
        assert!(decoded.diagnostics.is_empty());
        let expected = InterpolationDefinition::bezier([(0.0, 0.0), (0.5, 0.8), (1.0, 1.0)]);
        for def in &decoded.definitions {
            assert_eq!(def.curve.as_ref(), Some(&expected), "{}", def.name);
        }
    }

    #[test]
    fn to_rule_file_reads_back() {
        let defs = vec![
            RuleDefinition::new("FaceAngleX", "HeadYaw * -1", -30.0, 30.0),
            RuleDefinition::new("MouthOpen", "JawOpen", 0.0, 1.0)
                .with_default(0.1)
                .with_curve(InterpolationDefinition::bezier([(0.0, 0.0), (0.7, 0.3), (1.0, 1.0)])),
        ];
        let text = to_rule_file(&defs).unwrap();
        let decoded = decode_rule_file(&text).unwrap();
        assert_eq!(decoded.definitions, defs);
    }

    #[test]
    fn digest_tracks_content() {
        assert_eq!(source_digest("[]"), source_digest("[]"));
        assert_ne!(source_digest("[]"), source_digest("[ ]"));
    }
}
