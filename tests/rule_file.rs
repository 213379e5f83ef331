use rigmap::serial::{decode_rule_file, source_digest, to_rule_file};
use rigmap::{
    validate_rule, validate_rules, InterpolationDefinition, LoadError, RuleDefinition,
};

fn sample_definitions() -> Vec<RuleDefinition> {
    vec![
        RuleDefinition::new("FaceAngleX", "HeadYaw * -1", -30.0, 30.0),
        RuleDefinition::new("EyeOpenLeft", "1 - EyeBlinkLeft", 0.0, 1.0).with_default(1.0),
        RuleDefinition::new("MouthOpen", "clamp(JawOpen * 1.2, 0, 1)", 0.0, 1.0).with_curve(
            InterpolationDefinition::bezier([(0.0, 0.0), (0.7, 0.3), (0.9, 0.7), (1.0, 1.0)]),
        ),
        RuleDefinition::new("Linear", "x", 0.0, 1.0).with_curve(InterpolationDefinition::Identity),
    ]
}

#[test]
fn definition_round_trip_revalidates_to_same_rule() {
    let defs = sample_definitions();
    let text = to_rule_file(&defs).unwrap();
    let decoded = decode_rule_file(&text).unwrap();
    assert!(decoded.diagnostics.is_empty());
    assert_eq!(decoded.definitions, defs);

    for (original, reread) in defs.iter().zip(&decoded.definitions) {
        let a = validate_rule(original).unwrap();
        let b = validate_rule(reread).unwrap();
        assert_eq!(a, b);
        assert_eq!(b.to_definition(), *original);
    }
}

#[test]
fn accepts_bare_array_and_short_names() {
    let text = r#"[
        {"name": "a", "func": "x * 2", "min": 0, "max": 4, "default": 1},
        {"name": "b", "formula": "y", "input_min": -1, "input_max": 1,
         "curve": {"type": "linear"}}
    ]"#;
    let decoded = decode_rule_file(text).unwrap();
    assert!(decoded.diagnostics.is_empty(), "{:?}", decoded.diagnostics);
    assert_eq!(
        decoded.definitions[0],
        RuleDefinition::new("a", "x * 2", 0.0, 4.0).with_default(1.0)
    );
    assert_eq!(decoded.definitions[1].curve, Some(InterpolationDefinition::Identity));
}

#[test]
fn unknown_curve_type_is_an_entry_error() {
    let text = r#"[
        {"name": "a", "expression": "x", "input_min": 0, "input_max": 1,
         "curve": {"type": "Spline", "points": []}},
        {"name": "b", "expression": "x", "input_min": 0, "input_max": 1}
    ]"#;
    let decoded = decode_rule_file(text).unwrap();
    assert_eq!(decoded.definitions.len(), 1);
    assert_eq!(decoded.diagnostics.len(), 1);
    assert_eq!(decoded.diagnostics[0].rule_name(), "a");
}

#[test]
fn shape_errors_surface_at_validation() {
    let text = r#"[
        {"name": "few", "expression": "x", "input_min": 0, "input_max": 1,
         "curve": {"type": "Bezier", "points": [[0, 0]]}},
        {"name": "off", "expression": "x", "input_min": 0, "input_max": 1,
         "curve": {"type": "Bezier", "points": [[0, 0], [1.5, 0.5], [1, 1]]}},
        {"name": "start", "expression": "x", "input_min": 0, "input_max": 1,
         "curve": {"type": "Bezier", "points": [[0.1, 0], [1, 1]]}}
    ]"#;
    let decoded = decode_rule_file(text).unwrap();
    assert!(decoded.diagnostics.is_empty());
    let (valid, diagnostics) = validate_rules(&decoded.definitions);
    assert!(valid.is_empty());
    let names: Vec<&str> = diagnostics.iter().map(|d| d.rule_name()).collect();
    assert_eq!(names, vec!["few", "off", "start"]);
    assert!(diagnostics.iter().all(|d| d.message().starts_with("invalid curve:")));
}

#[test]
fn broken_container_is_a_load_error() {
    for text in ["", "{", "true", r#"{"rules": {"a": 1}}"#] {
        assert!(
            matches!(decode_rule_file(text), Err(LoadError::Parse(_))),
            "{text:?}"
        );
    }
}

#[test]
fn digest_is_stable_across_rendering() {
    let defs = sample_definitions();
    let a = to_rule_file(&defs).unwrap();
    let b = to_rule_file(&defs).unwrap();
    assert_eq!(source_digest(&a), source_digest(&b));
}
