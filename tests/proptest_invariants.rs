
use std::collections::HashMap;

use proptest::prelude::*;
use rigmap::{serial, Engine, EngineConfig, Expression, InputFrame, RuleSetSnapshot};
use strategies::{
    arb_bezier, arb_chained_rules, arb_flat_rules, arb_flat_uncurved_rules, arb_frame,
    arb_monotone_bezier,
};

fn env(frame: &InputFrame) -> HashMap<String, f64> {
    frame.iter().map(|(k, v)| (k.to_owned(), v)).collect()
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * (1.0 + a.abs().max(b.abs()))
}

// ---------------------------------------------------------------------------
// Determinism
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn determinism_flat(defs in arb_flat_rules(), frame in arb_frame()) {
        let snapshot = RuleSetSnapshot::from_definitions(&defs);
        let engine = Engine::default();
        let first = engine.evaluate(&snapshot, &frame);
        for _ in 0..3 {
            let again = engine.evaluate(&snapshot, &frame);
            prop_assert_eq!(first.outputs(), again.outputs());
            prop_assert_eq!(first.passes(), again.passes());
        }
    }

    #[test]
    fn determinism_revalidated(defs in arb_chained_rules(), frame in arb_frame()) {
        let a = Engine::default().evaluate(&RuleSetSnapshot::from_definitions(&defs), &frame);
        let b = Engine::default().evaluate(&RuleSetSnapshot::from_definitions(&defs), &frame);
        prop_assert_eq!(a.outputs(), b.outputs());
    }
}

// ---------------------------------------------------------------------------
// Output shaping
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn generated_rules_are_all_valid(defs in arb_flat_rules()) {
        let snapshot = RuleSetSnapshot::from_definitions(&defs);
        prop_assert!(snapshot.diagnostics().is_empty(), "{:?}", snapshot.diagnostics());
        prop_assert_eq!(snapshot.valid_count(), defs.len());
    }

    #[test]
    fn outputs_stay_within_bounds(defs in arb_flat_rules(), frame in arb_frame()) {
        let snapshot = RuleSetSnapshot::from_definitions(&defs);
        let result = Engine::default().evaluate(&snapshot, &frame);
        prop_assert!(result.diagnostics().is_empty());
        for def in &defs {
            let out = result.output(&def.name).unwrap();
            let slack = 1e-9 * (1.0 + def.input_min.abs().max(def.input_max.abs()));
            prop_assert!(
                out >= def.input_min - slack && out <= def.input_max + slack,
                "{} = {} outside [{}, {}]", def.name, out, def.input_min, def.input_max
            );
        }
    }

    #[test]
    fn uncurved_output_is_clamped_raw(defs in arb_flat_uncurved_rules(), frame in arb_frame()) {
        let snapshot = RuleSetSnapshot::from_definitions(&defs);
        let result = Engine::default().evaluate(&snapshot, &frame);
        let env = env(&frame);
        for def in &defs {
            let raw = Expression::compile(&def.expression).unwrap().evaluate(&env).unwrap();
            let out = result.output(&def.name).unwrap();
            if def.input_min == def.input_max {
                prop_assert_eq!(out, def.input_min);
            } else {
                let expected = raw.clamp(def.input_min, def.input_max);
                prop_assert!(close(out, expected), "{}: {} vs {}", def.name, out, expected);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Convergence
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn flat_rules_take_one_pass(defs in arb_flat_rules(), frame in arb_frame()) {
        let snapshot = RuleSetSnapshot::from_definitions(&defs);
        let result = Engine::default().evaluate(&snapshot, &frame);
        prop_assert_eq!(result.passes(), 1);
        prop_assert!(result.converged());
    }

    #[test]
    fn ordered_chains_settle_within_two_passes(defs in arb_chained_rules(), frame in arb_frame()) {
        let snapshot = RuleSetSnapshot::from_definitions(&defs);
        prop_assert!(snapshot.diagnostics().is_empty());
        let two = Engine::new(EngineConfig::default().with_max_evaluation_iterations(2))
            .evaluate(&snapshot, &frame);
        let ten = Engine::default().evaluate(&snapshot, &frame);
        prop_assert_eq!(two.outputs(), ten.outputs());
        prop_assert!(ten.converged());
        prop_assert!(ten.passes() <= 2);
    }

    #[test]
    fn every_valid_rule_gets_an_output(defs in arb_chained_rules(), frame in arb_frame()) {
        let snapshot = RuleSetSnapshot::from_definitions(&defs);
        let result = Engine::new(EngineConfig::default().with_max_evaluation_iterations(1))
            .evaluate(&snapshot, &frame);
        prop_assert_eq!(result.outputs().len(), snapshot.valid_count());
    }
}

// ---------------------------------------------------------------------------
// Curves
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn bezier_endpoints_are_exact(curve in arb_bezier()) {
        prop_assert_eq!(rigmap::curve::validate(&curve), Ok(()));
        prop_assert_eq!(rigmap::curve::evaluate(&curve, 0.0), 0.0);
        prop_assert_eq!(rigmap::curve::evaluate(&curve, 1.0), 1.0);
    }

    #[test]
    fn bezier_output_stays_in_unit_interval(curve in arb_bezier(), t in -0.5_f64..1.5) {
        let y = rigmap::curve::evaluate(&curve, t);
        prop_assert!((-1e-12..=1.0 + 1e-12).contains(&y), "y({}) = {}", t, y);
    }

    #[test]
    fn monotone_control_points_give_monotone_response(
        curve in arb_monotone_bezier(),
        a in 0.0_f64..=1.0,
        b in 0.0_f64..=1.0,
    ) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let y_lo = rigmap::curve::evaluate(&curve, lo);
        let y_hi = rigmap::curve::evaluate(&curve, hi);
        prop_assert!(y_lo <= y_hi + 1e-9, "f({}) = {} > f({}) = {}", lo, y_lo, hi, y_hi);
    }

    #[test]
    fn two_point_bezier_matches_identity(t in -1.0_f64..2.0) {
        let linear = rigmap::InterpolationDefinition::bezier([(0.0, 0.0), (1.0, 1.0)]);
        let identity = rigmap::InterpolationDefinition::Identity;
        let a = rigmap::curve::evaluate(&linear, t);
        let b = rigmap::curve::evaluate(&identity, t);
        prop_assert!((a - b).abs() < 1e-9);
    }
}

// ---------------------------------------------------------------------------
// Rule file round trip
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn rule_file_round_trip_preserves_behavior(defs in arb_flat_rules(), frame in arb_frame()) {
        let text = serial::to_rule_file(&defs).unwrap();
        let decoded = serial::decode_rule_file(&text).unwrap();
        prop_assert!(decoded.diagnostics.is_empty());
        prop_assert_eq!(decoded.definitions.len(), defs.len());

        let original = RuleSetSnapshot::from_definitions(&defs);
        let reloaded = RuleSetSnapshot::from_definitions(&decoded.definitions);
        prop_assert_eq!(reloaded.valid_count(), original.valid_count());

        let a = Engine::default().evaluate(&original, &frame);
        let b = Engine::default().evaluate(&reloaded, &frame);
        for def in &defs {
            let (x, y) = (a.output(&def.name).unwrap(), b.output(&def.name).unwrap());
            prop_assert!(close(x, y), "{}: {} vs {}", def.name, x, y);
        }
    }
}
