use rigmap::{Engine, EngineConfig, InputFrame, RuleDefinition, RuleSetSnapshot};
use tracing_subscriber::EnvFilter;

fn main() {
    // RUST_LOG=rigmap=debug shows pass caps and rejected rules
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Listed consumer-first, so each pass carries the value one link further
    let snapshot = RuleSetSnapshot::from_definitions(&[
        RuleDefinition::new("Mouth", "Jaw * 2", 0.0, 2.0),
        RuleDefinition::new("Jaw", "Raw * 0.5", 0.0, 1.0),
        RuleDefinition::new("Raw", "JawOpen", 0.0, 1.0),
    ]);
    for rule in snapshot.valid_rules() {
        println!(
            "{} reads {:?}",
            rule.name(),
            snapshot.dependencies_of(rule.name()).unwrap_or_default()
        );
    }

    let frame = InputFrame::new().set("JawOpen", 0.8);
    for cap in [1, 2, 3, 10] {
        let engine = Engine::new(EngineConfig::default().with_max_evaluation_iterations(cap));
        let result = engine.evaluate(&snapshot, &frame);
        println!(
            "cap {cap:>2}: Mouth={:?} passes={} converged={}",
            result.output("Mouth"),
            result.passes(),
            result.converged()
        );
    }
}
