use rigmap::{Engine, InputFrame, InterpolationDefinition, RuleDefinition, RuleSetSnapshot};

fn main() {
    let snapshot = RuleSetSnapshot::from_definitions(&[
        RuleDefinition::new("FaceAngleX", "HeadYaw * -1", -30.0, 30.0),
        RuleDefinition::new("MouthOpen", "JawOpen", 0.0, 1.0).with_curve(
            InterpolationDefinition::bezier([(0.0, 0.0), (0.7, 0.3), (0.9, 0.7), (1.0, 1.0)]),
        ),
        RuleDefinition::new("MouthWide", "MouthOpen * 2 + missing", 0.0, 1.0).with_default(0.25),
        RuleDefinition::new("Broken", "undefined_function(JawOpen)", 0.0, 1.0),
    ]);

    println!("{snapshot}");
    for diagnostic in snapshot.diagnostics() {
        println!("  {diagnostic}");
    }
    println!(
        "MouthWide reads: {:?}",
        snapshot.dependencies_of("MouthWide").unwrap_or_default()
    );

    let frame = InputFrame::new().set("HeadYaw", 8.0).set("JawOpen", 0.5);
    let result = Engine::default().evaluate(&snapshot, &frame);

    println!();
    println!("{result}");
    println!();
    println!("Passes: {} (converged: {})", result.passes(), result.converged());
    println!("Duration: {:?}", result.duration());
}
