use rigmap::{Engine, InputFrame, RuleDefinition, RuleSetSnapshot};

fn main() {
    // Define rules
    let snapshot = RuleSetSnapshot::from_definitions(&[
        RuleDefinition::new("FaceAngleX", "HeadYaw * -1", -30.0, 30.0),
        RuleDefinition::new("EyeOpenLeft", "1 - EyeBlinkLeft", 0.0, 1.0).with_default(1.0),
        RuleDefinition::new("MouthOpen", "clamp(JawOpen * 1.2, 0, 1)", 0.0, 1.0),
    ]);

    println!("{snapshot}");

    // Evaluate one tracking frame
    let frame = InputFrame::new()
        .set("HeadYaw", 12.5)
        .set("EyeBlinkLeft", 0.2)
        .set("JawOpen", 0.5);

    let result = Engine::default().evaluate(&snapshot, &frame);
    for name in ["FaceAngleX", "EyeOpenLeft", "MouthOpen"] {
        match result.output(name) {
            Some(value) => println!("{name} = {value:.3}"),
            None => println!("{name} has no output"),
        }
    }
}
