use std::fs;

use rigmap::{Engine, InputFrame, RuleRepository};

const RULES: &str = r#"{
  "rules": [
    { "name": "FaceAngleX", "expression": "HeadYaw * -1", "input_min": -30, "input_max": 30 },
    { "name": "EyeOpenLeft", "func": "1 - EyeBlinkLeft", "min": 0, "max": 1, "default": 1 },
    { "name": "MouthOpen", "expression": "JawOpen", "input_min": 0, "input_max": 1,
      "curve": { "type": "Bezier", "points": [[0, 0], [0.7, 0.3], [0.9, 0.7], [1, 1]] } }
  ]
}"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("face.json");
    fs::write(&path, RULES)?;

    let repo = RuleRepository::from_fs();
    let snapshot = repo.load(&path);
    println!("{snapshot}");

    let frame = InputFrame::new()
        .set("HeadYaw", 10.0)
        .set("EyeBlinkLeft", 0.3)
        .set("JawOpen", 0.5);
    println!("{}", Engine::default().evaluate(&snapshot, &frame));

    // A broken edit keeps the last good rules in service
    fs::write(&path, "{ not json")?;
    let fallback = repo.load(&path);
    println!("{fallback}");
    println!("{}", Engine::default().evaluate(&fallback, &frame));

    Ok(())
}
