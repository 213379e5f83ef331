use std::sync::Arc;
use std::thread;

use rigmap::{Engine, InputFrame, MemoryRuleSource, RuleRepository};

const RULES: &str = r#"[
    {"name": "FaceAngleX", "expression": "HeadYaw * -1", "input_min": -30, "input_max": 30},
    {"name": "MouthOpen", "expression": "JawOpen", "input_min": 0, "input_max": 1}
]"#;

fn main() {
    let source = Arc::new(MemoryRuleSource::new().with_file("face.json", RULES));
    let repo = Arc::new(RuleRepository::new(source));
    repo.load("face.json");

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let repo = Arc::clone(&repo);
            thread::spawn(move || {
                // Each thread holds its own snapshot for the whole evaluation
                let snapshot = repo.current_snapshot();
                let frame = InputFrame::new()
                    .set("HeadYaw", f64::from(i) * 10.0)
                    .set("JawOpen", f64::from(i) / 4.0);

                let result = Engine::default().evaluate(&snapshot, &frame);
                println!(
                    "Thread {i}: FaceAngleX={:?} MouthOpen={:?}",
                    result.output("FaceAngleX"),
                    result.output("MouthOpen")
                );
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }
}
