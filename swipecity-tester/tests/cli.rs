use std::path::PathBuf;
use std::process::Command;

fn tester() -> Command {
    Command::new(env!("CARGO_BIN_EXE_swipecity-tester"))
}

fn scratch_file(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("swipecity-cli-{}-{name}", std::process::id()))
}

#[test]
fn lists_scenarios_to_file() {
    let path = scratch_file("list.txt");
    let status = tester()
        .args(["--list-scenarios", "--output"])
        .arg(&path)
        .status()
        .unwrap();
    assert!(status.success());
    let listing = std::fs::read_to_string(&path).unwrap();
    assert!(listing.starts_with("Available scenarios:"));
    for name in ["smoke", "reload", "classifier-sweep", "deterministic"] {
        assert!(listing.contains(name), "missing {name}");
    }
    std::fs::remove_file(path).unwrap();
}

#[test]
fn smoke_run_writes_json_report() {
    let path = scratch_file("smoke.json");
    let status = tester()
        .args(["--scenarios", "smoke,reload", "--seeds", "7,lisbon"])
        .args(["--iterations", "2", "--report", "json", "--output"])
        .arg(&path)
        .status()
        .unwrap();
    assert!(status.success());

    let report: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let results = report.as_array().unwrap();
    assert_eq!(results.len(), 4);
    assert!(results.iter().all(|r| r["passed"] == true));
    assert_eq!(results[0]["scenario_name"], "smoke");
    assert_eq!(results[0]["seed"], 7);
    std::fs::remove_file(path).unwrap();
}

#[test]
fn rejects_unknown_report_format() {
    let output = tester().args(["--report", "xml"]).output().unwrap();
    assert!(!output.status.success());
}
