use std::process::Command;

fn bin() -> std::path::PathBuf {
    std::path::PathBuf::from(env!("CARGO_BIN_EXE_distfxn"))
}

#[test]
fn families_lists_sorted_names() {
    let output = Command::new(bin())
        .arg("families")
        .output()
        .expect("failed to run distfxn");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().collect::<Vec<_>>(), vec!["bernoulli", "normal", "uniform"]);
}

#[test]
fn gate_passes_and_prints_reports() {
    let output = Command::new(bin())
        .args(["gate", "--seed", "3", "--random-specs", "2"])
        .output()
        .expect("failed to run distfxn");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("[PASS] verification report for family 'bernoulli'"));
    assert!(!stdout.contains("[FAIL]"));
}

#[test]
fn gate_json_is_an_array_of_reports() {
    let output = Command::new(bin())
        .args(["gate", "--random-specs", "0", "--json"])
        .output()
        .expect("failed to run distfxn");
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let reports = value.as_array().unwrap();
    assert_eq!(reports.len(), 10);
    assert!(reports.iter().all(|r| r["passed"] == serde_json::json!(true)));
}
