use serde_json::Value;
use std::process::Command;

#[test]
fn experiment_plan_prints_json_for_bottleneck_scenario() {
    let output = Command::new(env!("CARGO_BIN_EXE_experiment_plan"))
        .args([
            "--option", "c", "--scenario", "c2b", "--cc", "yeah", "--loss", "3",
        ])
        .output()
        .expect("run experiment_plan");
    assert!(
        output.status.success(),
        "experiment_plan failed: stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );

    let v: Value = serde_json::from_slice(&output.stdout).expect("parse plan json");
    assert_eq!(v["option"], "c");
    assert_eq!(v["congestion_control"], "yeah");
    let flows = v["flows"].as_array().expect("flows array");
    let clients: Vec<&str> = flows.iter().filter_map(|f| f["client"].as_str()).collect();
    assert_eq!(clients, vec!["h1", "h3"]);

    let lossy = v["topology"]["links"]
        .as_array()
        .expect("links")
        .iter()
        .find(|l| l["a"] == "s2" && l["b"] == "s3")
        .expect("s2-s3 link");
    assert_eq!(lossy["shaping"]["bandwidth_mbps"].as_u64(), Some(50));
    assert_eq!(lossy["shaping"]["loss_percent"].as_f64(), Some(3.0));
}

#[test]
fn experiment_plan_prints_iperf3_commands() {
    let output = Command::new(env!("CARGO_BIN_EXE_experiment_plan"))
        .args(["--option", "b", "--commands", "--out", "/dev/null"])
        .output()
        .expect("run experiment_plan");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("h7: iperf3 -s -D -p 5202"), "{stdout}");
    assert!(
        stdout.contains("h4 (+30s): iperf3 -c 10.0.0.7 -p 5203 -b 10M -P 10 -t 90 -C bic"),
        "{stdout}"
    );
}

#[test]
fn experiment_plan_exits_nonzero_without_scenario_for_option_c() {
    let output = Command::new(env!("CARGO_BIN_EXE_experiment_plan"))
        .args(["--option", "c"])
        .output()
        .expect("run experiment_plan");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("requires a scenario"), "{stderr}");
}
