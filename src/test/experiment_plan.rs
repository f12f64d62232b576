use crate::plan::{
    CongestionControl, ExperimentOption, ExperimentOpts, ExperimentPlan, PlanError, Scenario,
    build_plan,
};

fn opts(option: ExperimentOption, scenario: Option<Scenario>) -> ExperimentOpts {
    ExperimentOpts {
        option,
        scenario,
        ..ExperimentOpts::default()
    }
}

fn clients(plan: &ExperimentPlan) -> Vec<&str> {
    plan.flows.iter().map(|f| f.client.as_str()).collect()
}

#[test]
fn option_a_is_a_single_flow_to_h7() {
    let plan = build_plan(&opts(ExperimentOption::A, None)).expect("plan");
    assert_eq!(clients(&plan), vec!["h1"]);
    assert_eq!(plan.server, "h7");
    assert_eq!(plan.server_ports, vec![5201]);
    let f = &plan.flows[0];
    assert_eq!(f.start_offset_s, 0);
    assert_eq!(f.duration_s, 150);
    assert_eq!(f.bitrate_mbps, 10);
    assert_eq!(f.parallel, 10);
}

#[test]
fn option_b_staggers_three_flows_on_distinct_ports() {
    let plan = build_plan(&opts(ExperimentOption::B, None)).expect("plan");
    let schedule: Vec<(&str, u16, u64, u64)> = plan
        .flows
        .iter()
        .map(|f| (f.client.as_str(), f.port, f.start_offset_s, f.duration_s))
        .collect();
    assert_eq!(
        schedule,
        vec![
            ("h1", 5201, 0, 150),
            ("h3", 5202, 15, 120),
            ("h4", 5203, 30, 90),
        ]
    );
    assert_eq!(plan.server_ports, vec![5201, 5202, 5203]);
    assert_eq!(plan.makespan_s(), 150);
    assert_eq!(plan.flows[2].end_offset_s(), 120);
}

#[test]
fn option_c_scenarios_select_clients() {
    let cases = [
        (Scenario::C1, vec!["h3"]),
        (Scenario::C2a, vec!["h1", "h2"]),
        (Scenario::C2b, vec!["h1", "h3"]),
        (Scenario::C2c, vec!["h1", "h3", "h4"]),
        (Scenario::C2d, vec!["h1", "h3", "h4"]),
    ];
    for (scenario, expected) in cases {
        let plan = build_plan(&opts(ExperimentOption::C, Some(scenario))).expect("plan");
        assert_eq!(clients(&plan), expected, "{scenario:?}");
        assert_eq!(plan.server_ports, vec![5201]);
    }
}

#[test]
fn iperf3_arguments_follow_flow_settings() {
    let plan = build_plan(&ExperimentOpts {
        congestion_control: CongestionControl::Yeah,
        ..opts(ExperimentOption::A, None)
    })
    .expect("plan");
    let ip = plan.topology.host_ip("h7").expect("h7 ip");
    assert_eq!(ip, "10.0.0.7");
    assert_eq!(
        plan.flows[0].iperf3_client_args(ip).join(" "),
        "-c 10.0.0.7 -p 5201 -b 10M -P 10 -t 150 -C yeah"
    );
}

#[test]
fn invalid_option_combinations_are_rejected() {
    assert_eq!(
        build_plan(&opts(ExperimentOption::C, None)).unwrap_err(),
        PlanError::MissingScenario
    );
    assert_eq!(
        build_plan(&opts(ExperimentOption::B, Some(Scenario::C1))).unwrap_err(),
        PlanError::UnexpectedScenario {
            option: ExperimentOption::B,
            scenario: Scenario::C1,
        }
    );
    assert!(matches!(
        build_plan(&ExperimentOpts {
            loss_percent: 150.0,
            ..opts(ExperimentOption::C, Some(Scenario::C1))
        }),
        Err(PlanError::LossOutOfRange(_))
    ));
}

#[test]
fn link_loss_is_ignored_without_shaped_link() {
    for option in [ExperimentOption::A, ExperimentOption::B] {
        let plan = build_plan(&ExperimentOpts {
            loss_percent: 5.0,
            ..opts(option, None)
        })
        .expect("plan");
        assert_eq!(plan.loss_percent, 0.0, "{option:?}");
        assert!(
            plan.topology.links.iter().all(|l| l.shaping.is_none()),
            "{option:?}"
        );
    }
}

#[test]
fn plan_serializes_snake_case_json() {
    let plan = build_plan(&ExperimentOpts {
        congestion_control: CongestionControl::Highspeed,
        loss_percent: 2.0,
        ..opts(ExperimentOption::C, Some(Scenario::C2a))
    })
    .expect("plan");
    let raw = serde_json::to_string(&plan).expect("serialize plan");
    let v: serde_json::Value = serde_json::from_str(&raw).expect("parse plan");
    assert_eq!(v["option"], "c");
    assert_eq!(v["scenario"], "c2a");
    assert_eq!(v["congestion_control"], "highspeed");
    assert_eq!(v["flows"].as_array().map(Vec::len), Some(2));

    let decoded: ExperimentPlan = serde_json::from_str(&raw).expect("deserialize plan");
    assert_eq!(decoded.flows, plan.flows);
    assert_eq!(decoded.topology, plan.topology);
}
