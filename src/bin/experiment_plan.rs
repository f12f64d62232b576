//! 输出交换网络拥塞控制实验的拓扑与流时间表（JSON）

use capmetrics_rs::plan::{
    CongestionControl, ExperimentOption, ExperimentOpts, Scenario, build_plan,
};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

#[derive(Debug, Parser)]
#[command(
    name = "experiment-plan",
    about = "Describe the switched-network TCP congestion control experiment as JSON"
)]
struct Args {
    /// Experiment option: a, b or c
    #[arg(long, value_parser = ["a", "b", "c"])]
    option: String,

    /// TCP congestion control scheme
    #[arg(long, default_value = "bic", value_parser = ["bic", "highspeed", "yeah"])]
    cc: String,

    /// Scenario for option c
    #[arg(long, value_parser = ["c1", "c2a", "c2b", "c2c", "c2d"])]
    scenario: Option<String>,

    /// Loss percentage on the s2-s3 link (option c only)
    #[arg(long, default_value_t = 0.0)]
    loss: f64,

    /// Also print the iperf3 client command line for every flow
    #[arg(long)]
    commands: bool,

    /// Write the plan here instead of stdout
    #[arg(long)]
    out: Option<PathBuf>,
}

fn parse_option(raw: &str) -> ExperimentOption {
    match raw {
        "b" => ExperimentOption::B,
        "c" => ExperimentOption::C,
        _ => ExperimentOption::A,
    }
}

fn parse_cc(raw: &str) -> CongestionControl {
    match raw {
        "highspeed" => CongestionControl::Highspeed,
        "yeah" => CongestionControl::Yeah,
        _ => CongestionControl::Bic,
    }
}

fn parse_scenario(raw: Option<&str>) -> Option<Scenario> {
    match raw {
        Some("c1") => Some(Scenario::C1),
        Some("c2a") => Some(Scenario::C2a),
        Some("c2b") => Some(Scenario::C2b),
        Some("c2c") => Some(Scenario::C2c),
        Some("c2d") => Some(Scenario::C2d),
        _ => None,
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .init();

    let args = Args::parse();
    let opts = ExperimentOpts {
        option: parse_option(&args.option),
        scenario: parse_scenario(args.scenario.as_deref()),
        congestion_control: parse_cc(&args.cc),
        loss_percent: args.loss,
    };

    let plan = match build_plan(&opts) {
        Ok(plan) => plan,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };
    info!(
        flows = plan.flows.len(),
        makespan_s = plan.makespan_s(),
        "built experiment plan"
    );

    let json = match serde_json::to_string_pretty(&plan) {
        Ok(json) => json,
        Err(err) => {
            eprintln!("error: cannot serialize plan: {err}");
            return ExitCode::FAILURE;
        }
    };
    match &args.out {
        Some(path) => {
            if let Err(err) = fs::write(path, json) {
                eprintln!("error: cannot write {}: {err}", path.display());
                return ExitCode::FAILURE;
            }
        }
        None => println!("{json}"),
    }

    if args.commands {
        let server_ip = plan.topology.host_ip(&plan.server).unwrap_or("127.0.0.1");
        for port in &plan.server_ports {
            println!("{}: iperf3 -s -D -p {port}", plan.server);
        }
        for flow in &plan.flows {
            println!(
                "{} (+{}s): iperf3 {}",
                flow.client,
                flow.start_offset_s,
                flow.iperf3_client_args(server_ip).join(" ")
            );
        }
    }
    ExitCode::SUCCESS
}
