use serde::{Deserialize, Serialize};
use tracing::warn;

use super::error::PlanError;
use super::topology::{LabTopology, build_lab_topology};

pub const DEFAULT_SERVER_PORT: u16 = 5201;
pub const DEFAULT_FLOW_SECS: u64 = 150;
pub const DEFAULT_BITRATE_MBPS: u64 = 10;
pub const DEFAULT_PARALLEL: u32 = 10;
pub const SERVER_HOST: &str = "h7";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperimentOption {
    /// 单流 h1 -> h7
    A,
    /// 三条错峰启动的流
    B,
    /// 瓶颈链路整形 + 场景
    C,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    C1,
    C2a,
    C2b,
    C2c,
    C2d,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CongestionControl {
    Bic,
    Highspeed,
    Yeah,
}

impl CongestionControl {
    pub fn as_str(self) -> &'static str {
        match self {
            CongestionControl::Bic => "bic",
            CongestionControl::Highspeed => "highspeed",
            CongestionControl::Yeah => "yeah",
        }
    }
}

/// 一条客户端流
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowSpec {
    pub client: String,
    pub server: String,
    pub port: u16,
    pub start_offset_s: u64,
    pub duration_s: u64,
    pub bitrate_mbps: u64,
    pub parallel: u32,
    pub congestion_control: CongestionControl,
}

impl FlowSpec {
    fn new(
        client: &str,
        port: u16,
        start_offset_s: u64,
        duration_s: u64,
        cc: CongestionControl,
    ) -> Self {
        Self {
            client: client.to_string(),
            server: SERVER_HOST.to_string(),
            port,
            start_offset_s,
            duration_s,
            bitrate_mbps: DEFAULT_BITRATE_MBPS,
            parallel: DEFAULT_PARALLEL,
            congestion_control: cc,
        }
    }

    /// iperf3 客户端参数，例如 `-c 10.0.0.7 -p 5201 -b 10M -P 10 -t 150 -C bic`
    pub fn iperf3_client_args(&self, server_ip: &str) -> Vec<String> {
        vec![
            "-c".to_string(),
            server_ip.to_string(),
            "-p".to_string(),
            self.port.to_string(),
            "-b".to_string(),
            format!("{}M", self.bitrate_mbps),
            "-P".to_string(),
            self.parallel.to_string(),
            "-t".to_string(),
            self.duration_s.to_string(),
            "-C".to_string(),
            self.congestion_control.as_str().to_string(),
        ]
    }

    pub fn end_offset_s(&self) -> u64 {
        self.start_offset_s.saturating_add(self.duration_s)
    }
}

#[derive(Debug, Clone)]
pub struct ExperimentOpts {
    pub option: ExperimentOption,
    pub scenario: Option<Scenario>,
    pub congestion_control: CongestionControl,
    pub loss_percent: f64,
}

impl Default for ExperimentOpts {
    fn default() -> Self {
        Self {
            option: ExperimentOption::A,
            scenario: None,
            congestion_control: CongestionControl::Bic,
            loss_percent: 0.0,
        }
    }
}

/// 完整实验计划：拓扑 + 服务器端口 + 客户端流
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentPlan {
    pub option: ExperimentOption,
    #[serde(default)]
    pub scenario: Option<Scenario>,
    pub congestion_control: CongestionControl,
    pub loss_percent: f64,
    pub topology: LabTopology,
    pub server: String,
    pub server_ports: Vec<u16>,
    pub flows: Vec<FlowSpec>,
}

impl ExperimentPlan {
    /// 所有流结束的时间（秒）
    pub fn makespan_s(&self) -> u64 {
        self.flows.iter().map(FlowSpec::end_offset_s).max().unwrap_or(0)
    }
}

fn validate(opts: &ExperimentOpts) -> Result<(), PlanError> {
    if !opts.loss_percent.is_finite() || !(0.0..=100.0).contains(&opts.loss_percent) {
        return Err(PlanError::LossOutOfRange(opts.loss_percent));
    }
    match (opts.option, opts.scenario) {
        (ExperimentOption::C, None) => Err(PlanError::MissingScenario),
        (ExperimentOption::A | ExperimentOption::B, Some(scenario)) => {
            Err(PlanError::UnexpectedScenario {
                option: opts.option,
                scenario,
            })
        }
        _ => Ok(()),
    }
}

pub fn build_plan(opts: &ExperimentOpts) -> Result<ExperimentPlan, PlanError> {
    validate(opts)?;
    let cc = opts.congestion_control;
    // 只有选项 c 有整形链路，a/b 上的丢包率被忽略
    let loss_percent = match opts.option {
        ExperimentOption::C => opts.loss_percent,
        _ if opts.loss_percent > 0.0 => {
            warn!(
                option = ?opts.option,
                loss_percent = opts.loss_percent,
                "link loss only applies to option c, ignoring it"
            );
            0.0
        }
        _ => 0.0,
    };

    let flows = match opts.option {
        ExperimentOption::A => vec![FlowSpec::new(
            "h1",
            DEFAULT_SERVER_PORT,
            0,
            DEFAULT_FLOW_SECS,
            cc,
        )],
        ExperimentOption::B => vec![
            FlowSpec::new("h1", 5201, 0, 150, cc),
            FlowSpec::new("h3", 5202, 15, 120, cc),
            FlowSpec::new("h4", 5203, 30, 90, cc),
        ],
        ExperimentOption::C => {
            let clients: &[&str] = match opts.scenario {
                Some(Scenario::C1) => &["h3"],
                Some(Scenario::C2a) => &["h1", "h2"],
                Some(Scenario::C2b) => &["h1", "h3"],
                Some(Scenario::C2c | Scenario::C2d) => &["h1", "h3", "h4"],
                None => return Err(PlanError::MissingScenario),
            };
            clients
                .iter()
                .map(|c| FlowSpec::new(c, DEFAULT_SERVER_PORT, 0, DEFAULT_FLOW_SECS, cc))
                .collect()
        }
    };

    let mut server_ports: Vec<u16> = flows.iter().map(|f| f.port).collect();
    server_ports.sort_unstable();
    server_ports.dedup();

    Ok(ExperimentPlan {
        option: opts.option,
        scenario: opts.scenario,
        congestion_control: cc,
        loss_percent,
        topology: build_lab_topology(opts.option, loss_percent),
        server: SERVER_HOST.to_string(),
        server_ports,
        flows,
    })
}
