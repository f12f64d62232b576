//! 实验计划模块
//!
//! 声明式描述交换网络拓扑与客户端流时间表；本身不运行任何流量，
//! 由外部仿真器与流量发生器按计划执行，抓包结果再交给指标引擎。

mod error;
mod flows;
mod topology;

pub use error::PlanError;
pub use flows::{
    CongestionControl, DEFAULT_BITRATE_MBPS, DEFAULT_FLOW_SECS, DEFAULT_PARALLEL,
    DEFAULT_SERVER_PORT, ExperimentOption, ExperimentOpts, ExperimentPlan, FlowSpec, SERVER_HOST,
    Scenario, build_plan,
};
pub use topology::{
    LabTopology, LinkShaping, LinkSpec, NodeKind, NodeSpec, PathProfile, SHAPED_QUEUE_PKTS,
    build_lab_topology,
};
