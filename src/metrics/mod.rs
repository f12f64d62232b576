//! 指标引擎模块
//!
//! 输入规范化后的 `CaptureSession`，输出结构化的 `MetricsReport`；
//! 展示格式（文本/JSON）在 `present` 中单独处理。

mod config;
mod direction;
mod engine;
mod estimator;
mod present;
mod report;

pub use config::{DEFAULT_HEADER_BYTES, MetricsConfig, MetricsDefaults, RateUnit};
pub use direction::{DirectionFilter, RelevantPacket, annotation_ports, effective_dest_port};
pub use engine::{compute, effective_payload};
pub use estimator::{
    Confidence, DuplicateAnnotation, LossStrategy, RetransmissionEstimate,
    RetransmissionEstimator, RetransmissionMarker,
};
pub use present::{ReportFormat, render, render_text};
pub use report::{MetricsReport, ReportWarning};
