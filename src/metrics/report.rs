use std::fmt;

use serde::Serialize;

use super::config::RateUnit;
use super::estimator::{Confidence, LossStrategy};

/// 附在报告上的非致命提示
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReportWarning {
    /// 时长 <= 0 或不同时间戳少于 2 个；速率类字段全部置 0
    DegenerateCapture {
        distinct_timestamps: usize,
        span_seconds: f64,
    },
    /// 丢包率来自重复注释这一粗略代理
    LowConfidenceEstimate { strategy: LossStrategy },
}

impl fmt::Display for ReportWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportWarning::DegenerateCapture {
                distinct_timestamps,
                span_seconds,
            } => write!(
                f,
                "degenerate capture: {distinct_timestamps} distinct timestamp(s), span {span_seconds:.2}s; rates reported as 0"
            ),
            ReportWarning::LowConfidenceEstimate { strategy } => write!(
                f,
                "low-confidence loss estimate: computed with {strategy:?} instead of retransmission markers"
            ),
        }
    }
}

/// 一次指标计算的全部输出
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsReport {
    pub duration_seconds: f64,
    pub total_frame_bytes: u64,
    pub throughput_bps: f64,
    pub total_payload_bytes: u64,
    pub goodput_bps: f64,
    pub max_packet_size: u64,
    pub retransmission_count: u64,
    pub data_packet_count: u64,
    /// 丢包率的分母；随策略不同，可能是数据包数或会话总包数
    pub loss_basis_packets: u64,
    /// 百分比
    pub packet_loss_rate: f64,

    /// `throughput_bps`/`goodput_bps` 的单位
    pub rate_unit: RateUnit,
    pub loss_strategy: LossStrategy,
    pub loss_confidence: Confidence,
    pub total_packets: usize,
    pub relevant_packets: usize,
    /// 载荷长度由帧长减头部估算出来的包数
    pub estimated_payload_packets: usize,
    pub warnings: Vec<ReportWarning>,
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

impl MetricsReport {
    pub fn is_degenerate(&self) -> bool {
        self.warnings
            .iter()
            .any(|w| matches!(w, ReportWarning::DegenerateCapture { .. }))
    }

    pub fn is_low_confidence(&self) -> bool {
        self.loss_confidence == Confidence::Low
    }

    /// 展示用副本：时长、速率、丢包率保留两位小数
    pub fn rounded(&self) -> MetricsReport {
        MetricsReport {
            duration_seconds: round2(self.duration_seconds),
            throughput_bps: round2(self.throughput_bps),
            goodput_bps: round2(self.goodput_bps),
            packet_loss_rate: round2(self.packet_loss_rate),
            ..self.clone()
        }
    }
}
