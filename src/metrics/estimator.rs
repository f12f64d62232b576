//! 重传（丢包）估计策略
//!
//! 这里的丢包率不是基于序号空洞的真实测量，而是“重传密度”代理指标。
//! 两种策略实现同一个接口，置信度随策略一起返回，不在事后推断。

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::capture::CaptureSession;

use super::direction::RelevantPacket;

const RETRANSMISSION_MARKER: &str = "retransmission";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossStrategy {
    /// 会话里有注释文本就用重传标记，否则退回重复注释
    #[default]
    Auto,
    RetransmissionMarker,
    DuplicateAnnotation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Primary,
    Low,
}

/// 一次估计的结果：重传数与作为分母的包数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetransmissionEstimate {
    pub strategy: LossStrategy,
    pub confidence: Confidence,
    pub retransmissions: u64,
    pub basis_packets: u64,
}

impl RetransmissionEstimate {
    /// 百分比；分母为 0 时记为 0
    pub fn rate_percent(&self) -> f64 {
        if self.basis_packets == 0 {
            return 0.0;
        }
        self.retransmissions as f64 / self.basis_packets as f64 * 100.0
    }
}

pub trait RetransmissionEstimator {
    fn strategy(&self) -> LossStrategy;
    fn confidence(&self) -> Confidence;
    fn estimate_retransmissions(
        &self,
        session: &CaptureSession,
        relevant: &[RelevantPacket<'_>],
    ) -> RetransmissionEstimate;
}

/// 在相关方向的包里统计注释含 "Retransmission"（不区分大小写）的个数，
/// 分母是相关方向上载荷大于 0 的数据包数。
#[derive(Debug, Clone, Copy, Default)]
pub struct RetransmissionMarker;

impl RetransmissionEstimator for RetransmissionMarker {
    fn strategy(&self) -> LossStrategy {
        LossStrategy::RetransmissionMarker
    }

    fn confidence(&self) -> Confidence {
        Confidence::Primary
    }

    fn estimate_retransmissions(
        &self,
        _session: &CaptureSession,
        relevant: &[RelevantPacket<'_>],
    ) -> RetransmissionEstimate {
        let retransmissions = relevant
            .iter()
            .filter(|p| {
                p.record
                    .annotation
                    .to_ascii_lowercase()
                    .contains(RETRANSMISSION_MARKER)
            })
            .count() as u64;
        let basis_packets = relevant.iter().filter(|p| p.payload > 0).count() as u64;
        RetransmissionEstimate {
            strategy: self.strategy(),
            confidence: self.confidence(),
            retransmissions,
            basis_packets,
        }
    }
}

/// 粗略代理：整个会话（不做方向过滤）中重复出现的非空注释个数，
/// 分母是会话总包数。
#[derive(Debug, Clone, Copy, Default)]
pub struct DuplicateAnnotation;

impl RetransmissionEstimator for DuplicateAnnotation {
    fn strategy(&self) -> LossStrategy {
        LossStrategy::DuplicateAnnotation
    }

    fn confidence(&self) -> Confidence {
        Confidence::Low
    }

    fn estimate_retransmissions(
        &self,
        session: &CaptureSession,
        _relevant: &[RelevantPacket<'_>],
    ) -> RetransmissionEstimate {
        let mut seen = HashSet::new();
        let mut duplicates = 0u64;
        for rec in session.records() {
            let note = rec.annotation.trim();
            if note.is_empty() {
                continue;
            }
            if !seen.insert(note) {
                duplicates += 1;
            }
        }
        RetransmissionEstimate {
            strategy: self.strategy(),
            confidence: self.confidence(),
            retransmissions: duplicates,
            basis_packets: session.len() as u64,
        }
    }
}

impl LossStrategy {
    /// 把 `Auto` 落到具体策略
    ///
    /// `Auto` 只在所有注释都为空时才选 `DuplicateAnnotation`，而该策略跳过空注释，
    /// 所以这条回退路径的重传数总是 0：它只表示“没有可用的注释”，
    /// 并用低置信度警告标出来，不是一个真正起作用的估计。
    pub fn resolve(self, session: &CaptureSession) -> LossStrategy {
        match self {
            LossStrategy::Auto if session.has_annotations() => LossStrategy::RetransmissionMarker,
            LossStrategy::Auto => LossStrategy::DuplicateAnnotation,
            other => other,
        }
    }

    pub fn estimator(self, session: &CaptureSession) -> Box<dyn RetransmissionEstimator> {
        match self.resolve(session) {
            LossStrategy::DuplicateAnnotation => Box::new(DuplicateAnnotation),
            _ => Box::new(RetransmissionMarker),
        }
    }
}
