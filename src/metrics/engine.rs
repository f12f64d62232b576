//! 指标计算：时长、吞吐、有效吞吐、丢包率代理、最大包长
//!
//! 纯函数，单遍、无状态；退化的抓包只会得到速率全为 0 的报告，不会报错。

use tracing::{debug, warn};

use crate::capture::{CaptureSession, PacketRecord};

use super::config::MetricsConfig;
use super::direction::{DirectionFilter, RelevantPacket};
use super::estimator::Confidence;
use super::report::{MetricsReport, ReportWarning};

/// 载荷长度：显式列优先；未知时用 `max(frame_length - header_bytes, 0)` 估算。
/// 显式值不会超过帧长，帧长缺失（记为 0）时载荷也记为 0。
///
/// 返回 `(载荷字节数, 是否为估算值)`。
pub fn effective_payload(rec: &PacketRecord, header_bytes: u64) -> (u64, bool) {
    match rec.transport_payload_length {
        Some(len) => (len.min(rec.frame_length), false),
        None => (rec.frame_length.saturating_sub(header_bytes), true),
    }
}

/// 字节数求和；异常大的单元格只会把总数钉在 `u64::MAX`
fn saturating_total(bytes: impl Iterator<Item = u64>) -> u64 {
    bytes.fold(0u64, u64::saturating_add)
}

/// 从规范化会话计算指标报告
#[tracing::instrument(skip(session, cfg), fields(packets = session.len()))]
pub fn compute(session: &CaptureSession, cfg: &MetricsConfig) -> MetricsReport {
    let records = session.records();

    let distinct_timestamps = session.distinct_timestamps();
    let span_seconds = match (session.first_timestamp(), session.last_timestamp()) {
        (Some(first), Some(last)) => last - first,
        _ => 0.0,
    };
    let degenerate = distinct_timestamps < 2 || !(span_seconds > 0.0);
    let duration_seconds = if degenerate { 0.0 } else { span_seconds };

    let total_frame_bytes = saturating_total(records.iter().map(|r| r.frame_length));
    let max_packet_size = records.iter().map(|r| r.frame_length).max().unwrap_or(0);

    let filter = DirectionFilter::from_config(cfg);
    let mut estimated_payload_packets = 0usize;
    let relevant: Vec<RelevantPacket<'_>> = records
        .iter()
        .filter(|r| filter.matches(r))
        .map(|record| {
            let (payload, estimated) = effective_payload(record, cfg.header_bytes);
            if estimated {
                estimated_payload_packets += 1;
            }
            RelevantPacket { record, payload }
        })
        .collect();
    let total_payload_bytes = saturating_total(relevant.iter().map(|p| p.payload));
    let data_packet_count = relevant.iter().filter(|p| p.payload > 0).count() as u64;
    debug!(
        relevant = relevant.len(),
        estimated_payload_packets,
        unfiltered = filter.is_unfiltered(),
        "applied direction filter"
    );

    let estimator = cfg.loss_strategy.estimator(session);
    let estimate = estimator.estimate_retransmissions(session, &relevant);

    let rate = |bytes: u64| {
        if degenerate {
            0.0
        } else {
            bytes as f64 * cfg.rate_unit.per_byte() / duration_seconds
        }
    };

    let mut warnings = Vec::new();
    if degenerate {
        warn!(
            distinct_timestamps,
            span_seconds, "degenerate capture, reporting zero rates"
        );
        warnings.push(ReportWarning::DegenerateCapture {
            distinct_timestamps,
            span_seconds,
        });
    }
    if estimate.confidence == Confidence::Low {
        warn!(strategy = ?estimate.strategy, "loss rate is a low-confidence estimate");
        warnings.push(ReportWarning::LowConfidenceEstimate {
            strategy: estimate.strategy,
        });
    }

    MetricsReport {
        duration_seconds,
        total_frame_bytes,
        throughput_bps: rate(total_frame_bytes),
        total_payload_bytes,
        goodput_bps: rate(total_payload_bytes),
        max_packet_size,
        retransmission_count: estimate.retransmissions,
        data_packet_count,
        loss_basis_packets: estimate.basis_packets,
        packet_loss_rate: if degenerate {
            0.0
        } else {
            estimate.rate_percent()
        },
        rate_unit: cfg.rate_unit,
        loss_strategy: estimate.strategy,
        loss_confidence: estimate.confidence,
        total_packets: records.len(),
        relevant_packets: relevant.len(),
        estimated_payload_packets,
        warnings,
    }
}
