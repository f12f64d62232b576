//! 报告展示（文本 / JSON），与计算逻辑分离

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use super::estimator::LossStrategy;
use super::report::MetricsReport;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

pub fn render(report: &MetricsReport, format: ReportFormat) -> Result<String, serde_json::Error> {
    match format {
        ReportFormat::Text => Ok(render_text(report)),
        ReportFormat::Json => serde_json::to_string_pretty(&report.rounded()),
    }
}

pub fn render_text(report: &MetricsReport) -> String {
    let unit = report.rate_unit.label();
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(out, "Capture Duration: {:.2} seconds", report.duration_seconds);
    let _ = writeln!(
        out,
        "Throughput: {:.2} {unit} (Total bytes: {})",
        report.throughput_bps, report.total_frame_bytes
    );
    let _ = writeln!(
        out,
        "Goodput: {:.2} {unit} (Total payload: {})",
        report.goodput_bps, report.total_payload_bytes
    );
    let _ = writeln!(
        out,
        "Packets: {} total, {} toward target, {} with estimated payload",
        report.total_packets, report.relevant_packets, report.estimated_payload_packets
    );
    let basis = match report.loss_strategy {
        LossStrategy::DuplicateAnnotation => "captured packets",
        _ => "data packets",
    };
    let _ = writeln!(
        out,
        "Retransmissions (approx.): {} of {} {basis}",
        report.retransmission_count, report.loss_basis_packets
    );
    let _ = writeln!(
        out,
        "Packet Loss Rate (approx.): {:.2}%",
        report.packet_loss_rate
    );
    let _ = writeln!(out, "Maximum Packet Size: {} bytes", report.max_packet_size);
    for w in &report.warnings {
        let _ = writeln!(out, "warning: {w}");
    }
    out
}
