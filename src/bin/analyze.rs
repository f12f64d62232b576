//! 抓包 CSV 指标分析
//!
//! 读取 tshark 字段导出或 Wireshark CSV 导出，计算时长、吞吐、有效吞吐、
//! 丢包率代理和最大包长。

use capmetrics_rs::capture::CaptureSession;
use capmetrics_rs::metrics::{
    self, LossStrategy, MetricsDefaults, RateUnit, ReportFormat,
};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

/// 严格模式下缺字段或退化报告的退出码
const EXIT_STRICT_FAILURE: u8 = 2;

#[derive(Debug, Parser)]
#[command(
    name = "analyze",
    about = "Compute throughput, goodput, loss-rate proxy and max packet size from a capture CSV"
)]
struct Args {
    /// Path to the capture CSV (tshark fields export or Wireshark CSV export)
    csv_file: PathBuf,

    /// JSON file with analysis defaults; command-line flags override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Only count packets sent to this (server) address
    #[arg(long)]
    target_address: Option<String>,

    /// Only count packets sent to this (server) port
    #[arg(long)]
    target_port: Option<u16>,

    /// Assumed TCP/IP header bytes when no payload-length column exists
    #[arg(long)]
    header_bytes: Option<u64>,

    /// Rate unit: bytes or bits (per second)
    #[arg(long, value_parser = ["bytes", "bits"])]
    unit: Option<String>,

    /// Loss estimator: auto, marker or duplicate
    #[arg(long, value_parser = ["auto", "marker", "duplicate"])]
    loss_strategy: Option<String>,

    /// Output format: text or json
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    format: String,

    /// Exit non-zero when required fields are missing or the capture is degenerate
    #[arg(long)]
    strict: bool,
}

fn parse_unit(raw: Option<&str>) -> Option<RateUnit> {
    match raw {
        Some("bits") => Some(RateUnit::BitsPerSec),
        Some("bytes") => Some(RateUnit::BytesPerSec),
        _ => None,
    }
}

fn parse_loss_strategy(raw: Option<&str>) -> Option<LossStrategy> {
    match raw {
        Some("marker") => Some(LossStrategy::RetransmissionMarker),
        Some("duplicate") => Some(LossStrategy::DuplicateAnnotation),
        Some("auto") => Some(LossStrategy::Auto),
        _ => None,
    }
}

fn parse_format(raw: &str) -> ReportFormat {
    match raw {
        "json" => ReportFormat::Json,
        _ => ReportFormat::Text,
    }
}

fn load_defaults(path: Option<&PathBuf>) -> Result<MetricsDefaults, String> {
    let Some(path) = path else {
        return Ok(MetricsDefaults::default());
    };
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("cannot read config {}: {e}", path.display()))?;
    serde_json::from_str(&raw).map_err(|e| format!("cannot parse config {}: {e}", path.display()))
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

    let file_defaults = match load_defaults(args.config.as_ref()) {
        Ok(d) => d,
        Err(msg) => {
            eprintln!("error: {msg}");
            return ExitCode::FAILURE;
        }
    };
    let cfg = file_defaults
        .overridden_by(MetricsDefaults {
            target_address: args.target_address.clone(),
            target_port: args.target_port,
            header_bytes: args.header_bytes,
            rate_unit: parse_unit(args.unit.as_deref()),
            loss_strategy: parse_loss_strategy(args.loss_strategy.as_deref()),
        })
        .into_config();

    let session = match CaptureSession::from_csv_path(&args.csv_file) {
        Ok(session) => session,
        Err(err) if err.is_missing_required_field() => {
            error!(%err, "no report produced");
            eprintln!("error: {err}");
            return if args.strict {
                ExitCode::from(EXIT_STRICT_FAILURE)
            } else {
                ExitCode::SUCCESS
            };
        }
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let report = metrics::compute(&session, &cfg);
    match metrics::render(&report, parse_format(&args.format)) {
        Ok(out) => {
            print!("{out}");
            if !out.ends_with('\n') {
                println!();
            }
        }
        Err(err) => {
            eprintln!("error: cannot render report: {err}");
            return ExitCode::FAILURE;
        }
    }

    if args.strict && report.is_degenerate() {
        return ExitCode::from(EXIT_STRICT_FAILURE);
    }
    ExitCode::SUCCESS
}
