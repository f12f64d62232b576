use crate::capture::{CaptureSession, PacketRecord, SchemaFamily};
use crate::metrics::{
    LossStrategy, MetricsConfig, MetricsDefaults, RateUnit, ReportFormat, compute, render,
};
use serde_json::Value;

fn session() -> CaptureSession {
    let rec = |ts: f64, note: &str| PacketRecord {
        dest_port: Some(5201),
        transport_payload_length: Some(50),
        annotation: note.to_string(),
        ..PacketRecord::new(ts, 100)
    };
    CaptureSession::new(
        vec![rec(0.0, "a"), rec(1.0, "[TCP Retransmission] b"), rec(3.0, "c")],
        SchemaFamily::Raw,
    )
}

#[test]
fn text_report_uses_two_decimals_and_integer_bytes() {
    let report = compute(&session(), &MetricsConfig::default());
    let out = render(&report, ReportFormat::Text).expect("render text");

    assert!(out.contains("Capture Duration: 3.00 seconds"), "{out}");
    assert!(out.contains("Throughput: 100.00 bytes/sec (Total bytes: 300)"), "{out}");
    assert!(out.contains("Goodput: 50.00 bytes/sec (Total payload: 150)"), "{out}");
    assert!(out.contains("Packet Loss Rate (approx.): 33.33%"), "{out}");
    assert!(out.contains("Maximum Packet Size: 100 bytes"), "{out}");
    assert!(out.contains("Retransmissions (approx.): 1 of 3 data packets"), "{out}");
    assert!(!out.contains("warning:"), "{out}");
}

#[test]
fn duplicate_strategy_text_names_session_denominator() {
    let rec = |ts: f64, note: &str| PacketRecord {
        annotation: note.to_string(),
        ..PacketRecord::new(ts, 100)
    };
    let session = CaptureSession::new(
        vec![rec(0.0, "x"), rec(1.0, "x"), rec(2.0, ""), rec(3.0, "y")],
        SchemaFamily::Export,
    );
    let cfg = MetricsConfig {
        target_port: Some(5201),
        loss_strategy: LossStrategy::DuplicateAnnotation,
        ..MetricsConfig::default()
    };
    let report = compute(&session, &cfg);
    // The port filter leaves no data packets, but the estimate covers the whole session.
    assert_eq!(report.data_packet_count, 0);
    assert_eq!(report.loss_basis_packets, 4);

    let out = render(&report, ReportFormat::Text).expect("render text");
    assert!(out.contains("Retransmissions (approx.): 1 of 4 captured packets"), "{out}");
    assert!(out.contains("Packet Loss Rate (approx.): 25.00%"), "{out}");
}

#[test]
fn json_report_is_rounded_and_tagged() {
    let cfg = MetricsConfig {
        rate_unit: RateUnit::BitsPerSec,
        ..MetricsConfig::default()
    };
    let report = compute(&session(), &cfg);
    let out = render(&report, ReportFormat::Json).expect("render json");
    let v: Value = serde_json::from_str(&out).expect("parse json");

    assert_eq!(v["rate_unit"], "bits_per_sec");
    assert_eq!(v["throughput_bps"].as_f64(), Some(800.0));
    assert_eq!(v["packet_loss_rate"].as_f64(), Some(33.33));
    assert_eq!(v["total_frame_bytes"].as_u64(), Some(300));
    assert_eq!(v["loss_strategy"], "retransmission_marker");
    assert_eq!(v["loss_confidence"], "primary");
    assert!(v["warnings"].as_array().expect("warnings").is_empty());
}

#[test]
fn degenerate_warning_is_rendered() {
    let single = CaptureSession::new(vec![PacketRecord::new(1.0, 60)], SchemaFamily::Export);
    let report = compute(&single, &MetricsConfig::default());

    let text = render(&report, ReportFormat::Text).expect("render text");
    assert!(text.contains("warning: degenerate capture"), "{text}");

    let json: Value =
        serde_json::from_str(&render(&report, ReportFormat::Json).expect("json")).expect("parse");
    let kinds: Vec<&str> = json["warnings"]
        .as_array()
        .expect("warnings")
        .iter()
        .filter_map(|w| w["kind"].as_str())
        .collect();
    assert!(kinds.contains(&"degenerate_capture"));
    assert!(kinds.contains(&"low_confidence_estimate"));
}

#[test]
fn metrics_defaults_parse_and_override() {
    let raw = r#"
    {
        "target_port": 5201,
        "header_bytes": 52,
        "rate_unit": "bits_per_sec",
        "loss_strategy": "duplicate_annotation"
    }
    "#;
    let file: MetricsDefaults = serde_json::from_str(raw).expect("parse defaults");
    let cfg = file
        .overridden_by(MetricsDefaults {
            target_port: Some(5202),
            ..MetricsDefaults::default()
        })
        .into_config();

    assert_eq!(cfg.target_port, Some(5202));
    assert_eq!(cfg.target_address, None);
    assert_eq!(cfg.header_bytes, 52);
    assert_eq!(cfg.rate_unit, RateUnit::BitsPerSec);
    assert_eq!(cfg.loss_strategy, LossStrategy::DuplicateAnnotation);

    let empty: MetricsDefaults = serde_json::from_str("{}").expect("parse empty");
    assert_eq!(empty.into_config(), MetricsConfig::default());
}
