//! Nagle / delayed-ACK 实验客户端：按 40 字节/秒发送一个 4 KiB 文件

use capmetrics_rs::traffic::{
    DEFAULT_CHUNK_BYTES, PacedSendOpts, SocketTuning, connect_and_send, default_payload,
};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "paced-client", about = "TCP client for the Nagle & delayed-ACK experiment")]
struct Args {
    #[arg(long, default_value = "127.0.0.1")]
    server: String,
    #[arg(long, default_value_t = 5001)]
    port: u16,
    /// Nagle's algorithm: enabled or disabled
    #[arg(long, default_value = "enabled", value_parser = ["enabled", "disabled"])]
    nagle: String,
    /// Delayed ACK: enabled or disabled
    #[arg(long, default_value = "enabled", value_parser = ["enabled", "disabled"])]
    delayed_ack: String,
    /// File to send; a 4 KiB file of 'A' is generated if it does not exist
    #[arg(long, default_value = "data_4KB.bin")]
    file: PathBuf,
    #[arg(long, default_value_t = DEFAULT_CHUNK_BYTES)]
    chunk_bytes: usize,
    /// Pause after each chunk (milliseconds)
    #[arg(long, default_value_t = 1000)]
    interval_ms: u64,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .init();

    let args = Args::parse();

    if !args.file.exists() {
        info!(file = %args.file.display(), "file not found, generating 4 KiB payload");
        if let Err(err) = fs::write(&args.file, default_payload()) {
            eprintln!("error: cannot create {}: {err}", args.file.display());
            return ExitCode::FAILURE;
        }
    }
    let payload = match fs::read(&args.file) {
        Ok(data) => data,
        Err(err) => {
            eprintln!("error: cannot read {}: {err}", args.file.display());
            return ExitCode::FAILURE;
        }
    };

    let opts = PacedSendOpts {
        chunk_bytes: args.chunk_bytes,
        interval: Duration::from_millis(args.interval_ms),
        tuning: SocketTuning {
            nagle: args.nagle == "enabled",
            delayed_ack: args.delayed_ack == "enabled",
        },
    };

    match connect_and_send((args.server.as_str(), args.port), &payload, &opts) {
        Ok(summary) => {
            println!("--- Transfer Summary ---");
            println!("{summary}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: transfer to {}:{} failed: {err}", args.server, args.port);
            ExitCode::FAILURE
        }
    }
}
