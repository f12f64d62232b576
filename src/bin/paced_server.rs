//! Nagle / delayed-ACK 实验服务端：接受一个连接并读到 EOF

use capmetrics_rs::traffic::{DEFAULT_RECV_BUFFER_BYTES, SocketTuning, serve_once};
use clap::Parser;
use std::net::TcpListener;
use std::process::ExitCode;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "paced-server", about = "TCP server for the Nagle & delayed-ACK experiment")]
struct Args {
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    #[arg(long, default_value_t = 5001)]
    port: u16,
    /// Nagle's algorithm: enabled or disabled
    #[arg(long, default_value = "enabled", value_parser = ["enabled", "disabled"])]
    nagle: String,
    /// Delayed ACK: enabled or disabled
    #[arg(long, default_value = "enabled", value_parser = ["enabled", "disabled"])]
    delayed_ack: String,
    #[arg(long, default_value_t = DEFAULT_RECV_BUFFER_BYTES)]
    buffer_bytes: usize,
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
    let listener = match TcpListener::bind((args.host.as_str(), args.port)) {
        Ok(l) => l,
        Err(err) => {
            eprintln!("error: cannot bind {}:{}: {err}", args.host, args.port);
            return ExitCode::FAILURE;
        }
    };
    info!(host = %args.host, port = args.port, "listening");

    let tuning = SocketTuning {
        nagle: args.nagle == "enabled",
        delayed_ack: args.delayed_ack == "enabled",
    };
    match serve_once(&listener, tuning, args.buffer_bytes) {
        Ok((peer, summary)) => {
            println!("--- Transfer Summary ({peer}) ---");
            println!("{summary}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: receive failed: {err}");
            ExitCode::FAILURE
        }
    }
}
