//! 限速发送端与接收端
//!
//! 发送端按固定块大小和间隔写出负载（默认 40 字节/秒），
//! 用来观察 Nagle 与 delayed ACK 的相互作用。

use std::fmt;
use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream, ToSocketAddrs};
use std::thread;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, info};

use super::sockopt::{SocketTuning, apply_tuning};

pub const DEFAULT_PAYLOAD_BYTES: usize = 4096;
pub const DEFAULT_CHUNK_BYTES: usize = 40;
pub const DEFAULT_RECV_BUFFER_BYTES: usize = 1024;

/// 默认负载：4 KiB 的 `A`
pub fn default_payload() -> Vec<u8> {
    vec![b'A'; DEFAULT_PAYLOAD_BYTES]
}

/// 一次传输的结果
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TransferSummary {
    pub bytes: u64,
    pub duration_seconds: f64,
}

impl TransferSummary {
    fn new(bytes: u64, elapsed: Duration) -> Self {
        Self {
            bytes,
            duration_seconds: elapsed.as_secs_f64(),
        }
    }

    /// 字节/秒；时长为 0 时记为 0
    pub fn throughput(&self) -> f64 {
        if self.duration_seconds > 0.0 {
            self.bytes as f64 / self.duration_seconds
        } else {
            0.0
        }
    }
}

impl fmt::Display for TransferSummary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Total bytes: {}", self.bytes)?;
        writeln!(f, "Duration: {:.2} seconds", self.duration_seconds)?;
        writeln!(f, "Throughput: {:.2} bytes/second", self.throughput())?;
        // Only application data crosses the socket, so goodput equals throughput here.
        write!(f, "Goodput: {:.2} bytes/second", self.throughput())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PacedSendOpts {
    pub chunk_bytes: usize,
    pub interval: Duration,
    pub tuning: SocketTuning,
}

impl Default for PacedSendOpts {
    fn default() -> Self {
        Self {
            chunk_bytes: DEFAULT_CHUNK_BYTES,
            interval: Duration::from_secs(1),
            tuning: SocketTuning::default(),
        }
    }
}

/// 在已连接的流上分块发送 `payload`，每块之后暂停 `interval`
pub fn send_paced(
    stream: &mut TcpStream,
    payload: &[u8],
    opts: &PacedSendOpts,
) -> io::Result<TransferSummary> {
    let chunk_bytes = opts.chunk_bytes.max(1);
    let start = Instant::now();
    let mut total = 0u64;
    for chunk in payload.chunks(chunk_bytes) {
        stream.write_all(chunk)?;
        total += chunk.len() as u64;
        debug!(sent = chunk.len(), total, "sent chunk");
        if !opts.interval.is_zero() {
            thread::sleep(opts.interval);
        }
    }
    stream.flush()?;
    Ok(TransferSummary::new(total, start.elapsed()))
}

/// 连接服务器、应用套接字设置并发送；结束后关闭写方向
#[tracing::instrument(skip(payload, opts), fields(bytes = payload.len()))]
pub fn connect_and_send(
    addr: impl ToSocketAddrs + fmt::Debug,
    payload: &[u8],
    opts: &PacedSendOpts,
) -> io::Result<TransferSummary> {
    let mut stream = TcpStream::connect(addr)?;
    info!(peer = ?stream.peer_addr().ok(), "connected");
    apply_tuning(&stream, opts.tuning)?;
    let summary = send_paced(&mut stream, payload, opts)?;
    stream.shutdown(std::net::Shutdown::Write)?;
    Ok(summary)
}

/// 读到 EOF 为止
pub fn receive_all(stream: &mut TcpStream, buffer_bytes: usize) -> io::Result<TransferSummary> {
    let mut buf = vec![0u8; buffer_bytes.max(1)];
    let start = Instant::now();
    let mut total = 0u64;
    loop {
        let n = match stream.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        };
        total += n as u64;
        debug!(received = n, total, "received chunk");
    }
    Ok(TransferSummary::new(total, start.elapsed()))
}

/// 接受一个连接、应用设置并接收全部数据
#[tracing::instrument(skip(listener))]
pub fn serve_once(
    listener: &TcpListener,
    tuning: SocketTuning,
    buffer_bytes: usize,
) -> io::Result<(SocketAddr, TransferSummary)> {
    let (mut stream, peer) = listener.accept()?;
    info!(%peer, "accepted connection");
    apply_tuning(&stream, tuning)?;
    let summary = receive_all(&mut stream, buffer_bytes)?;
    Ok((peer, summary))
}
