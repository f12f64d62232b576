//! 流量收发模块
//!
//! Nagle / delayed-ACK 实验用的限速 TCP 发送端与接收端。

mod paced;
mod sockopt;

pub use paced::{
    DEFAULT_CHUNK_BYTES, DEFAULT_PAYLOAD_BYTES, DEFAULT_RECV_BUFFER_BYTES, PacedSendOpts,
    TransferSummary, connect_and_send, default_payload, receive_all, send_paced, serve_once,
};
pub use sockopt::{AppliedTuning, SocketTuning, apply_tuning};
