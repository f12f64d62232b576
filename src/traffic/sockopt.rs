//! Nagle / delayed-ACK 套接字选项

use std::io;
use std::net::TcpStream;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// `true` 表示保持内核默认行为（启用）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocketTuning {
    pub nagle: bool,
    pub delayed_ack: bool,
}

impl Default for SocketTuning {
    fn default() -> Self {
        Self {
            nagle: true,
            delayed_ack: true,
        }
    }
}

/// 实际生效的设置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AppliedTuning {
    pub nodelay: bool,
    /// 请求了关闭 delayed ACK 且平台支持 `TCP_QUICKACK`
    pub quickack: bool,
}

#[cfg(target_os = "linux")]
fn set_quickack(stream: &TcpStream) -> io::Result<()> {
    use std::os::fd::AsRawFd;

    let on: libc::c_int = 1;
    // SAFETY: fd 在 `stream` 生命周期内有效，optval 指向一个 c_int。
    let rc = unsafe {
        libc::setsockopt(
            stream.as_raw_fd(),
            libc::IPPROTO_TCP,
            libc::TCP_QUICKACK,
            &on as *const _ as *const libc::c_void,
            std::mem::size_of::<libc::c_int>() as libc::socklen_t,
        )
    };
    if rc == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}

#[cfg(not(target_os = "linux"))]
fn set_quickack(_stream: &TcpStream) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "TCP_QUICKACK is only available on Linux",
    ))
}

/// 应用设置。关闭 Nagle 失败会返回错误；`TCP_QUICKACK` 不可用时只记录警告。
pub fn apply_tuning(stream: &TcpStream, tuning: SocketTuning) -> io::Result<AppliedTuning> {
    let nodelay = !tuning.nagle;
    if nodelay {
        stream.set_nodelay(true)?;
        info!("Nagle's algorithm disabled (TCP_NODELAY)");
    }

    let mut quickack = false;
    if !tuning.delayed_ack {
        match set_quickack(stream) {
            Ok(()) => {
                quickack = true;
                info!("delayed ACK disabled (TCP_QUICKACK)");
            }
            Err(err) => warn!(%err, "TCP_QUICKACK not applied, delayed ACK unchanged"),
        }
    }
    Ok(AppliedTuning { nodelay, quickack })
}
