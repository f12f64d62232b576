//! 方向过滤：只保留流向“服务器”一侧的包

use crate::capture::PacketRecord;

use super::config::MetricsConfig;

/// 从注释文本里尽力提取 `src > dst` 端口对。
///
/// Wireshark 新版本用 `→`，旧版本和 tshark 文本输出用 `>`，
/// 例如 `"54321 → 5201 [PSH, ACK] Seq=1 Len=40"`。
pub fn annotation_ports(annotation: &str) -> Option<(u16, u16)> {
    let (before, after) = annotation
        .split_once('→')
        .or_else(|| annotation.split_once('>'))?;
    let src = before.split_whitespace().last()?.parse().ok()?;
    let dst_token = after.split_whitespace().next()?;
    let dst = dst_token
        .trim_end_matches(|c: char| !c.is_ascii_digit())
        .parse()
        .ok()?;
    Some((src, dst))
}

/// 目的端口：优先用端口列，缺失时退回注释解析
pub fn effective_dest_port(rec: &PacketRecord) -> Option<u16> {
    rec.dest_port
        .or_else(|| annotation_ports(&rec.annotation).map(|(_, dst)| dst))
}

#[derive(Debug, Clone, Copy)]
pub struct DirectionFilter<'a> {
    address: Option<&'a str>,
    port: Option<u16>,
}

impl<'a> DirectionFilter<'a> {
    pub fn new(address: Option<&'a str>, port: Option<u16>) -> Self {
        Self { address, port }
    }

    pub fn from_config(cfg: &'a MetricsConfig) -> Self {
        Self::new(cfg.target_address.as_deref(), cfg.target_port)
    }

    /// 未配置任何目标时所有包都算相关方向
    pub fn is_unfiltered(&self) -> bool {
        self.address.is_none() && self.port.is_none()
    }

    pub fn matches(&self, rec: &PacketRecord) -> bool {
        if let Some(addr) = self.address {
            if rec.dest_address != addr {
                return false;
            }
        }
        match self.port {
            Some(port) => effective_dest_port(rec) == Some(port),
            None => true,
        }
    }
}

/// 通过方向过滤的包及其（可能是估算出的）载荷长度
#[derive(Debug, Clone, Copy)]
pub struct RelevantPacket<'a> {
    pub record: &'a PacketRecord,
    pub payload: u64,
}
