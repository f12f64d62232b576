use serde::{Deserialize, Serialize};

use super::estimator::LossStrategy;

/// 载荷长度未知时假定的 TCP/IP 头部字节数
pub const DEFAULT_HEADER_BYTES: u64 = 40;

/// 速率输出单位（每份报告只用一种）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateUnit {
    #[default]
    BytesPerSec,
    BitsPerSec,
}

impl RateUnit {
    pub fn per_byte(self) -> f64 {
        match self {
            RateUnit::BytesPerSec => 1.0,
            RateUnit::BitsPerSec => 8.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RateUnit::BytesPerSec => "bytes/sec",
            RateUnit::BitsPerSec => "bits/sec",
        }
    }
}

/// 指标引擎的全部输入参数
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// 只统计发往该地址的包（服务器地址）
    pub target_address: Option<String>,
    /// 只统计发往该端口的包（服务器端口）
    pub target_port: Option<u16>,
    pub header_bytes: u64,
    pub rate_unit: RateUnit,
    pub loss_strategy: LossStrategy,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            target_address: None,
            target_port: None,
            header_bytes: DEFAULT_HEADER_BYTES,
            rate_unit: RateUnit::default(),
            loss_strategy: LossStrategy::default(),
        }
    }
}

/// JSON 配置文件里的可选项；命令行参数会覆盖这里的值
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricsDefaults {
    #[serde(default)]
    pub target_address: Option<String>,
    #[serde(default)]
    pub target_port: Option<u16>,
    #[serde(default)]
    pub header_bytes: Option<u64>,
    #[serde(default)]
    pub rate_unit: Option<RateUnit>,
    #[serde(default)]
    pub loss_strategy: Option<LossStrategy>,
}

impl MetricsDefaults {
    /// 以 `over` 中已设置的字段覆盖 `self`
    pub fn overridden_by(self, over: MetricsDefaults) -> MetricsDefaults {
        MetricsDefaults {
            target_address: over.target_address.or(self.target_address),
            target_port: over.target_port.or(self.target_port),
            header_bytes: over.header_bytes.or(self.header_bytes),
            rate_unit: over.rate_unit.or(self.rate_unit),
            loss_strategy: over.loss_strategy.or(self.loss_strategy),
        }
    }

    pub fn into_config(self) -> MetricsConfig {
        let base = MetricsConfig::default();
        MetricsConfig {
            target_address: self.target_address,
            target_port: self.target_port,
            header_bytes: self.header_bytes.unwrap_or(base.header_bytes),
            rate_unit: self.rate_unit.unwrap_or(base.rate_unit),
            loss_strategy: self.loss_strategy.unwrap_or(base.loss_strategy),
        }
    }
}
