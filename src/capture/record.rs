//! 规范化后的包记录与抓包会话
//!
//! 不同导出工具的列名各不相同，进入指标引擎之前统一映射到这里的形状。

use serde::Serialize;

use super::schema::SchemaFamily;

/// 一条观测到的帧/报文段
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PacketRecord {
    /// 抓包相对时间（秒）
    pub timestamp: f64,
    /// 线上总字节数；缺失时记为 0
    pub frame_length: u64,
    /// 传输层载荷长度；`None` 表示导出里没有这一列或无法解析
    pub transport_payload_length: Option<u64>,
    pub source_address: String,
    pub dest_address: String,
    pub source_port: Option<u16>,
    pub dest_port: Option<u16>,
    pub protocol_label: String,
    /// Wireshark "Info" 列之类的注释文本
    pub annotation: String,
}

impl PacketRecord {
    /// 只有时间戳和帧长的最小记录，其余字段为空/未知。
    pub fn new(timestamp: f64, frame_length: u64) -> Self {
        Self {
            timestamp,
            frame_length,
            transport_payload_length: None,
            source_address: String::new(),
            dest_address: String::new(),
            source_port: None,
            dest_port: None,
            protocol_label: String::new(),
            annotation: String::new(),
        }
    }

    pub fn is_protocol(&self, label: &str) -> bool {
        self.protocol_label.eq_ignore_ascii_case(label)
    }
}

/// 一次实验运行的完整抓包序列（按时间戳升序，构造后不可变）
#[derive(Debug, Clone)]
pub struct CaptureSession {
    records: Vec<PacketRecord>,
    family: SchemaFamily,
    dropped_rows: usize,
}

impl CaptureSession {
    /// 从任意顺序的记录构造会话。
    ///
    /// 非有限时间戳的记录会被剔除；剩余记录按时间戳稳定排序，
    /// 相同时间戳保持输入顺序。
    pub fn new(records: Vec<PacketRecord>, family: SchemaFamily) -> Self {
        let before = records.len();
        let mut records: Vec<PacketRecord> = records
            .into_iter()
            .filter(|r| r.timestamp.is_finite())
            .collect();
        let dropped_rows = before - records.len();
        records.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));
        Self {
            records,
            family,
            dropped_rows,
        }
    }

    pub(crate) fn with_dropped_rows(mut self, extra: usize) -> Self {
        self.dropped_rows = self.dropped_rows.saturating_add(extra);
        self
    }

    pub fn records(&self) -> &[PacketRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 映射时使用的列名族
    pub fn family(&self) -> SchemaFamily {
        self.family
    }

    /// 因时间戳不可用而被丢弃的行数
    pub fn dropped_rows(&self) -> usize {
        self.dropped_rows
    }

    pub fn first_timestamp(&self) -> Option<f64> {
        self.records.first().map(|r| r.timestamp)
    }

    pub fn last_timestamp(&self) -> Option<f64> {
        self.records.last().map(|r| r.timestamp)
    }

    /// 不同时间戳的个数（已排序，所以只需比较相邻项）
    pub fn distinct_timestamps(&self) -> usize {
        let mut count = 0;
        let mut prev: Option<f64> = None;
        for r in &self.records {
            if prev != Some(r.timestamp) {
                count += 1;
                prev = Some(r.timestamp);
            }
        }
        count
    }

    /// 会话中是否存在任何非空注释
    pub fn has_annotations(&self) -> bool {
        self.records.iter().any(|r| !r.annotation.trim().is_empty())
    }
}
