//! 列名族探测
//!
//! 支持两类导出格式：
//! - **Raw**：tshark `-T fields` 导出的协议字段名（`frame.time_epoch` 等）
//! - **Export**：Wireshark “导出为 CSV” 的可读列名（`Time` 等）
//!
//! 每个族只描述一次列名映射，规范化逻辑据此统一取值。

use serde::{Deserialize, Serialize};

use super::error::CaptureError;
use super::table::RawTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaFamily {
    Raw,
    Export,
}

/// 某个列名族中各规范字段对应的列名（`None` 表示该族没有这一列）
#[derive(Debug, Clone, Copy)]
pub struct FamilyColumns {
    pub timestamp: &'static str,
    pub frame_length: &'static str,
    pub payload_length: Option<&'static str>,
    pub source_address: &'static str,
    pub dest_address: &'static str,
    pub source_port: &'static str,
    pub dest_port: &'static str,
    pub protocol: &'static str,
    pub annotation: &'static str,
}

const RAW_COLUMNS: FamilyColumns = FamilyColumns {
    timestamp: "frame.time_epoch",
    frame_length: "frame.len",
    payload_length: Some("tcp.len"),
    source_address: "ip.src",
    dest_address: "ip.dst",
    source_port: "tcp.srcport",
    dest_port: "tcp.dstport",
    protocol: "_ws.col.protocol",
    annotation: "_ws.col.info",
};

const EXPORT_COLUMNS: FamilyColumns = FamilyColumns {
    timestamp: "Time",
    frame_length: "Length",
    payload_length: None,
    source_address: "Source",
    dest_address: "Destination",
    source_port: "Source Port",
    dest_port: "Destination Port",
    protocol: "Protocol",
    annotation: "Info",
};

impl SchemaFamily {
    /// 探测顺序：Raw 优先（字段更全，带显式载荷长度）
    pub const PROBE_ORDER: [SchemaFamily; 2] = [SchemaFamily::Raw, SchemaFamily::Export];

    pub fn columns(self) -> &'static FamilyColumns {
        match self {
            SchemaFamily::Raw => &RAW_COLUMNS,
            SchemaFamily::Export => &EXPORT_COLUMNS,
        }
    }

    /// 根据时间戳列是否存在选择列名族。
    pub fn detect(table: &RawTable) -> Result<SchemaFamily, CaptureError> {
        Self::PROBE_ORDER
            .into_iter()
            .find(|family| table.has_column(family.columns().timestamp))
            .ok_or_else(|| CaptureError::MissingRequiredField {
                expected: Self::PROBE_ORDER
                    .iter()
                    .map(|f| f.columns().timestamp)
                    .collect(),
                found: table.headers().to_vec(),
            })
    }
}

/// 某张表里各规范字段解析出的列下标
#[derive(Debug, Clone, Copy)]
pub struct ColumnIndex {
    pub timestamp: usize,
    pub frame_length: Option<usize>,
    pub payload_length: Option<usize>,
    pub source_address: Option<usize>,
    pub dest_address: Option<usize>,
    pub source_port: Option<usize>,
    pub dest_port: Option<usize>,
    pub protocol: Option<usize>,
    pub annotation: Option<usize>,
}

impl ColumnIndex {
    /// 解析列下标；时间戳列必须存在（由 `detect` 保证），其余列缺失即为未知。
    pub fn resolve(table: &RawTable, family: SchemaFamily) -> Option<ColumnIndex> {
        let cols = family.columns();
        Some(ColumnIndex {
            timestamp: table.column(cols.timestamp)?,
            frame_length: table.column(cols.frame_length),
            payload_length: cols.payload_length.and_then(|name| table.column(name)),
            source_address: table.column(cols.source_address),
            dest_address: table.column(cols.dest_address),
            source_port: table.column(cols.source_port),
            dest_port: table.column(cols.dest_port),
            protocol: table.column(cols.protocol),
            annotation: table.column(cols.annotation),
        })
    }
}
