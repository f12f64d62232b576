//! 抓包表 -> 规范化会话

use tracing::{debug, info, warn};

use super::error::CaptureError;
use super::record::{CaptureSession, PacketRecord};
use super::schema::{ColumnIndex, SchemaFamily};
use super::table::RawTable;

/// 宽松解析时间戳：无法解析或非有限值返回 `None`（该行被丢弃）
pub fn parse_timestamp(raw: &str) -> Option<f64> {
    let v: f64 = raw.trim().parse().ok()?;
    v.is_finite().then_some(v)
}

/// 宽松解析非负字节数；接受 `"1514"` 与 `"1514.0"` 两种写法
pub fn parse_byte_count(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    if let Ok(v) = raw.parse::<u64>() {
        return Some(v);
    }
    let v: f64 = raw.parse().ok()?;
    (v.is_finite() && v >= 0.0).then(|| v as u64)
}

/// 宽松解析端口；tshark 对隧道包会导出 `"5201,5201"`，取第一个
pub fn parse_port(raw: &str) -> Option<u16> {
    let first = raw.split(',').next()?.trim();
    if let Ok(v) = first.parse::<u16>() {
        return Some(v);
    }
    let v: f64 = first.parse().ok()?;
    (v.is_finite() && v >= 0.0 && v <= f64::from(u16::MAX) && v.fract() == 0.0).then(|| v as u16)
}

fn text(table: &RawTable, row: usize, col: Option<usize>) -> String {
    table
        .cell(row, col)
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

/// 按列下标把一行映射成规范记录；时间戳不可用时返回 `None`
fn map_row(table: &RawTable, row: usize, idx: &ColumnIndex) -> Option<PacketRecord> {
    let timestamp = table.cell(row, Some(idx.timestamp)).and_then(parse_timestamp)?;
    let frame_length = table
        .cell(row, idx.frame_length)
        .and_then(parse_byte_count)
        .unwrap_or(0);

    Some(PacketRecord {
        timestamp,
        frame_length,
        transport_payload_length: table.cell(row, idx.payload_length).and_then(parse_byte_count),
        source_address: text(table, row, idx.source_address),
        dest_address: text(table, row, idx.dest_address),
        source_port: table.cell(row, idx.source_port).and_then(parse_port),
        dest_port: table.cell(row, idx.dest_port).and_then(parse_port),
        protocol_label: text(table, row, idx.protocol),
        annotation: text(table, row, idx.annotation),
    })
}

/// 把任一受支持列名族的表规范化为按时间排序的会话。
///
/// 单元格级别的解析失败就地吸收；只有缺少时间戳列或没有任何可用行时才报错。
#[tracing::instrument(skip(table), fields(rows = table.row_count()))]
pub fn normalize(table: &RawTable) -> Result<CaptureSession, CaptureError> {
    let family = SchemaFamily::detect(table)?;
    let idx = ColumnIndex::resolve(table, family).ok_or_else(|| {
        CaptureError::MissingRequiredField {
            expected: vec![family.columns().timestamp],
            found: table.headers().to_vec(),
        }
    })?;
    debug!(?family, ?idx, "resolved capture columns");

    if idx.frame_length.is_none() {
        warn!(
            column = family.columns().frame_length,
            "frame length column absent, byte totals will be zero"
        );
    }

    let mut records = Vec::with_capacity(table.row_count());
    let mut dropped = 0usize;
    for row in 0..table.row_count() {
        match map_row(table, row, &idx) {
            Some(rec) => records.push(rec),
            None => {
                dropped += 1;
                debug!(row, "dropping row without usable timestamp");
            }
        }
    }

    if records.is_empty() {
        return Err(CaptureError::NoUsableRows {
            field: family.columns().timestamp,
            rows: table.row_count(),
        });
    }

    let session = CaptureSession::new(records, family).with_dropped_rows(dropped);
    info!(
        ?family,
        packets = session.len(),
        dropped = session.dropped_rows(),
        "normalized capture"
    );
    Ok(session)
}

impl CaptureSession {
    /// 读取 CSV 文件并规范化
    pub fn from_csv_path(path: impl AsRef<std::path::Path>) -> Result<Self, CaptureError> {
        let table = RawTable::from_csv_path(path)?;
        normalize(&table)
    }
}
