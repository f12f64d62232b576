//! 原始抓包表
//!
//! 整个 CSV 在分析前一次性读入内存；列名去掉首尾空白后再参与匹配。

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use super::error::CaptureError;

/// 带表头的字符串表格
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RawTable {
    /// 由表头和行直接构造（列名会被 trim）
    pub fn new<H, S>(headers: impl IntoIterator<Item = H>, rows: Vec<Vec<S>>) -> Self
    where
        H: AsRef<str>,
        S: Into<String>,
    {
        Self {
            headers: headers
                .into_iter()
                .map(|h| h.as_ref().trim().to_string())
                .collect(),
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        }
    }

    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self, CaptureError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| CaptureError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_reader(file)
    }

    /// 从任意 reader 读取 CSV；行长度允许与表头不一致（缺的列按空值处理）。
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CaptureError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
        let mut rows = Vec::new();
        for rec in rdr.records() {
            let rec = rec?;
            rows.push(rec.iter().map(str::to_string).collect::<Vec<_>>());
        }
        debug!(columns = headers.len(), rows = rows.len(), "read capture table");
        Ok(Self::new(headers, rows))
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// 按精确列名（区分大小写）查找列下标
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// 取单元格；列不存在或该行较短时返回 `None`
    pub fn cell(&self, row: usize, col: Option<usize>) -> Option<&str> {
        let col = col?;
        self.rows.get(row)?.get(col).map(String::as_str)
    }
}
