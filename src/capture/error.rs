use thiserror::Error;

/// 抓包表读取与规范化错误
#[derive(Debug, Error)]
pub enum CaptureError {
    /// 两个列名族都没有时间戳列
    #[error("missing required field: none of {expected:?} found in columns {found:?}")]
    MissingRequiredField {
        expected: Vec<&'static str>,
        found: Vec<String>,
    },

    /// 有时间戳列，但没有任何一行能解析出有限的时间戳
    #[error("missing required field: no usable `{field}` value in {rows} row(s)")]
    NoUsableRows { field: &'static str, rows: usize },

    #[error("cannot open capture file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed capture table: {0}")]
    Csv(#[from] csv::Error),
}

impl CaptureError {
    /// 是否属于“缺少必需字段”这一类（整次运行中止，但不是 I/O 故障）
    pub fn is_missing_required_field(&self) -> bool {
        matches!(
            self,
            CaptureError::MissingRequiredField { .. } | CaptureError::NoUsableRows { .. }
        )
    }
}
