//! 抓包规范化模块
//!
//! 把不同抓包工具导出的表格统一为按时间排序的 `PacketRecord` 序列。

mod error;
mod normalize;
mod record;
mod schema;
mod table;

pub use error::CaptureError;
pub use normalize::{normalize, parse_byte_count, parse_port, parse_timestamp};
pub use record::{CaptureSession, PacketRecord};
pub use schema::{ColumnIndex, FamilyColumns, SchemaFamily};
pub use table::RawTable;
