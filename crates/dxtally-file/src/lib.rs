//! DXTALLY 文件处理
//!
//! 支持：
//! - `.dxf` 解析（基于 `dxf` crate），产出实体记录序列
//! - 统计结果导出为 XLSX 报表

pub mod dxf_io;
pub mod error;
pub mod report;

pub use error::FileError;
