//! 报表导出
//!
//! 把聚合结果摊平成单工作表的XLSX工作簿：固定表头
//! `Name / Layer / Count`，每个（名称，图层）对一行，
//! 行序与聚合结果一致。

use std::fs;
use std::path::Path;

use rust_xlsxwriter::{Format, Workbook};

use dxtally_core::aggregate::AggregationResult;

use crate::error::FileError;

/// XLSX 的 MIME 类型
pub const XLSX_MEDIA_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// 导出聚合结果为XLSX工作簿字节流
///
/// 空结果也会生成只有表头的工作簿。
pub fn export_workbook(result: &AggregationResult) -> Result<Vec<u8>, FileError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Summary")?;

    let header = Format::new().set_bold();
    worksheet.write_string_with_format(0, 0, "Name", &header)?;
    worksheet.write_string_with_format(0, 1, "Layer", &header)?;
    worksheet.write_string_with_format(0, 2, "Count", &header)?;

    let mut row: u32 = 1;
    for group in result.groups() {
        for layer_count in &group.layers {
            worksheet.write_string(row, 0, &group.name)?;
            worksheet.write_string(row, 1, &layer_count.layer)?;
            worksheet.write_number(row, 2, layer_count.count as f64)?;
            row += 1;
        }
    }

    let bytes = workbook.save_to_buffer()?;

    tracing::debug!("exported workbook with {} data rows", row - 1);

    Ok(bytes)
}

/// 导出聚合结果并写入文件
pub fn export_to_file(
    result: &AggregationResult,
    path: impl AsRef<Path>,
) -> Result<(), FileError> {
    let bytes = export_workbook(result)?;
    fs::write(path, bytes)?;
    Ok(())
}
