//! 文件格式识别
//!
//! 只看文件名扩展名，不检查内容。二进制/交换格式/不支持的
//! 判定集中在这里，调用方不再各自做字符串判断。

use serde::Serialize;

/// 图纸文件格式分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawingFormat {
    /// 文本交换格式（.dxf），可直接解析
    Interchange,
    /// 二进制格式（.dwg），需要先转换
    Binary,
    /// 既不能解析也不能转换
    Unsupported,
}

impl DrawingFormat {
    /// 按扩展名分类，大小写不敏感
    ///
    /// 全函数：任何输入都返回一个分类，没有失败路径。
    pub fn from_filename(filename: &str) -> Self {
        let Some((_, extension)) = filename.rsplit_once('.') else {
            return Self::Unsupported;
        };
        match extension.to_ascii_lowercase().as_str() {
            "dxf" => Self::Interchange,
            "dwg" => Self::Binary,
            _ => Self::Unsupported,
        }
    }
}
