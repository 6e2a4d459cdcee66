//! 转换错误定义

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    /// 必填字段缺失或为空，此时未发起任何网络请求
    #[error("invalid conversion request: empty field `{0}`")]
    InvalidRequest(&'static str),

    /// 远程上传或下载失败（网络错误、非2xx状态、响应格式异常）
    #[error("conversion failed: {0}")]
    ConversionFailed(String),
}
