//! DXTALLY 远程转换代理
//!
//! 把二进制图纸（DWG）交给远程转换服务，取回DXF字节流。
//! 两次网络调用（上传、下载）串行执行，任一失败整体失败，
//! 不重试、不缓存、不落盘。

pub mod error;
pub mod proxy;

pub use error::ConvertError;
pub use proxy::{
    media_type_for, ConversionProxy, ConversionRequest, ConversionResult, DEFAULT_UPLOAD_URL,
};
