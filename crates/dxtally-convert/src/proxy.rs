//! 转换代理
//!
//! 协议分两步：multipart 上传原始文件，从JSON响应里取
//! `CONVERTED_FILE` 的绝对URL，再GET该URL拿到转换结果。
//! 凭证令牌是不透明的授权凭据，代理不检查也不记录它的值。

use serde::Deserialize;

use crate::error::ConvertError;

/// 默认的远程转换上传端点
pub const DEFAULT_UPLOAD_URL: &str = "https://api-tasker.onlineconvertfree.com/api/upload";

/// 一次转换请求，完全瞬态，不持久化
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    /// 原始文件字节
    pub source_bytes: Vec<u8>,
    /// 原始文件名（上传时附在multipart字段上）
    pub source_filename: String,
    /// 目标格式，如 `"dxf"`
    pub target_format: String,
    /// 远程服务的凭证令牌
    pub credential_token: String,
}

/// 转换结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionResult {
    /// 转换后的文件字节
    pub converted_bytes: Vec<u8>,
    /// 目标格式对应的MIME类型
    pub media_type: String,
}

/// 上传端点的JSON响应
#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(rename = "CONVERTED_FILE")]
    converted_file: Option<String>,
}

/// 远程转换代理
///
/// 上传端点和HTTP客户端在构造时注入，测试可以指向本地假服务，
/// 部署方也可以通过自定义客户端加上超时。
#[derive(Debug, Clone)]
pub struct ConversionProxy {
    client: reqwest::Client,
    upload_url: String,
}

impl ConversionProxy {
    /// 创建代理，使用默认HTTP客户端
    pub fn new(upload_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), upload_url)
    }

    /// 使用指定的HTTP客户端创建代理
    pub fn with_client(client: reqwest::Client, upload_url: impl Into<String>) -> Self {
        Self {
            client,
            upload_url: upload_url.into(),
        }
    }

    /// 执行一次端到端转换
    ///
    /// 前置条件：文件字节、目标格式、令牌都非空，违反时在
    /// 任何网络调用之前返回 `InvalidRequest`。
    pub async fn convert(
        &self,
        request: ConversionRequest,
    ) -> Result<ConversionResult, ConvertError> {
        let ConversionRequest {
            source_bytes,
            source_filename,
            target_format,
            credential_token,
        } = request;

        if source_bytes.is_empty() {
            return Err(ConvertError::InvalidRequest("file"));
        }
        if target_format.is_empty() {
            return Err(ConvertError::InvalidRequest("to"));
        }
        if credential_token.is_empty() {
            return Err(ConvertError::InvalidRequest("token"));
        }

        tracing::info!(
            "uploading {} ({} bytes) for conversion to {}",
            source_filename,
            source_bytes.len(),
            target_format
        );

        let part = reqwest::multipart::Part::bytes(source_bytes).file_name(source_filename);
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("to", target_format.clone())
            .text("token", credential_token);

        let response = self
            .client
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ConvertError::ConversionFailed(format!("upload request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(ConvertError::ConversionFailed(format!(
                "upload returned status {}",
                response.status()
            )));
        }

        let body: UploadResponse = response.json().await.map_err(|e| {
            ConvertError::ConversionFailed(format!("malformed upload response: {e}"))
        })?;
        let converted_url = body.converted_file.ok_or_else(|| {
            ConvertError::ConversionFailed("upload response missing CONVERTED_FILE".to_string())
        })?;

        tracing::info!("downloading converted file from {}", converted_url);

        let download = self
            .client
            .get(&converted_url)
            .send()
            .await
            .map_err(|e| ConvertError::ConversionFailed(format!("download request failed: {e}")))?;

        if !download.status().is_success() {
            return Err(ConvertError::ConversionFailed(format!(
                "download returned status {}",
                download.status()
            )));
        }

        let converted_bytes = download
            .bytes()
            .await
            .map_err(|e| {
                ConvertError::ConversionFailed(format!("failed to read converted file: {e}"))
            })?
            .to_vec();

        tracing::info!("conversion complete, {} bytes received", converted_bytes.len());

        Ok(ConversionResult {
            converted_bytes,
            media_type: media_type_for(&target_format),
        })
    }
}

/// 目标格式对应的MIME类型
pub fn media_type_for(target_format: &str) -> String {
    format!("application/{}", target_format.to_ascii_lowercase())
}
