//! HTTP请求处理
//!
//! 失败恢复策略：转换失败在这里转成结构化错误响应（原因只
//! 记日志，不进响应体）；解析失败降级成空结果加诊断提示；
//! 聚合与导出本身是纯函数，不会失败。

use axum::extract::{Multipart, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use tracing::{error, info, warn};

use dxtally_convert::{ConversionRequest, ConvertError};
use dxtally_core::aggregate::{aggregate, AggregationResult};
use dxtally_core::entity::DrawingEntity;
use dxtally_core::format::DrawingFormat;
use dxtally_file::dxf_io;
use dxtally_file::report;

use crate::AppState;

/// JSON错误响应体
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
}

type ErrorResponse = (StatusCode, Json<ErrorBody>);

fn bad_request(message: impl Into<String>) -> ErrorResponse {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorBody {
            message: message.into(),
        }),
    )
}

fn internal_error(message: impl Into<String>) -> ErrorResponse {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody {
            message: message.into(),
        }),
    )
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// 健康检查
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// multipart表单收集结果
#[derive(Default)]
struct UploadFields {
    file: Option<(String, Vec<u8>)>,
    to: Option<String>,
    token: Option<String>,
}

async fn collect_fields(mut multipart: Multipart) -> Result<UploadFields, ErrorResponse> {
    let mut fields = UploadFields::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request(format!("invalid multipart body: {e}")))?
    {
        match field.name() {
            Some("file") => {
                let filename = field.file_name().unwrap_or("upload").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| bad_request(format!("failed to read file field: {e}")))?;
                fields.file = Some((filename, bytes.to_vec()));
            }
            Some("to") => {
                fields.to = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| bad_request(format!("failed to read `to` field: {e}")))?,
                );
            }
            Some("token") => {
                fields.token = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| bad_request(format!("failed to read `token` field: {e}")))?,
                );
            }
            // 忽略未知字段
            _ => {}
        }
    }
    Ok(fields)
}

const MISSING_FIELDS: &str = "missing required fields (file, to, token)";

/// 转换端点：透传到远程转换服务，返回转换后的文件
///
/// 成功时直接流回二进制，带 `Content-Disposition` 建议文件名
/// `converted.<format>`。失败原因记入日志，响应体只给概括信息。
pub async fn convert(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ErrorResponse> {
    let fields = collect_fields(multipart).await?;

    let (filename, bytes) = fields.file.ok_or_else(|| bad_request(MISSING_FIELDS))?;
    let to = fields.to.ok_or_else(|| bad_request(MISSING_FIELDS))?;
    let token = fields.token.ok_or_else(|| bad_request(MISSING_FIELDS))?;

    info!("convert request: {} -> {}", filename, to);

    let result = state
        .proxy
        .convert(ConversionRequest {
            source_bytes: bytes,
            source_filename: filename,
            target_format: to.clone(),
            credential_token: token,
        })
        .await
        .map_err(|e| match e {
            ConvertError::InvalidRequest(_) => bad_request(e.to_string()),
            ConvertError::ConversionFailed(cause) => {
                error!("conversion failed: {cause}");
                internal_error("error during file conversion")
            }
        })?;

    let headers = [
        (header::CONTENT_TYPE, result.media_type.clone()),
        (
            header::CONTENT_DISPOSITION,
            format!(
                "attachment; filename=\"converted.{}\"",
                to.to_ascii_lowercase()
            ),
        ),
    ];

    Ok((headers, result.converted_bytes))
}

/// 统计响应
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub groups: AggregationResult,
    /// 解析失败等非致命问题的诊断提示
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

/// 统计端点：上传图纸，返回按名称、图层分组的计数
pub async fn summary(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<SummaryResponse>, ErrorResponse> {
    let fields = collect_fields(multipart).await?;
    let (filename, bytes) = fields
        .file
        .ok_or_else(|| bad_request("missing required field `file`"))?;

    let (entities, notice) = load_entities(&state, &filename, bytes).await?;
    let groups = aggregate(&entities);

    info!(
        "summary for {}: {} groups from {} entities",
        filename,
        groups.len(),
        entities.len()
    );

    Ok(Json(SummaryResponse { groups, notice }))
}

/// 解析降级提示所在的响应头（报表响应体是二进制，提示走头部）
pub const NOTICE_HEADER: &str = "x-dxtally-notice";

/// 报表端点：与统计端点同一条流水线，但以XLSX工作簿回复
pub async fn report(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ErrorResponse> {
    let fields = collect_fields(multipart).await?;
    let (filename, bytes) = fields
        .file
        .ok_or_else(|| bad_request("missing required field `file`"))?;

    let (entities, notice) = load_entities(&state, &filename, bytes).await?;
    let groups = aggregate(&entities);

    let workbook = report::export_workbook(&groups).map_err(|e| {
        error!("workbook export failed: {e}");
        internal_error("error while building report")
    })?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(report::XLSX_MEDIA_TYPE),
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_static("attachment; filename=\"report.xlsx\""),
    );
    if let Some(notice) = notice {
        if let Ok(value) = HeaderValue::from_str(&notice) {
            headers.insert(NOTICE_HEADER, value);
        }
    }

    Ok((headers, workbook))
}

/// 按文件名分类并取得可解析的DXF字节，再解析成实体序列
///
/// 二进制格式先经远程转换；解析失败不向上传播，降级为空
/// 序列并附诊断提示。
async fn load_entities(
    state: &AppState,
    filename: &str,
    bytes: Vec<u8>,
) -> Result<(Vec<DrawingEntity>, Option<String>), ErrorResponse> {
    let dxf_bytes = match DrawingFormat::from_filename(filename) {
        DrawingFormat::Interchange => bytes,
        DrawingFormat::Binary => {
            let result = state
                .proxy
                .convert(ConversionRequest {
                    source_bytes: bytes,
                    source_filename: filename.to_string(),
                    target_format: "dxf".to_string(),
                    credential_token: state.token.clone(),
                })
                .await
                .map_err(|e| match e {
                    ConvertError::InvalidRequest(_) => bad_request(e.to_string()),
                    ConvertError::ConversionFailed(cause) => {
                        error!("conversion failed: {cause}");
                        internal_error("error during file conversion")
                    }
                })?;
            result.converted_bytes
        }
        DrawingFormat::Unsupported => {
            return Err(bad_request(format!(
                "unsupported file format: {filename}"
            )));
        }
    };

    match dxf_io::parse_entities(&dxf_bytes) {
        Ok(entities) => Ok((entities, None)),
        Err(e) => {
            warn!("parse failure for {}, returning empty summary: {e}", filename);
            Ok((
                Vec::new(),
                Some("file could not be parsed; no entities available".to_string()),
            ))
        }
    }
}
