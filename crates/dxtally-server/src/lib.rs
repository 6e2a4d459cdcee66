//! DXTALLY HTTP服务
//!
//! 对外暴露四个端点：
//! - `GET /health`: 健康检查
//! - `POST /api/convert`: multipart（file/to/token）透传远程转换
//! - `POST /api/summary`: 上传图纸，返回实体分组统计JSON
//! - `POST /api/report`: 同一条流水线，返回XLSX报表
//!
//! 每个请求只处理一个文件，统计状态每次从头构建，不跨请求共享。

pub mod config;
pub mod handlers;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use dxtally_convert::ConversionProxy;

pub use config::{ConfigError, ServerConfig};

/// 处理器之间共享的服务状态
#[derive(Clone)]
pub struct AppState {
    /// 远程转换代理
    pub proxy: Arc<ConversionProxy>,
    /// 服务端配置的凭证令牌（统计、报表端点的转换路径使用）
    pub token: String,
}

impl AppState {
    /// 从配置创建服务状态
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            proxy: Arc::new(ConversionProxy::new(config.upload_url.clone())),
            token: config.token.clone(),
        }
    }
}

/// 构建路由
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/convert", post(handlers::convert))
        .route("/api/summary", post(handlers::summary))
        .route("/api/report", post(handlers::report))
        // CAD图纸可能较大，放宽默认请求体上限
        .layer(DefaultBodyLimit::max(64 * 1024 * 1024))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// 启动服务
pub async fn start_server(addr: &str, state: AppState) -> Result<(), std::io::Error> {
    tracing::info!("listening on {}", addr);

    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await
}
