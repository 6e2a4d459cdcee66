//! 服务配置
//!
//! 配置来自TOML文件，环境变量可以逐项覆盖。凭证令牌只通过
//! 配置注入，代码里不允许出现令牌字面量，换令牌不需要改代码。

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use dxtally_convert::DEFAULT_UPLOAD_URL;

/// 服务配置根结构
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "ServerConfig::default_bind_addr")]
    pub bind_addr: String,
    /// 远程转换上传端点
    #[serde(default = "ServerConfig::default_upload_url")]
    pub upload_url: String,
    /// 远程转换服务的凭证令牌
    #[serde(default)]
    pub token: String,
}

impl ServerConfig {
    fn default_bind_addr() -> String {
        "0.0.0.0:8080".to_string()
    }

    fn default_upload_url() -> String {
        DEFAULT_UPLOAD_URL.to_string()
    }

    /// 从显式路径加载配置
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Self =
            toml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.apply_env();
        Ok(config)
    }

    /// 自动发现配置：优先读环境变量 `DXTALLY_CONFIG` 指定的文件，
    /// 其次找 `./config/default.toml`，都没有时用默认值。
    /// 环境变量覆盖始终在最后生效。
    pub fn discover() -> Result<Self, ConfigError> {
        if let Some(path) = env::var_os("DXTALLY_CONFIG") {
            return Self::from_file(PathBuf::from(path));
        }

        let default_path = Path::new("config").join("default.toml");
        if default_path.exists() {
            return Self::from_file(default_path);
        }

        let mut config = Self::default();
        config.apply_env();
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(addr) = env::var("DXTALLY_ADDR") {
            self.bind_addr = addr;
        }
        if let Ok(url) = env::var("DXTALLY_UPLOAD_URL") {
            self.upload_url = url;
        }
        if let Ok(token) = env::var("DXTALLY_TOKEN") {
            self.token = token;
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: Self::default_bind_addr(),
            upload_url: Self::default_upload_url(),
            token: String::new(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.upload_url, DEFAULT_UPLOAD_URL);
        assert!(config.token.is_empty());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            bind_addr = "127.0.0.1:9000"
            upload_url = "http://localhost:9999/api/upload"
            token = "test-token"
            "#
        )
        .unwrap();

        let config = ServerConfig::from_file(file.path()).unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:9000");
        assert_eq!(config.upload_url, "http://localhost:9999/api/upload");
        assert_eq!(config.token, "test-token");
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"token = "only-token""#).unwrap();

        let config = ServerConfig::from_file(file.path()).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.token, "only-token");
    }

    #[test]
    fn test_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "not valid toml [[[").unwrap();

        assert!(matches!(
            ServerConfig::from_file(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }
}
