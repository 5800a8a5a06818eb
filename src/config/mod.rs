//! 存储桶配置模块。
//!
//! 该模块负责从 HCL 配置文件（默认 `backend.hcl`）加载存储桶名称和区域。

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// 默认的配置文件路径（相对于当前工作目录）
pub const DEFAULT_CONFIG_PATH: &str = "backend.hcl";

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("无法读取配置文件 {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("无法解析配置文件 {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: hcl::Error,
    },

    #[error("配置文件 {} 中的 `bucket` 不能为空", path.display())]
    EmptyBucket { path: PathBuf },
}

/// 存储桶配置
///
/// 启动时加载一次，之后只读，以引用的方式传给每个操作。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BucketConfig {
    /// 存储桶名称（必填）
    pub bucket: String,

    /// 区域，设置后覆盖环境中的区域
    #[serde(default)]
    pub region: Option<String>,

    /// S3 兼容服务的端点 URL（MinIO、R2、LocalStack 等）
    #[serde(default)]
    pub endpoint: Option<String>,
}

impl BucketConfig {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            region: None,
            endpoint: None,
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }
}

/// 从 HCL 文本解析配置。
///
/// # 参数
///
/// * `source` - HCL 文本内容。
/// * `path` - 仅用于错误信息的文件路径。
pub fn parse_config(source: &str, path: &Path) -> Result<BucketConfig, ConfigError> {
    let config: BucketConfig = hcl::from_str(source).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    if config.bucket.trim().is_empty() {
        return Err(ConfigError::EmptyBucket {
            path: path.to_path_buf(),
        });
    }

    Ok(config)
}

/// 读取并解析配置文件。
///
/// # 参数
///
/// * `path` - 配置文件路径。
///
/// # 返回值
///
/// 解析后的 [`BucketConfig`]，文件缺失、格式错误或缺少 `bucket` 时返回 [`ConfigError`]。
pub fn load_config(path: impl AsRef<Path>) -> Result<BucketConfig, ConfigError> {
    let path = path.as_ref();
    debug!(path = %path.display(), "读取配置文件");

    let source = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    parse_config(&source, path)
}
