//! 存储桶检查工具库
//!
//! 这是一个小型命令行工具的核心逻辑，按顺序执行：
//! - 从 HCL 配置文件读取存储桶名称和区域
//! - 解析环境中的云服务凭证并创建 S3 客户端
//! - 检查存储桶是否存在，不存在时创建并等待其可用
//! - 读取存储桶中的一个对象并输出其内容

pub mod cli;
pub mod config;
pub mod error;
pub mod s3;
pub mod utils;

use crate::cli::{Cli, Command};
use crate::config::{BucketConfig, load_config};
use crate::error::AppError;
use crate::s3::{ObjectStore, S3Store, WaitOptions};
use crate::utils::body::ReadLimit;
use std::sync::Arc;
use tracing::info;

/// 默认流程的运行参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// 要读取的对象键
    pub key: String,
    /// 最多读取的字节数
    pub limit: ReadLimit,
    /// 新建存储桶后的等待参数
    pub wait: WaitOptions,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            key: s3::object::DEFAULT_OBJECT_KEY.to_string(),
            limit: ReadLimit::default(),
            wait: WaitOptions::default(),
        }
    }
}

/// 默认流程：确保存储桶存在，然后读取对象。
///
/// # 参数
///
/// * `store` - 存储客户端。
/// * `config` - 存储桶配置。
/// * `options` - 运行参数。
///
/// # 返回值
///
/// 读取到的对象内容，任何未恢复的错误都会中止整个流程。
pub async fn ensure_and_fetch(
    store: &dyn ObjectStore,
    config: &BucketConfig,
    options: &RunOptions,
) -> Result<Vec<u8>, AppError> {
    s3::ensure_bucket(store, config, &options.wait).await?;
    s3::fetch_object(store, config, &options.key, options.limit).await
}

/// 按命令行参数执行一次完整运行。
///
/// 配置文件在任何远程调用之前加载，加载失败时直接返回。
pub async fn execute(cli: &Cli) -> Result<(), AppError> {
    let config = load_config(&cli.config)?;
    info!(bucket = %config.bucket, region = ?config.region, "已加载配置");

    let client = s3::create_s3_client(&config).await?;
    let store = S3Store::new(Arc::new(client));

    match cli.command() {
        Command::Run => {
            let bytes = ensure_and_fetch(&store, &config, &cli.run_options()).await?;
            println!("{}", String::from_utf8_lossy(&bytes));
        }
        Command::Delete => {
            s3::delete_bucket(&store, &config).await?;
            println!("Bucket deleted: {}", config.bucket);
        }
    }

    Ok(())
}
