//! S3 客户端配置模块
//!
//! 该模块负责解析环境中的凭证并初始化 S3 客户端。

use crate::config::BucketConfig;
use crate::error::AppError;
use aws_config::BehaviorVersion;
use aws_config::Region;
use aws_config::SdkConfig;
use aws_config::meta::region::RegionProviderChain;
use aws_credential_types::provider::ProvideCredentials;
use aws_sdk_s3::Client;
use tracing::{debug, info};

/// 使用标准 AWS 凭证链加载 SDK 配置。
///
/// 凭证来源依次为环境变量、共享配置文件（`~/.aws/config`、`~/.aws/credentials`）
/// 和实例元数据。配置文件中的 `region` 会覆盖环境中的区域，
/// `endpoint` 会覆盖默认端点。
///
/// # 标准 AWS 环境变量
///
/// * `AWS_ACCESS_KEY_ID` - AWS 访问密钥 ID
/// * `AWS_SECRET_ACCESS_KEY` - AWS 秘密访问密钥
/// * `AWS_REGION` - AWS 区域
/// * `AWS_ENDPOINT_URL` - S3 兼容服务的端点 URL
pub async fn load_sdk_config(config: &BucketConfig) -> SdkConfig {
    let region_provider =
        RegionProviderChain::first_try(config.region.clone().map(Region::new)).or_default_provider();

    let mut loader = aws_config::defaults(BehaviorVersion::latest()).region(region_provider);

    if let Some(endpoint) = &config.endpoint {
        loader = loader.endpoint_url(endpoint);
    }

    loader.load().await
}

/// 立即解析一次凭证，找不到任何凭证时返回 [`AppError::Credential`]。
pub async fn resolve_credentials(sdk_config: &SdkConfig) -> Result<(), AppError> {
    let provider = sdk_config
        .credentials_provider()
        .ok_or_else(|| AppError::Credential("未配置任何凭证提供者".to_string()))?;

    let credentials = provider
        .provide_credentials()
        .await
        .map_err(|e| AppError::Credential(e.to_string()))?;

    debug!(access_key_id = %mask_key(credentials.access_key_id()), "已解析凭证");
    Ok(())
}

/// 根据 SDK 配置构建 S3 客户端。
///
/// 使用自定义端点时启用 path-style 访问，兼容 MinIO、LocalStack 等服务。
pub fn build_client(sdk_config: &SdkConfig, config: &BucketConfig) -> Client {
    let s3_config = aws_sdk_s3::config::Builder::from(sdk_config)
        .force_path_style(config.endpoint.is_some())
        .build();

    Client::from_conf(s3_config)
}

/// 解析凭证并创建 S3 客户端。
///
/// # 参数
///
/// * `config` - 存储桶配置。
///
/// # 返回值
///
/// 配置好的 `aws_sdk_s3::Client`，无法解析凭证时返回错误。
pub async fn create_s3_client(config: &BucketConfig) -> Result<Client, AppError> {
    let sdk_config = load_sdk_config(config).await;
    resolve_credentials(&sdk_config).await?;

    info!(
        region = sdk_config.region().map(|r| r.as_ref()).unwrap_or("<未设置>"),
        endpoint = config.endpoint.as_deref().unwrap_or("<默认>"),
        "S3 客户端已初始化"
    );

    Ok(build_client(&sdk_config, config))
}

/// 只保留访问密钥的前四位用于日志
fn mask_key(key: &str) -> String {
    let prefix: String = key.chars().take(4).collect();
    format!("{}****", prefix)
}
