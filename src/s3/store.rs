//! 对象存储访问层。
//!
//! [`ObjectStore`] 抽象了本程序用到的五个存储 API 调用，
//! [`S3Store`] 是基于 `aws-sdk-s3` 的实现，测试中使用 `MockObjectStore`。

use crate::utils::body::{ReadLimit, read_limited};
use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_s3::types::{BucketLocationConstraint, CreateBucketConfiguration};
use mockall::automock;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// S3 返回的“存储桶不存在”错误码
const NO_SUCH_BUCKET: &str = "NoSuchBucket";

/// S3 返回的“对象不存在”错误码
const NO_SUCH_KEY: &str = "NoSuchKey";

/// HEAD 请求 404 时的错误码（HEAD 响应没有错误体）
const NOT_FOUND: &str = "NotFound";

/// 不需要 LocationConstraint 的默认区域
const DEFAULT_REGION: &str = "us-east-1";

/// 存储调用错误
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("存储桶 `{0}` 不存在")]
    NoSuchBucket(String),

    #[error("存储桶 `{bucket}` 中不存在对象 `{key}`")]
    NoSuchKey { bucket: String, key: String },

    #[error("{operation} 调用失败: {message}")]
    Provider {
        operation: &'static str,
        code: Option<String>,
        message: String,
    },

    #[error("读取对象内容失败: {0}")]
    Body(String),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StoreError::NoSuchBucket(_) | StoreError::NoSuchKey { .. }
        )
    }

    fn provider<E>(operation: &'static str, err: &E) -> Self
    where
        E: ProvideErrorMetadata + std::error::Error,
    {
        StoreError::Provider {
            operation,
            code: err.code().map(str::to_owned),
            message: DisplayErrorContext(err).to_string(),
        }
    }
}

/// 列举结果中的单个对象
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectSummary {
    pub key: String,
    pub size: i64,
}

impl ObjectSummary {
    pub fn new(key: impl Into<String>, size: i64) -> Self {
        Self {
            key: key.into(),
            size,
        }
    }
}

/// 本程序使用的存储 API
#[automock]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// 列举存储桶中的对象（只取第一页）
    async fn list_objects(&self, bucket: &str) -> Result<Vec<ObjectSummary>, StoreError>;

    /// 创建存储桶，`region` 为非默认区域时附带 LocationConstraint
    async fn create_bucket(&self, bucket: &str, region: Option<String>) -> Result<(), StoreError>;

    /// 单次存在性检查，存储桶不存在时返回 `Ok(false)`
    async fn bucket_exists(&self, bucket: &str) -> Result<bool, StoreError>;

    /// 读取对象内容，最多读取 `limit` 指定的字节数
    async fn get_object(
        &self,
        bucket: &str,
        key: &str,
        limit: ReadLimit,
    ) -> Result<Vec<u8>, StoreError>;

    async fn delete_bucket(&self, bucket: &str) -> Result<(), StoreError>;
}

/// 根据区域生成创建存储桶时的 LocationConstraint。
///
/// `us-east-1` 和未设置区域时不需要（S3 会拒绝 `us-east-1` 的显式约束）。
fn location_constraint(region: Option<&str>) -> Option<CreateBucketConfiguration> {
    match region {
        Some(region) if !region.is_empty() && region != DEFAULT_REGION => Some(
            CreateBucketConfiguration::builder()
                .location_constraint(BucketLocationConstraint::from(region))
                .build(),
        ),
        _ => None,
    }
}

/// 基于 `aws-sdk-s3` 的 [`ObjectStore`] 实现
#[derive(Debug, Clone)]
pub struct S3Store {
    client: Arc<Client>,
}

impl S3Store {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn list_objects(&self, bucket: &str) -> Result<Vec<ObjectSummary>, StoreError> {
        let output = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .send()
            .await
            .map_err(|e| {
                let no_such_bucket = e
                    .as_service_error()
                    .is_some_and(|se| se.is_no_such_bucket())
                    || e.code() == Some(NO_SUCH_BUCKET);
                if no_such_bucket {
                    StoreError::NoSuchBucket(bucket.to_string())
                } else {
                    StoreError::provider("ListObjectsV2", &e)
                }
            })?;

        let objects = output
            .contents()
            .iter()
            .map(|object| ObjectSummary {
                key: object.key().unwrap_or_default().to_string(),
                size: object.size().unwrap_or(0),
            })
            .collect::<Vec<_>>();

        debug!(bucket, count = objects.len(), "ListObjectsV2 完成");
        Ok(objects)
    }

    async fn create_bucket(&self, bucket: &str, region: Option<String>) -> Result<(), StoreError> {
        self.client
            .create_bucket()
            .bucket(bucket)
            .set_create_bucket_configuration(location_constraint(region.as_deref()))
            .send()
            .await
            .map_err(|e| StoreError::provider("CreateBucket", &e))?;

        debug!(bucket, ?region, "CreateBucket 完成");
        Ok(())
    }

    async fn bucket_exists(&self, bucket: &str) -> Result<bool, StoreError> {
        match self.client.head_bucket().bucket(bucket).send().await {
            Ok(_) => Ok(true),
            Err(e) => {
                let not_found = e.as_service_error().is_some_and(|se| se.is_not_found())
                    || matches!(e.code(), Some(NOT_FOUND) | Some(NO_SUCH_BUCKET));
                if not_found {
                    Ok(false)
                } else {
                    Err(StoreError::provider("HeadBucket", &e))
                }
            }
        }
    }

    async fn get_object(
        &self,
        bucket: &str,
        key: &str,
        limit: ReadLimit,
    ) -> Result<Vec<u8>, StoreError> {
        let mut output = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                if e.as_service_error().is_some_and(|se| se.is_no_such_key())
                    || e.code() == Some(NO_SUCH_KEY)
                {
                    StoreError::NoSuchKey {
                        bucket: bucket.to_string(),
                        key: key.to_string(),
                    }
                } else if e.code() == Some(NO_SUCH_BUCKET) {
                    StoreError::NoSuchBucket(bucket.to_string())
                } else {
                    StoreError::provider("GetObject", &e)
                }
            })?;

        debug!(bucket, key, content_length = ?output.content_length(), "GetObject 响应");

        read_limited(&mut output.body, limit)
            .await
            .map_err(|e| StoreError::Body(e.to_string()))
    }

    async fn delete_bucket(&self, bucket: &str) -> Result<(), StoreError> {
        self.client
            .delete_bucket()
            .bucket(bucket)
            .send()
            .await
            .map_err(|e| {
                if e.code() == Some(NO_SUCH_BUCKET) {
                    StoreError::NoSuchBucket(bucket.to_string())
                } else {
                    StoreError::provider("DeleteBucket", &e)
                }
            })?;

        Ok(())
    }
}
