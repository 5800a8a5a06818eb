//! 对象读取模块

use crate::config::BucketConfig;
use crate::error::AppError;
use crate::s3::store::ObjectStore;
use crate::utils::body::ReadLimit;
use tracing::info;

/// 默认读取的对象键。
///
/// 空键是否有意为之尚无定论，保持原样，可通过 `--key` 覆盖。
pub const DEFAULT_OBJECT_KEY: &str = "";

/// 读取存储桶中的单个对象。
///
/// 请求失败（包括对象不存在）时直接返回错误，不重试。
///
/// # 参数
///
/// * `store` - 存储客户端。
/// * `config` - 存储桶配置。
/// * `key` - 对象键。
/// * `limit` - 最多读取的字节数。
///
/// # 返回值
///
/// 读取到的对象内容。
pub async fn fetch_object(
    store: &dyn ObjectStore,
    config: &BucketConfig,
    key: &str,
    limit: ReadLimit,
) -> Result<Vec<u8>, AppError> {
    let bytes = store.get_object(&config.bucket, key, limit).await?;
    info!(bucket = %config.bucket, key, len = bytes.len(), "对象读取完成");
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::s3::store::{MockObjectStore, StoreError};
    use mockall::predicate::eq;
    use tokio_test::{assert_err, assert_ok};

    #[tokio::test]
    async fn test_fetch_returns_body() {
        let mut store = MockObjectStore::new();
        store
            .expect_get_object()
            .with(eq("test-bucket"), eq(""), eq(ReadLimit::Bytes(1024)))
            .times(1)
            .returning(|_, _, _| Ok(b"hello".to_vec()));

        let bytes = fetch_object(
            &store,
            &BucketConfig::new("test-bucket"),
            DEFAULT_OBJECT_KEY,
            ReadLimit::default(),
        )
        .await;
        assert_eq!(assert_ok!(bytes), b"hello");
    }

    #[tokio::test]
    async fn test_fetch_missing_object_is_fatal_without_retry() {
        let mut store = MockObjectStore::new();
        store.expect_get_object().times(1).returning(|bucket, key, _| {
            Err(StoreError::NoSuchKey {
                bucket: bucket.to_string(),
                key: key.to_string(),
            })
        });

        let err = assert_err!(
            fetch_object(
                &store,
                &BucketConfig::new("test-bucket"),
                "missing.txt",
                ReadLimit::Unbounded,
            )
            .await
        );
        assert!(err.is_not_found());
        assert_eq!(err.exit_code(), 1);
    }
}
