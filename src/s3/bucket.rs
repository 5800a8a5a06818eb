//! 存储桶操作模块
//!
//! 检查存储桶是否存在，不存在时创建并等待其可用；以及删除存储桶。

use crate::config::BucketConfig;
use crate::error::AppError;
use crate::s3::store::{ObjectStore, ObjectSummary, StoreError};
use std::io::{self, Write};
use std::time::Duration;
use tokio::time::{Instant, sleep};
use tracing::{info, warn};

/// 等待存储桶可用的默认上限
pub const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(60);

/// 存在性检查的默认间隔
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// 存在性检查的最小间隔，避免间隔为零时连续发送请求
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// 创建完成后的默认静置时间
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(10);

/// 创建存储桶后等待其可用的参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitOptions {
    /// 轮询存在性的总时间上限
    pub max_wait: Duration,
    /// 两次存在性检查之间的间隔
    pub poll_interval: Duration,
    /// 确认存在后额外等待的时间，应对最终一致性；为零时跳过
    pub settle_delay: Duration,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            max_wait: DEFAULT_MAX_WAIT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            settle_delay: DEFAULT_SETTLE_DELAY,
        }
    }
}

impl WaitOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = max_wait;
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_settle_delay(mut self, settle_delay: Duration) -> Self {
        self.settle_delay = settle_delay;
        self
    }
}

/// [`ensure_bucket`] 的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnsureOutcome {
    /// 存储桶已存在，附带列举到的第一页对象
    Existed(Vec<ObjectSummary>),
    /// 存储桶不存在，已创建并确认可用
    Created,
}

/// 确保存储桶存在。
///
/// 先列举一次对象：成功则打印每个对象的键和大小；
/// 返回“存储桶不存在”时创建存储桶；其他错误直接返回，不尝试创建。
///
/// # 参数
///
/// * `store` - 存储客户端。
/// * `config` - 存储桶配置。
/// * `wait` - 创建后的等待参数。
pub async fn ensure_bucket(
    store: &dyn ObjectStore,
    config: &BucketConfig,
    wait: &WaitOptions,
) -> Result<EnsureOutcome, AppError> {
    match store.list_objects(&config.bucket).await {
        Ok(objects) => {
            info!(bucket = %config.bucket, "存储桶已存在");
            write_object_listing(&mut io::stdout().lock(), &objects)?;
            Ok(EnsureOutcome::Existed(objects))
        }
        Err(StoreError::NoSuchBucket(_)) => {
            info!(bucket = %config.bucket, "存储桶不存在，开始创建");
            create_bucket(store, config, wait).await?;
            Ok(EnsureOutcome::Created)
        }
        Err(e) => Err(e.into()),
    }
}

/// 按 `key=<键> size=<大小>` 的格式逐行输出对象列表
pub fn write_object_listing(out: &mut impl Write, objects: &[ObjectSummary]) -> io::Result<()> {
    for object in objects {
        writeln!(out, "key={} size={}", object.key, object.size)?;
    }
    out.flush()
}

/// 创建存储桶并等待其可用。
///
/// 创建失败、存在性检查出错或等待超时都会返回错误。
pub async fn create_bucket(
    store: &dyn ObjectStore,
    config: &BucketConfig,
    wait: &WaitOptions,
) -> Result<(), AppError> {
    store
        .create_bucket(&config.bucket, config.region.clone())
        .await?;

    info!(bucket = %config.bucket, max_wait = ?wait.max_wait, "等待存储桶创建完成...");
    wait_until_exists(store, &config.bucket, wait.max_wait, wait.poll_interval).await?;

    if !wait.settle_delay.is_zero() {
        info!(delay = ?wait.settle_delay, "存储桶已可用，静置等待");
        sleep(wait.settle_delay).await;
    }

    Ok(())
}

/// 轮询存储桶直到存在，或在 `max_wait` 后返回 [`AppError::Timeout`]。
///
/// 每次检查前都会先确认剩余时间足够，因此总等待时间不会超过 `max_wait`。
/// 小于 [`MIN_POLL_INTERVAL`] 的间隔按最小间隔处理。
pub async fn wait_until_exists(
    store: &dyn ObjectStore,
    bucket: &str,
    max_wait: Duration,
    poll_interval: Duration,
) -> Result<(), AppError> {
    let poll_interval = poll_interval.max(MIN_POLL_INTERVAL);
    let started = Instant::now();
    let deadline = started + max_wait;
    let mut attempts = 0u32;

    loop {
        attempts += 1;
        if store.bucket_exists(bucket).await? {
            info!(bucket, attempts, elapsed = ?started.elapsed(), "存储桶已可用");
            return Ok(());
        }

        let now = Instant::now();
        if now + poll_interval > deadline {
            warn!(bucket, attempts, "等待存储桶超时");
            return Err(AppError::Timeout {
                bucket: bucket.to_string(),
                waited: now - started,
            });
        }

        sleep(poll_interval).await;
    }
}

/// 删除存储桶。
///
/// 不在默认流程中，只有显式执行 `delete` 子命令时才会调用。
pub async fn delete_bucket(store: &dyn ObjectStore, config: &BucketConfig) -> Result<(), AppError> {
    store.delete_bucket(&config.bucket).await?;
    info!(bucket = %config.bucket, "存储桶已删除");
    Ok(())
}
