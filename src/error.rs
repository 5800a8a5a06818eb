//! 错误类型模块
//!
//! 所有可恢复与不可恢复的错误都以 [`AppError`] 的形式向上传播，
//! 由 `main` 中唯一的顶层处理器决定进程退出码。

use crate::config::ConfigError;
use crate::s3::store::StoreError;
use std::time::Duration;
use thiserror::Error;

/// 应用级错误
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("无法解析云服务凭证: {0}")]
    Credential(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("等待存储桶 `{bucket}` 可用超时（已等待 {waited:?}）")]
    Timeout { bucket: String, waited: Duration },

    #[error("写入输出失败: {0}")]
    Output(#[from] std::io::Error),

    #[error("运行时间超过上限 {0:?}")]
    Deadline(Duration),

    #[error("运行被中断")]
    Interrupted,
}

impl AppError {
    /// 进程退出码
    ///
    /// 被 Ctrl-C 中断时返回 130，其余任何未恢复的错误都返回 1。
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Interrupted => 130,
            _ => 1,
        }
    }

    /// 是否为“存储桶或对象不存在”类错误
    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::Store(e) if e.is_not_found())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(AppError::Interrupted.exit_code(), 130);
        assert_eq!(AppError::Credential("none".into()).exit_code(), 1);
        assert_eq!(
            AppError::Timeout {
                bucket: "b".into(),
                waited: Duration::from_secs(60)
            }
            .exit_code(),
            1
        );
        assert_eq!(
            AppError::Store(StoreError::NoSuchBucket("b".into())).exit_code(),
            1
        );
    }

    #[test]
    fn test_is_not_found() {
        assert!(AppError::Store(StoreError::NoSuchBucket("b".into())).is_not_found());
        assert!(
            AppError::Store(StoreError::NoSuchKey {
                bucket: "b".into(),
                key: "k".into()
            })
            .is_not_found()
        );
        assert!(!AppError::Deadline(Duration::from_secs(1)).is_not_found());
    }
}
