use crate::error::AppError;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// 在取消信号和可选的总超时下运行 `fut`。
///
/// 取消或超时时 `fut` 被直接丢弃，正在进行的远程调用随之中止。
///
/// # 参数
///
/// * `fut` - 要运行的任务。
/// * `timeout` - 总运行时间上限，`None` 表示不限制。
/// * `cancel` - 完成即表示请求取消的 future（通常是 [`shutdown_signal`]）。
pub async fn run_until_cancelled<F, T, C>(
    fut: F,
    timeout: Option<Duration>,
    cancel: C,
) -> Result<T, AppError>
where
    F: Future<Output = Result<T, AppError>>,
    C: Future<Output = ()>,
{
    let guarded = async {
        match timeout {
            Some(limit) => tokio::time::timeout(limit, fut)
                .await
                .map_err(|_| AppError::Deadline(limit))?,
            None => fut.await,
        }
    };

    tokio::select! {
        result = guarded => result,
        _ = cancel => Err(AppError::Interrupted),
    }
}

/// 等待 Ctrl-C。
///
/// 无法注册信号处理器时记录警告并永不完成。
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("无法监听 Ctrl-C 信号: {}", e);
        std::future::pending::<()>().await;
    }
}
