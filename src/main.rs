use bucket_ensure::cli::Cli;
use bucket_ensure::execute;
use bucket_ensure::utils::cancel::{run_until_cancelled, shutdown_signal};
use clap::Parser;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::fmt::time::LocalTime;

fn init_tracing(cli: &Cli) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_timer(LocalTime::rfc_3339())
        .with_max_level(cli.log_level())
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("初始化日志失败: {e}"))
}

#[tokio::main]
async fn main() -> ExitCode {
    // 加载 .env 文件
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    if let Err(e) = init_tracing(&cli) {
        eprintln!("{e:#}");
    }

    match run_until_cancelled(execute(&cli), cli.timeout(), shutdown_signal()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if e.is_not_found() {
                error!("目标资源不存在: {}", e);
            } else {
                error!("{}", e);
            }
            ExitCode::from(e.exit_code())
        }
    }
}
