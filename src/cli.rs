//! 命令行参数定义

use crate::RunOptions;
use crate::config::DEFAULT_CONFIG_PATH;
use crate::s3::WaitOptions;
use crate::s3::object::DEFAULT_OBJECT_KEY;
use crate::utils::body::{DEFAULT_READ_LIMIT, ReadLimit};
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;

#[derive(Debug, Parser)]
#[command(
    name = "bucket-ensure",
    version,
    about = "确保对象存储桶存在，并读取其中的一个对象"
)]
pub struct Cli {
    /// HCL 配置文件路径
    #[arg(short, long, env = "BUCKET_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// 要读取的对象键（默认为空键）
    #[arg(long)]
    pub key: Option<String>,

    /// 最多读取的字节数
    #[arg(long, default_value_t = DEFAULT_READ_LIMIT, conflicts_with = "all")]
    pub max_bytes: usize,

    /// 读取完整的对象内容
    #[arg(long)]
    pub all: bool,

    /// 等待新建存储桶可用的上限（秒）
    #[arg(long, default_value_t = 60)]
    pub wait_timeout_secs: u64,

    /// 存在性检查的间隔（秒），至少 1 秒
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u64).range(1..))]
    pub poll_interval_secs: u64,

    /// 存储桶可用后的静置时间（秒），0 表示跳过
    #[arg(long, default_value_t = 10)]
    pub settle_delay_secs: u64,

    /// 整个运行的时间上限（秒）
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// 日志详细程度，可重复（-v、-vv）
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// 检查（必要时创建）存储桶并读取对象（默认）
    Run,
    /// 删除存储桶
    Delete,
}

impl Cli {
    pub fn command(&self) -> Command {
        self.command.unwrap_or(Command::Run)
    }

    pub fn object_key(&self) -> &str {
        self.key.as_deref().unwrap_or(DEFAULT_OBJECT_KEY)
    }

    pub fn read_limit(&self) -> ReadLimit {
        if self.all {
            ReadLimit::Unbounded
        } else {
            ReadLimit::Bytes(self.max_bytes)
        }
    }

    pub fn wait_options(&self) -> WaitOptions {
        WaitOptions::new()
            .with_max_wait(Duration::from_secs(self.wait_timeout_secs))
            .with_poll_interval(Duration::from_secs(self.poll_interval_secs))
            .with_settle_delay(Duration::from_secs(self.settle_delay_secs))
    }

    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            key: self.object_key().to_string(),
            limit: self.read_limit(),
            wait: self.wait_options(),
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// 默认 INFO，每多一个 `-v` 提升一级
    pub fn log_level(&self) -> Level {
        match self.verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["bucket-ensure"]).unwrap();

        assert_eq!(cli.command(), Command::Run);
        assert_eq!(cli.object_key(), "");
        assert_eq!(cli.read_limit(), ReadLimit::Bytes(1024));
        assert_eq!(cli.wait_options(), WaitOptions::default());
        assert!(cli.timeout().is_none());
        assert_eq!(cli.log_level(), Level::INFO);
    }

    #[test]
    fn test_delete_subcommand() {
        let cli = Cli::try_parse_from(["bucket-ensure", "--config", "other.hcl", "delete"]).unwrap();

        assert_eq!(cli.command(), Command::Delete);
        assert_eq!(cli.config, PathBuf::from("other.hcl"));
    }

    #[test]
    fn test_read_all_and_options() {
        let cli = Cli::try_parse_from([
            "bucket-ensure",
            "--all",
            "--key",
            "state/terraform.tfstate",
            "--settle-delay-secs",
            "0",
            "--timeout-secs",
            "120",
            "-vv",
        ])
        .unwrap();

        let options = cli.run_options();
        assert_eq!(options.limit, ReadLimit::Unbounded);
        assert_eq!(options.key, "state/terraform.tfstate");
        assert!(options.wait.settle_delay.is_zero());
        assert_eq!(cli.timeout(), Some(Duration::from_secs(120)));
        assert_eq!(cli.log_level(), Level::TRACE);
    }

    #[test]
    fn test_zero_poll_interval_is_rejected() {
        assert!(Cli::try_parse_from(["bucket-ensure", "--poll-interval-secs", "0"]).is_err());

        let cli = Cli::try_parse_from(["bucket-ensure", "--poll-interval-secs", "1"]).unwrap();
        assert_eq!(cli.wait_options().poll_interval, Duration::from_secs(1));
    }

    #[test]
    fn test_all_conflicts_with_max_bytes() {
        assert!(Cli::try_parse_from(["bucket-ensure", "--all", "--max-bytes", "10"]).is_err());
    }
}
