//! # 图床上传工具 — 命令行入口
//!
//! 本文件仅负责参数解析、配置加载与工作流装配。
//! 业务逻辑分布在各子模块中，详见 `lib.rs` 架构文档。

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use pic_uploader::error::AppError;
use pic_uploader::settings::{self, UploaderSettings};
use pic_uploader::uploader::{
    ClipboardHelper, NotificationLevel, Notifier, PathChooser, UploadWorkflow, format_size,
};

#[derive(Parser, Debug)]
#[command(name = "pic-uploader", version, about = "把本地图片上传到 GitHub 仓库并生成 CDN 链接")]
struct Cli {
    /// 配置文件路径，默认为系统配置目录下的 pic-uploader/settings.json
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 上传一张图片并输出 CDN 地址
    Upload {
        file: PathBuf,
        /// 上传成功后把地址复制到剪贴板
        #[arg(long)]
        copy: bool,
        /// 覆盖配置中的目标分支
        #[arg(long)]
        branch: Option<String>,
        /// 复制后保持剪贴板内容的最长秒数（Linux 下进程退出会丢失剪贴板内容）
        #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..=600))]
        hold_secs: u64,
    },
    /// 按界面规则格式化字节数
    Size { bytes: u64 },
}

/// 把通知打印到终端。
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, level: NotificationLevel, title: &str, body: &str) {
        match level {
            NotificationLevel::Success => println!("[{}] {}", title, body),
            NotificationLevel::Warning | NotificationLevel::Error => {
                eprintln!("[{}] {}", title, body)
            }
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("❌ 执行失败: {}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    match cli.command {
        Command::Size { bytes } => {
            println!("{}", format_size(bytes));
            Ok(())
        }
        Command::Upload {
            file,
            copy,
            branch,
            hold_secs,
        } => {
            let config_path = cli.config.unwrap_or_else(settings::default_settings_path);
            let mut settings = UploaderSettings::load_from_path(&config_path)?;
            settings.apply_env_overrides(|key| std::env::var(key).ok());
            if let Some(branch) = branch {
                settings.repo.branch = branch;
            }
            settings.validate()?;

            log::info!(
                "⚙️ 使用仓库 {}/{}@{}",
                settings.repo.owner,
                settings.repo.name,
                settings.repo.branch
            );

            let workflow = UploadWorkflow::from_github(
                settings.github_config(),
                settings.cdn_base(),
                Arc::new(ConsoleNotifier),
            )?
            .with_publish_config(settings.publish_config())
            .with_clipboard(ClipboardHelper::system_holding(Duration::from_secs(hold_secs)));

            upload(&workflow, file, copy).await
        }
    }
}

async fn upload(workflow: &UploadWorkflow, file: PathBuf, copy: bool) -> Result<(), AppError> {
    workflow.select_via_picker(&PathChooser::new(file)).await?;

    if let Some(selected) = workflow.snapshot()?.selected {
        match selected.dimensions {
            Some((w, h)) => println!("{} ({}, {}x{})", selected.name, selected.size_label, w, h),
            None => println!("{} ({})", selected.name, selected.size_label),
        }
    }

    let published = workflow.upload_image().await?;
    println!("{}", published.url);

    if copy {
        workflow.copy_url(&published.url).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_defaults_to_holding_clipboard() {
        let cli = Cli::try_parse_from(["pic-uploader", "upload", "a.png", "--copy"]).expect("parse");
        match cli.command {
            Command::Upload {
                copy, hold_secs, ..
            } => {
                assert!(copy);
                assert_eq!(hold_secs, 30);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn hold_secs_must_be_positive() {
        let result = Cli::try_parse_from(["pic-uploader", "upload", "a.png", "--hold-secs", "0"]);
        assert!(result.is_err());
    }
}
