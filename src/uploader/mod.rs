//! # 图片上传模块（uploader）
//!
//! ## 设计思路
//!
//! 该模块将“选择图片 → 校验 → 预览 → 转码 → 提交远端仓库 → 推导 CDN 地址 → 复制链接”
//! 按职责拆分为多个子模块，避免单文件膨胀与耦合。
//!
//! - `workflow`：持有状态与协作者，一个实例对应一组采集 + 发布
//! - `state`：不可变状态对象与事件迁移
//! - `ingest`：选择 / 拖放 / 预览 / 移除 / 重置
//! - `publish`：存储路径、提交、CDN 地址
//! - `validator` / `transcoder`：纯函数（校验、Base64）
//! - `remote` / `github` / `cdn`：远端仓库接口与实现
//! - `clipboard`：带暂存守卫的复制
//! - `notify` / `messages`：通知出口与固定文案
//! - `config/error/source`：配置、错误、中间数据模型
//!
//! ## 新同事快速上手
//!
//! ```text
//! 前端 / 命令行
//!    ↓
//! workflow.rs（状态锁 + 协作者）
//!    ├─ ingest.rs（validator → 读取 → transcoder::to_data_url → FileAccepted）
//!    ├─ publish.rs（storage_path → transcoder::encode_payload → remote → cdn）
//!    └─ clipboard.rs（StagingGuard → arboard）
//!    ↓
//! notify.rs（成功 / 警告 / 错误）
//! ```

mod cdn;
mod clipboard;
mod config;
mod error;
mod github;
mod ingest;
pub mod messages;
mod notify;
mod publish;
mod remote;
mod source;
mod state;
pub mod transcoder;
pub mod validator;
mod workflow;

#[cfg(test)]
mod test_support;

pub use cdn::{CdnBase, CdnResolver};
pub use clipboard::{ArboardSurface, ClipboardHelper, ClipboardSurface, StagingGuard};
pub use config::{
    COMMIT_MESSAGE, DEFAULT_EXTENSION, MAX_FILE_SIZE, PublishConfig, STORAGE_DIR,
    SUPPORTED_TYPES, ValidationPolicy,
};
pub use error::{UploadError, ValidationError};
pub use github::{GitHubConfig, GitHubRepository};
pub use ingest::{DragDisposition, format_size};
pub use notify::{BufferedNotifier, LogNotifier, Notification, NotificationLevel, Notifier};
pub use publish::{file_extension, storage_path};
pub use remote::{CreateFileRequest, ImageRepoProvider, RemoteRepository};
pub use source::{FileChooser, FileContent, PathChooser, PickedFile, PublishedImage, SelectedFile};
pub use state::{IngestState, UploadEvent, UploadState, UploadStatus};
pub use workflow::{SelectedSummary, UploadWorkflow, WorkflowSnapshot};
