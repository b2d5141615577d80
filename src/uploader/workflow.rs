//! # 工作流（一组采集 + 发布）
//!
//! ## 设计思路
//!
//! `UploadWorkflow` 持有状态对象与全部协作者（远端仓库、分支配置、CDN 规则、通知出口、剪贴板），
//! 一个实例对应一个页面上的“选择 → 预览 → 上传 → 复制”流程，实例之间不共享可变状态。
//!
//! 采集、发布、复制分别在 `ingest.rs`、`publish.rs`、`clipboard.rs` 中以 `impl UploadWorkflow`
//! 的形式实现，本文件只负责构建与状态读写。
//!
//! 状态锁只在状态迁移的瞬间持有，绝不跨越 `.await`。

use std::sync::atomic::AtomicU64;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;

use super::cdn::{CdnBase, CdnResolver};
use super::clipboard::ClipboardHelper;
use super::config::{PublishConfig, ValidationPolicy};
use super::github::{GitHubConfig, GitHubRepository};
use super::ingest::format_size;
use super::notify::Notifier;
use super::remote::{ImageRepoProvider, RemoteRepository};
use super::source::PublishedImage;
use super::state::{IngestState, UploadEvent, UploadState, UploadStatus};
use super::UploadError;

/// 上传工作流。
pub struct UploadWorkflow {
    pub(super) state: Mutex<UploadState>,
    pub(super) policy: ValidationPolicy,
    pub(super) publish_config: PublishConfig,
    pub(super) sequence: AtomicU64,
    pub(super) remote: Arc<dyn RemoteRepository>,
    pub(super) repo: Arc<dyn ImageRepoProvider>,
    pub(super) cdn: Arc<dyn CdnResolver>,
    pub(super) notifier: Arc<dyn Notifier>,
    pub(super) clipboard: ClipboardHelper,
}

/// 已选择文件的展示信息（不含内容字节）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectedSummary {
    pub name: String,
    pub mime: String,
    pub size: u64,
    pub size_label: String,
    pub dimensions: Option<(u32, u32)>,
    /// 可直接渲染的 `data:` 预览地址。
    pub preview_url: String,
}

/// 可序列化的状态快照，供前端渲染。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkflowSnapshot {
    pub ingest_state: IngestState,
    pub status: UploadStatus,
    pub is_drag_over: bool,
    pub selected: Option<SelectedSummary>,
    pub published: Option<PublishedImage>,
}

impl UploadWorkflow {
    pub fn new(
        remote: Arc<dyn RemoteRepository>,
        repo: Arc<dyn ImageRepoProvider>,
        cdn: Arc<dyn CdnResolver>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            state: Mutex::new(UploadState::default()),
            policy: ValidationPolicy::STANDARD,
            publish_config: PublishConfig::default(),
            sequence: AtomicU64::new(0),
            remote,
            repo,
            cdn,
            notifier,
            clipboard: ClipboardHelper::system(),
        }
    }

    /// 使用 GitHub 仓库作为远端与分支来源。
    ///
    /// # 示例
    /// ```rust,no_run
    /// use std::sync::Arc;
    /// use pic_uploader::uploader::{CdnBase, GitHubConfig, LogNotifier, UploadWorkflow};
    ///
    /// let config = GitHubConfig {
    ///     owner: "octo".into(),
    ///     repo: "pics".into(),
    ///     ..GitHubConfig::default()
    /// };
    /// let cdn = CdnBase::jsdelivr("octo", "pics", "main");
    /// let workflow = UploadWorkflow::from_github(config, cdn, Arc::new(LogNotifier))?;
    /// # Ok::<(), pic_uploader::uploader::UploadError>(())
    /// ```
    pub fn from_github(
        config: GitHubConfig,
        cdn: CdnBase,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, UploadError> {
        let github = Arc::new(GitHubRepository::new(config)?);
        Ok(Self::new(
            Arc::clone(&github) as Arc<dyn RemoteRepository>,
            github,
            Arc::new(cdn),
            notifier,
        ))
    }

    pub fn with_clipboard(mut self, clipboard: ClipboardHelper) -> Self {
        self.clipboard = clipboard;
        self
    }

    pub fn with_publish_config(mut self, config: PublishConfig) -> Self {
        self.publish_config = config;
        self
    }

    pub(super) fn lock_state(&self) -> Result<MutexGuard<'_, UploadState>, UploadError> {
        self.state
            .lock()
            .map_err(|_| UploadError::State("上传状态锁已中毒".to_string()))
    }

    /// 执行一次状态迁移。
    pub(super) fn dispatch(&self, event: UploadEvent) -> Result<(), UploadError> {
        let mut guard = self.lock_state()?;
        let current = std::mem::take(&mut *guard);
        *guard = current.apply(event);
        Ok(())
    }

    /// 当前状态的副本。
    pub fn state(&self) -> Result<UploadState, UploadError> {
        Ok(self.lock_state()?.clone())
    }

    pub fn snapshot(&self) -> Result<WorkflowSnapshot, UploadError> {
        let state = self.lock_state()?;
        Ok(WorkflowSnapshot {
            ingest_state: state.ingest_state(),
            status: state.status(),
            is_drag_over: state.is_drag_over(),
            selected: state.selected().map(|file| SelectedSummary {
                name: file.name.clone(),
                mime: file.mime.clone(),
                size: file.size,
                size_label: format_size(file.size),
                dimensions: file.dimensions,
                preview_url: file.preview_url.clone(),
            }),
            published: state.published().cloned(),
        })
    }
}
