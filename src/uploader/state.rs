//! # 上传状态机
//!
//! ## 设计思路
//!
//! 把“当前选择 / 上传结果 / 上传状态 / 拖拽提示”收拢为一个不可变状态对象，
//! 所有变化都通过 `apply(event)` 产生新状态，便于脱离任何 UI 运行时测试。
//!
//! ## 代际（generation）
//!
//! 每次选择发生变化（接受新文件、移除、重置）都会递增 `generation`。
//! 发布开始时记录当时的代际，完成时若代际已变化，说明结果针对的是一个
//! 已被替换的选择：结果被丢弃，只把状态恢复为 `Idle`。
//! 重置不会在上传进行中强制回到 `Idle`，因此同一时刻最多一个上传在途。

use std::sync::Arc;

use serde::Serialize;

use super::source::{PublishedImage, SelectedFile};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadStatus {
    #[default]
    Idle,
    Uploading,
}

/// 对外可见的采集状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IngestState {
    Empty,
    HasPreview,
}

#[derive(Debug, Clone)]
pub enum UploadEvent {
    DragOver,
    DragLeave,
    FileAccepted(Arc<SelectedFile>),
    Removed,
    Reset,
    PublishStarted,
    PublishSucceeded { generation: u64, image: PublishedImage },
    PublishFailed { generation: u64 },
}

#[derive(Debug, Clone, Default)]
pub struct UploadState {
    selected: Option<Arc<SelectedFile>>,
    published: Option<PublishedImage>,
    status: UploadStatus,
    drag_over: bool,
    generation: u64,
}

impl UploadState {
    pub fn selected(&self) -> Option<&Arc<SelectedFile>> {
        self.selected.as_ref()
    }

    pub fn published(&self) -> Option<&PublishedImage> {
        self.published.as_ref()
    }

    pub fn status(&self) -> UploadStatus {
        self.status
    }

    pub fn is_drag_over(&self) -> bool {
        self.drag_over
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn ingest_state(&self) -> IngestState {
        if self.selected.is_some() {
            IngestState::HasPreview
        } else {
            IngestState::Empty
        }
    }

    /// 只有空闲且存在选择时才能开始发布。
    pub fn can_publish(&self) -> bool {
        self.status == UploadStatus::Idle && self.selected.is_some()
    }

    pub fn apply(mut self, event: UploadEvent) -> Self {
        match event {
            UploadEvent::DragOver => self.drag_over = true,
            UploadEvent::DragLeave => self.drag_over = false,
            UploadEvent::FileAccepted(file) => {
                self.selected = Some(file);
                self.bump_generation();
            }
            UploadEvent::Removed => {
                self.selected = None;
                self.bump_generation();
            }
            UploadEvent::Reset => {
                self.selected = None;
                self.published = None;
                self.bump_generation();
            }
            UploadEvent::PublishStarted => {
                if self.can_publish() {
                    self.status = UploadStatus::Uploading;
                }
            }
            UploadEvent::PublishSucceeded { generation, image } => {
                if self.status != UploadStatus::Uploading {
                    return self;
                }
                self.status = UploadStatus::Idle;
                if generation == self.generation {
                    // 先清空选择，再暴露结果
                    self.selected = None;
                    self.published = Some(image);
                }
            }
            UploadEvent::PublishFailed { .. } => {
                self.status = UploadStatus::Idle;
            }
        }
        self
    }

    fn bump_generation(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }
}
