//! # 采集模块
//!
//! ## 设计思路
//!
//! 负责“选择 / 拖入 / 放下 → 校验 → 读取 → 预览”，以及移除与重置。
//! 对外只有两个可观察状态：`Empty` 与 `HasPreview`。
//!
//! ## 实现思路
//!
//! - 校验失败：发出带文件名与原因的错误通知，状态不变。
//! - 读取失败：同样作为校验类错误通知，状态不变，不会静默丢失。
//! - 拖放一次只处理第一个文件，其余文件不产生通知也不改变状态。

use std::sync::Arc;

use super::messages::{self, TITLE_ERROR};
use super::source::{FileChooser, PickedFile, SelectedFile};
use super::state::UploadEvent;
use super::transcoder;
use super::validator;
use super::{UploadError, UploadWorkflow, ValidationError};

/// 拖拽事件处理结果，提示宿主应执行的默认行为处理。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragDisposition {
    /// 阻止平台默认的“打开文件”行为。
    pub prevent_default: bool,
    pub stop_propagation: bool,
}

impl DragDisposition {
    const HANDLED: Self = Self {
        prevent_default: true,
        stop_propagation: true,
    };
}

impl UploadWorkflow {
    /// 打开文件选择器；用户取消时不做任何事。
    pub async fn select_via_picker(&self, chooser: &dyn FileChooser) -> Result<(), UploadError> {
        match chooser.choose().await? {
            Some(file) => self.process_file(file).await,
            None => {
                log::debug!("📂 用户取消了文件选择");
                Ok(())
            }
        }
    }

    pub fn handle_drag_over(&self) -> Result<DragDisposition, UploadError> {
        self.dispatch(UploadEvent::DragOver)?;
        Ok(DragDisposition::HANDLED)
    }

    pub fn handle_drag_leave(&self) -> Result<DragDisposition, UploadError> {
        self.dispatch(UploadEvent::DragLeave)?;
        Ok(DragDisposition::HANDLED)
    }

    /// 处理拖放：只取第一个文件。
    pub async fn handle_drop(&self, files: Vec<PickedFile>) -> Result<DragDisposition, UploadError> {
        self.dispatch(UploadEvent::DragLeave)?;

        let dropped = files.len();
        if let Some(first) = files.into_iter().next() {
            if dropped > 1 {
                log::debug!("📥 拖放了 {} 个文件，仅处理第一个", dropped);
            }
            self.process_file(first).await?;
        }
        Ok(DragDisposition::HANDLED)
    }

    /// 校验并生成预览。
    pub async fn process_file(&self, file: PickedFile) -> Result<(), UploadError> {
        if let Err(reason) = validator::validate_file(&self.policy, &file) {
            log::warn!(
                "🚫 文件被拒绝 - 名称: {} 类型: {} 大小: {} 原因: {}",
                file.name,
                file.mime,
                file.size,
                reason
            );
            return Err(self.reject(file.name, reason));
        }

        let bytes = match file.read_bytes().await {
            Ok(bytes) => bytes,
            Err(err) => {
                log::error!("❌ 读取文件失败 - 名称: {} 错误: {}", file.name, err);
                return Err(self.reject(file.name, ValidationError::ReadFailed));
            }
        };

        // 读取期间文件可能被改写，以实际字节数为准再校验一次
        let size = bytes.len() as u64;
        if let Err(reason) = validator::validate(&self.policy, &file.mime, size) {
            log::warn!(
                "🚫 读取后的文件未通过校验 - 名称: {} 声明大小: {} 实际大小: {}",
                file.name,
                file.size,
                size
            );
            return Err(self.reject(file.name, reason));
        }

        let selected = SelectedFile {
            preview_url: transcoder::to_data_url(&file.mime, &bytes),
            dimensions: transcoder::probe_dimensions(&bytes),
            name: file.name,
            mime: file.mime,
            size,
            bytes,
        };

        log::info!(
            "🖼️ 已生成预览 - 名称: {} 大小: {} 尺寸: {:?}",
            selected.name,
            format_size(selected.size),
            selected.dimensions
        );

        self.dispatch(UploadEvent::FileAccepted(Arc::new(selected)))
    }

    fn reject(&self, name: String, reason: ValidationError) -> UploadError {
        self.notifier
            .error(TITLE_ERROR, &messages::rejection(&name, reason));
        UploadError::Validation { name, reason }
    }

    /// 移除当前预览。
    pub fn remove_image(&self) -> Result<(), UploadError> {
        self.dispatch(UploadEvent::Removed)
    }

    /// 清空预览与上传结果。
    pub fn reset_upload(&self) -> Result<(), UploadError> {
        self.dispatch(UploadEvent::Reset)
    }
}

/// 格式化文件大小：`< 1 KB` 显示字节，`< 1 MB` 显示 KB，否则显示 MB，保留两位小数。
///
/// 两位小数按整数百分位计算，恰好落在 .xx5 上时向上取整（1152 B → `1.13 KB`）。
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;

    if bytes < KB {
        format!("{} B", bytes)
    } else if bytes < MB {
        format!("{} KB", hundredths(bytes, KB))
    } else {
        format!("{} MB", hundredths(bytes, MB))
    }
}

fn hundredths(bytes: u64, unit: u64) -> String {
    let scaled = (u128::from(bytes) * 100 + u128::from(unit) / 2) / u128::from(unit);
    format!("{}.{:02}", scaled / 100, scaled % 100)
}
