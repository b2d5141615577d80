//! # 发布模块
//!
//! ## 实现思路
//!
//! 1. 检查前置条件：必须有选择且当前空闲；上传中再次调用直接拒绝，不排队
//! 2. 生成存储路径 `images/<毫秒时间戳>.<原扩展名>`（无扩展名时为 `jpg`）
//! 3. 转码为纯 Base64 负载
//! 4. 调用远端仓库创建文件（`is_encode = false`，内容已编码）
//! 5. 按 CDN 规则推导公网地址
//! 6. 成功：清空选择、写入结果、回到空闲；失败：保留选择、回到空闲
//!
//! 失败时用户只看到固定文案，底层错误写入日志。
//! 完成时若选择已被移除或重置（代际变化），结果被丢弃，见 `state.rs`。

use std::sync::atomic::Ordering;
use std::time::Instant;

use super::config::{COMMIT_MESSAGE, DEFAULT_EXTENSION, STORAGE_DIR};
use super::messages::{
    NO_SELECTION, TITLE_ERROR, TITLE_SUCCESS, TITLE_WARNING, UPLOAD_BUSY, UPLOAD_FAILED,
    UPLOAD_SUCCESS,
};
use super::remote::CreateFileRequest;
use super::source::{PublishedImage, SelectedFile};
use super::state::{UploadEvent, UploadStatus};
use super::transcoder;
use super::{UploadError, UploadWorkflow};

/// 取原文件名最后一个 `.` 之后的部分作为扩展名，保留大小写。
pub fn file_extension(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => ext,
        _ => DEFAULT_EXTENSION,
    }
}

/// 生成存储路径。
pub fn storage_path(name: &str, timestamp_ms: i64, sequence: Option<u64>) -> String {
    let ext = file_extension(name);
    match sequence {
        Some(seq) => format!("{}/{}-{}.{}", STORAGE_DIR, timestamp_ms, seq, ext),
        None => format!("{}/{}.{}", STORAGE_DIR, timestamp_ms, ext),
    }
}

impl UploadWorkflow {
    /// 发布当前选择的图片。
    ///
    /// # 示例
    /// ```rust,no_run
    /// # async fn demo(workflow: pic_uploader::uploader::UploadWorkflow) {
    /// match workflow.upload_image().await {
    ///     Ok(image) => println!("{}", image.url),
    ///     Err(err) => eprintln!("{} ({})", err, err.code()),
    /// }
    /// # }
    /// ```
    pub async fn upload_image(&self) -> Result<PublishedImage, UploadError> {
        let (generation, selected) = {
            let mut guard = self.lock_state()?;
            let Some(selected) = guard.selected().cloned() else {
                log::warn!("⚠️ 没有可上传的图片");
                self.notifier.warning(TITLE_WARNING, NO_SELECTION);
                return Err(UploadError::NoSelection);
            };
            if guard.status() == UploadStatus::Uploading {
                log::warn!("⚠️ 已有上传任务进行中，忽略本次请求");
                self.notifier.warning(TITLE_WARNING, UPLOAD_BUSY);
                return Err(UploadError::Busy);
            }
            let current = std::mem::take(&mut *guard);
            *guard = current.apply(UploadEvent::PublishStarted);
            (guard.generation(), selected)
        };

        log::info!("⬆️ 开始上传 - 名称: {} 大小: {} 字节", selected.name, selected.size);
        let started = Instant::now();

        match self.publish_selected(&selected).await {
            Ok(image) => {
                let superseded = {
                    let mut guard = self.lock_state()?;
                    let superseded = guard.generation() != generation;
                    let current = std::mem::take(&mut *guard);
                    *guard = current.apply(UploadEvent::PublishSucceeded {
                        generation,
                        image: image.clone(),
                    });
                    superseded
                };

                if superseded {
                    log::warn!(
                        "⚠️ 上传完成时选择已变化，丢弃结果 - 名称: {} URL: {}",
                        image.name,
                        image.url
                    );
                    return Err(UploadError::Superseded { url: image.url });
                }

                log::info!(
                    "✅ 图片上传完成 - URL: {} 耗时: {}ms",
                    image.url,
                    started.elapsed().as_millis()
                );
                self.notifier.success(TITLE_SUCCESS, UPLOAD_SUCCESS);
                Ok(image)
            }
            Err(err) => {
                log::error!(
                    "❌ 图片上传失败 - code={} stage={} 耗时: {}ms 错误: {}",
                    err.code(),
                    err.stage(),
                    started.elapsed().as_millis(),
                    err
                );
                if let Err(state_err) = self.dispatch(UploadEvent::PublishFailed { generation }) {
                    log::error!("❌ 恢复上传状态失败: {}", state_err);
                }
                self.notifier.error(TITLE_ERROR, UPLOAD_FAILED);
                Err(err)
            }
        }
    }

    async fn publish_selected(&self, selected: &SelectedFile) -> Result<PublishedImage, UploadError> {
        let path = self.next_storage_path(&selected.name);
        let content = transcoder::encode_payload(&selected.mime, selected.bytes());

        let request = CreateFileRequest {
            branch: self.repo.branch(),
            message: COMMIT_MESSAGE.to_string(),
            content,
            path,
            is_encode: false,
        };
        self.remote.create_file(&request).await?;

        Ok(PublishedImage {
            name: selected.name.clone(),
            url: self.cdn.cdn_url(&request.path),
        })
    }

    fn next_storage_path(&self, name: &str) -> String {
        let timestamp = chrono::Utc::now().timestamp_millis();
        let sequence = self
            .publish_config
            .sequence_suffix
            .then(|| self.sequence.fetch_add(1, Ordering::Relaxed));
        storage_path(name, timestamp, sequence)
    }
}
