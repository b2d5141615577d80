//! # 剪贴板模块
//!
//! ## 设计思路
//!
//! 复制流程固定为：打开暂存面 → 写入文本 → 选中并执行复制 → 移除暂存面。
//! 暂存面由 `StagingGuard` 持有，`Drop` 时移除，成功、失败、提前返回三条路径一致。
//!
//! 与系统剪贴板的交互放在阻塞线程中执行，避免阻塞 async 运行时。
//! 默认实现基于 `arboard`，不依赖任何权限弹窗。

use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use std::time::Duration;

use super::messages::{COPY_FAILED, COPY_SUCCESS, TITLE_ERROR, TITLE_SUCCESS};
use super::{UploadError, UploadWorkflow};

/// 复制用的暂存面。
pub trait ClipboardSurface {
    /// 把文本放到暂存面上。
    fn stage(&mut self, text: &str) -> Result<(), UploadError>;

    /// 选中暂存内容并执行复制；平台拒绝时返回 `Ok(false)`。
    fn select_and_copy(&mut self) -> Result<bool, UploadError>;

    /// 移除暂存面，可重复调用。
    fn remove(&mut self);
}

/// 暂存面的 RAII 守卫：离开作用域时一定移除暂存面。
pub struct StagingGuard<'a> {
    surface: &'a mut (dyn ClipboardSurface + 'static),
}

impl<'a> StagingGuard<'a> {
    pub fn new(surface: &'a mut (dyn ClipboardSurface + 'static)) -> Self {
        Self { surface }
    }
}

impl Deref for StagingGuard<'_> {
    type Target = dyn ClipboardSurface;

    fn deref(&self) -> &Self::Target {
        &*self.surface
    }
}

impl DerefMut for StagingGuard<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.surface
    }
}

impl Drop for StagingGuard<'_> {
    fn drop(&mut self) {
        self.surface.remove();
        log::debug!("🧹 已移除剪贴板暂存面");
    }
}

/// 基于 `arboard` 的系统剪贴板暂存面。
///
/// X11 / Wayland 下剪贴板内容归属于写入进程，进程退出即丢失。
/// 短生命周期的调用方（命令行）应使用 `open_holding`：写入后阻塞到其他程序
/// 接管内容或到达期限为止。
pub struct ArboardSurface {
    clipboard: Option<arboard::Clipboard>,
    staged: Option<String>,
    hold: Option<Duration>,
}

impl ArboardSurface {
    pub fn open() -> Result<Self, UploadError> {
        Self::open_with(None)
    }

    /// 写入后最多保持 `hold` 时长的剪贴板所有权。
    pub fn open_holding(hold: Duration) -> Result<Self, UploadError> {
        Self::open_with(Some(hold))
    }

    fn open_with(hold: Option<Duration>) -> Result<Self, UploadError> {
        let clipboard =
            arboard::Clipboard::new().map_err(|e| UploadError::Clipboard(e.to_string()))?;
        Ok(Self {
            clipboard: Some(clipboard),
            staged: None,
            hold,
        })
    }
}

#[cfg(all(
    unix,
    not(any(target_os = "macos", target_os = "android", target_os = "emscripten"))
))]
fn write_text(
    clipboard: &mut arboard::Clipboard,
    text: String,
    hold: Option<Duration>,
) -> Result<(), arboard::Error> {
    use arboard::SetExtLinux;
    use std::time::Instant;

    match hold {
        Some(hold) => {
            log::info!("📋 等待其他程序接管剪贴板内容，最长 {} 秒", hold.as_secs());
            clipboard
                .set()
                .wait_until(Instant::now() + hold)
                .text(text)
        }
        None => clipboard.set_text(text),
    }
}

#[cfg(not(all(
    unix,
    not(any(target_os = "macos", target_os = "android", target_os = "emscripten"))
)))]
fn write_text(
    clipboard: &mut arboard::Clipboard,
    text: String,
    _hold: Option<Duration>,
) -> Result<(), arboard::Error> {
    // 其他平台由系统持有内容，进程退出后仍然有效
    clipboard.set_text(text)
}

impl ClipboardSurface for ArboardSurface {
    fn stage(&mut self, text: &str) -> Result<(), UploadError> {
        self.staged = Some(text.to_string());
        Ok(())
    }

    fn select_and_copy(&mut self) -> Result<bool, UploadError> {
        let Some(text) = self.staged.take() else {
            return Ok(false);
        };
        let clipboard = self
            .clipboard
            .as_mut()
            .ok_or_else(|| UploadError::Clipboard("剪贴板已释放".to_string()))?;
        write_text(clipboard, text, self.hold).map_err(|e| UploadError::Clipboard(e.to_string()))?;
        Ok(true)
    }

    fn remove(&mut self) {
        self.staged = None;
        self.clipboard = None;
    }
}

type SurfaceOpener =
    Arc<dyn Fn() -> Result<Box<dyn ClipboardSurface>, UploadError> + Send + Sync>;

/// 剪贴板助手：每次复制打开一个新的暂存面。
#[derive(Clone)]
pub struct ClipboardHelper {
    open: SurfaceOpener,
}

impl ClipboardHelper {
    /// 使用系统剪贴板。
    pub fn system() -> Self {
        Self::with_opener(|| {
            ArboardSurface::open().map(|s| Box::new(s) as Box<dyn ClipboardSurface>)
        })
    }

    /// 使用系统剪贴板，写入后保持所有权直到被接管或超过 `hold`。
    pub fn system_holding(hold: Duration) -> Self {
        Self::with_opener(move || {
            ArboardSurface::open_holding(hold).map(|s| Box::new(s) as Box<dyn ClipboardSurface>)
        })
    }

    /// 使用自定义暂存面（测试或其他平台）。
    pub fn with_opener<F>(open: F) -> Self
    where
        F: Fn() -> Result<Box<dyn ClipboardSurface>, UploadError> + Send + Sync + 'static,
    {
        Self {
            open: Arc::new(open),
        }
    }

    pub async fn copy(&self, text: &str) -> Result<(), UploadError> {
        let open = Arc::clone(&self.open);
        let text = text.to_string();
        tokio::task::spawn_blocking(move || copy_blocking(open.as_ref(), &text))
            .await
            .map_err(|e| UploadError::Clipboard(format!("剪贴板线程异常：{}", e)))?
    }
}

impl Default for ClipboardHelper {
    fn default() -> Self {
        Self::system()
    }
}

fn copy_blocking(
    open: &(dyn Fn() -> Result<Box<dyn ClipboardSurface>, UploadError> + Send + Sync),
    text: &str,
) -> Result<(), UploadError> {
    let mut surface = open()?;
    let mut guard = StagingGuard::new(surface.as_mut());
    guard.stage(text)?;
    if guard.select_and_copy()? {
        Ok(())
    } else {
        Err(UploadError::Clipboard("系统拒绝了复制操作".to_string()))
    }
}

impl UploadWorkflow {
    /// 复制地址到剪贴板并发出结果通知。
    pub async fn copy_url(&self, url: &str) -> Result<(), UploadError> {
        match self.clipboard.copy(url).await {
            Ok(()) => {
                log::info!("📋 已复制链接到剪贴板");
                self.notifier.success(TITLE_SUCCESS, COPY_SUCCESS);
                Ok(())
            }
            Err(err) => {
                log::error!("❌ 复制失败: {}", err);
                self.notifier.error(TITLE_ERROR, COPY_FAILED);
                Err(err)
            }
        }
    }
}
