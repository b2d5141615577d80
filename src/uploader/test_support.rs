//! 单元测试共用的替身实现。

use std::io::Cursor;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgba};
use tokio::sync::Notify;

use super::cdn::CdnBase;
use super::clipboard::{ClipboardHelper, ClipboardSurface};
use super::notify::BufferedNotifier;
use super::remote::{CreateFileRequest, ImageRepoProvider, RemoteRepository};
use super::source::PickedFile;
use super::{UploadError, UploadWorkflow};

pub(crate) const TEST_CDN: &str = "https://cdn.example.com/";

pub(crate) struct FakeRemote {
    requests: Mutex<Vec<CreateFileRequest>>,
    fail: AtomicBool,
    gate: Option<Arc<Notify>>,
}

impl FakeRemote {
    pub(crate) fn new(fail: bool) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            fail: AtomicBool::new(fail),
            gate: None,
        }
    }

    pub(crate) fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn requests(&self) -> Vec<CreateFileRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl RemoteRepository for FakeRemote {
    async fn create_file(&self, request: &CreateFileRequest) -> Result<(), UploadError> {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.requests.lock().unwrap().push(request.clone());
        if self.fail.load(Ordering::SeqCst) {
            Err(UploadError::Remote {
                status: 500,
                message: "boom".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

impl ImageRepoProvider for FakeRemote {
    fn branch(&self) -> String {
        "main".to_string()
    }
}

struct RecordingSurface {
    copied: Arc<Mutex<Vec<String>>>,
    staged: Option<String>,
}

impl ClipboardSurface for RecordingSurface {
    fn stage(&mut self, text: &str) -> Result<(), UploadError> {
        self.staged = Some(text.to_string());
        Ok(())
    }

    fn select_and_copy(&mut self) -> Result<bool, UploadError> {
        match self.staged.take() {
            Some(text) => {
                self.copied.lock().unwrap().push(text);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn remove(&mut self) {
        self.staged = None;
    }
}

pub(crate) fn recording_clipboard() -> (ClipboardHelper, Arc<Mutex<Vec<String>>>) {
    let copied = Arc::new(Mutex::new(Vec::new()));
    let shared = Arc::clone(&copied);
    let helper = ClipboardHelper::with_opener(move || {
        Ok(Box::new(RecordingSurface {
            copied: Arc::clone(&shared),
            staged: None,
        }) as Box<dyn ClipboardSurface>)
    });
    (helper, copied)
}

fn build(remote: Arc<FakeRemote>) -> (UploadWorkflow, Arc<FakeRemote>, Arc<BufferedNotifier>) {
    let notifier = Arc::new(BufferedNotifier::new());
    let (clipboard, _) = recording_clipboard();
    let workflow = UploadWorkflow::new(
        Arc::clone(&remote) as Arc<dyn RemoteRepository>,
        Arc::clone(&remote) as Arc<dyn ImageRepoProvider>,
        Arc::new(CdnBase::new(TEST_CDN)),
        Arc::clone(&notifier) as Arc<dyn super::Notifier>,
    )
    .with_clipboard(clipboard);
    (workflow, remote, notifier)
}

pub(crate) fn workflow_with(fail: bool) -> (UploadWorkflow, Arc<FakeRemote>, Arc<BufferedNotifier>) {
    build(Arc::new(FakeRemote::new(fail)))
}

/// 远端调用会挂起，直到 `Notify` 放行。
pub(crate) fn gated_workflow() -> (
    UploadWorkflow,
    Arc<FakeRemote>,
    Arc<BufferedNotifier>,
    Arc<Notify>,
) {
    let gate = Arc::new(Notify::new());
    let remote = Arc::new(FakeRemote {
        requests: Mutex::new(Vec::new()),
        fail: AtomicBool::new(false),
        gate: Some(Arc::clone(&gate)),
    });
    let (workflow, remote, notifier) = build(remote);
    (workflow, remote, notifier, gate)
}

pub(crate) fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = ImageBuffer::from_fn(width, height, |x, y| {
        Rgba([(x % 255) as u8, (y % 255) as u8, ((x + y) % 255) as u8, 255])
    });
    let mut cursor = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(img)
        .write_to(&mut cursor, ImageFormat::Png)
        .expect("failed to encode test image");
    cursor.into_inner()
}

pub(crate) fn png_file(name: &str) -> PickedFile {
    PickedFile::from_bytes(name, "image/png", png_bytes(8, 4))
}
