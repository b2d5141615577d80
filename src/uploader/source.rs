//! # 数据源与中间模型
//!
//! ## 设计思路
//!
//! 将“外部输入”和“流水线中间结果”解耦：
//! - `PickedFile` 表示文件选择器或拖放给出的文件句柄（声明的类型与体积）
//! - `SelectedFile` 表示已通过校验、已生成预览、等待发布的文件
//! - `PublishedImage` 表示一次成功发布的结果

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;
use tokio::io::AsyncReadExt;

use super::UploadError;

/// 文件内容来源。
#[derive(Debug, Clone)]
pub enum FileContent {
    /// 本地路径，读取延迟到校验通过之后。
    Path(PathBuf),
    /// 已在内存中的字节（拖放、粘贴等来源）。
    Bytes(Vec<u8>),
}

/// 选择器或拖放给出的文件句柄。
#[derive(Debug, Clone)]
pub struct PickedFile {
    pub name: String,
    /// 声明的 MIME 类型。
    pub mime: String,
    /// 声明的字节数。
    pub size: u64,
    pub content: FileContent,
}

impl PickedFile {
    pub fn from_bytes(name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            size: bytes.len() as u64,
            content: FileContent::Bytes(bytes),
        }
    }

    /// 从本地路径构建句柄，只读取 metadata，不读取内容。
    ///
    /// MIME 类型按扩展名推断；扩展名未知时再按文件头嗅探。
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, UploadError> {
        let path = path.as_ref();
        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| UploadError::FileSystem(format!("无法读取文件信息：{}", e)))?;
        if !metadata.is_file() {
            return Err(UploadError::FileSystem(format!(
                "不是普通文件：{}",
                path.display()
            )));
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());

        let mime = match mime_from_extension(&name) {
            Some(mime) => mime.to_string(),
            None => sniff_mime_from_path(path).await,
        };

        Ok(Self {
            name,
            mime,
            size: metadata.len(),
            content: FileContent::Path(path.to_path_buf()),
        })
    }

    /// 异步读取完整内容。
    pub(crate) async fn read_bytes(&self) -> Result<Vec<u8>, UploadError> {
        match &self.content {
            FileContent::Bytes(bytes) => Ok(bytes.clone()),
            FileContent::Path(path) => tokio::fs::read(path)
                .await
                .map_err(|e| UploadError::FileSystem(format!("无法读取图片文件：{}", e))),
        }
    }
}

fn mime_from_extension(name: &str) -> Option<&'static str> {
    let (_, ext) = name.rsplit_once('.')?;
    match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" | "jfif" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        "svg" => Some("image/svg+xml"),
        "ico" => Some("image/x-icon"),
        "avif" => Some("image/avif"),
        "tif" | "tiff" => Some("image/tiff"),
        "txt" => Some("text/plain"),
        "pdf" => Some("application/pdf"),
        _ => None,
    }
}

/// 只读取文件头部用于嗅探。
const SNIFF_LIMIT: u64 = 8192;

async fn sniff_mime_from_path(path: &Path) -> String {
    let mut head = Vec::new();
    let read = async {
        let file = tokio::fs::File::open(path).await?;
        file.take(SNIFF_LIMIT).read_to_end(&mut head).await
    };
    if let Err(e) = read.await {
        log::debug!("嗅探文件类型失败 - 路径: {} 错误: {}", path.display(), e);
    }

    infer::get(&head)
        .map(|kind| kind.mime_type().to_string())
        .unwrap_or_else(|| "application/octet-stream".to_string())
}

/// 已通过校验、等待发布的文件。
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub name: String,
    pub mime: String,
    pub size: u64,
    /// 可直接渲染的预览地址（`data:<mime>;base64,...`）。
    pub preview_url: String,
    /// 图片头中读取到的宽高，无法识别时为 `None`。
    pub dimensions: Option<(u32, u32)>,
    pub(crate) bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// 成功发布的图片。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishedImage {
    pub name: String,
    pub url: String,
}

/// 平台文件选择器。
///
/// 用户取消时返回 `Ok(None)`。
#[async_trait]
pub trait FileChooser: Send + Sync {
    async fn choose(&self) -> Result<Option<PickedFile>, UploadError>;
}

/// 由命令行参数给出路径的选择器。
pub struct PathChooser {
    path: Option<PathBuf>,
}

impl PathChooser {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    pub fn cancelled() -> Self {
        Self { path: None }
    }
}

#[async_trait]
impl FileChooser for PathChooser {
    async fn choose(&self) -> Result<Option<PickedFile>, UploadError> {
        match &self.path {
            Some(path) => PickedFile::from_path(path).await.map(Some),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str, bytes: &[u8]) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "pic_uploader_source_{}_{}",
            std::process::id(),
            chrono::Utc::now().timestamp_nanos_opt().unwrap_or(0)
        ));
        std::fs::create_dir_all(&dir).expect("create temp dir failed");
        let path = dir.join(name);
        std::fs::write(&path, bytes).expect("write temp file failed");
        path
    }

    #[test]
    fn mime_from_extension_is_case_insensitive() {
        assert_eq!(mime_from_extension("photo.PNG"), Some("image/png"));
        assert_eq!(mime_from_extension("a.jpeg"), Some("image/jpeg"));
        assert_eq!(mime_from_extension("noext"), None);
        assert_eq!(mime_from_extension("archive.xyz"), None);
    }

    #[tokio::test]
    async fn from_path_reads_metadata_and_infers_type() {
        let path = temp_file("cat.webp", b"RIFF\0\0\0\0WEBPVP8 ");
        let picked = PickedFile::from_path(&path).await.expect("picked file");

        assert_eq!(picked.name, "cat.webp");
        assert_eq!(picked.mime, "image/webp");
        assert_eq!(picked.size, 16);
    }

    #[tokio::test]
    async fn from_path_sniffs_unknown_extension() {
        let png_signature = [137_u8, 80, 78, 71, 13, 10, 26, 10, 0, 0, 0, 13, 73, 72, 68, 82];
        let path = temp_file("screenshot.bin", &png_signature);
        let picked = PickedFile::from_path(&path).await.expect("picked file");

        assert_eq!(picked.mime, "image/png");
    }

    #[tokio::test]
    async fn from_path_rejects_missing_file() {
        let result = PickedFile::from_path("/definitely/not/here.png").await;
        assert!(matches!(result, Err(UploadError::FileSystem(_))));
    }

    #[tokio::test]
    async fn path_chooser_cancel_yields_none() {
        let chosen = PathChooser::cancelled().choose().await.expect("choose");
        assert!(chosen.is_none());
    }

    #[tokio::test]
    async fn read_bytes_returns_file_content() {
        let path = temp_file("a.gif", b"GIF89a");
        let picked = PickedFile::from_path(&path).await.expect("picked file");
        assert_eq!(picked.read_bytes().await.expect("read"), b"GIF89a");
    }
}
