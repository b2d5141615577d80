//! 面向用户的提示文案。
//!
//! 每类错误只对应一条固定文案，底层错误细节只进日志。

use super::error::ValidationError;

pub const TITLE_SUCCESS: &str = "成功";
pub const TITLE_WARNING: &str = "警告";
pub const TITLE_ERROR: &str = "错误";

pub const NO_SELECTION: &str = "请先选择要上传的图片";
pub const UPLOAD_BUSY: &str = "图片正在上传中，请稍候";
pub const UPLOAD_SUCCESS: &str = "图片上传成功";
pub const UPLOAD_FAILED: &str = "图片上传失败，请重试";
pub const COPY_SUCCESS: &str = "链接已复制到剪贴板";
pub const COPY_FAILED: &str = "复制失败，请手动复制";

/// 文件被拒绝时的提示，包含文件名与具体原因。
pub fn rejection(name: &str, reason: ValidationError) -> String {
    format!("文件 \"{}\" {}", name, reason)
}
