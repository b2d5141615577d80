//! # 错误模型模块
//!
//! ## 设计思路
//!
//! 使用单一错误枚举承载上传链路中的所有错误来源，避免字符串拼接式错误处理。
//! 通过 `thiserror` 保持人类可读错误，同时让调用侧可按分支匹配。
//!
//! 面向用户的提示文案统一由 `messages` 模块给出，这里的 `Display`
//! 只用于日志与诊断，不直接展示给最终用户。

use serde::Serialize;

/// 文件校验失败原因。
///
/// `Display` 输出即为提示文案中文件名之后的部分，
/// 例如 `不是支持的图片格式`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(rename_all = "snake_case")]
pub enum ValidationError {
    #[error("不是支持的图片格式")]
    UnsupportedType,

    #[error("超过 10MB 大小限制")]
    TooLarge,

    /// 文件已通过校验，但读取内容生成预览时失败。
    #[error("读取失败，请重新选择")]
    ReadFailed,
}

/// 上传链路统一错误类型。
///
/// 该类型会在命令层被上转为 `AppError`。
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("文件 \"{name}\" {reason}")]
    Validation { name: String, reason: ValidationError },

    #[error("没有已选择的图片")]
    NoSelection,

    #[error("已有上传任务进行中")]
    Busy,

    /// 上传完成时所属的选择已被移除或重置，结果被丢弃。
    #[error("上传结果已过期：{url}")]
    Superseded { url: String },

    #[error("文件错误：{0}")]
    FileSystem(String),

    #[error("网络错误：{0}")]
    Network(String),

    #[error("远端仓库拒绝写入（HTTP {status}）：{message}")]
    Remote { status: u16, message: String },

    #[error("格式错误：{0}")]
    InvalidFormat(String),

    #[error("剪贴板错误：{0}")]
    Clipboard(String),

    #[error("状态错误：{0}")]
    State(String),
}

impl UploadError {
    /// 稳定错误码，供前端或脚本按类型分支。
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation { reason, .. } => match reason {
                ValidationError::UnsupportedType => "unsupported_type",
                ValidationError::TooLarge => "too_large",
                ValidationError::ReadFailed => "read_failed",
            },
            Self::NoSelection => "no_selection",
            Self::Busy => "busy",
            Self::Superseded { .. } => "superseded",
            Self::FileSystem(_) => "file_system",
            Self::Network(_) => "network",
            Self::Remote { .. } => "remote_rejected",
            Self::InvalidFormat(_) => "invalid_format",
            Self::Clipboard(_) => "clipboard",
            Self::State(_) => "state",
        }
    }

    /// 出错所在阶段。
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Validation { .. } | Self::FileSystem(_) => "ingest",
            Self::NoSelection | Self::Busy | Self::Superseded { .. } => "publish",
            Self::Network(_) | Self::Remote { .. } | Self::InvalidFormat(_) => "remote",
            Self::Clipboard(_) => "clipboard",
            Self::State(_) => "state",
        }
    }

    /// 是否属于远端提交失败（重试同一文件即可恢复）。
    pub fn is_publish_failure(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::Remote { .. } | Self::InvalidFormat(_)
        )
    }
}

impl From<UploadError> for String {
    fn from(error: UploadError) -> Self {
        error.to_string()
    }
}
