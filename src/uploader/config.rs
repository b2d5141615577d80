//! # 配置模块
//!
//! ## 设计思路
//!
//! 校验策略（允许的 MIME 类型与体积上限）在进程生命周期内不可变，
//! 因此以 `const` 形式给出；可调整的部分（路径后缀策略）集中到 `PublishConfig`。

/// 允许上传的图片 MIME 类型。
pub const SUPPORTED_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];

/// 单个文件体积上限（10 MiB，含边界）。
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// 提交到远端仓库时使用的固定提交信息。
pub const COMMIT_MESSAGE: &str = "create image";

/// 远端仓库中存放图片的目录。
pub const STORAGE_DIR: &str = "images";

/// 原文件名没有扩展名时使用的默认扩展名。
pub const DEFAULT_EXTENSION: &str = "jpg";

/// 文件校验策略。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationPolicy {
    pub allowed_types: &'static [&'static str],
    pub max_file_size: u64,
}

impl ValidationPolicy {
    pub const STANDARD: Self = Self {
        allowed_types: SUPPORTED_TYPES,
        max_file_size: MAX_FILE_SIZE,
    };

    pub fn allows_type(&self, mime: &str) -> bool {
        self.allowed_types.contains(&mime)
    }
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// 发布阶段配置。
#[derive(Debug, Clone, Default)]
pub struct PublishConfig {
    /// 在时间戳后追加自增序号（`images/<ts>-<seq>.<ext>`）。
    ///
    /// 手动单张上传时毫秒时间戳足够唯一；批量或自动化场景应开启。
    pub sequence_suffix: bool,
}
