//! 远端仓库协作接口。
//!
//! 发布流水线只依赖这里的 trait，具体仓库（GitHub 等）由 `github` 模块实现。

use async_trait::async_trait;
use serde::Serialize;

use super::UploadError;

/// 创建文件请求。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateFileRequest {
    pub branch: String,
    pub message: String,
    /// 文件内容；`is_encode == false` 时已是 Base64。
    pub content: String,
    pub path: String,
    /// 是否需要客户端先把 `content` 编码为 Base64。
    pub is_encode: bool,
}

/// 远端仓库创建文件接口。
#[async_trait]
pub trait RemoteRepository: Send + Sync {
    async fn create_file(&self, request: &CreateFileRequest) -> Result<(), UploadError>;
}

/// 图片仓库配置访问器。
pub trait ImageRepoProvider: Send + Sync {
    /// 上传目标分支。
    fn branch(&self) -> String;
}
