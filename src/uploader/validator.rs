//! 文件校验。
//!
//! 纯函数，按顺序执行规则，第一个失败即返回。
//! 仅用于客户端提示，远端仓库不应依赖这里的结果做安全判断。

use super::config::ValidationPolicy;
use super::error::ValidationError;
use super::source::PickedFile;

/// 按策略校验声明的 MIME 类型与体积。
///
/// 1. 类型不在允许列表内 → `UnsupportedType`
/// 2. 体积大于上限 → `TooLarge`（等于上限时通过）
pub fn validate(policy: &ValidationPolicy, mime: &str, size: u64) -> Result<(), ValidationError> {
    if !policy.allows_type(mime) {
        return Err(ValidationError::UnsupportedType);
    }
    if size > policy.max_file_size {
        return Err(ValidationError::TooLarge);
    }
    Ok(())
}

pub fn validate_file(policy: &ValidationPolicy, file: &PickedFile) -> Result<(), ValidationError> {
    validate(policy, &file.mime, file.size)
}
