//! 上传配置的读取、保存与校验
//!
//! # 设计思路
//!
//! 配置保存在 JSON 文件中，文件不存在时回退到默认值，格式错误时明确报错。
//! 令牌等敏感信息可通过环境变量覆盖，避免写入配置文件。
//!
//! # 实现思路
//!
//! - 默认路径：系统配置目录下的 `pic-uploader/settings.json`。
//! - 环境变量覆盖通过可注入的查找函数实现，测试无需修改进程环境。
//! - `validate` 在构建客户端之前执行，保证错误尽早暴露。

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::uploader::{CdnBase, GitHubConfig, PublishConfig};

pub const ENV_TOKEN: &str = "PIC_UPLOADER_TOKEN";
pub const ENV_BRANCH: &str = "PIC_UPLOADER_BRANCH";
pub const ENV_CDN_BASE: &str = "PIC_UPLOADER_CDN_BASE";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepoSettings {
    pub owner: String,
    pub name: String,
    pub branch: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    pub api_base: String,
    /// 未设置时使用 jsDelivr 的 GitHub 加速地址。
    pub cdn_base: Option<String>,
}

impl Default for RepoSettings {
    fn default() -> Self {
        Self {
            owner: String::new(),
            name: String::new(),
            branch: "main".to_string(),
            token: None,
            api_base: "https://api.github.com".to_string(),
            cdn_base: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    pub connect_timeout_secs: u64,
    /// 整体请求超时；不设置时完全交给传输层。
    pub request_timeout_secs: Option<u64>,
    pub user_agent: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        let defaults = GitHubConfig::default();
        Self {
            connect_timeout_secs: defaults.connect_timeout,
            request_timeout_secs: defaults.request_timeout,
            user_agent: defaults.user_agent,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathSettings {
    pub sequence_suffix: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploaderSettings {
    pub repo: RepoSettings,
    pub http: HttpSettings,
    pub path: PathSettings,
}

/// 默认配置文件路径。
pub fn default_settings_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pic-uploader")
        .join("settings.json")
}

impl UploaderSettings {
    /// 从文件读取配置；文件不存在时返回默认配置。
    pub fn load_from_path(path: &Path) -> Result<Self, AppError> {
        if !path.exists() {
            log::info!("⚙️ 配置文件不存在，使用默认配置 - 路径: {}", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| AppError::Config(format!("解析配置文件 '{}' 失败: {}", path.display(), e)))
    }

    pub fn save_to_path(&self, path: &Path) -> Result<(), AppError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| AppError::Config(format!("序列化配置失败: {}", e)))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// 用环境变量覆盖令牌、分支与 CDN 前缀。
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(token) = non_empty(ENV_TOKEN) {
            self.repo.token = Some(token);
        }
        if let Some(branch) = non_empty(ENV_BRANCH) {
            self.repo.branch = branch;
        }
        if let Some(cdn_base) = non_empty(ENV_CDN_BASE) {
            self.repo.cdn_base = Some(cdn_base);
        }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.repo.owner.trim().is_empty() || self.repo.name.trim().is_empty() {
            return Err(AppError::Config("repo.owner 与 repo.name 不能为空".to_string()));
        }
        if self.repo.branch.trim().is_empty() {
            return Err(AppError::Config("repo.branch 不能为空".to_string()));
        }
        if !(1..=120).contains(&self.http.connect_timeout_secs) {
            return Err(AppError::Config(
                "http.connect_timeout_secs 必须在 1~120 秒之间".to_string(),
            ));
        }
        if let Some(secs) = self.http.request_timeout_secs {
            if !(1..=600).contains(&secs) {
                return Err(AppError::Config(
                    "http.request_timeout_secs 必须在 1~600 秒之间".to_string(),
                ));
            }
        }
        reqwest::Url::parse(&self.repo.api_base)
            .map_err(|e| AppError::Config(format!("repo.api_base 格式错误: {}", e)))?;
        Ok(())
    }

    pub fn github_config(&self) -> GitHubConfig {
        GitHubConfig {
            api_base: self.repo.api_base.clone(),
            owner: self.repo.owner.clone(),
            repo: self.repo.name.clone(),
            branch: self.repo.branch.clone(),
            token: self.repo.token.clone(),
            connect_timeout: self.http.connect_timeout_secs,
            request_timeout: self.http.request_timeout_secs,
            user_agent: self.http.user_agent.clone(),
        }
    }

    pub fn cdn_base(&self) -> CdnBase {
        match self.repo.cdn_base.as_deref().filter(|b| !b.trim().is_empty()) {
            Some(base) => CdnBase::new(base),
            None => CdnBase::jsdelivr(&self.repo.owner, &self.repo.name, &self.repo.branch),
        }
    }

    pub fn publish_config(&self) -> PublishConfig {
        PublishConfig {
            sequence_suffix: self.path.sequence_suffix,
        }
    }
}
