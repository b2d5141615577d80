//! CDN 地址推导：存储路径 → 公网可访问地址，纯函数，不发起网络请求。

/// CDN 地址推导接口。
pub trait CdnResolver: Send + Sync {
    fn cdn_url(&self, path: &str) -> String;
}

/// 以固定前缀拼接路径的推导规则。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CdnBase {
    base: String,
}

impl CdnBase {
    pub fn new(base: impl Into<String>) -> Self {
        let mut base = base.into();
        if !base.ends_with('/') {
            base.push('/');
        }
        Self { base }
    }

    /// jsDelivr 的 GitHub 加速地址：`https://cdn.jsdelivr.net/gh/<owner>/<repo>@<branch>/`。
    pub fn jsdelivr(owner: &str, repo: &str, branch: &str) -> Self {
        Self::new(format!(
            "https://cdn.jsdelivr.net/gh/{}/{}@{}/",
            owner, repo, branch
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.base
    }
}

impl CdnResolver for CdnBase {
    fn cdn_url(&self, path: &str) -> String {
        format!("{}{}", self.base, path.trim_start_matches('/'))
    }
}
