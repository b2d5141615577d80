//! # GitHub 仓库客户端
//!
//! ## 实现思路
//!
//! 通过 contents 接口创建文件：
//! `PUT {api_base}/repos/{owner}/{repo}/contents/{path}`，
//! 请求体为 `{ message, content, branch }`，其中 `content` 必须是 Base64。
//!
//! - `is_encode == true` 时由客户端先编码；否则视为已编码，原样发送。
//! - 非 2xx 响应映射为 `UploadError::Remote`，传输层错误映射为 `UploadError::Network`。
//! - 日志中的地址去掉查询串与片段，令牌只放在请求头中。

use std::borrow::Cow;
use std::time::Duration;

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose};
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};

use super::remote::{CreateFileRequest, ImageRepoProvider, RemoteRepository};
use super::UploadError;

const ERROR_BODY_LOG_LIMIT: usize = 200;

/// GitHub 客户端配置。
#[derive(Debug, Clone)]
pub struct GitHubConfig {
    pub api_base: String,
    pub owner: String,
    pub repo: String,
    pub branch: String,
    pub token: Option<String>,
    /// 建立连接（TCP/TLS）超时时间（秒）。
    pub connect_timeout: u64,
    /// 整体请求超时（秒）；`None` 表示交给传输层自身处理。
    pub request_timeout: Option<u64>,
    pub user_agent: String,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.github.com".to_string(),
            owner: String::new(),
            repo: String::new(),
            branch: "main".to_string(),
            token: None,
            connect_timeout: 8,
            request_timeout: None,
            user_agent: concat!("pic-uploader/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[derive(Serialize)]
struct ContentsPayload<'a> {
    message: &'a str,
    content: Cow<'a, str>,
    branch: &'a str,
}

#[derive(Deserialize)]
struct GitHubErrorBody {
    message: String,
}

/// GitHub contents 接口客户端。
pub struct GitHubRepository {
    client: reqwest::Client,
    config: GitHubConfig,
}

impl GitHubRepository {
    pub fn new(config: GitHubConfig) -> Result<Self, UploadError> {
        let mut builder = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout))
            .user_agent(config.user_agent.clone());
        if let Some(secs) = config.request_timeout {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| UploadError::Network(format!("创建 HTTP 客户端失败：{}", e)))?;

        Ok(Self { client, config })
    }

    /// 拼接 contents 接口地址，逐段追加以正确转义文件名。
    fn contents_url(&self, path: &str) -> Result<Url, UploadError> {
        let mut url = Url::parse(&self.config.api_base)
            .map_err(|e| UploadError::InvalidFormat(format!("API 地址格式错误：{}", e)))?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| UploadError::InvalidFormat("API 地址不能作为基础路径".to_string()))?;
            segments
                .pop_if_empty()
                .extend(["repos", self.config.owner.as_str(), self.config.repo.as_str(), "contents"])
                .extend(path.split('/').filter(|s| !s.is_empty()));
        }
        Ok(url)
    }

    fn redact_url_for_log(url: &Url) -> String {
        let mut redacted = url.clone();
        redacted.set_query(None);
        redacted.set_fragment(None);
        redacted.to_string()
    }

    fn describe_failure(status: StatusCode, body: &str) -> String {
        if let Ok(parsed) = serde_json::from_str::<GitHubErrorBody>(body) {
            return parsed.message;
        }
        let trimmed: String = body.chars().take(ERROR_BODY_LOG_LIMIT).collect();
        if trimmed.is_empty() {
            status
                .canonical_reason()
                .unwrap_or("unknown")
                .to_string()
        } else {
            trimmed
        }
    }
}

#[async_trait]
impl RemoteRepository for GitHubRepository {
    async fn create_file(&self, request: &CreateFileRequest) -> Result<(), UploadError> {
        let url = self.contents_url(&request.path)?;
        let content = if request.is_encode {
            Cow::Owned(general_purpose::STANDARD.encode(request.content.as_bytes()))
        } else {
            Cow::Borrowed(request.content.as_str())
        };
        let payload = ContentsPayload {
            message: &request.message,
            content,
            branch: &request.branch,
        };

        log::info!(
            "🌐 提交文件到远端仓库 - URL: {} 分支: {} 负载: {} 字节",
            Self::redact_url_for_log(&url),
            request.branch,
            payload.content.len()
        );

        let mut builder = self
            .client
            .put(url.clone())
            .header("Accept", "application/vnd.github+json")
            .json(&payload);
        if let Some(token) = self.config.token.as_deref().filter(|t| !t.is_empty()) {
            builder = builder.header("Authorization", format!("token {}", token));
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                UploadError::Network(format!("请求超时：{}", e))
            } else {
                UploadError::Network(e.to_string())
            }
        })?;

        let status = response.status();
        if status.is_success() {
            log::info!("✅ 远端仓库已创建文件 - 路径: {} 状态: {}", request.path, status);
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        let message = Self::describe_failure(status, &body);
        log::warn!(
            "⚠️ 远端仓库拒绝写入 - URL: {} 状态: {} 信息: {}",
            Self::redact_url_for_log(&url),
            status,
            message
        );
        Err(UploadError::Remote {
            status: status.as_u16(),
            message,
        })
    }
}

impl ImageRepoProvider for GitHubRepository {
    fn branch(&self) -> String {
        self.config.branch.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::{TcpListener, TcpStream};
    use std::thread;

    /// 读取完整的 HTTP 请求（头 + Content-Length 指定的体）。
    fn read_request(stream: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = stream.read(&mut chunk).expect("read request failed");
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);

            let text = String::from_utf8_lossy(&buf);
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text[..header_end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if buf.len() >= header_end + 4 + content_length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn serve_once(status_line: &'static str, body: &'static str) -> (u16, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind test server failed");
        let port = listener.local_addr().expect("read local addr failed").port();

        let server = thread::spawn(move || {
            let (mut stream, _) = listener.accept().expect("accept failed");
            let request = read_request(&mut stream);
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            stream
                .write_all(response.as_bytes())
                .expect("write response failed");
            stream.flush().expect("flush failed");
            request
        });

        (port, server)
    }

    fn repository(port: u16, token: Option<&str>) -> GitHubRepository {
        GitHubRepository::new(GitHubConfig {
            api_base: format!("http://127.0.0.1:{}", port),
            owner: "octo".to_string(),
            repo: "pics".to_string(),
            branch: "main".to_string(),
            token: token.map(str::to_string),
            ..GitHubConfig::default()
        })
        .expect("client init failed")
    }

    fn request(path: &str, content: &str, is_encode: bool) -> CreateFileRequest {
        CreateFileRequest {
            branch: "main".to_string(),
            message: "create image".to_string(),
            content: content.to_string(),
            path: path.to_string(),
            is_encode,
        }
    }

    #[tokio::test]
    async fn create_file_puts_contents_payload() {
        let (port, server) = serve_once("201 Created", r#"{"content":{}}"#);
        let repo = repository(port, Some("secret"));

        repo.create_file(&request("images/1700000000000.png", "aGVsbG8=", false))
            .await
            .expect("create file should succeed");

        let raw = server.join().expect("server thread failed");
        let lower = raw.to_ascii_lowercase();
        assert!(raw.starts_with("PUT /repos/octo/pics/contents/images/1700000000000.png HTTP/1.1"));
        assert!(lower.contains("authorization: token secret"));
        assert!(raw.contains(r#""content":"aGVsbG8=""#));
        assert!(raw.contains(r#""branch":"main""#));
        assert!(raw.contains(r#""message":"create image""#));
    }

    #[tokio::test]
    async fn create_file_encodes_when_requested() {
        let (port, server) = serve_once("201 Created", "{}");
        let repo = repository(port, None);

        repo.create_file(&request("notes/a.txt", "hello", true))
            .await
            .expect("create file should succeed");

        let raw = server.join().expect("server thread failed");
        assert!(raw.contains(r#""content":"aGVsbG8=""#));
        assert!(!raw.to_ascii_lowercase().contains("authorization:"));
    }

    #[tokio::test]
    async fn rejected_request_maps_to_remote_error() {
        let (port, server) = serve_once(
            "422 Unprocessable Entity",
            r#"{"message":"Invalid request.\n\n\"sha\" wasn't supplied."}"#,
        );
        let repo = repository(port, Some("secret"));

        let result = repo.create_file(&request("images/1.png", "AAAA", false)).await;
        server.join().expect("server thread failed");

        match result {
            Err(UploadError::Remote { status, message }) => {
                assert_eq!(status, 422);
                assert!(message.starts_with("Invalid request."));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn unreachable_host_maps_to_network_error() {
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").expect("bind failed");
            listener.local_addr().expect("addr").port()
        };
        let repo = repository(port, None);

        let result = repo.create_file(&request("images/1.png", "AAAA", false)).await;
        assert!(matches!(result, Err(UploadError::Network(_))));
    }

    #[test]
    fn contents_url_escapes_file_names() {
        let repo = repository(1, None);
        let url = repo.contents_url("images/my photo.png").expect("url");
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:1/repos/octo/pics/contents/images/my%20photo.png"
        );
    }

    #[test]
    fn describe_failure_falls_back_to_reason() {
        assert_eq!(
            GitHubRepository::describe_failure(StatusCode::NOT_FOUND, ""),
            "Not Found"
        );
        assert_eq!(
            GitHubRepository::describe_failure(StatusCode::BAD_GATEWAY, "upstream down"),
            "upstream down"
        );
    }

    #[test]
    fn branch_comes_from_config() {
        assert_eq!(repository(1, None).branch(), "main");
    }
}
