//! # 图床上传工具 — 库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │            前端 / 命令行 (main.rs, clap)                  │
//! │                                                          │
//! │  选择文件 ── 拖放 ── 预览 ── 上传 ── 复制链接             │
//! └───────┬──────────────────────────────────────────────────┘
//!         ↕ Result<T, AppError>
//! ┌───────┼──────────────────────────────────────────────────┐
//! │       ↕            后端 (Rust)                           │
//! │                                                          │
//! │  ┌─ error ────── AppError (统一错误类型)                  │
//! │  │                                                       │
//! │  ├─ settings ─── JSON 配置 + 环境变量覆盖                 │
//! │  │                                                       │
//! │  └─ uploader ─── UploadWorkflow (状态锁 + 协作者)          │
//! │      ├─ ingest       校验·读取·预览·拖放                  │
//! │      ├─ publish      存储路径·Base64·提交·CDN             │
//! │      ├─ github       GitHub contents API (reqwest)        │
//! │      ├─ clipboard    StagingGuard (RAII) + arboard        │
//! │      └─ notify       成功/警告/错误通知                   │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`error`] | 统一错误类型 `AppError`，命令行与嵌入方的返回类型 |
//! | [`settings`] | 仓库、HTTP 与路径配置的读取、保存、校验 |
//! | [`uploader`] | 图片采集、校验、预览、发布与复制链接 |

pub mod error;
pub mod settings;
pub mod uploader;
