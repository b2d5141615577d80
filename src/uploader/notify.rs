//! 通知出口。
//!
//! 上传链路只“发出”通知，不关心展示方式，也不消费返回值。

use std::sync::Mutex;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub body: String,
}

pub trait Notifier: Send + Sync {
    fn notify(&self, level: NotificationLevel, title: &str, body: &str);

    fn success(&self, title: &str, body: &str) {
        self.notify(NotificationLevel::Success, title, body);
    }

    fn warning(&self, title: &str, body: &str) {
        self.notify(NotificationLevel::Warning, title, body);
    }

    fn error(&self, title: &str, body: &str) {
        self.notify(NotificationLevel::Error, title, body);
    }
}

/// 把通知写入日志。
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, level: NotificationLevel, title: &str, body: &str) {
        match level {
            NotificationLevel::Success => log::info!("🔔 [{}] {}", title, body),
            NotificationLevel::Warning => log::warn!("🔔 [{}] {}", title, body),
            NotificationLevel::Error => log::error!("🔔 [{}] {}", title, body),
        }
    }
}

/// 缓存通知，供前端轮询取走。
#[derive(Debug, Default)]
pub struct BufferedNotifier {
    queue: Mutex<Vec<Notification>>,
}

impl BufferedNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// 取走并清空已缓存的通知。
    pub fn drain(&self) -> Vec<Notification> {
        match self.queue.lock() {
            Ok(mut queue) => std::mem::take(&mut *queue),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl Notifier for BufferedNotifier {
    fn notify(&self, level: NotificationLevel, title: &str, body: &str) {
        let notification = Notification {
            level,
            title: title.to_string(),
            body: body.to_string(),
        };
        match self.queue.lock() {
            Ok(mut queue) => queue.push(notification),
            Err(poisoned) => poisoned.into_inner().push(notification),
        }
    }
}
