//! User-facing notices (toasts).
//!
//! Components never print directly: they raise [`Notice`]s on a
//! [`NoticeCenter`], which mirrors them to the `log` facade and broadcasts
//! them to every subscriber (the CLI printer, tests).

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;

use crate::config::NOTICE_CAPACITY;

/// Notice level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl NoticeLevel {
    /// Prefix for terminal display.
    pub fn emoji(&self) -> &'static str {
        match self {
            NoticeLevel::Info => "ℹ️",
            NoticeLevel::Success => "✅",
            NoticeLevel::Warning => "⚠️",
            NoticeLevel::Error => "❌",
        }
    }
}

/// A single notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    /// Local time (HH:MM:SS)
    pub timestamp: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp: chrono::Local::now().format("%H:%M:%S").to_string(),
        }
    }
}

/// Broadcasts notices to all subscribers.
///
/// Cloning shares the underlying channel.
#[derive(Debug, Clone)]
pub struct NoticeCenter {
    sender: broadcast::Sender<Notice>,
}

impl NoticeCenter {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(NOTICE_CAPACITY);
        Self { sender }
    }

    /// Raise a notice.
    pub fn raise(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Error => log::error!("{}", notice.message),
            NoticeLevel::Warning => log::warn!("{}", notice.message),
            NoticeLevel::Info | NoticeLevel::Success => log::info!("{}", notice.message),
        }

        // No subscribers is fine
        let _ = self.sender.send(notice);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.raise(Notice::new(NoticeLevel::Info, message));
    }

    pub fn success(&self, message: impl Into<String>) {
        self.raise(Notice::new(NoticeLevel::Success, message));
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.raise(Notice::new(NoticeLevel::Warning, message));
    }

    pub fn error(&self, message: impl Into<String>) {
        self.raise(Notice::new(NoticeLevel::Error, message));
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.sender.subscribe()
    }

    /// Stream of notices; ends once every `NoticeCenter` clone is dropped.
    /// Lagged notices are skipped.
    pub fn stream(&self) -> impl tokio_stream::Stream<Item = Notice> + Send + 'static {
        BroadcastStream::new(self.sender.subscribe()).filter_map(|result| result.ok())
    }
}

impl Default for NoticeCenter {
    fn default() -> Self {
        Self::new()
    }
}

/// Drain every notice already queued on a receiver.
#[cfg(test)]
pub fn drain(receiver: &mut broadcast::Receiver<Notice>) -> Vec<Notice> {
    let mut notices = Vec::new();
    loop {
        match receiver.try_recv() {
            Ok(notice) => notices.push(notice),
            Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
            Err(_) => break,
        }
    }
    notices
}
