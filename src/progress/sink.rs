//! ProgressSink and its implementations

use tokio::sync::mpsc;
use tracing::{debug, info};

/// Receives human-readable status lines
pub trait ProgressSink: Send + Sync {
    fn notify(&self, message: &str);
}

/// Discards every notification
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn notify(&self, _message: &str) {}
}

/// Writes notifications to the log at INFO
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl ProgressSink for LogSink {
    fn notify(&self, message: &str) {
        info!(progress = message, "Pipeline progress");
    }
}

/// Forwards notifications to an unbounded channel
///
/// A dropped receiver is not an error; later notifications are discarded.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::UnboundedSender<String>) -> Self {
        Self { tx }
    }

    /// Sink plus the receiving end of its channel
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

impl ProgressSink for ChannelSink {
    fn notify(&self, message: &str) {
        if self.tx.send(message.to_string()).is_err() {
            debug!("ChannelSink::notify: receiver dropped");
        }
    }
}

/// Keeps every notification in memory for assertions
#[cfg(test)]
#[derive(Debug, Default)]
pub struct CollectingSink {
    messages: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl CollectingSink {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().map(|m| m.clone()).unwrap_or_default()
    }
}

#[cfg(test)]
impl ProgressSink for CollectingSink {
    fn notify(&self, message: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(message.to_string());
        }
    }
}
