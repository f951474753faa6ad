// core/src/notify.rs

//! Side-channel for human-readable mutation feedback. Not part of the core
//! rules; presentation layers decide how to render the messages (toasts in
//! the reference frontend).

/// Receives one message per attempted mutation.
pub trait NotificationSink: Send + Sync {
  fn success(&self, message: &str);
  fn failure(&self, message: &str);
}

/// Default sink: forwards messages to the tracing subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl NotificationSink for LogSink {
  fn success(&self, message: &str) {
    tracing::info!(target: "feria_core::notify", message, "mutation succeeded");
  }

  fn failure(&self, message: &str) {
    tracing::warn!(target: "feria_core::notify", message, "mutation failed");
  }
}
