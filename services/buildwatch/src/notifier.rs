//! Notifier trait and the dispatcher that formats and sends status messages

use std::sync::Arc;

use async_trait::async_trait;

use crate::message::{format_message, StatusMessage};
use crate::record::BuildRecord;

/// Trait for delivering a message to a chat sink
#[async_trait]
pub trait Notifier: Send + Sync + std::fmt::Debug {
    /// Get the notifier type name (e.g. "wecom")
    fn type_name(&self) -> &str;

    /// Send a formatted message
    async fn notify(&self, text: &str) -> crate::Result<()>;
}

/// Formats build records and hands them to a notifier
#[derive(Debug, Clone)]
pub struct NotificationDispatcher {
    project_name: String,
    notifier: Arc<dyn Notifier>,
}

impl NotificationDispatcher {
    pub fn new(project_name: impl Into<String>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            project_name: project_name.into(),
            notifier,
        }
    }

    pub fn format_message(&self, record: &BuildRecord) -> StatusMessage {
        format_message(&self.project_name, record)
    }

    /// Send `text`, returning whether the sink acknowledged it.
    ///
    /// Failures are logged and not retried.
    pub async fn send(&self, text: &str) -> bool {
        match self.notifier.notify(text).await {
            Ok(()) => {
                tracing::info!("Notification sent via '{}'", self.notifier.type_name());
                true
            }
            Err(e) => {
                tracing::warn!(
                    "Notification via '{}' failed: {}",
                    self.notifier.type_name(),
                    e
                );
                false
            }
        }
    }
}
