//! WeCom (WeChat Work) group robot webhook client

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::config::NotifierConfig;
use crate::io::HttpClient;
use crate::notifier::Notifier;

/// Reply body of the group robot API
#[derive(Debug, Deserialize)]
struct WeComReply {
    #[serde(default)]
    errcode: i64,
    #[serde(default)]
    errmsg: String,
}

/// Posts markdown messages to a WeCom group robot
pub struct WeComNotifier {
    webhook_url: String,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for WeComNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // the URL embeds the robot key
        f.debug_struct("WeComNotifier").finish_non_exhaustive()
    }
}

impl WeComNotifier {
    /// Build from config; `resolve_secrets` must have run first
    pub fn new(config: &NotifierConfig, http: Arc<dyn HttpClient>) -> crate::Result<Self> {
        let NotifierConfig::WeCom { webhook_url, .. } = config;
        let webhook_url = webhook_url.clone().ok_or_else(|| {
            crate::BuildwatchError::Config("WeCom notifier has no webhook URL".to_string())
        })?;

        tracing::debug!("Created WeComNotifier");
        Ok(Self { webhook_url, http })
    }
}

/// JSON body for a markdown message
pub fn markdown_payload(content: &str) -> serde_json::Value {
    json!({
        "msgtype": "markdown",
        "markdown": {
            "content": content
        }
    })
}

#[async_trait]
impl Notifier for WeComNotifier {
    fn type_name(&self) -> &str {
        "wecom"
    }

    async fn notify(&self, text: &str) -> crate::Result<()> {
        tracing::debug!("Sending WeCom notification ({} bytes)", text.len());

        let response = self
            .http
            .post_json(&self.webhook_url, &markdown_payload(text))
            .await
            .map_err(|e| crate::BuildwatchError::Dispatch(e.to_string()))?;

        if !response.is_success() {
            return Err(crate::BuildwatchError::Dispatch(format!(
                "WeCom webhook returned status {}: {}",
                response.status, response.body
            )));
        }

        // The API answers 200 even when it rejects a message
        if let Ok(reply) = serde_json::from_str::<WeComReply>(&response.body) {
            if reply.errcode != 0 {
                tracing::warn!(
                    "WeCom accepted the request but reported errcode {}: {}",
                    reply.errcode,
                    reply.errmsg
                );
            }
        }

        tracing::debug!("WeCom notification sent successfully");
        Ok(())
    }
}
