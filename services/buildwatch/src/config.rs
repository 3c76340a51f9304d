//! Configuration types for the buildwatch service

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable consulted for the webhook URL when none is configured
pub const DEFAULT_WEBHOOK_URL_ENV: &str = "BUILDWATCH_WEBHOOK_URL";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_project_name")]
    pub project_name: String,
    #[serde(default = "default_polling_interval")]
    pub polling_interval_seconds: u64,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub notifier: NotifierConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project_name: default_project_name(),
            polling_interval_seconds: default_polling_interval(),
            provider: ProviderConfig::default(),
            notifier: NotifierConfig::default(),
        }
    }
}

impl Config {
    pub fn polling_interval(&self) -> Duration {
        Duration::from_secs(self.polling_interval_seconds)
    }

    /// Reject values the monitor loop cannot run with
    pub fn validate(&self) -> crate::Result<()> {
        if self.polling_interval_seconds == 0 {
            return Err(crate::BuildwatchError::Config(
                "polling_interval_seconds must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Fill the webhook URL from the process environment
    pub fn resolve_secrets(&mut self) -> crate::Result<()> {
        self.resolve_secrets_with(|name| std::env::var(name).ok())
    }

    /// Fill the webhook URL using `lookup` to read variables.
    ///
    /// A value found through `webhook_url_env` takes precedence over a URL
    /// written in the config file. It is an error if neither yields a URL.
    pub fn resolve_secrets_with<F>(&mut self, lookup: F) -> crate::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        match &mut self.notifier {
            NotifierConfig::WeCom {
                webhook_url,
                webhook_url_env,
            } => {
                if let Some(var) = webhook_url_env.as_deref() {
                    if let Some(value) = lookup(var).filter(|v| !v.trim().is_empty()) {
                        tracing::debug!("Webhook URL taken from ${}", var);
                        *webhook_url = Some(value);
                    }
                }

                match webhook_url.as_deref() {
                    Some(url) if !url.trim().is_empty() => Ok(()),
                    _ => Err(crate::BuildwatchError::Config(format!(
                        "No webhook URL configured; set notifier.webhook_url or ${}",
                        webhook_url_env.as_deref().unwrap_or(DEFAULT_WEBHOOK_URL_ENV)
                    ))),
                }
            }
        }
    }
}

/// Build-status provider configuration with tagged enum for extensibility
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ProviderConfig {
    #[serde(rename = "github_cli")]
    GithubCli {
        #[serde(default = "default_gh_executable")]
        executable: PathBuf,
        #[serde(default = "default_working_dir")]
        working_dir: PathBuf,
        #[serde(default)]
        repo: Option<String>,
        #[serde(default)]
        branch: Option<String>,
        #[serde(default)]
        workflow: Option<String>,
    },
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig::GithubCli {
            executable: default_gh_executable(),
            working_dir: default_working_dir(),
            repo: None,
            branch: None,
            workflow: None,
        }
    }
}

impl ProviderConfig {
    pub fn type_name(&self) -> &str {
        match self {
            ProviderConfig::GithubCli { .. } => "github_cli",
        }
    }

    pub fn set_working_dir(&mut self, dir: PathBuf) {
        match self {
            ProviderConfig::GithubCli { working_dir, .. } => *working_dir = dir,
        }
    }
}

/// Notifier configuration with tagged enum for extensibility
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum NotifierConfig {
    #[serde(rename = "wecom")]
    WeCom {
        #[serde(default)]
        webhook_url: Option<String>,
        #[serde(default = "default_webhook_url_env")]
        webhook_url_env: Option<String>,
    },
}

impl Default for NotifierConfig {
    fn default() -> Self {
        NotifierConfig::WeCom {
            webhook_url: None,
            webhook_url_env: default_webhook_url_env(),
        }
    }
}

impl NotifierConfig {
    pub fn type_name(&self) -> &str {
        match self {
            NotifierConfig::WeCom { .. } => "wecom",
        }
    }
}

fn default_project_name() -> String {
    "Lightning Search".to_string()
}

fn default_polling_interval() -> u64 {
    180
}

fn default_gh_executable() -> PathBuf {
    PathBuf::from("gh")
}

fn default_working_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_webhook_url_env() -> Option<String> {
    Some(DEFAULT_WEBHOOK_URL_ENV.to_string())
}

/// Load configuration from a JSON file
pub fn load_config(path: &Path) -> crate::Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        crate::BuildwatchError::Config(format!("Failed to read config file {:?}: {}", path, e))
    })?;
    let config: Config = serde_json::from_str(&content)?;
    Ok(config)
}
