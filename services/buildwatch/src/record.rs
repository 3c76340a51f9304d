//! Build run records and the status key used for change detection

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Lifecycle status of a build run as reported by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BuildStatus {
    Queued,
    InProgress,
    Completed,
    /// Any status without dedicated handling, kept verbatim for display
    Unknown(String),
}

impl BuildStatus {
    /// No further state changes are expected once a run is completed
    pub fn is_terminal(&self) -> bool {
        matches!(self, BuildStatus::Completed)
    }
}

impl Default for BuildStatus {
    fn default() -> Self {
        BuildStatus::Unknown("unknown".to_string())
    }
}

impl From<String> for BuildStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "queued" => BuildStatus::Queued,
            "in_progress" => BuildStatus::InProgress,
            "completed" => BuildStatus::Completed,
            _ => BuildStatus::Unknown(raw),
        }
    }
}

impl From<&str> for BuildStatus {
    fn from(raw: &str) -> Self {
        BuildStatus::from(raw.to_string())
    }
}

impl From<BuildStatus> for String {
    fn from(status: BuildStatus) -> Self {
        status.to_string()
    }
}

impl fmt::Display for BuildStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildStatus::Queued => write!(f, "queued"),
            BuildStatus::InProgress => write!(f, "in_progress"),
            BuildStatus::Completed => write!(f, "completed"),
            BuildStatus::Unknown(raw) => write!(f, "{}", raw),
        }
    }
}

/// The most recent build run of the watched project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildRecord {
    #[serde(default)]
    pub status: BuildStatus,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub conclusion: Option<String>,
    #[serde(rename = "displayTitle", default = "default_title")]
    pub title: String,
    #[serde(rename = "headBranch", default = "default_branch")]
    pub branch: String,
    #[serde(default = "default_timestamp")]
    pub updated_at: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl BuildRecord {
    /// Record with the given status and display defaults for everything else
    pub fn new(status: BuildStatus, conclusion: Option<&str>) -> Self {
        Self {
            status,
            conclusion: conclusion.map(str::to_string),
            title: default_title(),
            branch: default_branch(),
            updated_at: default_timestamp(),
            name: None,
            created_at: None,
        }
    }

    pub fn status_key(&self) -> StatusKey {
        StatusKey {
            status: self.status.clone(),
            conclusion: self.conclusion.clone(),
        }
    }
}

/// The (status, conclusion) pair compared between polls
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusKey {
    pub status: BuildStatus,
    pub conclusion: Option<String>,
}

impl fmt::Display for StatusKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.conclusion {
            Some(conclusion) => write!(f, "{}/{}", self.status, conclusion),
            None => write!(f, "{}", self.status),
        }
    }
}

// gh reports an empty string for runs that have not concluded yet
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

fn default_title() -> String {
    "Unknown".to_string()
}

fn default_branch() -> String {
    "unknown".to_string()
}

fn default_timestamp() -> String {
    "N/A".to_string()
}
