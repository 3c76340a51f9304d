//! Build status fetching from the GitHub CLI

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;

use crate::config::ProviderConfig;
use crate::io::CommandRunner;
use crate::record::BuildRecord;

/// Fields requested from `gh run list`
pub const RUN_FIELDS: &str = "status,conclusion,name,headBranch,displayTitle,createdAt,updatedAt";

/// Trait for obtaining the latest build run of the watched project
#[async_trait]
pub trait StatusFetcher: Send + Sync + fmt::Debug {
    /// Get the provider name
    fn name(&self) -> &str;

    /// Fetch the most recent build run.
    ///
    /// Failures are logged and reported as `None`; the caller simply skips
    /// the polling cycle.
    async fn fetch(&self) -> Option<BuildRecord>;
}

/// Fetches the latest workflow run by shelling out to `gh run list`
pub struct GhRunFetcher {
    executable: PathBuf,
    working_dir: PathBuf,
    args: Vec<String>,
    runner: Arc<dyn CommandRunner>,
}

impl fmt::Debug for GhRunFetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GhRunFetcher")
            .field("executable", &self.executable)
            .field("working_dir", &self.working_dir)
            .finish()
    }
}

impl GhRunFetcher {
    pub fn new(config: &ProviderConfig, runner: Arc<dyn CommandRunner>) -> Self {
        let ProviderConfig::GithubCli {
            executable,
            working_dir,
            repo,
            branch,
            workflow,
        } = config;

        let mut args: Vec<String> = ["run", "list", "--limit", "1", "--json", RUN_FIELDS]
            .iter()
            .map(|s| s.to_string())
            .collect();
        for (flag, value) in [("--repo", repo), ("--branch", branch), ("--workflow", workflow)] {
            if let Some(value) = value {
                args.push(flag.to_string());
                args.push(value.clone());
            }
        }

        tracing::debug!(
            "Created GhRunFetcher using {} in {}",
            executable.display(),
            working_dir.display()
        );

        Self {
            executable: executable.clone(),
            working_dir: working_dir.clone(),
            args,
            runner,
        }
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Fetch the latest run, surfacing the reason on failure
    pub async fn try_fetch(&self) -> crate::Result<BuildRecord> {
        let output = self
            .runner
            .run(&self.executable, &self.args, &self.working_dir)
            .await?;

        if !output.success() {
            return Err(crate::BuildwatchError::Fetch(format!(
                "{} exited with status {}: {}",
                self.executable.display(),
                output
                    .code
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "signal".to_string()),
                output.stderr.trim()
            )));
        }

        parse_run_list(&output.stdout)
    }
}

#[async_trait]
impl StatusFetcher for GhRunFetcher {
    fn name(&self) -> &str {
        "github_cli"
    }

    async fn fetch(&self) -> Option<BuildRecord> {
        match self.try_fetch().await {
            Ok(record) => {
                tracing::debug!("Latest run: {} ({})", record.status_key(), record.title);
                Some(record)
            }
            Err(e) => {
                tracing::warn!("Failed to fetch build status: {}", e);
                None
            }
        }
    }
}

/// Parse the JSON array printed by `gh run list` into its first record
pub fn parse_run_list(stdout: &str) -> crate::Result<BuildRecord> {
    let runs: Vec<BuildRecord> = serde_json::from_str(stdout)?;
    runs.into_iter()
        .next()
        .ok_or_else(|| crate::BuildwatchError::Fetch("No build runs found".to_string()))
}
