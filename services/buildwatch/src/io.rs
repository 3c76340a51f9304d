//! Process and HTTP abstractions for testability
//!
//! The build provider is reached by running a CLI and the chat sink over
//! HTTP. Both sit behind traits so the monitor loop can be exercised with
//! mockall mocks instead of real subprocesses and network calls.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

/// HTTP response from a request
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Abstraction over HTTP client for dependency injection
#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait HttpClient: Send + Sync {
    /// Send a POST request with a JSON body
    async fn post_json(&self, url: &str, body: &serde_json::Value) -> crate::Result<HttpResponse>;
}

/// Production HTTP client using reqwest
#[derive(Default)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn post_json(&self, url: &str, body: &serde_json::Value) -> crate::Result<HttpResponse> {
        tracing::debug!("POST {}", redact(url));
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                crate::BuildwatchError::Http(format!("POST {} failed: {}", redact(url), e))
            })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| crate::BuildwatchError::Http(format!("Reading response body: {}", e)))?;

        tracing::debug!("POST {} -> {} ({} bytes)", redact(url), status, body.len());
        Ok(HttpResponse { status, body })
    }
}

/// Webhook URLs carry their access key in the query string
fn redact(url: &str) -> &str {
    url.split('?').next().unwrap_or(url)
}

/// Captured result of a finished subprocess
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` if the process was terminated by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Abstraction over running an external command to completion
#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args` inside `working_dir` and capture its output
    async fn run(
        &self,
        program: &Path,
        args: &[String],
        working_dir: &Path,
    ) -> crate::Result<CommandOutput>;
}

/// Tokio implementation of CommandRunner
#[derive(Default, Clone)]
pub struct TokioCommandRunner;

impl TokioCommandRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for TokioCommandRunner {
    async fn run(
        &self,
        program: &Path,
        args: &[String],
        working_dir: &Path,
    ) -> crate::Result<CommandOutput> {
        tracing::debug!(
            "Running {} {} in {}",
            program.display(),
            args.join(" "),
            working_dir.display()
        );

        let output = Command::new(program)
            .args(args)
            .current_dir(working_dir)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                crate::BuildwatchError::Fetch(format!(
                    "Failed to run {}: {}",
                    program.display(),
                    e
                ))
            })?;

        let result = CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        tracing::debug!(
            "{} exited with {:?} ({} bytes stdout)",
            program.display(),
            result.code,
            result.stdout.len()
        );
        Ok(result)
    }
}
