//! Buildwatch - CI build status monitor
//!
//! Polls the latest CI run of a project, sends a chat notification whenever
//! its status changes, and stops once the run has completed.

pub mod config;
pub mod engine;
pub mod error;
pub mod fetcher;
pub mod io;
pub mod message;
pub mod notifier;
pub mod record;
pub mod wecom;

pub use config::{load_config, Config};
pub use engine::RunOutcome;
pub use error::{BuildwatchError, Result};

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::config::{NotifierConfig, ProviderConfig};
use crate::engine::Engine;
use crate::fetcher::{GhRunFetcher, StatusFetcher};
use crate::io::{ReqwestHttpClient, TokioCommandRunner};
use crate::notifier::{NotificationDispatcher, Notifier};
use crate::wecom::WeComNotifier;

/// Run the buildwatch service with the given configuration.
///
/// Secrets must already be resolved. Returns once the build has completed
/// or the process received Ctrl-C.
pub async fn run(config: Config) -> Result<RunOutcome> {
    config.validate()?;

    let fetcher: Arc<dyn StatusFetcher> = match &config.provider {
        ProviderConfig::GithubCli { .. } => Arc::new(GhRunFetcher::new(
            &config.provider,
            Arc::new(TokioCommandRunner::new()),
        )),
    };

    let notifier: Arc<dyn Notifier> = match &config.notifier {
        NotifierConfig::WeCom { .. } => Arc::new(WeComNotifier::new(
            &config.notifier,
            Arc::new(ReqwestHttpClient::new()),
        )?),
    };

    let cancel = CancellationToken::new();
    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Shutdown signal received");
                cancel_for_signal.cancel();
            }
            Err(e) => tracing::error!("Failed to listen for ctrl-c: {}", e),
        }
    });

    let dispatcher = NotificationDispatcher::new(config.project_name.clone(), notifier);
    let mut engine = Engine::new(fetcher, dispatcher, config.polling_interval(), cancel);

    tracing::info!(
        "Monitoring '{}' via '{}', checking every {}s",
        config.project_name,
        config.provider.type_name(),
        config.polling_interval_seconds
    );

    let outcome = engine.run().await;
    tracing::info!("Buildwatch stopped: {:?}", outcome);

    Ok(outcome)
}
