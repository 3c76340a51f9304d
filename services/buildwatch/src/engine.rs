//! Engine: polls the build provider and notifies on status changes

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::fetcher::StatusFetcher;
use crate::notifier::NotificationDispatcher;
use crate::record::StatusKey;

/// Consecutive absent fetches after which a warning is logged
pub const MISSED_FETCH_WARN_THRESHOLD: u32 = 5;

/// Whether the monitor loop keeps polling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    Stopped,
}

/// How a call to [`Engine::run`] ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// A terminal status was dispatched
    Completed,
    /// The operator interrupted monitoring
    Cancelled,
}

/// Result of a single polling cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tick {
    /// The provider returned nothing usable
    Absent,
    /// Same status key as the last notification
    Unchanged(StatusKey),
    /// A notification was dispatched for a new status key
    Dispatched {
        key: StatusKey,
        delivered: bool,
        terminal: bool,
    },
}

impl Tick {
    pub fn run_state(&self) -> RunState {
        match self {
            Tick::Dispatched { terminal: true, .. } => RunState::Stopped,
            _ => RunState::Running,
        }
    }
}

/// Change-detection memory of one monitoring session
#[derive(Debug, Default)]
pub struct MonitorState {
    last_status_key: Option<StatusKey>,
    consecutive_misses: u32,
}

impl MonitorState {
    pub fn last_status_key(&self) -> Option<&StatusKey> {
        self.last_status_key.as_ref()
    }

    pub fn consecutive_misses(&self) -> u32 {
        self.consecutive_misses
    }

    /// True if `key` differs from the last dispatched key, or none was sent yet
    pub fn is_changed(&self, key: &StatusKey) -> bool {
        self.last_status_key.as_ref() != Some(key)
    }

    fn record_dispatch(&mut self, key: StatusKey) {
        self.last_status_key = Some(key);
    }

    fn record_miss(&mut self) -> u32 {
        self.consecutive_misses += 1;
        self.consecutive_misses
    }

    fn record_hit(&mut self) {
        self.consecutive_misses = 0;
    }
}

/// The engine drives the fetch, compare and notify cycle
pub struct Engine {
    fetcher: Arc<dyn StatusFetcher>,
    dispatcher: NotificationDispatcher,
    interval: Duration,
    cancel: CancellationToken,
    state: MonitorState,
}

impl Engine {
    pub fn new(
        fetcher: Arc<dyn StatusFetcher>,
        dispatcher: NotificationDispatcher,
        interval: Duration,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            fetcher,
            dispatcher,
            interval,
            cancel,
            state: MonitorState::default(),
        }
    }

    pub fn state(&self) -> &MonitorState {
        &self.state
    }

    /// Run one polling cycle
    pub async fn tick(&mut self) -> Tick {
        let Some(record) = self.fetcher.fetch().await else {
            let misses = self.state.record_miss();
            tracing::info!("No build status available from '{}'", self.fetcher.name());
            if misses == MISSED_FETCH_WARN_THRESHOLD {
                tracing::warn!(
                    "Provider '{}' has failed {} consecutive polls",
                    self.fetcher.name(),
                    misses
                );
            }
            return Tick::Absent;
        };
        self.state.record_hit();

        let key = record.status_key();
        if !self.state.is_changed(&key) {
            tracing::info!("Build status unchanged: {}", key);
            return Tick::Unchanged(key);
        }

        tracing::info!(
            "Build status changed: {} -> {}, sending notification",
            self.state
                .last_status_key()
                .map(|k| k.to_string())
                .unwrap_or_else(|| "unset".to_string()),
            key
        );

        let message = self.dispatcher.format_message(&record);
        let delivered = self.dispatcher.send(&message.text).await;
        self.state.record_dispatch(key.clone());

        Tick::Dispatched {
            key,
            delivered,
            terminal: message.is_terminal,
        }
    }

    /// Poll until a terminal status is dispatched or the token is cancelled
    pub async fn run(&mut self) -> RunOutcome {
        let cancel = self.cancel.clone();

        loop {
            let tick = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::debug!("Monitoring cancelled during poll");
                    return RunOutcome::Cancelled;
                }
                tick = self.tick() => tick,
            };

            if tick.run_state() == RunState::Stopped {
                tracing::info!("Build completed, monitoring stopped");
                return RunOutcome::Completed;
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::debug!("Monitoring cancelled while waiting");
                    return RunOutcome::Cancelled;
                }
                _ = tokio::time::sleep(self.interval) => {}
            }
        }
    }
}
