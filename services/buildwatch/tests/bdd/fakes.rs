//! Test doubles for the build provider and chat sink

use std::collections::VecDeque;
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use buildwatch::fetcher::StatusFetcher;
use buildwatch::notifier::Notifier;
use buildwatch::record::BuildRecord;

/// Replays scripted fetch results and cancels monitoring once polled past the end
#[derive(Debug)]
pub struct ScriptedFetcher {
    script: Mutex<VecDeque<Option<BuildRecord>>>,
    calls: Mutex<u32>,
    cancel: CancellationToken,
}

impl ScriptedFetcher {
    pub fn new(script: Vec<Option<BuildRecord>>, cancel: CancellationToken) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: Mutex::new(0),
            cancel,
        }
    }

    pub async fn call_count(&self) -> u32 {
        *self.calls.lock().await
    }
}

#[async_trait::async_trait]
impl StatusFetcher for ScriptedFetcher {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn fetch(&self) -> Option<BuildRecord> {
        *self.calls.lock().await += 1;
        match self.script.lock().await.pop_front() {
            Some(next) => next,
            None => {
                self.cancel.cancel();
                None
            }
        }
    }
}

/// Records every message and optionally reports delivery failure
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    rejects: bool,
    records: Arc<Mutex<Vec<String>>>,
}

impl RecordingNotifier {
    pub fn new(rejects: bool) -> Self {
        Self {
            rejects,
            records: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub async fn messages(&self) -> Vec<String> {
        self.records.lock().await.clone()
    }
}

#[async_trait::async_trait]
impl Notifier for RecordingNotifier {
    fn type_name(&self) -> &str {
        "recording"
    }

    async fn notify(&self, text: &str) -> buildwatch::Result<()> {
        self.records.lock().await.push(text.to_string());
        if self.rejects {
            Err(buildwatch::BuildwatchError::Dispatch(
                "webhook returned status 500".to_string(),
            ))
        } else {
            Ok(())
        }
    }
}
