

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strum::Display;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::deleter::Deleter;


#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PollOutcome {
    /// The table reached zero rows.
    Completed,
    /// The poller was stopped before the table was empty.
    Cancelled,
}


/// Owner's handle on a running row-count poller.
///
/// Dropping the handle stops the poller; keep it alive for as long as the
/// table should be tracked.
pub struct PollerHandle {
    table_name: String,
    token: CancellationToken,
    task: Option<JoinHandle<PollOutcome>>,
}

impl PollerHandle {

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Asks the poller to exit; an in-flight count query is abandoned.
    pub fn stop(&self) {
        self.token.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(|task| task.is_finished())
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.token
    }


    pub async fn wait(mut self) -> PollOutcome {
        let Some(task) = self.task.take() else {
            return PollOutcome::Cancelled;
        };

        match task.await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Row count poller for table {} died: {}", self.table_name, e);
                PollOutcome::Cancelled
            }
        }
    }


    pub async fn stop_and_wait(self) -> PollOutcome {
        self.stop();
        self.wait().await
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        // No-op once the poller has finished.
        self.token.cancel();
    }
}

/// Waits for every poller, returning outcomes in the order given.
pub async fn wait_all(handles: Vec<PollerHandle>) -> Vec<PollOutcome> {
    futures::future::join_all(handles.into_iter().map(PollerHandle::wait)).await
}

impl Deleter {
    /// Spawns the row-count poller on the current tokio runtime.
    pub fn start(self: &Arc<Self>) -> PollerHandle {
        self.start_with_token(&CancellationToken::new())
    }

    /// Like [`Deleter::start`], also stopping when `token` is cancelled. Share
    /// one token across tables to stop a whole run at once; the handle only
    /// ever cancels its own child of it.
    pub fn start_with_token(self: &Arc<Self>, token: &CancellationToken) -> PollerHandle {
        info!("Starting row count poller for table {}", self.table_name());

        let token = token.child_token();

        let task = tokio::spawn(run_row_count_poller(Arc::clone(self), token.clone()));

        PollerHandle {
            table_name: self.table_name().to_string(),
            token,
            task: Some(task),
        }
    }
}

/// Polls until the table is empty or `token` fires.
///
/// Each pause is `poll_multiplier` times the duration of the query before it,
/// so slow counts back the poller off and roughly 1/(multiplier + 1) of the
/// wall-clock time is spent querying.
async fn run_row_count_poller(deleter: Arc<Deleter>, token: CancellationToken) -> PollOutcome {
    let multiplier = deleter.config().poll_multiplier;

    loop {
        if deleter.status().is_terminal() {
            info!("Row count poller for table {} finished", deleter.table_name());
            return PollOutcome::Completed;
        }
        if token.is_cancelled() {
            break;
        }

        let begin = Instant::now();

        // Count failures are usually transient; try again next round.
        if let Err(e) = deleter.observe_row_count(&token).await {
            if token.is_cancelled() {
                break;
            }
            warn!("Failed to count rows of table {}: {}", deleter.table_name(), e);
        }

        if deleter.status().is_terminal() {
            continue;
        }

        let pause = begin.elapsed() * multiplier;
        debug!(
            "Next row count of table {} in {:?}",
            deleter.table_name(),
            pause
        );

        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = tokio::time::sleep(pause) => {}
        }
    }

    info!("Row count poller for table {} stopped", deleter.table_name());
    PollOutcome::Cancelled
}
