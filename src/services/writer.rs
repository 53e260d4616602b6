use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::models::{MatchRecord, Notice, NoticeLevel};
use crate::services::store::{ProfileStore, StoreError};

/// Exponential backoff settings for match writes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            base_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(4),
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `attempt` (1-based), doubling each time
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

/// Final result of a match write
#[derive(Debug)]
pub enum MatchWriteOutcome {
    Created(MatchRecord),
    Failed { attempts: u32, error: StoreError },
}

/// Writes match records for liked candidates, retrying transient failures
///
/// Runs off the gesture path: the deck never waits on it. A write that
/// still fails after the last attempt is reported as a [`Notice`].
#[derive(Clone)]
pub struct MatchWriter {
    store: Arc<dyn ProfileStore>,
    policy: RetryPolicy,
}

impl MatchWriter {
    pub fn new(store: Arc<dyn ProfileStore>, policy: RetryPolicy) -> Self {
        Self { store, policy }
    }

    /// Create the match, retrying with exponential backoff
    pub async fn write(&self, user_id: &str, candidate_id: &str) -> MatchWriteOutcome {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            match self.store.create_match(user_id, candidate_id).await {
                Ok(record) => {
                    if attempt > 1 {
                        info!("Created match {} -> {} after {} attempts", user_id, candidate_id, attempt);
                    } else {
                        debug!("Created match {} -> {}", user_id, candidate_id);
                    }
                    return MatchWriteOutcome::Created(record);
                }
                Err(e) if e.is_transient() && attempt < max_attempts => {
                    let delay = self.policy.delay_for(attempt);
                    warn!(
                        "Match write {} -> {} failed (attempt {}), retrying in {}ms: {}",
                        user_id,
                        candidate_id,
                        attempt,
                        delay.as_millis(),
                        e
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    error!(
                        "Match write {} -> {} failed after {} attempts: {}",
                        user_id, candidate_id, attempt, e
                    );
                    return MatchWriteOutcome::Failed { attempts: attempt, error: e };
                }
            }
        }
    }

    /// Fire the write on the runtime and report a final failure on `notices`
    pub fn spawn(
        &self,
        user_id: String,
        candidate_id: String,
        notices: mpsc::UnboundedSender<Notice>,
    ) -> tokio::task::JoinHandle<()> {
        let writer = self.clone();
        tokio::spawn(async move {
            if let MatchWriteOutcome::Failed { .. } = writer.write(&user_id, &candidate_id).await {
                let notice = Notice {
                    level: NoticeLevel::Warning,
                    message: "We couldn't save your like. Try again later.".to_string(),
                    candidate_id: Some(candidate_id.clone()),
                };
                if notices.send(notice).is_err() {
                    warn!(
                        "Deck session for {} expired before the failed like on {} could be reported",
                        user_id, candidate_id
                    );
                }
            }
        })
    }
}
