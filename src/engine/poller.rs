//! Execution Poller
//!
//! Drives one query through the remote engine's lifecycle:
//! submit -> poll until terminal -> fetch.
//!
//! ## Polling policy
//! - Status is checked at most `max_attempts` times.
//! - After each `QUEUED`/`RUNNING` observation the poller sleeps `base_delay * attempt`
//!   (linear backoff, attempt is 1-based).
//! - `FAILED`/`CANCELLED` end the loop immediately; the engine will not recover from them.
//! - If the budget runs out the execution is cancelled exactly once before reporting.

use super::client::QueryEngine;
use super::types::*;

use std::collections::HashSet;
use std::sync::Arc;

/// Upper bound on result pages fetched for one execution.
pub const MAX_RESULT_PAGES: usize = 10_000;

pub struct ExecutionPoller {
    engine: Arc<dyn QueryEngine>,
    config: PollConfig,
}

impl ExecutionPoller {
    pub fn new(engine: Arc<dyn QueryEngine>, config: PollConfig) -> Self {
        Self { engine, config }
    }

    pub fn config(&self) -> &PollConfig {
        &self.config
    }

    /// Runs `query` to completion and returns its full result set.
    ///
    /// Submission is not retried; any submit failure is returned as-is.
    pub async fn execute(&self, query: &SubmitQuery) -> Result<ResultSet, ExecutionError> {
        let id = self
            .engine
            .submit(query)
            .await
            .map_err(ExecutionError::Submit)?;

        tracing::info!("Submitted query execution {}", id);

        self.wait_for_completion(&id).await?;
        self.fetch_results(&id).await
    }

    /// Polls until the execution reaches `SUCCEEDED`.
    async fn wait_for_completion(&self, id: &QueryExecutionId) -> Result<(), ExecutionError> {
        for attempt in 1..=self.config.max_attempts {
            let status = match self.engine.get_status(id).await {
                Ok(status) => status,
                Err(source) => {
                    tracing::warn!("Status check for {} failed: {}", id, source);
                    // The execution may still be running on the engine side
                    self.cancel(id).await;
                    return Err(ExecutionError::Status {
                        id: id.clone(),
                        source,
                    });
                }
            };

            match status.state {
                ExecutionState::Succeeded => {
                    tracing::info!("Execution {} succeeded after {} status checks", id, attempt);
                    return Ok(());
                }
                ExecutionState::Failed | ExecutionState::Cancelled => {
                    tracing::warn!(
                        "Execution {} ended in state {} ({})",
                        id,
                        status.state,
                        status.state_change_reason.as_deref().unwrap_or("no reason given")
                    );
                    return Err(ExecutionError::Terminal {
                        id: id.clone(),
                        state: status.state,
                        reason: status.state_change_reason,
                    });
                }
                ExecutionState::Queued | ExecutionState::Running => {
                    let delay = self.config.backoff(attempt);
                    tracing::debug!(
                        "Execution {} is {} (attempt {}/{}), retrying in {:?}",
                        id,
                        status.state,
                        attempt,
                        self.config.max_attempts,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }

        tracing::warn!(
            "Execution {} still not finished after {} status checks, cancelling",
            id,
            self.config.max_attempts
        );
        self.cancel(id).await;

        Err(ExecutionError::Exhausted {
            id: id.clone(),
            attempts: self.config.max_attempts,
        })
    }

    /// Best-effort cancellation. A failure here does not change the outcome.
    async fn cancel(&self, id: &QueryExecutionId) {
        match self.engine.cancel(id).await {
            Ok(()) => tracing::info!("Cancelled execution {}", id),
            Err(e) => tracing::error!("Failed to cancel execution {}: {}", id, e),
        }
    }

    /// Collects every result page. The header row only appears on the first page.
    ///
    /// Stops with `ExecutionError::Fetch` if a continuation token comes back twice or
    /// the page count reaches `MAX_RESULT_PAGES`.
    async fn fetch_results(&self, id: &QueryExecutionId) -> Result<ResultSet, ExecutionError> {
        let fetch_error = |source: EngineError| ExecutionError::Fetch {
            id: id.clone(),
            source,
        };

        let mut rows = Vec::new();
        let mut next_token: Option<String> = None;
        let mut seen_tokens: HashSet<String> = HashSet::new();
        let mut pages = 0usize;

        loop {
            let page = self
                .engine
                .get_results(id, next_token.as_deref())
                .await
                .map_err(fetch_error)?;

            pages += 1;
            rows.extend(page.rows);

            let Some(token) = page.next_token else {
                break;
            };

            if !seen_tokens.insert(token.clone()) {
                tracing::error!("Execution {} repeated result token {:?}", id, token);
                return Err(fetch_error(EngineError::Protocol(format!(
                    "result token {:?} returned twice",
                    token
                ))));
            }
            if pages >= MAX_RESULT_PAGES {
                tracing::error!("Execution {} exceeded {} result pages", id, MAX_RESULT_PAGES);
                return Err(fetch_error(EngineError::Protocol(format!(
                    "more than {} result pages",
                    MAX_RESULT_PAGES
                ))));
            }

            next_token = Some(token);
        }

        tracing::debug!("Fetched {} rows in {} pages for {}", rows.len(), pages, id);
        Ok(ResultSet { rows })
    }
}
