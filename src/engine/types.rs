use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Opaque identifier the remote engine returns for a submitted query.
///
/// Only meaningful to the engine that issued it; the poller owns it for the
/// lifetime of a single request and drops it once the execution resolves.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct QueryExecutionId(pub String);

impl fmt::Display for QueryExecutionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Execution state as reported by the remote engine.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionState {
    /// Accepted but not yet scheduled.
    Queued,
    /// Currently executing.
    Running,
    /// Finished; results can be fetched.
    Succeeded,
    /// Finished with an error. The engine never leaves this state.
    Failed,
    /// Stopped before completion, either by us or by the engine.
    Cancelled,
}

impl ExecutionState {
    /// Whether the engine will never move the execution out of this state.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ExecutionState::Succeeded | ExecutionState::Failed | ExecutionState::Cancelled
        )
    }
}

impl fmt::Display for ExecutionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExecutionState::Queued => "QUEUED",
            ExecutionState::Running => "RUNNING",
            ExecutionState::Succeeded => "SUCCEEDED",
            ExecutionState::Failed => "FAILED",
            ExecutionState::Cancelled => "CANCELLED",
        };
        f.write_str(name)
    }
}

/// One status observation of a running query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExecutionStatus {
    pub state: ExecutionState,
    /// Free-form explanation the engine attaches to FAILED/CANCELLED transitions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_change_reason: Option<String>,
}

impl ExecutionStatus {
    pub fn new(state: ExecutionState) -> Self {
        Self {
            state,
            state_change_reason: None,
        }
    }
}

/// A value bound to a `?` placeholder in the query text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum QueryParameter {
    Date(NaiveDate),
    Text(String),
}

/// Everything the engine needs to start an execution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubmitQuery {
    /// SQL text with positional `?` placeholders.
    pub query_string: String,
    /// Values for the placeholders, in order.
    pub parameters: Vec<QueryParameter>,
    /// Database the query runs in.
    pub database: String,
    /// Where the engine stores its intermediate result files.
    pub output_location: String,
    /// Idempotency token; resubmitting with the same token must not start a second execution.
    pub client_request_token: String,
}

/// A single result row. Cells are `None` where the engine returned SQL NULL.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Row {
    pub cells: Vec<Option<String>>,
}

impl Row {
    pub fn new<I, S>(cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            cells: cells.into_iter().map(|c| Some(c.into())).collect(),
        }
    }
}

/// One page of a result set as returned by `get_results`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ResultPage {
    pub rows: Vec<Row>,
    /// Continuation token; `None` on the last page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

/// The complete tabular result of a query: header row first, then data rows.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultSet {
    pub rows: Vec<Row>,
}

/// Polling budget for a single execution.
#[derive(Debug, Clone, PartialEq)]
pub struct PollConfig {
    /// Maximum number of status checks before the execution is cancelled.
    pub max_attempts: u32,
    /// Unit of the linear backoff schedule.
    pub base_delay: Duration,
}

impl PollConfig {
    /// Delay after the `attempt`-th non-terminal observation (1-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }

    /// Upper bound on the total time spent sleeping before giving up.
    pub fn worst_case_wait(&self) -> Duration {
        (1..=self.max_attempts).map(|attempt| self.backoff(attempt)).sum()
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            max_attempts: 50,
            base_delay: Duration::from_millis(100),
        }
    }
}

/// Failure talking to the remote engine.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("engine transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("engine rejected request (status {status}): {message}")]
    Rejected { status: u16, message: String },

    /// The engine answered, but the answer breaks the protocol (e.g. endless pagination).
    #[error("engine protocol violation: {0}")]
    Protocol(String),
}

/// Why an execution did not produce a result set.
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("query submission failed")]
    Submit(#[source] EngineError),

    #[error("status check for execution {id} failed")]
    Status {
        id: QueryExecutionId,
        #[source]
        source: EngineError,
    },

    #[error("execution {id} ended in state {state}: {}", .reason.as_deref().unwrap_or("no reason given"))]
    Terminal {
        id: QueryExecutionId,
        state: ExecutionState,
        reason: Option<String>,
    },

    #[error("execution {id} did not finish within {attempts} status checks")]
    Exhausted { id: QueryExecutionId, attempts: u32 },

    #[error("fetching results of execution {id} failed")]
    Fetch {
        id: QueryExecutionId,
        #[source]
        source: EngineError,
    },
}
