//! Query Engine Client Seam
//!
//! The poller talks to the remote engine only through [`QueryEngine`], so the
//! lifecycle logic can be driven by the HTTP client in production and by an
//! in-memory fake in tests.

use super::types::*;

use async_trait::async_trait;

/// The four operations the remote engine exposes.
#[async_trait]
pub trait QueryEngine: Send + Sync {
    /// Starts an execution and returns its handle.
    async fn submit(&self, query: &SubmitQuery) -> Result<QueryExecutionId, EngineError>;

    /// Reports the current state of an execution.
    async fn get_status(&self, id: &QueryExecutionId) -> Result<ExecutionStatus, EngineError>;

    /// Returns one page of results. Pass the previous page's `next_token` to continue.
    async fn get_results(
        &self,
        id: &QueryExecutionId,
        next_token: Option<&str>,
    ) -> Result<ResultPage, EngineError>;

    /// Asks the engine to stop an execution.
    async fn cancel(&self, id: &QueryExecutionId) -> Result<(), EngineError>;
}
