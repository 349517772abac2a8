//! Remote Query Engine Module
//!
//! Everything needed to run one SQL query on an external, asynchronous query engine
//! and get its tabular result back.
//!
//! ## Lifecycle
//! 1. **Submit**: the query text, its bound parameters, the target database and the
//!    output location are sent to the engine, which answers with an execution id.
//! 2. **Poll**: the execution status is checked with linear backoff until it reaches a
//!    terminal state or the attempt budget runs out.
//! 3. **Cancel**: on budget exhaustion the execution is stopped so nothing is left running.
//! 4. **Fetch**: on success the result pages are collected into one `ResultSet`.
//!
//! ## Submodules
//! - **`types`**: Execution ids, states, result rows, poll budget and error types.
//! - **`client`**: The `QueryEngine` trait the poller is written against.
//! - **`protocol`**: HTTP endpoints and DTOs of the query gateway.
//! - **`http`**: `reqwest` implementation of `QueryEngine`.
//! - **`poller`**: The submit/poll/cancel/fetch state machine.

pub mod client;
pub mod http;
pub mod poller;
pub mod protocol;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;
