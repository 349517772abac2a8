//! Exam Ranking Module
//!
//! Produces a leaderboard of participants by summed score for one exam (or all exams)
//! over an inclusive date range.
//!
//! ## Pipeline
//! 1. **Validation**: the three inbound fields are checked (presence, exam code, date format).
//! 2. **Query building**: a parameterized `SUM(score) ... GROUP BY name` query is built.
//! 3. **Execution**: the query runs on the remote engine through the `ExecutionPoller`.
//! 4. **Projection**: result rows are numbered 1..n in engine order.
//!
//! ## Submodules
//! - **`types`**: Request, response envelope, leaderboard entries and error types.
//! - **`query`**: The query builder.
//! - **`projector`**: Result set to leaderboard conversion.
//! - **`service`**: `RankingService`, which validates and runs the pipeline.
//! - **`handlers`**: Axum HTTP handlers.

pub mod handlers;
pub mod projector;
pub mod query;
pub mod service;
pub mod types;
