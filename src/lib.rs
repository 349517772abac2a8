//! Exam Ranking Service Library
//!
//! Builds leaderboards of exam participants by summed score. The heavy lifting (the
//! aggregation itself) happens in a remote, asynchronous query engine; this crate
//! drives that engine's submit/poll/fetch/cancel lifecycle and shapes the answer.
//!
//! ## Architecture Modules
//! - **`engine`**: Client side of the remote query engine. The `ExecutionPoller` submits a
//!   query, polls with linear backoff, cancels on budget exhaustion and fetches results.
//! - **`ranking`**: Request validation, query building, result projection and the HTTP
//!   handlers that expose the ranking operation.
//! - **`config`**: Startup configuration loaded from the environment.

pub mod config;
pub mod engine;
pub mod ranking;

use config::AppConfig;
use engine::http::HttpQueryEngine;
use engine::poller::ExecutionPoller;
use ranking::service::RankingService;
use std::sync::Arc;

/// Wires a `RankingService` to the HTTP query engine described by `config`.
pub fn build_service(config: &AppConfig) -> RankingService {
    let engine = Arc::new(HttpQueryEngine::new(&config.engine_url, config.engine_timeout));
    let poller = ExecutionPoller::new(engine, config.poll.clone());

    RankingService::new(config.target.clone(), config.exams.clone(), poller)
}
