//! In-memory `QueryEngine` used by the unit tests.
//!
//! Replays a scripted sequence of states (the last one repeats forever) and serves
//! pre-built result pages, while counting every call the poller makes.

use super::client::QueryEngine;
use super::types::*;

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// How `get_results` hands out continuation tokens.
#[derive(Clone, Copy, PartialEq)]
enum Pagination {
    /// One token per remaining page, none on the last one.
    Finite,
    /// Always answers with the first page's token.
    Repeating,
    /// Always answers with a fresh token, past the last page too.
    Endless,
}

pub struct ScriptedEngine {
    states: Mutex<VecDeque<ExecutionState>>,
    pages: Vec<Vec<Row>>,
    pagination: Pagination,
    fail_submit: bool,
    fail_status: bool,
    fail_cancel: bool,
    pub submitted: Mutex<Vec<SubmitQuery>>,
    pub submit_calls: AtomicUsize,
    pub status_calls: AtomicUsize,
    pub results_calls: AtomicUsize,
    pub cancel_calls: AtomicUsize,
}

impl ScriptedEngine {
    pub fn new<I: IntoIterator<Item = ExecutionState>>(states: I) -> Self {
        Self {
            states: Mutex::new(states.into_iter().collect()),
            pages: vec![Vec::new()],
            pagination: Pagination::Finite,
            fail_submit: false,
            fail_status: false,
            fail_cancel: false,
            submitted: Mutex::new(Vec::new()),
            submit_calls: AtomicUsize::new(0),
            status_calls: AtomicUsize::new(0),
            results_calls: AtomicUsize::new(0),
            cancel_calls: AtomicUsize::new(0),
        }
    }

    /// An engine whose first status check already reports `SUCCEEDED`.
    pub fn succeeding(rows: Vec<Row>) -> Self {
        Self::new([ExecutionState::Succeeded]).with_pages(vec![rows])
    }

    pub fn with_pages(mut self, pages: Vec<Vec<Row>>) -> Self {
        self.pages = pages;
        self
    }

    pub fn with_repeating_token(mut self) -> Self {
        self.pagination = Pagination::Repeating;
        self
    }

    pub fn with_endless_pages(mut self) -> Self {
        self.pagination = Pagination::Endless;
        self
    }

    pub fn failing_submit(mut self) -> Self {
        self.fail_submit = true;
        self
    }

    pub fn failing_status(mut self) -> Self {
        self.fail_status = true;
        self
    }

    pub fn failing_cancel(mut self) -> Self {
        self.fail_cancel = true;
        self
    }

    pub fn calls(&self) -> (usize, usize, usize, usize) {
        (
            self.submit_calls.load(Ordering::SeqCst),
            self.status_calls.load(Ordering::SeqCst),
            self.results_calls.load(Ordering::SeqCst),
            self.cancel_calls.load(Ordering::SeqCst),
        )
    }

    fn rejected(message: &str) -> EngineError {
        EngineError::Rejected {
            status: 500,
            message: message.to_string(),
        }
    }
}

#[async_trait]
impl QueryEngine for ScriptedEngine {
    async fn submit(&self, query: &SubmitQuery) -> Result<QueryExecutionId, EngineError> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_submit {
            return Err(Self::rejected("syntax error"));
        }
        self.submitted.lock().unwrap().push(query.clone());
        Ok(QueryExecutionId("exec-1".to_string()))
    }

    async fn get_status(&self, _id: &QueryExecutionId) -> Result<ExecutionStatus, EngineError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_status {
            return Err(Self::rejected("throttled"));
        }

        let mut states = self.states.lock().unwrap();
        let state = if states.len() > 1 {
            states.pop_front()
        } else {
            states.front().copied()
        };

        let state = state.unwrap_or(ExecutionState::Running);
        Ok(ExecutionStatus {
            state,
            state_change_reason: (state == ExecutionState::Failed)
                .then(|| "COLUMN_NOT_FOUND".to_string()),
        })
    }

    async fn get_results(
        &self,
        _id: &QueryExecutionId,
        next_token: Option<&str>,
    ) -> Result<ResultPage, EngineError> {
        self.results_calls.fetch_add(1, Ordering::SeqCst);

        let index = match next_token {
            None => 0,
            Some(token) => token
                .strip_prefix("page-")
                .and_then(|n| n.parse::<usize>().ok())
                .ok_or_else(|| Self::rejected("bad token"))?,
        };

        let rows = self.pages.get(index).cloned().unwrap_or_default();
        let next_token = match self.pagination {
            Pagination::Finite => {
                (index + 1 < self.pages.len()).then(|| format!("page-{}", index + 1))
            }
            Pagination::Repeating => Some("page-1".to_string()),
            Pagination::Endless => Some(format!("page-{}", index + 1)),
        };

        Ok(ResultPage { rows, next_token })
    }

    async fn cancel(&self, _id: &QueryExecutionId) -> Result<(), EngineError> {
        self.cancel_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_cancel {
            return Err(Self::rejected("already finished"));
        }
        Ok(())
    }
}
