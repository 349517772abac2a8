//! Ranking Request Handler
//!
//! Validates inbound parameters, then runs query building, execution and
//! projection in sequence. Every failure collapses into the same
//! `{"result":"error"}` envelope; the cause only shows up in the logs.

use super::projector::project;
use super::query::{build_query, QueryTarget};
use super::types::*;
use crate::engine::poller::ExecutionPoller;

pub struct RankingService {
    target: QueryTarget,
    exams: Vec<String>,
    poller: ExecutionPoller,
}

impl RankingService {
    /// # Arguments
    /// * `target` - Database, table and output location of the ranking query.
    /// * `exams` - Closed set of accepted exam codes (`ALL` is always accepted).
    /// * `poller` - Runs the query against the remote engine.
    pub fn new(target: QueryTarget, exams: Vec<String>, poller: ExecutionPoller) -> Self {
        Self {
            target,
            exams,
            poller,
        }
    }

    /// Serves one ranking request. Never fails; errors become `RankingResponse::Error`.
    pub async fn handle(&self, params: RankingParams) -> RankingResponse {
        tracing::info!("Ranking request: {:?}", params);

        match self.rank(params).await {
            Ok(response) => {
                tracing::info!(
                    "Ranking served with {} entries",
                    response.ranking().len()
                );
                response
            }
            Err(RankingError::Validation(e)) => {
                tracing::warn!("Rejected ranking request: {}", e);
                RankingResponse::Error
            }
            Err(e) => {
                tracing::error!("Ranking request failed: {}", e);
                RankingResponse::Error
            }
        }
    }

    /// Same as [`handle`](Self::handle) but keeps the failure cause.
    pub async fn rank(&self, params: RankingParams) -> Result<RankingResponse, RankingError> {
        let request = validate(params, &self.exams)?;

        let query = build_query(&self.target, &request);
        tracing::info!(
            "Query: {} (parameters: {:?})",
            query.query_string,
            query.parameters
        );

        let result = self.poller.execute(&query).await?;
        Ok(project(result, &request)?)
    }
}

/// Checks, in order: all fields present, exam known, both dates well-formed.
///
/// An inverted range (`start_date > end_date`) is accepted and left to the engine.
pub fn validate(params: RankingParams, exams: &[String]) -> Result<RankingRequest, ValidationError> {
    let exam = required(params.exam, "exam")?;
    let start_date = required(params.start_date, "start_date")?;
    let end_date = required(params.end_date, "end_date")?;

    let exam = ExamFilter::parse(&exam, exams).ok_or(ValidationError::UnknownExam(exam))?;

    Ok(RankingRequest {
        exam,
        start_date: parse_date("start_date", start_date)?,
        end_date: parse_date("end_date", end_date)?,
    })
}

fn required(value: Option<String>, field: &'static str) -> Result<String, ValidationError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or(ValidationError::MissingField(field))
}

fn parse_date(field: &'static str, value: String) -> Result<CalendarDate, ValidationError> {
    CalendarDate::parse(&value).ok_or(ValidationError::InvalidDate { field, value })
}
