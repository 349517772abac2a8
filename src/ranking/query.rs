//! Ranking Query Builder
//!
//! Turns a validated `RankingRequest` into the aggregation query sent to the engine.
//! Caller-supplied values (dates, exam code) are always bound as parameters; only the
//! configured database and table names are written into the SQL text, and those are
//! checked to be plain identifiers when the configuration is loaded.

use super::types::{ExamFilter, RankingRequest};
use crate::engine::types::{QueryParameter, SubmitQuery};

/// Where the ranking data lives and where the engine writes its output.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryTarget {
    pub database: String,
    pub table: String,
    pub output_location: String,
}

/// Builds the leaderboard query for `request`.
///
/// Rows come back as `(name, total_score)`, highest total first.
pub fn build_query(target: &QueryTarget, request: &RankingRequest) -> SubmitQuery {
    let mut query_string = format!(
        "SELECT name, SUM(score) AS total_score FROM {}.{} \
         WHERE date(?) <= \"date\" AND \"date\" <= date(?)",
        target.database, target.table
    );
    let mut parameters = vec![
        QueryParameter::Date(request.start_date.date),
        QueryParameter::Date(request.end_date.date),
    ];

    if let ExamFilter::Exam(code) = &request.exam {
        query_string.push_str(" AND \"exam\" = ?");
        parameters.push(QueryParameter::Text(code.clone()));
    }

    query_string.push_str(" GROUP BY name ORDER BY total_score DESC");

    SubmitQuery {
        query_string,
        parameters,
        database: target.database.clone(),
        output_location: target.output_location.clone(),
        client_request_token: uuid::Uuid::new_v4().to_string(),
    }
}
