//! Query Engine Wire Protocol
//!
//! Defines the Data Transfer Objects (DTOs) exchanged with the query gateway over HTTP.
//!
//! Endpoint constants are relative to the engine base URL. Paths containing `{id}`
//! are expanded with [`execution_path`].

use super::types::*;
use serde::{Deserialize, Serialize};

pub const ENDPOINT_SUBMIT_QUERY: &str = "/v1/queries";
pub const ENDPOINT_QUERY_STATUS: &str = "/v1/queries/{id}";
pub const ENDPOINT_QUERY_RESULTS: &str = "/v1/queries/{id}/results";
pub const ENDPOINT_QUERY_CANCEL: &str = "/v1/queries/{id}/cancel";

/// Substitutes an execution id into one of the per-execution endpoints.
pub fn execution_path(endpoint: &str, id: &QueryExecutionId) -> String {
    endpoint.replace("{id}", &id.0)
}

/// Body of `POST /v1/queries`.
pub type SubmitQueryRequest = SubmitQuery;

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitQueryResponse {
    pub query_execution_id: QueryExecutionId,
}

/// Body of `GET /v1/queries/{id}`.
pub type QueryStatusResponse = ExecutionStatus;

/// Query string of `GET /v1/queries/{id}/results`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct GetResultsParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

/// Body of `GET /v1/queries/{id}/results`.
pub type GetResultsResponse = ResultPage;

/// Error body the gateway returns alongside non-2xx statuses.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}
