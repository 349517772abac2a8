//! HTTP Query Engine Client
//!
//! Implements [`QueryEngine`] against a query gateway speaking the JSON protocol
//! in [`super::protocol`]. Every call is a single request with a per-request timeout;
//! retrying is the poller's business, not the transport's.

use super::client::QueryEngine;
use super::protocol::*;
use super::types::*;

use async_trait::async_trait;
use std::time::Duration;

pub struct HttpQueryEngine {
    /// Gateway base URL without a trailing slash, e.g. `http://127.0.0.1:9000`.
    base_url: String,
    http_client: reqwest::Client,
    timeout: Duration,
}

impl HttpQueryEngine {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client: reqwest::Client::new(),
            timeout,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Turns a non-2xx response into `EngineError::Rejected`, keeping the gateway's message.
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, EngineError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ErrorResponse>(&body) {
            Ok(err) => err.message,
            Err(_) if body.is_empty() => status.to_string(),
            Err(_) => body,
        };

        Err(EngineError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl QueryEngine for HttpQueryEngine {
    async fn submit(&self, query: &SubmitQuery) -> Result<QueryExecutionId, EngineError> {
        let response = self
            .http_client
            .post(self.url(ENDPOINT_SUBMIT_QUERY))
            .json(query)
            .timeout(self.timeout)
            .send()
            .await?;

        let body: SubmitQueryResponse = Self::check(response).await?.json().await?;
        Ok(body.query_execution_id)
    }

    async fn get_status(&self, id: &QueryExecutionId) -> Result<ExecutionStatus, EngineError> {
        let response = self
            .http_client
            .get(self.url(&execution_path(ENDPOINT_QUERY_STATUS, id)))
            .timeout(self.timeout)
            .send()
            .await?;

        let status: QueryStatusResponse = Self::check(response).await?.json().await?;
        Ok(status)
    }

    async fn get_results(
        &self,
        id: &QueryExecutionId,
        next_token: Option<&str>,
    ) -> Result<ResultPage, EngineError> {
        let params = GetResultsParams {
            next_token: next_token.map(str::to_string),
        };

        let response = self
            .http_client
            .get(self.url(&execution_path(ENDPOINT_QUERY_RESULTS, id)))
            .query(&params)
            .timeout(self.timeout)
            .send()
            .await?;

        let page: GetResultsResponse = Self::check(response).await?.json().await?;
        Ok(page)
    }

    async fn cancel(&self, id: &QueryExecutionId) -> Result<(), EngineError> {
        let response = self
            .http_client
            .post(self.url(&execution_path(ENDPOINT_QUERY_CANCEL, id)))
            .timeout(self.timeout)
            .send()
            .await?;

        Self::check(response).await?;
        Ok(())
    }
}
