use super::service::RankingService;
use super::types::{RankingParams, RankingResponse};

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::Query;
use axum::{Extension, Json};
use std::sync::Arc;

pub const ENDPOINT_RANKING: &str = "/ranking";

/// `POST /ranking` with a JSON body `{exam, start_date, end_date}`.
///
/// An unreadable body (wrong content type, wrong field types) gets the error envelope
/// rather than axum's rejection text.
pub async fn handle_post_ranking(
    Extension(service): Extension<Arc<RankingService>>,
    params: Result<Json<RankingParams>, JsonRejection>,
) -> Json<RankingResponse> {
    match params {
        Ok(Json(params)) => Json(service.handle(params).await),
        Err(rejection) => {
            tracing::warn!("Rejected ranking body: {}", rejection.body_text());
            Json(RankingResponse::Error)
        }
    }
}

/// `GET /ranking?exam=..&start_date=..&end_date=..`
pub async fn handle_get_ranking(
    Extension(service): Extension<Arc<RankingService>>,
    params: Result<Query<RankingParams>, QueryRejection>,
) -> Json<RankingResponse> {
    match params {
        Ok(Query(params)) => Json(service.handle(params).await),
        Err(rejection) => {
            tracing::warn!("Rejected ranking query string: {}", rejection.body_text());
            Json(RankingResponse::Error)
        }
    }
}
