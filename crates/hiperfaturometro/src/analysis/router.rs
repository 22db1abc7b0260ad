use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::domain::{BidId, BidRecord};
use super::provider::ReferenceDataProvider;
use super::repository::{CaseRepository, RepositoryError};
use super::service::{CaseFilters, CaseService, CaseServiceError};

/// Router builder exposing the case endpoints consumed by the dashboard.
pub fn cases_router<P, R>(service: Arc<CaseService<P, R>>) -> Router
where
    P: ReferenceDataProvider + 'static,
    R: CaseRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/cases",
            post(assess_handler::<P, R>).get(list_handler::<P, R>),
        )
        .route("/api/v1/cases/by-orgao", get(by_orgao_handler::<P, R>))
        .route("/api/v1/cases/:case_id", get(detail_handler::<P, R>))
        .route("/api/v1/statistics", get(statistics_handler::<P, R>))
        .with_state(service)
}

pub(crate) async fn assess_handler<P, R>(
    State(service): State<Arc<CaseService<P, R>>>,
    axum::Json(bid): axum::Json<BidRecord>,
) -> Response
where
    P: ReferenceDataProvider + 'static,
    R: CaseRepository + 'static,
{
    let id = bid.id.clone();
    match service.assess(bid).and_then(|_| service.get(&id)) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record.view())).into_response(),
        Err(CaseServiceError::Assessment(error)) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(CaseServiceError::Provider(error)) => {
            // Surface a clear failure instead of silently serving zeroed
            // scores when the reference collaborator is unreachable.
            let payload = json!({ "error": error.to_string() });
            (StatusCode::SERVICE_UNAVAILABLE, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn list_handler<P, R>(
    State(service): State<Arc<CaseService<P, R>>>,
    Query(filters): Query<CaseFilters>,
) -> Response
where
    P: ReferenceDataProvider + 'static,
    R: CaseRepository + 'static,
{
    match service.list(&filters) {
        Ok(views) => {
            let payload = json!({ "data": views, "total": views.len() });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => internal_error(error),
    }
}

pub(crate) async fn detail_handler<P, R>(
    State(service): State<Arc<CaseService<P, R>>>,
    Path(case_id): Path<String>,
) -> Response
where
    P: ReferenceDataProvider + 'static,
    R: CaseRepository + 'static,
{
    let id = BidId(case_id);
    match service.get(&id) {
        Ok(record) => {
            let payload = json!({ "data": record.view() });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(CaseServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({ "error": format!("caso '{}' não encontrado", id.0) });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(error) => internal_error(error),
    }
}

pub(crate) async fn statistics_handler<P, R>(
    State(service): State<Arc<CaseService<P, R>>>,
) -> Response
where
    P: ReferenceDataProvider + 'static,
    R: CaseRepository + 'static,
{
    match service.statistics() {
        Ok(statistics) => {
            let payload = json!({ "data": statistics });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => internal_error(error),
    }
}

pub(crate) async fn by_orgao_handler<P, R>(
    State(service): State<Arc<CaseService<P, R>>>,
) -> Response
where
    P: ReferenceDataProvider + 'static,
    R: CaseRepository + 'static,
{
    match service.by_agency() {
        Ok(groups) => {
            let payload = json!({ "data": groups });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => internal_error(error),
    }
}

fn internal_error(error: CaseServiceError) -> Response {
    let payload = json!({ "error": error.to_string() });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
}
