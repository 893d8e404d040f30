//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! service layer for business logic.

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};

use super::dto::{
    CommodityListResponse, ComputeGtModelRequest, GtModelData, GtModelQuery, HealthResponse,
};
use super::error::AppError;
use super::state::AppState;
use crate::db::services as db_services;
use crate::parsing::parse_rows;
use crate::routes::export::EXPORT_FILE_NAME;
use crate::services::{self, compute_gt_model_data};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and the data source is reachable.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match db_services::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Commodities
// =============================================================================

/// GET /v1/commodities
pub async fn list_commodities(
    State(state): State<AppState>,
) -> HandlerResult<CommodityListResponse> {
    let commodities = db_services::list_commodities(state.repository.as_ref()).await?;
    let total = commodities.len();
    Ok(Json(CommodityListResponse { commodities, total }))
}

// =============================================================================
// Grade-Tonnage Model
// =============================================================================

async fn load_gt_model(state: &AppState, query: &GtModelQuery) -> Result<GtModelData, AppError> {
    let request = query.to_request(&state.model)?;
    let data = services::get_gt_model_data(
        state.repository.as_ref(),
        &query.selected_commodities(),
        &request,
        state.model.guide_curves,
    )
    .await?;
    Ok(data)
}

/// GET /v1/gt-model?commodities=copper,zinc&proximity=5&visible=Skarn|Porphyry
///
/// Build the grade-tonnage plot dataset from the repository.
pub async fn get_gt_model(
    State(state): State<AppState>,
    Query(query): Query<GtModelQuery>,
) -> HandlerResult<GtModelData> {
    tracing::debug!(commodities = %query.commodities, "Computing grade-tonnage model");
    Ok(Json(load_gt_model(&state, &query).await?))
}

/// POST /v1/gt-model
///
/// Build the plot dataset from a caller-supplied table and distance list.
pub async fn compute_gt_model(
    State(state): State<AppState>,
    Json(body): Json<ComputeGtModelRequest>,
) -> HandlerResult<GtModelData> {
    let records = parse_rows(&body.rows)?;
    let distances = body.distance_cache()?;
    let request = body.to_request(&state.model)?;
    tracing::debug!(
        records = records.len(),
        distances = distances.len(),
        "Computing grade-tonnage model from request body"
    );

    let data = compute_gt_model_data(
        records,
        distances,
        body.commodities.clone(),
        body.dictionary(),
        &request,
        state.model.guide_curves,
    )?;
    Ok(Json(data))
}

/// GET /v1/gt-model/export
///
/// Same query as `GET /v1/gt-model`; returns the visible clusters as CSV.
pub async fn export_gt_model(
    State(state): State<AppState>,
    Query(query): Query<GtModelQuery>,
) -> Result<impl IntoResponse, AppError> {
    let data = load_gt_model(&state, &query).await?;
    let csv = services::export_csv(&data)?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", EXPORT_FILE_NAME),
            ),
        ],
        csv,
    ))
}
