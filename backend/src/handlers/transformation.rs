//! HTTP handlers for transformations

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use shared::{ClippingResult, TransformationOutcome};
use uuid::Uuid;

use crate::{
    error::AppResult,
    services::transformation::{ClipRequest, TransformationRequest, TransformationService},
    AppState,
};

fn service(state: &AppState) -> TransformationService {
    TransformationService::new(state.ledger.clone(), state.config.commodity.currency.clone())
}

/// Fill a target quantity from candidate lots
pub async fn clip_inputs(
    State(state): State<AppState>,
    Json(input): Json<ClipRequest>,
) -> Json<ClippingResult> {
    Json(service(&state).clip(&input))
}

/// Validate a transformation and preview its outcome without submitting
pub async fn preview_transformation(
    State(state): State<AppState>,
    Json(input): Json<TransformationRequest>,
) -> AppResult<Json<TransformationOutcome>> {
    let outcome = service(&state).preview(input).await?;
    Ok(Json(outcome))
}

/// Validate and submit a transformation
pub async fn create_transformation(
    State(state): State<AppState>,
    Json(input): Json<TransformationRequest>,
) -> AppResult<impl IntoResponse> {
    let response = service(&state).submit(input).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Delete a transformation
pub async fn delete_transformation(
    State(state): State<AppState>,
    Path(processing_order_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    service(&state).delete(processing_order_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
