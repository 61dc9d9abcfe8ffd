//! HTTP handlers for batch history and public traceability

use axum::{
    extract::{Path, State},
    Json,
};
use shared::TimelineEntry;
use uuid::Uuid;

use crate::{
    error::AppResult,
    services::traceability::{TraceabilityService, TraceabilityView},
    AppState,
};

/// Grouped batch history of a lot
pub async fn get_lot_history(
    State(state): State<AppState>,
    Path(lot_id): Path<Uuid>,
) -> AppResult<Json<Vec<TimelineEntry>>> {
    let service = TraceabilityService::new(state.ledger);
    let timeline = service.get_history(lot_id).await?;
    Ok(Json(timeline))
}

/// Get public traceability view for a lot
/// This endpoint is reached from a scanned QR code
pub async fn get_traceability_view(
    State(state): State<AppState>,
    Path(lot_id): Path<Uuid>,
) -> AppResult<Json<TraceabilityView>> {
    let service = TraceabilityService::new(state.ledger);
    let view = service.get_traceability_view(lot_id).await?;
    Ok(Json(view))
}
