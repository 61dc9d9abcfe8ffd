//! Lot HTTP handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Serialize;
use shared::DeliveryDraft;
use uuid::Uuid;

use crate::error::AppResult;
use crate::external::AvailableLotsQuery;
use crate::services::lot::{LotService, LotView};
use crate::AppState;

#[derive(Serialize)]
pub struct AvailableLotsResponse {
    pub lots: Vec<LotView>,
}

/// Get a specific lot with its derived values
pub async fn get_lot(
    State(state): State<AppState>,
    Path(lot_id): Path<Uuid>,
) -> AppResult<Json<LotView>> {
    let service = LotService::new(state.ledger);
    let lot = service.get_lot(lot_id).await?;
    Ok(Json(lot))
}

/// List lots at a facility that can be consumed as inputs
pub async fn list_available_lots(
    State(state): State<AppState>,
    Path(facility_id): Path<Uuid>,
    Query(mut query): Query<AvailableLotsQuery>,
) -> AppResult<Json<AvailableLotsResponse>> {
    query.facility_id = facility_id;
    let service = LotService::new(state.ledger);
    let lots = service.available_lots(query).await?;
    Ok(Json(AvailableLotsResponse { lots }))
}

/// Validate a farm delivery and preview the purchase lot
pub async fn preview_delivery(
    State(state): State<AppState>,
    Json(draft): Json<DeliveryDraft>,
) -> AppResult<Json<LotView>> {
    let service = LotService::new(state.ledger);
    let lot = service.preview_delivery(draft)?;
    Ok(Json(lot))
}
