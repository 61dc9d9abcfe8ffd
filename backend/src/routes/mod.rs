//! Route definitions for the stock-order ledger API

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Pure previews
        .nest("/deductions", deduction_routes())
        .route("/deliveries/preview", post(handlers::preview_delivery))
        .route("/field-requirements", post(handlers::resolve_field_requirements))
        // Lots and candidate inputs
        .route("/lots/:lot_id", get(handlers::get_lot))
        .route("/lots/:lot_id/history", get(handlers::get_lot_history))
        .route(
            "/facilities/:facility_id/available-lots",
            get(handlers::list_available_lots),
        )
        .nest("/transformations", transformation_routes())
        // Public traceability (QR code scanning)
        .route("/trace/:lot_id", get(handlers::get_traceability_view))
}

/// Deduction and pricing previews
fn deduction_routes() -> Router<AppState> {
    Router::new()
        .route("/net-weight", post(handlers::preview_net_weight))
        .route("/final-price", post(handlers::preview_final_price))
}

/// Transformation routes
fn transformation_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::create_transformation))
        .route("/clip", post(handlers::clip_inputs))
        .route("/preview", post(handlers::preview_transformation))
        .route("/:processing_order_id", delete(handlers::delete_transformation))
}
