//! HTTP handler for form field requirements

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use shared::{FacilityFlags, FieldRequirementSet, TransformationType};

use crate::{error::AppResult, AppState};

#[derive(Debug, Deserialize)]
pub struct FieldRequirementsInput {
    #[serde(default)]
    pub facility: FacilityFlags,
    pub transformation_type: String,
}

#[derive(Debug, Serialize)]
pub struct FieldRequirementsResponse {
    pub strategy: &'static str,
    pub commodity: String,
    pub fields: FieldRequirementSet,
}

/// Resolve which fields a transformation form shows and requires
pub async fn resolve_field_requirements(
    State(state): State<AppState>,
    Json(input): Json<FieldRequirementsInput>,
) -> AppResult<Json<FieldRequirementsResponse>> {
    let transformation_type: TransformationType = input.transformation_type.parse()?;
    let fields = state.field_strategy.resolve(&input.facility, transformation_type);

    Ok(Json(FieldRequirementsResponse {
        strategy: state.field_strategy.name(),
        commodity: state.config.commodity.commodity_type.to_string(),
        fields,
    }))
}
