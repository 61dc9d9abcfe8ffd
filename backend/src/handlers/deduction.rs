//! HTTP handlers for weight and price deduction previews
//!
//! Fields arrive as typed into a form: JSON numbers, numeric text, blank
//! text or junk. Anything that does not read as a number counts as 0.

use axum::Json;
use rust_decimal::Decimal;
use serde::{de::IgnoredAny, Deserialize, Deserializer, Serialize};
use shared::{compute_final_price, compute_net_weight, parse_optional_quantity, parse_quantity, NetWeight};

/// Weight-stage inputs of a delivery
#[derive(Debug, Deserialize)]
pub struct NetWeightInput {
    #[serde(default, deserialize_with = "form_quantity")]
    pub gross_quantity: Decimal,
    #[serde(default, deserialize_with = "optional_form_quantity")]
    pub tare: Option<Decimal>,
    #[serde(default, deserialize_with = "optional_form_quantity")]
    pub damaged_weight_deduction: Option<Decimal>,
    #[serde(default, deserialize_with = "optional_form_quantity")]
    pub moisture_percentage: Option<Decimal>,
}

/// Price-stage inputs of a delivery
#[derive(Debug, Deserialize)]
pub struct FinalPriceInput {
    #[serde(default, deserialize_with = "form_quantity")]
    pub price_per_unit: Decimal,
    #[serde(default, deserialize_with = "optional_form_quantity")]
    pub damaged_price_deduction: Option<Decimal>,
    #[serde(default, deserialize_with = "form_quantity")]
    pub net_weight: Decimal,
    #[serde(default, deserialize_with = "optional_form_quantity")]
    pub final_price_discount: Option<Decimal>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FormValue {
    Number(serde_json::Number),
    Text(String),
    Other(IgnoredAny),
}

impl FormValue {
    fn into_text(self) -> Option<String> {
        match self {
            FormValue::Number(n) => Some(n.to_string()),
            FormValue::Text(text) => Some(text),
            FormValue::Other(_) => None,
        }
    }
}

fn form_quantity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
    let text = Option::<FormValue>::deserialize(deserializer)?.and_then(FormValue::into_text);
    Ok(text.map(|t| parse_quantity(&t)).unwrap_or(Decimal::ZERO))
}

fn optional_form_quantity<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Decimal>, D::Error> {
    let text = Option::<FormValue>::deserialize(deserializer)?.and_then(FormValue::into_text);
    Ok(text.and_then(|t| parse_optional_quantity(&t)))
}

#[derive(Debug, Serialize)]
pub struct FinalPriceResponse {
    pub total: Decimal,
}

/// Preview the net weight of a delivery
pub async fn preview_net_weight(Json(input): Json<NetWeightInput>) -> Json<NetWeight> {
    Json(compute_net_weight(
        input.gross_quantity,
        input.tare,
        input.damaged_weight_deduction,
        input.moisture_percentage,
    ))
}

/// Preview the final price of a delivery
pub async fn preview_final_price(Json(input): Json<FinalPriceInput>) -> Json<FinalPriceResponse> {
    let total = compute_final_price(
        input.price_per_unit,
        input.damaged_price_deduction,
        input.net_weight,
        input.final_price_discount,
    );
    Json(FinalPriceResponse { total })
}
