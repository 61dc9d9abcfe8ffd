//! Farm deliveries: the entry point of every lot

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::LedgerResult;
use crate::models::{OrderType, ProductRef, StockOrder, TraceabilityAttributes};
use crate::types::MeasureUnit;
use crate::validation::validate_delivery;

/// What an operator records when a farmer delivers produce
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeliveryDraft {
    pub facility_id: Uuid,
    pub product: ProductRef,
    #[serde(default)]
    pub measure_unit: MeasureUnit,
    pub internal_lot_number: Option<String>,
    pub production_date: NaiveDate,
    pub creator_id: Option<Uuid>,
    pub gross_quantity: Decimal,
    pub tare: Option<Decimal>,
    pub damaged_weight_deduction: Option<Decimal>,
    pub moisture_percentage: Option<Decimal>,
    pub price_per_unit: Option<Decimal>,
    pub damaged_price_deduction: Option<Decimal>,
    pub final_price_discount: Option<Decimal>,
    pub paid: Option<Decimal>,
    pub currency: Option<String>,
    #[serde(default)]
    pub organic: bool,
    #[serde(default)]
    pub traceability: TraceabilityAttributes,
}

/// Validate a delivery and turn it into a purchase lot.
///
/// The new lot is fully available: nothing has consumed it yet.
pub fn record_delivery(draft: DeliveryDraft) -> LedgerResult<StockOrder> {
    validate_delivery(&draft)?;

    let mut lot = StockOrder {
        id: Uuid::new_v4(),
        order_type: OrderType::Purchase,
        facility_id: draft.facility_id,
        product: draft.product,
        measure_unit: draft.measure_unit,
        internal_lot_number: draft.internal_lot_number,
        sac_number: None,
        production_date: draft.production_date,
        creator_id: draft.creator_id,
        gross_quantity: draft.gross_quantity,
        tare: draft.tare,
        damaged_weight_deduction: draft.damaged_weight_deduction,
        moisture_percentage: draft.moisture_percentage,
        fulfilled_quantity: Decimal::ZERO,
        available_quantity: Decimal::ZERO,
        price_per_unit: draft.price_per_unit,
        damaged_price_deduction: draft.damaged_price_deduction,
        final_price_discount: draft.final_price_discount,
        paid: draft.paid,
        currency: draft.currency,
        organic: draft.organic,
        traceability: draft.traceability,
        created_at: None,
    };

    let net = lot.net_quantity();
    lot.fulfilled_quantity = net;
    lot.available_quantity = net;
    Ok(lot)
}

#[cfg(test)]
impl DeliveryDraft {
    pub(crate) fn sample(gross: Decimal) -> Self {
        Self {
            facility_id: Uuid::nil(),
            product: ProductRef::SemiProduct(Uuid::nil()),
            measure_unit: MeasureUnit::kilograms(),
            internal_lot_number: Some("DEL-001".to_string()),
            production_date: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
            creator_id: None,
            gross_quantity: gross,
            tare: None,
            damaged_weight_deduction: None,
            moisture_percentage: None,
            price_per_unit: None,
            damaged_price_deduction: None,
            final_price_discount: None,
            paid: None,
            currency: None,
            organic: false,
            traceability: TraceabilityAttributes::default(),
        }
    }
}
