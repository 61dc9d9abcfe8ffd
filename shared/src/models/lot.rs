//! Lot (stock order) model

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::deduction::{compute_final_price, compute_net_weight, NetWeight};
use crate::types::MeasureUnit;

/// A discrete quantity of product at one point in the chain
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StockOrder {
    pub id: Uuid,
    pub order_type: OrderType,
    pub facility_id: Uuid,
    pub product: ProductRef,
    pub measure_unit: MeasureUnit,
    /// Human-facing batch identifier, optionally suffixed `/<sacNumber>`
    pub internal_lot_number: Option<String>,
    pub sac_number: Option<u32>,
    pub production_date: NaiveDate,
    pub creator_id: Option<Uuid>,

    pub gross_quantity: Decimal,
    pub tare: Option<Decimal>,
    pub damaged_weight_deduction: Option<Decimal>,
    pub moisture_percentage: Option<Decimal>,
    pub fulfilled_quantity: Decimal,
    pub available_quantity: Decimal,

    pub price_per_unit: Option<Decimal>,
    pub damaged_price_deduction: Option<Decimal>,
    pub final_price_discount: Option<Decimal>,
    pub paid: Option<Decimal>,
    pub currency: Option<String>,
    pub organic: bool,

    #[serde(default)]
    pub traceability: TraceabilityAttributes,
    pub created_at: Option<DateTime<Utc>>,
}

/// Tag recording how a lot came into existence
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    Purchase,
    General,
    Processing,
    Transfer,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Purchase => "PURCHASE",
            OrderType::General => "GENERAL",
            OrderType::Processing => "PROCESSING",
            OrderType::Transfer => "TRANSFER",
        }
    }
}

impl std::fmt::Display for OrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The product a lot holds: either a semi-product or a final product
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ProductRef {
    SemiProduct(Uuid),
    FinalProduct(Uuid),
}

impl ProductRef {
    pub fn id(&self) -> Uuid {
        match self {
            ProductRef::SemiProduct(id) | ProductRef::FinalProduct(id) => *id,
        }
    }

    pub fn is_final(&self) -> bool {
        matches!(self, ProductRef::FinalProduct(_))
    }
}

/// Commodity-specific custody and quality attributes carried along a lot
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TraceabilityAttributes {
    /// Number of containers (sacks, boxes, tubs) holding the lot
    pub container_count: Option<u32>,
    pub week_number: Option<u32>,
    pub quality_note: Option<String>,
    pub lab_analysis: Option<String>,
    pub sensorial_score: Option<Decimal>,
    pub freezing_type: Option<String>,
    pub classification: Option<String>,
}

impl StockOrder {
    /// Net weight breakdown derived from the gross quantity and deductions
    pub fn net_weight(&self) -> NetWeight {
        compute_net_weight(
            self.gross_quantity,
            self.tare,
            self.damaged_weight_deduction,
            self.moisture_percentage,
        )
    }

    /// Net quantity; derived, never stored
    pub fn net_quantity(&self) -> Decimal {
        self.net_weight().net
    }

    pub fn moisture_weight_deduction(&self) -> Decimal {
        self.net_weight().moisture_deduction
    }

    /// Total cost of the lot, if it carries a price
    pub fn cost(&self) -> Option<Decimal> {
        self.price_per_unit.map(|price| {
            compute_final_price(
                price,
                self.damaged_price_deduction,
                self.net_quantity(),
                self.final_price_discount,
            )
        })
    }

    /// Outstanding amount: cost minus what has already been paid
    pub fn balance(&self) -> Option<Decimal> {
        self.cost()
            .map(|cost| cost.saturating_sub(self.paid.unwrap_or(Decimal::ZERO)))
    }

    /// Quantity already consumed by downstream transactions
    pub fn consumed_quantity(&self) -> Decimal {
        self.net_quantity()
            .saturating_sub(self.available_quantity)
            .max(Decimal::ZERO)
    }

    /// Prefix shared by sibling sub-lots, if this lot is a sac fragment
    pub fn sac_group_key(&self) -> Option<&str> {
        self.internal_lot_number.as_deref().and_then(sac_group_key)
    }
}

/// Text before the final `/segment` of an internal lot number.
///
/// `"LOT1/2"` yields `Some("LOT1")`; numbers without `/` yield `None`.
pub fn sac_group_key(internal_lot_number: &str) -> Option<&str> {
    internal_lot_number
        .rfind('/')
        .map(|idx| &internal_lot_number[..idx])
}

/// Build a sub-lot number: `<parent>/<sac>`
pub fn sac_lot_number(parent: &str, sac_number: u32) -> String {
    format!("{}/{}", parent, sac_number)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// A plain lot whose net equals its gross and which is fully available
    pub fn lot(quantity: Decimal) -> StockOrder {
        StockOrder {
            id: Uuid::new_v4(),
            order_type: OrderType::Purchase,
            facility_id: Uuid::nil(),
            product: ProductRef::SemiProduct(Uuid::nil()),
            measure_unit: MeasureUnit::kilograms(),
            internal_lot_number: None,
            sac_number: None,
            production_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            creator_id: None,
            gross_quantity: quantity,
            tare: None,
            damaged_weight_deduction: None,
            moisture_percentage: None,
            fulfilled_quantity: quantity,
            available_quantity: quantity,
            price_per_unit: None,
            damaged_price_deduction: None,
            final_price_discount: None,
            paid: None,
            currency: Some("EUR".to_string()),
            organic: false,
            traceability: TraceabilityAttributes::default(),
            created_at: None,
        }
    }

    pub fn numbered_lot(number: &str, quantity: Decimal) -> StockOrder {
        StockOrder {
            internal_lot_number: Some(number.to_string()),
            ..lot(quantity)
        }
    }
}
