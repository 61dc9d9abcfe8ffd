//! Batch history timeline models

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{StockOrder, TransformationType};
use crate::types::MeasureUnit;

/// Direction of a timeline entry relative to the root lot
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TimelineDirection {
    Ancestor,
    Root,
    Descendant,
}

/// One step in a lot's lineage
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimelineEntry {
    pub direction: TimelineDirection,
    /// Distance from the root lot in transformation steps
    pub depth: u32,
    /// Lot recorded at this step when no transformation is attached (e.g. a delivery)
    pub stock_order: Option<StockOrder>,
    pub processing_order: Option<TimelineEvent>,
}

/// A transformation as it appears in a timeline
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimelineEvent {
    pub id: Uuid,
    pub transformation_type: TransformationType,
    pub processing_date: NaiveDate,
    #[serde(default)]
    pub input_lots: Vec<StockOrder>,
    /// Output lots not folded into a group
    #[serde(default)]
    pub target_lots: Vec<StockOrder>,
    #[serde(default)]
    pub target_groups: Vec<LotGroup>,
}

/// Sibling sub-lots split from one parent, aggregated back together
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LotGroup {
    /// Internal lot number with the trailing `/<segment>` stripped
    pub group_key: String,
    pub facility_id: Uuid,
    pub measure_unit: MeasureUnit,
    pub production_date: NaiveDate,
    pub summed_quantity: Decimal,
    pub member_ids: Vec<Uuid>,
}

impl LotGroup {
    pub fn member_count(&self) -> usize {
        self.member_ids.len()
    }
}
