//! Remote persistence integrations
//!
//! Lots, transactions and transformation events are owned by a remote
//! ledger service. Everything the backend needs from it goes through the
//! `LedgerStore` trait.

pub mod ledger_api;
#[cfg(test)]
pub mod memory;

pub use ledger_api::LedgerApiClient;

use axum::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::{DateRange, StockOrder, TimelineEntry, TransformationDraft};
use uuid::Uuid;
use validator::Validate;

use crate::error::AppResult;

/// Filters for candidate input lots at a facility
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct AvailableLotsQuery {
    #[serde(skip)]
    pub facility_id: Uuid,
    pub product_id: Option<Uuid>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub organic_only: bool,
    /// Substring of the internal lot number
    #[validate(length(min = 1, max = 64, message = "Lot name filter must be 1-64 characters"))]
    pub lot_name: Option<String>,
}

impl AvailableLotsQuery {
    pub fn date_range(&self) -> Option<DateRange> {
        match (self.from, self.to) {
            (Some(start), Some(end)) => Some(DateRange::new(start, end)),
            (Some(start), None) => Some(DateRange::new(start, NaiveDate::MAX)),
            (None, Some(end)) => Some(DateRange::new(NaiveDate::MIN, end)),
            (None, None) => None,
        }
    }

    /// Whether a lot passes every filter and still has quantity left
    pub fn matches(&self, lot: &StockOrder) -> bool {
        if lot.facility_id != self.facility_id || lot.available_quantity <= rust_decimal::Decimal::ZERO {
            return false;
        }
        if let Some(product_id) = self.product_id {
            if lot.product.id() != product_id {
                return false;
            }
        }
        if let Some(range) = self.date_range() {
            if !range.contains(lot.production_date) {
                return false;
            }
        }
        if self.organic_only && !lot.organic {
            return false;
        }
        if let Some(name) = &self.lot_name {
            let needle = name.to_lowercase();
            let found = lot
                .internal_lot_number
                .as_deref()
                .map(|n| n.to_lowercase().contains(&needle))
                .unwrap_or(false);
            if !found {
                return false;
            }
        }
        true
    }
}

/// Identifiers the remote service assigned to a stored transformation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubmissionReceipt {
    pub processing_order_id: Uuid,
    pub created_lot_ids: Vec<Uuid>,
    pub transaction_ids: Vec<Uuid>,
}

/// Remote persistence boundary
#[async_trait]
pub trait LedgerStore: Send + Sync {
    async fn fetch_lot(&self, lot_id: Uuid) -> AppResult<StockOrder>;

    async fn fetch_available_lots(&self, query: &AvailableLotsQuery) -> AppResult<Vec<StockOrder>>;

    /// Raw lineage of a lot, sub-lots not yet grouped
    async fn fetch_raw_history(&self, lot_id: Uuid) -> AppResult<Vec<TimelineEntry>>;

    async fn submit_transformation(&self, draft: &TransformationDraft) -> AppResult<SubmissionReceipt>;

    async fn delete_transformation(&self, processing_order_id: Uuid) -> AppResult<()>;

    /// Whether the remote service answers at all
    async fn ping(&self) -> bool;
}
