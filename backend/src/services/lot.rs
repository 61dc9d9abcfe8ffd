//! Lot service: single-lot views, candidate inputs and delivery previews

use rust_decimal::Decimal;
use serde::Serialize;
use shared::{record_delivery, DeliveryDraft, NetWeight, StockOrder};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::error::AppResult;
use crate::external::{AvailableLotsQuery, LedgerStore};

/// Lot service for lookups and delivery previews
#[derive(Clone)]
pub struct LotService {
    ledger: Arc<dyn LedgerStore>,
}

/// A lot together with its derived quantities and amounts
#[derive(Debug, Clone, Serialize)]
pub struct LotView {
    #[serde(flatten)]
    pub lot: StockOrder,
    pub net_weight: NetWeight,
    pub consumed_quantity: Decimal,
    pub cost: Option<Decimal>,
    pub balance: Option<Decimal>,
}

impl From<StockOrder> for LotView {
    fn from(lot: StockOrder) -> Self {
        Self {
            net_weight: lot.net_weight(),
            consumed_quantity: lot.consumed_quantity(),
            cost: lot.cost(),
            balance: lot.balance(),
            lot,
        }
    }
}

impl LotService {
    pub fn new(ledger: Arc<dyn LedgerStore>) -> Self {
        Self { ledger }
    }

    /// Get a lot with its derived values
    pub async fn get_lot(&self, lot_id: Uuid) -> AppResult<LotView> {
        let lot = self.ledger.fetch_lot(lot_id).await?;
        Ok(LotView::from(lot))
    }

    /// Lots at a facility that can still be consumed, in the order the
    /// ledger returns them
    pub async fn available_lots(&self, query: AvailableLotsQuery) -> AppResult<Vec<LotView>> {
        query.validate()?;

        let lots = self.ledger.fetch_available_lots(&query).await?;
        let total = lots.len();
        let views: Vec<LotView> = lots
            .into_iter()
            .filter(|lot| lot.available_quantity > Decimal::ZERO)
            .map(LotView::from)
            .collect();

        tracing::debug!(
            "Facility {}: {} of {} lots available",
            query.facility_id,
            views.len(),
            total
        );
        Ok(views)
    }

    /// Validate a delivery and show the purchase lot it would create
    pub fn preview_delivery(&self, draft: DeliveryDraft) -> AppResult<LotView> {
        let lot = record_delivery(draft)?;
        Ok(LotView::from(lot))
    }
}
