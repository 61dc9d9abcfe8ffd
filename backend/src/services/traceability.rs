//! Lot traceability service for batch history and QR code landing pages
//!
//! Fetches a lot's raw lineage from the ledger and folds sibling sub-lots
//! back into their parent batches before returning it.

use serde::Serialize;
use shared::{displayed_lot_count, group_timeline, TimelineEntry};
use std::sync::Arc;
use uuid::Uuid;

use super::lot::LotView;
use crate::error::AppResult;
use crate::external::LedgerStore;

/// Traceability service for lot lineage
#[derive(Clone)]
pub struct TraceabilityService {
    ledger: Arc<dyn LedgerStore>,
}

/// Complete traceability view for a lot
#[derive(Debug, Serialize)]
pub struct TraceabilityView {
    pub lot: LotView,
    pub timeline: Vec<TimelineEntry>,
    /// Lots shown across the timeline once sub-lots are grouped
    pub displayed_lots: usize,
}

impl TraceabilityService {
    pub fn new(ledger: Arc<dyn LedgerStore>) -> Self {
        Self { ledger }
    }

    /// Grouped batch history of a lot
    pub async fn get_history(&self, lot_id: Uuid) -> AppResult<Vec<TimelineEntry>> {
        let raw = self.ledger.fetch_raw_history(lot_id).await?;
        let entries = raw.len();
        let timeline = group_timeline(raw);
        tracing::debug!("History for lot {}: {} entries", lot_id, entries);
        Ok(timeline)
    }

    /// Lot plus its grouped history, as shown when a QR code is scanned
    pub async fn get_traceability_view(&self, lot_id: Uuid) -> AppResult<TraceabilityView> {
        let (lot, timeline) = tokio::try_join!(self.ledger.fetch_lot(lot_id), self.get_history(lot_id))?;

        let displayed_lots = timeline
            .iter()
            .map(|entry| match &entry.processing_order {
                Some(event) => displayed_lot_count(event),
                None => usize::from(entry.stock_order.is_some()),
            })
            .sum();

        Ok(TraceabilityView {
            lot: LotView::from(lot),
            timeline,
            displayed_lots,
        })
    }
}
