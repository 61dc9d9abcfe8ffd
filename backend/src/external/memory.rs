//! In-memory ledger store for router and service tests

use axum::async_trait;
use shared::{commit_transformation, StockOrder, TimelineEntry, TransformationDraft};
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

use super::{AvailableLotsQuery, LedgerStore, SubmissionReceipt};
use crate::error::{AppError, AppResult};

#[derive(Default)]
pub struct InMemoryLedger {
    lots: Mutex<HashMap<Uuid, StockOrder>>,
    histories: Mutex<HashMap<Uuid, Vec<TimelineEntry>>>,
    /// Processing order id -> lots it created
    orders: Mutex<HashMap<Uuid, Vec<Uuid>>>,
    pub offline: bool,
}

impl InMemoryLedger {
    pub fn with_lots(lots: Vec<StockOrder>) -> Self {
        let store = Self::default();
        {
            let mut map = store.lots.lock().unwrap();
            for lot in lots {
                map.insert(lot.id, lot);
            }
        }
        store
    }

    pub fn offline() -> Self {
        Self {
            offline: true,
            ..Default::default()
        }
    }

    pub fn set_history(&self, lot_id: Uuid, timeline: Vec<TimelineEntry>) {
        self.histories.lock().unwrap().insert(lot_id, timeline);
    }

    pub fn lot(&self, lot_id: Uuid) -> Option<StockOrder> {
        self.lots.lock().unwrap().get(&lot_id).cloned()
    }

    fn check_online(&self) -> AppResult<()> {
        if self.offline {
            return Err(AppError::RemoteFailure("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedger {
    async fn fetch_lot(&self, lot_id: Uuid) -> AppResult<StockOrder> {
        self.check_online()?;
        self.lot(lot_id).ok_or_else(|| AppError::NotFound("Lot".to_string()))
    }

    async fn fetch_available_lots(&self, query: &AvailableLotsQuery) -> AppResult<Vec<StockOrder>> {
        self.check_online()?;
        let mut lots: Vec<StockOrder> = self
            .lots
            .lock()
            .unwrap()
            .values()
            .filter(|lot| query.matches(lot))
            .cloned()
            .collect();
        lots.sort_by_key(|lot| (lot.production_date, lot.internal_lot_number.clone()));
        Ok(lots)
    }

    async fn fetch_raw_history(&self, lot_id: Uuid) -> AppResult<Vec<TimelineEntry>> {
        self.check_online()?;
        self.histories
            .lock()
            .unwrap()
            .get(&lot_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Lot".to_string()))
    }

    async fn submit_transformation(&self, draft: &TransformationDraft) -> AppResult<SubmissionReceipt> {
        self.check_online()?;
        let outcome = commit_transformation(draft)?;
        let order = outcome.processing_order;

        let mut lots = self.lots.lock().unwrap();
        for input in outcome.updated_inputs {
            lots.insert(input.id, input);
        }
        let created_lot_ids: Vec<Uuid> = order.target_lots.iter().map(|lot| lot.id).collect();
        for target in order.target_lots {
            lots.insert(target.id, target);
        }
        self.orders
            .lock()
            .unwrap()
            .insert(order.id, created_lot_ids.clone());

        Ok(SubmissionReceipt {
            processing_order_id: order.id,
            created_lot_ids,
            transaction_ids: order.input_transactions.iter().map(|t| t.id).collect(),
        })
    }

    async fn delete_transformation(&self, processing_order_id: Uuid) -> AppResult<()> {
        self.check_online()?;
        let created = self
            .orders
            .lock()
            .unwrap()
            .remove(&processing_order_id)
            .ok_or_else(|| AppError::NotFound("Processing order".to_string()))?;
        let mut lots = self.lots.lock().unwrap();
        for lot_id in created {
            lots.remove(&lot_id);
        }
        Ok(())
    }

    async fn ping(&self) -> bool {
        !self.offline
    }
}
