//! Transaction edges between lots

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::MeasureUnit;

/// A directed edge recording quantity flowing from a source lot to a target lot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: Uuid,
    pub source_lot_id: Uuid,
    pub target_lot_id: Uuid,
    pub input_quantity: Decimal,
    pub output_quantity: Decimal,
    pub measure_unit: MeasureUnit,
    pub status: TransactionStatus,
    /// Part of a processing transformation rather than a simple transfer
    pub is_processing: bool,
}

/// Transaction status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    Pending,
    Executed,
    Canceled,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "PENDING",
            TransactionStatus::Executed => "EXECUTED",
            TransactionStatus::Canceled => "CANCELED",
        }
    }
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Transaction {
    /// Quantity lost between input and output (zero for pass-through edges)
    pub fn loss(&self) -> Decimal {
        (self.input_quantity - self.output_quantity).max(Decimal::ZERO)
    }
}
