//! Transformation types and processing orders

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use super::{OrderType, StockOrder, Transaction, TransactionStatus};
use crate::error::LedgerError;

/// Kind of transformation applied to lots
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransformationType {
    Purchase,
    Processing,
    FinalProcessing,
    Transfer,
    Shipment,
    GenerateQrCode,
}

/// How many output lots a transformation may declare
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputCardinality {
    ExactlyOne,
    OneOrMore,
}

/// How output quantity relates to consumed input quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityRule {
    /// Output equals the consumed input exactly
    PassThrough,
    /// Output is set by the operator but cannot exceed consumed input
    AtMostInput,
    /// Output is a fixed target; consumed input cannot exceed it
    FillsTarget,
}

impl TransformationType {
    pub const ALL: [TransformationType; 6] = [
        TransformationType::Purchase,
        TransformationType::Processing,
        TransformationType::FinalProcessing,
        TransformationType::Transfer,
        TransformationType::Shipment,
        TransformationType::GenerateQrCode,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransformationType::Purchase => "PURCHASE",
            TransformationType::Processing => "PROCESSING",
            TransformationType::FinalProcessing => "FINAL_PROCESSING",
            TransformationType::Transfer => "TRANSFER",
            TransformationType::Shipment => "SHIPMENT",
            TransformationType::GenerateQrCode => "GENERATE_QR_CODE",
        }
    }

    /// Minimum number of consumed input lots
    pub fn min_inputs(&self) -> usize {
        match self {
            // a shipment may be opened before any stock is allocated to it
            TransformationType::Shipment => 0,
            _ => 1,
        }
    }

    pub fn output_cardinality(&self) -> OutputCardinality {
        match self {
            TransformationType::Processing => OutputCardinality::OneOrMore,
            _ => OutputCardinality::ExactlyOne,
        }
    }

    pub fn quantity_rule(&self) -> QuantityRule {
        match self {
            TransformationType::GenerateQrCode => QuantityRule::PassThrough,
            TransformationType::Shipment => QuantityRule::FillsTarget,
            _ => QuantityRule::AtMostInput,
        }
    }

    /// Status given to transactions when the transformation is committed
    pub fn initial_transaction_status(&self) -> TransactionStatus {
        match self {
            TransformationType::Shipment => TransactionStatus::Pending,
            _ => TransactionStatus::Executed,
        }
    }

    /// Tag carried by lots this transformation produces
    pub fn output_order_type(&self) -> OrderType {
        match self {
            TransformationType::Purchase => OrderType::Purchase,
            TransformationType::Transfer => OrderType::Transfer,
            TransformationType::Shipment => OrderType::General,
            TransformationType::Processing
            | TransformationType::FinalProcessing
            | TransformationType::GenerateQrCode => OrderType::Processing,
        }
    }

    pub fn is_processing(&self) -> bool {
        !matches!(self, TransformationType::Transfer)
    }
}

impl std::fmt::Display for TransformationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TransformationType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TransformationType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                LedgerError::UnsupportedOperation(format!("unknown transformation type '{}'", s))
            })
    }
}

/// One grouped transformation: its input transactions and resulting lots
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProcessingOrder {
    pub id: Uuid,
    pub transformation_type: TransformationType,
    pub processing_date: NaiveDate,
    pub input_transactions: Vec<Transaction>,
    pub target_lots: Vec<StockOrder>,
}

impl ProcessingOrder {
    /// Sum of quantities consumed from input lots
    pub fn total_input_quantity(&self) -> Decimal {
        self.input_transactions
            .iter()
            .filter(|t| t.status != TransactionStatus::Canceled)
            .map(|t| t.input_quantity)
            .sum()
    }

    /// Sum of output lot quantities
    pub fn total_output_quantity(&self) -> Decimal {
        self.target_lots.iter().map(|l| l.net_quantity()).sum()
    }

    /// An order can only be edited while none of its inputs have been executed
    pub fn is_editable(&self) -> bool {
        self.input_transactions
            .iter()
            .all(|t| t.status == TransactionStatus::Pending)
    }

    /// Cancel every pending transaction.
    ///
    /// Returns the quantity each source lot gets back. Executed
    /// transactions are left untouched.
    pub fn cancel(&mut self) -> HashMap<Uuid, Decimal> {
        let mut released: HashMap<Uuid, Decimal> = HashMap::new();
        for transaction in &mut self.input_transactions {
            if transaction.status == TransactionStatus::Pending {
                transaction.status = TransactionStatus::Canceled;
                *released.entry(transaction.source_lot_id).or_insert(Decimal::ZERO) +=
                    transaction.input_quantity;
            }
        }
        released
    }
}
