//! Input clipping selector
//!
//! Fills a fixed target quantity from candidate lots in the order they are
//! presented, consuming each selected candidate fully until the remainder is
//! smaller than its availability, then partially, then deselecting the rest.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::StockOrder;

/// A lot offered as a possible input
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CandidateLot {
    pub lot_id: Uuid,
    pub available_quantity: Decimal,
    /// Whether the operator ticked this candidate
    #[serde(default = "default_selected")]
    pub selected: bool,
}

fn default_selected() -> bool {
    true
}

impl From<&StockOrder> for CandidateLot {
    fn from(lot: &StockOrder) -> Self {
        Self {
            lot_id: lot.id,
            available_quantity: lot.available_quantity,
            selected: true,
        }
    }
}

/// Outcome for one candidate after clipping
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClippedInput {
    pub lot_id: Uuid,
    pub selected: bool,
    pub selected_quantity: Decimal,
}

/// Result of a clipping pass
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClippingResult {
    pub inputs: Vec<ClippedInput>,
    pub total_selected: Decimal,
    /// Target quantity still unfilled
    pub remaining: Decimal,
}

impl ClippingResult {
    /// Inputs that actually contribute quantity
    pub fn contributing(&self) -> impl Iterator<Item = &ClippedInput> {
        self.inputs.iter().filter(|i| i.selected)
    }
}

/// Greedily fill `target - already_committed` from `candidates`.
///
/// Candidates keep their order in the result. Unselected candidates pass
/// through untouched with a zero quantity.
pub fn clip_inputs(
    candidates: &[CandidateLot],
    target: Decimal,
    already_committed: Decimal,
) -> ClippingResult {
    let mut remaining = (target - already_committed).max(Decimal::ZERO);
    let mut total_selected = Decimal::ZERO;

    let inputs = candidates
        .iter()
        .map(|candidate| {
            if !candidate.selected {
                return ClippedInput {
                    lot_id: candidate.lot_id,
                    selected: false,
                    selected_quantity: Decimal::ZERO,
                };
            }

            let available = candidate.available_quantity.max(Decimal::ZERO);
            let consumed = if remaining >= available {
                available
            } else {
                remaining
            };
            remaining -= consumed;
            total_selected += consumed;

            ClippedInput {
                lot_id: candidate.lot_id,
                selected: consumed > Decimal::ZERO,
                selected_quantity: consumed,
            }
        })
        .collect();

    ClippingResult {
        inputs,
        total_selected,
        remaining,
    }
}
