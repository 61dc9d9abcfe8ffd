//! Transformation orchestrator
//!
//! Validates a drafted transformation against the rules of its type and,
//! on commit, produces the transaction edges, the output lots and the
//! post-consumption state of every input lot. Nothing here is persisted:
//! the result is the preview of what the persistence service will store.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

use crate::error::{LedgerResult, ValidationErrors, ValidationRule};
use crate::models::{
    sac_lot_number, OutputCardinality, ProcessingOrder, ProductRef, QuantityRule, StockOrder,
    TraceabilityAttributes, Transaction, TransformationType,
};
use crate::types::MeasureUnit;
use crate::validation::validate_internal_lot_number;

/// What a transformation produces and where
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransformationDefinition {
    pub transformation_type: TransformationType,
    /// Facility the output lots are placed at
    pub facility_id: Uuid,
    pub output_product: ProductRef,
    #[serde(default)]
    pub measure_unit: MeasureUnit,
}

/// An input lot together with the quantity taken from it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SelectedInput {
    pub lot: StockOrder,
    pub quantity: Decimal,
}

/// An output lot as drafted by the operator
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutputDraft {
    pub quantity: Decimal,
    pub internal_lot_number: Option<String>,
    pub sac_number: Option<u32>,
    #[serde(default)]
    pub traceability: TraceabilityAttributes,
}

impl OutputDraft {
    pub fn new(quantity: Decimal) -> Self {
        Self {
            quantity,
            internal_lot_number: None,
            sac_number: None,
            traceability: TraceabilityAttributes::default(),
        }
    }
}

/// A transformation being edited in one session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransformationDraft {
    pub definition: TransformationDefinition,
    pub processing_date: NaiveDate,
    pub creator_id: Option<Uuid>,
    pub inputs: Vec<SelectedInput>,
    pub outputs: Vec<OutputDraft>,
}

impl TransformationDraft {
    pub fn total_input_quantity(&self) -> Decimal {
        self.inputs.iter().map(|i| i.quantity).sum()
    }

    pub fn total_output_quantity(&self) -> Decimal {
        self.outputs.iter().map(|o| o.quantity).sum()
    }
}

/// Everything a committed transformation produces
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransformationOutcome {
    pub processing_order: ProcessingOrder,
    /// Input lots with their available quantity after consumption
    pub updated_inputs: Vec<StockOrder>,
}

// ============================================================================
// Validation
// ============================================================================

/// Check a draft against the cardinality and quantity rules of its type.
///
/// All violations are collected into a single validation error.
pub fn validate_transformation(draft: &TransformationDraft) -> LedgerResult<()> {
    let transformation_type = draft.definition.transformation_type;
    let mut errors = ValidationErrors::new();

    let min_inputs = transformation_type.min_inputs();
    if draft.inputs.len() < min_inputs {
        errors.push(
            "inputs",
            ValidationRule::MinimumInputs,
            format!("{} requires at least {} input lot(s)", transformation_type, min_inputs),
        );
    }

    let mut seen = HashSet::new();
    for (idx, input) in draft.inputs.iter().enumerate() {
        let field = format!("inputs[{}].quantity", idx);
        if !seen.insert(input.lot.id) {
            errors.push(
                format!("inputs[{}]", idx),
                ValidationRule::DuplicateInput,
                format!("Lot {} is selected more than once", input.lot.id),
            );
        }
        if input.quantity <= Decimal::ZERO {
            errors.push(&field, ValidationRule::NonPositiveQuantity, "Consumed quantity must be positive");
        } else if input.quantity > input.lot.available_quantity {
            errors.push(
                &field,
                ValidationRule::QuantityExceedsAvailable,
                format!(
                    "Consumed quantity {} exceeds available quantity {}",
                    input.quantity, input.lot.available_quantity
                ),
            );
        }
    }

    let cardinality_ok = match transformation_type.output_cardinality() {
        OutputCardinality::ExactlyOne => draft.outputs.len() == 1,
        OutputCardinality::OneOrMore => !draft.outputs.is_empty(),
    };
    if !cardinality_ok {
        let expected = match transformation_type.output_cardinality() {
            OutputCardinality::ExactlyOne => "exactly one output lot",
            OutputCardinality::OneOrMore => "at least one output lot",
        };
        errors.push(
            "outputs",
            ValidationRule::OutputCardinality,
            format!("{} requires {}, got {}", transformation_type, expected, draft.outputs.len()),
        );
    }

    for (idx, output) in draft.outputs.iter().enumerate() {
        if output.quantity <= Decimal::ZERO {
            errors.push(
                format!("outputs[{}].quantity", idx),
                ValidationRule::NonPositiveQuantity,
                "Output quantity must be positive",
            );
        }
        if let Some(number) = &output.internal_lot_number {
            if let Err(msg) = validate_internal_lot_number(number) {
                errors.push(
                    format!("outputs[{}].internal_lot_number", idx),
                    ValidationRule::Format,
                    msg,
                );
            }
        }
    }

    let total_in = draft.total_input_quantity();
    let total_out = draft.total_output_quantity();
    match transformation_type.quantity_rule() {
        QuantityRule::PassThrough => {
            if total_out != total_in {
                errors.push(
                    "outputs",
                    ValidationRule::QuantityEquality,
                    format!(
                        "{} output quantity {} must equal consumed quantity {}",
                        transformation_type, total_out, total_in
                    ),
                );
            }
        }
        QuantityRule::AtMostInput => {
            if total_out > total_in {
                errors.push(
                    "outputs",
                    ValidationRule::QuantityExceedsInput,
                    format!("Output quantity {} exceeds consumed quantity {}", total_out, total_in),
                );
            }
        }
        QuantityRule::FillsTarget => {
            if total_in > total_out {
                errors.push(
                    "inputs",
                    ValidationRule::QuantityExceedsInput,
                    format!("Consumed quantity {} exceeds order quantity {}", total_in, total_out),
                );
            }
        }
    }

    errors.into_result()
}

// ============================================================================
// Commit
// ============================================================================

/// Validate a draft and build the processing order it produces.
///
/// Every transformation except TRANSFER routes all of its input
/// transactions to the first output lot. Further outputs of a multi-output
/// PROCESSING are created without incoming edges, so lineage of those lots
/// goes through the processing order rather than through transactions.
///
/// A transfer pairs each source with its own fragment, and the edge's
/// output quantity is the fragment's share of the drafted output.
pub fn commit_transformation(draft: &TransformationDraft) -> LedgerResult<TransformationOutcome> {
    validate_transformation(draft)?;

    let transformation_type = draft.definition.transformation_type;
    let target_lots = match transformation_type {
        TransformationType::Transfer => transfer_fragments(draft),
        _ => {
            let organic = !draft.inputs.is_empty() && draft.inputs.iter().all(|i| i.lot.organic);
            let currency = draft.inputs.first().and_then(|i| i.lot.currency.clone());
            draft
                .outputs
                .iter()
                .map(|output| build_output_lot(draft, output, organic, currency.clone()))
                .collect::<Vec<_>>()
        }
    };

    let status = transformation_type.initial_transaction_status();
    let input_transactions = draft
        .inputs
        .iter()
        .enumerate()
        .map(|(idx, input)| {
            let (target, output_quantity) = match transformation_type {
                TransformationType::Transfer => {
                    let fragment = &target_lots[idx];
                    (fragment, fragment.fulfilled_quantity)
                }
                _ => (&target_lots[0], input.quantity),
            };
            Transaction {
                id: Uuid::new_v4(),
                source_lot_id: input.lot.id,
                target_lot_id: target.id,
                input_quantity: input.quantity,
                output_quantity,
                measure_unit: input.lot.measure_unit.clone(),
                status,
                is_processing: transformation_type.is_processing(),
            }
        })
        .collect();

    let updated_inputs = draft
        .inputs
        .iter()
        .map(|input| {
            let mut lot = input.lot.clone();
            lot.available_quantity = (lot.available_quantity - input.quantity).max(Decimal::ZERO);
            lot
        })
        .collect();

    Ok(TransformationOutcome {
        processing_order: ProcessingOrder {
            id: Uuid::new_v4(),
            transformation_type,
            processing_date: draft.processing_date,
            input_transactions,
            target_lots,
        },
        updated_inputs,
    })
}

fn new_output_lot(draft: &TransformationDraft, quantity: Decimal) -> StockOrder {
    let definition = &draft.definition;
    StockOrder {
        id: Uuid::new_v4(),
        order_type: definition.transformation_type.output_order_type(),
        facility_id: definition.facility_id,
        product: definition.output_product,
        measure_unit: definition.measure_unit.clone(),
        internal_lot_number: None,
        sac_number: None,
        production_date: draft.processing_date,
        creator_id: draft.creator_id,
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
        currency: None,
        organic: false,
        traceability: TraceabilityAttributes::default(),
        created_at: None,
    }
}

fn build_output_lot(
    draft: &TransformationDraft,
    output: &OutputDraft,
    organic: bool,
    currency: Option<String>,
) -> StockOrder {
    let mut lot = new_output_lot(draft, output.quantity);
    lot.internal_lot_number = output.internal_lot_number.clone();
    lot.sac_number = output.sac_number;
    lot.organic = organic;
    lot.currency = currency;
    lot.traceability = output.traceability.clone();

    if draft.definition.transformation_type == TransformationType::Shipment {
        // only what has been allocated so far is on hand
        let allocated = draft.total_input_quantity().min(output.quantity);
        lot.fulfilled_quantity = allocated;
        lot.available_quantity = allocated;
    }
    lot
}

/// One target fragment per transferred source lot
fn transfer_fragments(draft: &TransformationDraft) -> Vec<StockOrder> {
    let output = draft.outputs.first();
    let parent = output
        .and_then(|o| o.internal_lot_number.clone())
        .or_else(|| draft.inputs.first().and_then(|i| i.lot.internal_lot_number.clone()));
    let split = draft.inputs.len() > 1;
    let quantities = fragment_quantities(draft);

    draft
        .inputs
        .iter()
        .zip(quantities)
        .enumerate()
        .map(|(idx, (input, quantity))| {
            let mut lot = new_output_lot(draft, quantity);
            let index = idx as u32 + 1;
            lot.internal_lot_number = match (&parent, split) {
                (Some(parent), true) => Some(sac_lot_number(parent, index)),
                (Some(parent), false) => Some(parent.clone()),
                (None, _) => None,
            };
            if split {
                lot.sac_number = Some(index);
            }
            lot.organic = input.lot.organic;
            lot.currency = input.lot.currency.clone();
            lot.traceability = input.lot.traceability.clone();
            lot
        })
        .collect()
}

/// Decimal places kept on a proportional fragment share
const FRAGMENT_DP: u32 = 3;

/// Split the drafted transfer output across sources in proportion to what
/// each source gave. The last fragment takes the rounding remainder so the
/// fragments always sum to the drafted output.
fn fragment_quantities(draft: &TransformationDraft) -> Vec<Decimal> {
    let total_in = draft.total_input_quantity();
    let total_out = draft
        .outputs
        .first()
        .map(|o| o.quantity)
        .unwrap_or(total_in);
    let dp = total_out.scale().max(FRAGMENT_DP);

    let mut quantities = Vec::with_capacity(draft.inputs.len());
    let mut assigned = Decimal::ZERO;
    for (idx, input) in draft.inputs.iter().enumerate() {
        let quantity = if idx + 1 == draft.inputs.len() {
            (total_out - assigned).max(Decimal::ZERO)
        } else {
            input
                .quantity
                .checked_div(total_in)
                .map(|share| (share * total_out).round_dp_with_strategy(dp, RoundingStrategy::ToZero))
                .unwrap_or(input.quantity)
        };
        assigned += quantity;
        quantities.push(quantity);
    }
    quantities
}

// ============================================================================
// Repacking
// ============================================================================

/// Split a quantity into sacs of at most `sac_capacity`, numbered `<parent>/<n>`.
///
/// The last sac carries the remainder. Returns nothing for non-positive
/// quantities or capacities.
pub fn repack_into_sacs(parent: &str, total: Decimal, sac_capacity: Decimal) -> Vec<OutputDraft> {
    if total <= Decimal::ZERO || sac_capacity <= Decimal::ZERO {
        return Vec::new();
    }

    let mut sacs = Vec::new();
    let mut remaining = total;
    let mut sac_number = 1u32;
    while remaining > Decimal::ZERO {
        let quantity = remaining.min(sac_capacity);
        sacs.push(OutputDraft {
            quantity,
            internal_lot_number: Some(sac_lot_number(parent, sac_number)),
            sac_number: Some(sac_number),
            traceability: TraceabilityAttributes::default(),
        });
        remaining -= quantity;
        sac_number += 1;
    }
    sacs
}
