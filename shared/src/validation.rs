//! Validation rules for lots and deliveries
//!
//! Every check collects all violations so the caller can flag every
//! offending field at once.

use rust_decimal::Decimal;

use crate::delivery::DeliveryDraft;
use crate::error::{LedgerResult, ValidationErrors, ValidationRule};
use crate::models::StockOrder;

// ============================================================================
// Quantity Checks
// ============================================================================

fn check_non_negative(errors: &mut ValidationErrors, field: &str, value: Option<Decimal>) {
    if let Some(v) = value {
        if v < Decimal::ZERO {
            errors.push(field, ValidationRule::NegativeValue, format!("{} cannot be negative", field));
        }
    }
}

/// Validate a moisture percentage is within 0-100
pub fn validate_moisture_percentage(moisture: Decimal) -> Result<(), &'static str> {
    if moisture < Decimal::ZERO || moisture > Decimal::ONE_HUNDRED {
        return Err("Moisture percentage must be between 0 and 100");
    }
    Ok(())
}

/// Validate a lot's available quantity against its net quantity
pub fn validate_lot_quantities(lot: &StockOrder) -> LedgerResult<()> {
    let mut errors = ValidationErrors::new();
    let net = lot.net_quantity();

    if lot.available_quantity < Decimal::ZERO {
        errors.push(
            "available_quantity",
            ValidationRule::NegativeValue,
            "Available quantity cannot be negative",
        );
    }
    if lot.available_quantity > net {
        errors.push(
            "available_quantity",
            ValidationRule::QuantityExceedsAvailable,
            format!(
                "Available quantity {} exceeds net quantity {}",
                lot.available_quantity, net
            ),
        );
    }

    errors.into_result()
}

// ============================================================================
// Delivery Checks
// ============================================================================

/// Validate the deduction fields of a delivery before it is recorded
pub fn validate_delivery(draft: &DeliveryDraft) -> LedgerResult<()> {
    let mut errors = ValidationErrors::new();

    check_non_negative(&mut errors, "gross_quantity", Some(draft.gross_quantity));
    check_non_negative(&mut errors, "tare", draft.tare);
    check_non_negative(&mut errors, "damaged_weight_deduction", draft.damaged_weight_deduction);
    check_non_negative(&mut errors, "price_per_unit", draft.price_per_unit);
    check_non_negative(&mut errors, "damaged_price_deduction", draft.damaged_price_deduction);
    check_non_negative(&mut errors, "final_price_discount", draft.final_price_discount);

    let tare = draft.tare.unwrap_or(Decimal::ZERO);
    if tare > draft.gross_quantity {
        errors.push(
            "tare",
            ValidationRule::DeductionExceedsBase,
            "Tare cannot exceed gross quantity",
        );
    }

    let after_tare = (draft.gross_quantity - tare).max(Decimal::ZERO);
    if draft.damaged_weight_deduction.unwrap_or(Decimal::ZERO) > after_tare {
        errors.push(
            "damaged_weight_deduction",
            ValidationRule::DeductionExceedsBase,
            "Damaged weight cannot exceed gross quantity minus tare",
        );
    }

    if let Some(moisture) = draft.moisture_percentage {
        if let Err(msg) = validate_moisture_percentage(moisture) {
            errors.push("moisture_percentage", ValidationRule::OutOfRange, msg);
        }
    }

    if let (Some(price), Some(deduction)) = (draft.price_per_unit, draft.damaged_price_deduction) {
        if deduction > price {
            errors.push(
                "damaged_price_deduction",
                ValidationRule::DeductionExceedsBase,
                "Damaged price deduction cannot exceed price per unit",
            );
        }
    }

    if let Some(number) = &draft.internal_lot_number {
        if let Err(msg) = validate_internal_lot_number(number) {
            errors.push("internal_lot_number", ValidationRule::Format, msg);
        }
    }

    errors.into_result()
}

// ============================================================================
// Identifier Checks
// ============================================================================

/// Validate an internal lot number: non-blank, no empty `/` segments
pub fn validate_internal_lot_number(number: &str) -> Result<(), &'static str> {
    if number.trim().is_empty() {
        return Err("Internal lot number cannot be empty");
    }
    if number.len() > 64 {
        return Err("Internal lot number must be at most 64 characters");
    }
    if number.split('/').any(|segment| segment.trim().is_empty()) {
        return Err("Internal lot number cannot contain empty segments");
    }
    Ok(())
}
