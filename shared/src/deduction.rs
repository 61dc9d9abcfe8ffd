//! Deduction and pricing calculator
//!
//! Turns a delivered gross quantity into a payable net weight, and a unit
//! price into a final total. Weight deductions are applied in a fixed order
//! (tare, then damaged weight, then moisture) and are fully resolved before
//! any price-stage computation. Every function here clamps to non-negative
//! results instead of failing, and arithmetic saturates at the `Decimal`
//! bounds rather than overflowing.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Result of the weight-deduction stage
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct NetWeight {
    /// Gross minus tare and damaged weight, never negative
    pub base_weight: Decimal,
    /// Weight removed by the moisture percentage
    pub moisture_deduction: Decimal,
    pub net: Decimal,
}

fn non_negative(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}

/// Compute net weight from gross quantity and optional deductions.
///
/// `moisture_percent` is the share of the base weight that remains payable
/// (90 keeps 90% of the base weight). It is clamped to `0..=100`.
pub fn compute_net_weight(
    gross: Decimal,
    tare: Option<Decimal>,
    damaged_weight: Option<Decimal>,
    moisture_percent: Option<Decimal>,
) -> NetWeight {
    let base_weight = non_negative(
        gross
            .saturating_sub(tare.unwrap_or(Decimal::ZERO))
            .saturating_sub(damaged_weight.unwrap_or(Decimal::ZERO)),
    );

    let (net, moisture_deduction) = match moisture_percent {
        Some(percent) => {
            // factor is at most 1, so the product stays within base_weight
            let factor = percent.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED) / Decimal::ONE_HUNDRED;
            let net = base_weight.saturating_mul(factor).min(base_weight);
            (net, base_weight - net)
        }
        None => (base_weight, Decimal::ZERO),
    };

    NetWeight {
        base_weight,
        moisture_deduction,
        net: non_negative(net),
    }
}

/// Compute the final total price for a net weight.
///
/// Rounded to 2 decimal places for currency display.
pub fn compute_final_price(
    price_per_unit: Decimal,
    damaged_price_deduction: Option<Decimal>,
    net_weight: Decimal,
    final_price_discount: Option<Decimal>,
) -> Decimal {
    let effective_price = non_negative(
        price_per_unit.saturating_sub(damaged_price_deduction.unwrap_or(Decimal::ZERO)),
    );
    let total = effective_price
        .saturating_mul(non_negative(net_weight))
        .saturating_sub(final_price_discount.unwrap_or(Decimal::ZERO));

    round_currency(non_negative(total))
}

/// Round an amount to 2 decimal places, midpoint away from zero
pub fn round_currency(amount: Decimal) -> Decimal {
    amount
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .normalize()
}

/// Parse a form value as a quantity; empty or non-numeric text counts as 0
pub fn parse_quantity(raw: &str) -> Decimal {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Decimal::ZERO;
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .unwrap_or(Decimal::ZERO)
}

/// Parse an optional deduction field; blank means the deduction is absent
pub fn parse_optional_quantity(raw: &str) -> Option<Decimal> {
    if raw.trim().is_empty() {
        None
    } else {
        Some(parse_quantity(raw))
    }
}
