//! Transformation orchestrator tests for the Stock-Order Ledger
//!
//! Cardinality and quantity rules per transformation type, transaction
//! edges produced on commit, and transfer fragment numbering.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::{
    commit_transformation, repack_into_sacs, validate_transformation, LedgerError, MeasureUnit,
    OrderType, OutputDraft, ProductRef, SelectedInput, StockOrder, TraceabilityAttributes,
    TransactionStatus, TransformationDefinition, TransformationDraft, TransformationType,
    ValidationRule,
};
use std::str::FromStr;
use uuid::Uuid;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn lot(number: &str, available: Decimal) -> StockOrder {
    StockOrder {
        id: Uuid::new_v4(),
        order_type: OrderType::Purchase,
        facility_id: Uuid::new_v4(),
        product: ProductRef::SemiProduct(Uuid::nil()),
        measure_unit: MeasureUnit::kilograms(),
        internal_lot_number: Some(number.to_string()),
        sac_number: None,
        production_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        creator_id: None,
        gross_quantity: available,
        tare: None,
        damaged_weight_deduction: None,
        moisture_percentage: None,
        fulfilled_quantity: available,
        available_quantity: available,
        price_per_unit: None,
        damaged_price_deduction: None,
        final_price_discount: None,
        paid: None,
        currency: Some("USD".to_string()),
        organic: true,
        traceability: TraceabilityAttributes::default(),
        created_at: None,
    }
}

fn draft(
    transformation_type: TransformationType,
    inputs: Vec<(StockOrder, Decimal)>,
    outputs: Vec<Decimal>,
) -> TransformationDraft {
    TransformationDraft {
        definition: TransformationDefinition {
            transformation_type,
            facility_id: Uuid::new_v4(),
            output_product: ProductRef::FinalProduct(Uuid::nil()),
            measure_unit: MeasureUnit::kilograms(),
        },
        processing_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        creator_id: None,
        inputs: inputs
            .into_iter()
            .map(|(lot, quantity)| SelectedInput { lot, quantity })
            .collect(),
        outputs: outputs.into_iter().map(OutputDraft::new).collect(),
    }
}

fn rules(err: LedgerError) -> Vec<ValidationRule> {
    match err {
        LedgerError::Validation(errors) => errors.issues.iter().map(|i| i.rule).collect(),
        other => panic!("expected validation error, got {:?}", other),
    }
}

// ============================================================================
// Quantity rules
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// QR code generation passes the consumed quantity through unchanged
    #[test]
    fn qr_code_output_equals_input(
        quantities in prop::collection::vec(1i64..1000, 1..6),
        delta in -50i64..50,
    ) {
        let inputs: Vec<(StockOrder, Decimal)> = quantities
            .iter()
            .enumerate()
            .map(|(i, q)| (lot(&format!("L{}", i), Decimal::from(*q)), Decimal::from(*q)))
            .collect();
        let total: i64 = quantities.iter().sum();
        let output = Decimal::from((total + delta).max(1));

        let result = validate_transformation(&draft(TransformationType::GenerateQrCode, inputs, vec![output]));
        prop_assert_eq!(result.is_ok(), output == Decimal::from(total));
    }

    /// Processing may lose weight but never gain it
    #[test]
    fn processing_output_bounded_by_input(
        consumed in 1i64..1000,
        outputs in prop::collection::vec(1i64..400, 1..5),
    ) {
        let source = lot("P", Decimal::from(consumed));
        let total_out: i64 = outputs.iter().sum();
        let result = validate_transformation(&draft(
            TransformationType::Processing,
            vec![(source, Decimal::from(consumed))],
            outputs.into_iter().map(Decimal::from).collect(),
        ));
        prop_assert_eq!(result.is_ok(), total_out <= consumed);
    }

    /// Committed inputs lose exactly what they gave
    #[test]
    fn commit_reduces_availability(
        available in 10i64..1000,
        taken_percent in 1i64..=100,
    ) {
        let available = Decimal::from(available);
        let taken = (available * Decimal::from(taken_percent) / Decimal::from(100)).max(Decimal::ONE);
        let source = lot("S", available);
        let outcome = commit_transformation(&draft(
            TransformationType::FinalProcessing,
            vec![(source.clone(), taken)],
            vec![taken],
        ))
        .unwrap();

        prop_assert_eq!(outcome.updated_inputs[0].available_quantity, available - taken);
        prop_assert_eq!(outcome.processing_order.total_input_quantity(), taken);
    }

    /// A shipment never consumes more than the order quantity
    #[test]
    fn shipment_consumption_within_order(
        order in 1i64..1000,
        consumed in 1i64..1000,
    ) {
        let source = lot("S", Decimal::from(consumed));
        let result = validate_transformation(&draft(
            TransformationType::Shipment,
            vec![(source, Decimal::from(consumed))],
            vec![Decimal::from(order)],
        ));
        prop_assert_eq!(result.is_ok(), consumed <= order);
    }

    /// Transfer fragments add up to the drafted output and follow each source's share
    #[test]
    fn transfer_fragments_sum_to_output(
        quantities in prop::collection::vec(1i64..1000, 1..6),
        kept_percent in 1i64..=100,
    ) {
        let inputs: Vec<(StockOrder, Decimal)> = quantities
            .iter()
            .enumerate()
            .map(|(i, q)| (lot(&format!("T{}", i), Decimal::from(*q)), Decimal::from(*q)))
            .collect();
        let total_in = Decimal::from(quantities.iter().sum::<i64>());
        let output = (total_in * Decimal::from(kept_percent) / Decimal::from(100)).round_dp(2);

        let order = commit_transformation(&draft(TransformationType::Transfer, inputs, vec![output]))
            .unwrap()
            .processing_order;
        prop_assert_eq!(order.target_lots.len(), quantities.len());
        prop_assert_eq!(order.total_output_quantity(), output);
        prop_assert!(order
            .input_transactions
            .iter()
            .zip(&order.target_lots)
            .all(|(t, l)| t.target_lot_id == l.id && t.output_quantity == l.available_quantity));
    }

    /// Repacking covers the total in sacs no larger than the capacity
    #[test]
    fn repacked_sacs_cover_total(total in 1i64..5000, capacity in 1i64..200) {
        let sacs = repack_into_sacs("R", Decimal::from(total), Decimal::from(capacity));
        let sum: Decimal = sacs.iter().map(|s| s.quantity).sum();
        prop_assert_eq!(sum, Decimal::from(total));
        prop_assert!(sacs.iter().all(|s| s.quantity <= Decimal::from(capacity)));
        prop_assert_eq!(sacs.last().and_then(|s| s.sac_number), Some(sacs.len() as u32));
    }
}

mod unit_tests {
    use super::*;

    #[test]
    fn test_qr_code_scenario() {
        let a = lot("A", dec("40"));
        let b = lot("B", dec("60"));
        let outcome = commit_transformation(&draft(
            TransformationType::GenerateQrCode,
            vec![(a, dec("40")), (b, dec("60"))],
            vec![dec("100")],
        ))
        .unwrap();

        let order = outcome.processing_order;
        assert_eq!(order.target_lots.len(), 1);
        assert_eq!(order.target_lots[0].available_quantity, dec("100"));
        assert_eq!(order.input_transactions.len(), 2);
        assert!(order
            .input_transactions
            .iter()
            .all(|t| t.target_lot_id == order.target_lots[0].id && t.input_quantity == t.output_quantity));
    }

    #[test]
    fn test_qr_code_mismatch_rejected() {
        let err = validate_transformation(&draft(
            TransformationType::GenerateQrCode,
            vec![(lot("A", dec("40")), dec("40")), (lot("B", dec("60")), dec("60"))],
            vec![dec("90")],
        ))
        .unwrap_err();
        assert_eq!(rules(err), vec![ValidationRule::QuantityEquality]);
    }

    #[test]
    fn test_every_violation_reported() {
        let source = lot("A", dec("10"));
        let err = validate_transformation(&draft(
            TransformationType::FinalProcessing,
            vec![(source.clone(), dec("20")), (source, dec("5"))],
            vec![dec("1"), dec("1")],
        ))
        .unwrap_err();
        let rules = rules(err);
        assert!(rules.contains(&ValidationRule::QuantityExceedsAvailable));
        assert!(rules.contains(&ValidationRule::DuplicateInput));
        assert!(rules.contains(&ValidationRule::OutputCardinality));
    }

    #[test]
    fn test_minimum_inputs() {
        let err = validate_transformation(&draft(TransformationType::Processing, vec![], vec![dec("1")]))
            .unwrap_err();
        assert!(rules(err).contains(&ValidationRule::MinimumInputs));

        // a shipment order may be opened before any stock is allocated
        assert!(validate_transformation(&draft(TransformationType::Shipment, vec![], vec![dec("100")])).is_ok());
    }

    #[test]
    fn test_shipment_transactions_pending() {
        let outcome = commit_transformation(&draft(
            TransformationType::Shipment,
            vec![(lot("A", dec("50")), dec("50")), (lot("B", dec("80")), dec("50"))],
            vec![dec("100")],
        ))
        .unwrap();
        let order = outcome.processing_order;
        assert!(order
            .input_transactions
            .iter()
            .all(|t| t.status == TransactionStatus::Pending));
        assert!(order.is_editable());
        assert_eq!(order.target_lots[0].available_quantity, dec("100"));
    }

    #[test]
    fn test_transfer_fragments_numbered_under_parent() {
        let a = lot("BATCH-A", dec("30"));
        let b = lot("BATCH-B", dec("20"));
        let mut transfer = draft(
            TransformationType::Transfer,
            vec![(a.clone(), dec("30")), (b.clone(), dec("20"))],
            vec![dec("50")],
        );
        transfer.outputs[0].internal_lot_number = Some("SHIP-9".to_string());

        let order = commit_transformation(&transfer).unwrap().processing_order;
        let numbers: Vec<_> = order
            .target_lots
            .iter()
            .map(|l| l.internal_lot_number.clone().unwrap())
            .collect();
        assert_eq!(numbers, vec!["SHIP-9/1", "SHIP-9/2"]);
        assert_eq!(order.target_lots[0].available_quantity, dec("30"));
        assert_eq!(order.input_transactions[1].target_lot_id, order.target_lots[1].id);
        assert!(order.input_transactions.iter().all(|t| !t.is_processing));
        assert!(order.target_lots.iter().all(|l| l.order_type == OrderType::Transfer));
    }

    #[test]
    fn test_transfer_may_lose_quantity() {
        let outcome = commit_transformation(&draft(
            TransformationType::Transfer,
            vec![(lot("A", dec("25")), dec("25"))],
            vec![dec("20")],
        ))
        .unwrap();
        let order = outcome.processing_order;
        assert_eq!(order.target_lots[0].available_quantity, dec("20"));
        assert_eq!(order.input_transactions[0].input_quantity, dec("25"));
        assert_eq!(order.input_transactions[0].output_quantity, dec("20"));
    }

    #[test]
    fn test_transfer_cannot_gain_quantity() {
        let err = validate_transformation(&draft(
            TransformationType::Transfer,
            vec![(lot("A", dec("30")), dec("30"))],
            vec![dec("35")],
        ))
        .unwrap_err();
        assert_eq!(rules(err), vec![ValidationRule::QuantityExceedsInput]);
    }

    #[test]
    fn test_organic_and_currency_inherited() {
        let mut conventional = lot("C", dec("10"));
        conventional.organic = false;
        let outcome = commit_transformation(&draft(
            TransformationType::Processing,
            vec![(lot("O", dec("10")), dec("10")), (conventional, dec("10"))],
            vec![dec("15")],
        ))
        .unwrap();
        let output = &outcome.processing_order.target_lots[0];
        assert!(!output.organic);
        assert_eq!(output.currency.as_deref(), Some("USD"));
        assert_eq!(output.production_date, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
    }

    #[test]
    fn test_unknown_type_unsupported() {
        assert!(matches!(
            TransformationType::from_str("ROASTING"),
            Err(LedgerError::UnsupportedOperation(_))
        ));
        for t in TransformationType::ALL {
            assert_eq!(TransformationType::from_str(t.as_str()), Ok(t));
        }
    }

    #[test]
    fn test_cancel_returns_quantities() {
        let source = lot("A", dec("50"));
        let source_id = source.id;
        let mut order = commit_transformation(&draft(
            TransformationType::Shipment,
            vec![(source, dec("30"))],
            vec![dec("40")],
        ))
        .unwrap()
        .processing_order;

        let returned = order.cancel();
        assert_eq!(returned.get(&source_id), Some(&dec("30")));
        assert_eq!(order.total_input_quantity(), Decimal::ZERO);
    }
}
