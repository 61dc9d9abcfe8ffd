//! Transformation service
//!
//! Resolves a transformation request against the ledger (input lots are
//! always re-fetched so availability is current), validates it locally and
//! only then hands it to the remote persistence service.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::{
    clip_inputs, commit_transformation, validate_lot_quantities, CandidateLot, ClippingResult,
    MeasureUnit, OutputDraft, ProductRef, SelectedInput, TransformationDefinition,
    TransformationDraft, TransformationOutcome, TransformationType,
};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::external::{LedgerStore, SubmissionReceipt};

/// Transformation service
#[derive(Clone)]
pub struct TransformationService {
    ledger: Arc<dyn LedgerStore>,
    default_currency: String,
}

/// Input lot reference with the quantity to consume
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputSelection {
    pub lot_id: Uuid,
    pub quantity: Decimal,
}

/// Transformation as submitted by a client
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TransformationRequest {
    /// Type name, e.g. `PROCESSING`; unknown names are rejected
    #[validate(length(min = 1, max = 32, message = "Transformation type is required"))]
    pub transformation_type: String,
    pub facility_id: Uuid,
    pub output_product: ProductRef,
    pub measure_unit: Option<MeasureUnit>,
    pub processing_date: NaiveDate,
    pub creator_id: Option<Uuid>,
    #[serde(default)]
    #[validate(length(max = 500, message = "Too many input lots"))]
    pub inputs: Vec<InputSelection>,
    #[validate(length(max = 500, message = "Too many output lots"))]
    pub outputs: Vec<OutputDraft>,
}

/// Clipping request: candidates in display order and the quantity to fill
#[derive(Debug, Clone, Deserialize)]
pub struct ClipRequest {
    pub target_quantity: Decimal,
    #[serde(default)]
    pub already_committed: Decimal,
    pub candidates: Vec<CandidateLot>,
}

/// Result of a submitted transformation
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionResponse {
    pub receipt: SubmissionReceipt,
    pub preview: TransformationOutcome,
}

impl TransformationService {
    pub fn new(ledger: Arc<dyn LedgerStore>, default_currency: String) -> Self {
        Self {
            ledger,
            default_currency,
        }
    }

    /// Pick quantities from the candidates to fill the target
    pub fn clip(&self, request: &ClipRequest) -> ClippingResult {
        clip_inputs(
            &request.candidates,
            request.target_quantity,
            request.already_committed,
        )
    }

    /// Turn a request into a draft, fetching every input lot
    pub async fn build_draft(&self, request: TransformationRequest) -> AppResult<TransformationDraft> {
        request.validate()?;
        let transformation_type: TransformationType = request.transformation_type.parse()?;

        let mut inputs = Vec::with_capacity(request.inputs.len());
        for selection in &request.inputs {
            let lot = self.ledger.fetch_lot(selection.lot_id).await?;
            validate_lot_quantities(&lot).map_err(|e| {
                tracing::warn!("Lot {} returned with inconsistent quantities: {}", lot.id, e);
                AppError::RemoteFailure(format!("Lot {} has inconsistent quantities: {}", lot.id, e))
            })?;
            inputs.push(SelectedInput {
                lot,
                quantity: selection.quantity,
            });
        }

        Ok(TransformationDraft {
            definition: TransformationDefinition {
                transformation_type,
                facility_id: request.facility_id,
                output_product: request.output_product,
                measure_unit: request.measure_unit.unwrap_or_default(),
            },
            processing_date: request.processing_date,
            creator_id: request.creator_id,
            inputs,
            outputs: request.outputs,
        })
    }

    /// Validate and show what committing would produce, without submitting
    pub async fn preview(&self, request: TransformationRequest) -> AppResult<TransformationOutcome> {
        let draft = self.build_draft(request).await?;
        self.preview_draft(&draft)
    }

    fn preview_draft(&self, draft: &TransformationDraft) -> AppResult<TransformationOutcome> {
        let mut outcome = commit_transformation(draft)?;
        for lot in outcome.processing_order.target_lots.iter_mut() {
            if lot.currency.is_none() {
                lot.currency = Some(self.default_currency.clone());
            }
        }
        Ok(outcome)
    }

    /// Validate locally, then submit to the ledger
    pub async fn submit(&self, request: TransformationRequest) -> AppResult<SubmissionResponse> {
        let draft = self.build_draft(request).await?;
        let preview = self.preview_draft(&draft)?;

        let receipt = self.ledger.submit_transformation(&draft).await?;
        tracing::info!(
            "Submitted {} transformation {}: {} input(s), {} output lot(s)",
            draft.definition.transformation_type,
            receipt.processing_order_id,
            draft.inputs.len(),
            receipt.created_lot_ids.len()
        );

        Ok(SubmissionResponse { receipt, preview })
    }

    /// Delete a transformation and the lots it created
    pub async fn delete(&self, processing_order_id: Uuid) -> AppResult<()> {
        self.ledger.delete_transformation(processing_order_id).await?;
        tracing::info!("Deleted transformation {}", processing_order_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::memory::InMemoryLedger;
    use shared::{OrderType, StockOrder, TraceabilityAttributes, TransactionStatus};

    fn lot(quantity: i64, number: &str) -> StockOrder {
        StockOrder {
            id: Uuid::new_v4(),
            order_type: OrderType::Purchase,
            facility_id: Uuid::nil(),
            product: ProductRef::SemiProduct(Uuid::nil()),
            measure_unit: MeasureUnit::kilograms(),
            internal_lot_number: Some(number.to_string()),
            sac_number: None,
            production_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            creator_id: None,
            gross_quantity: Decimal::from(quantity),
            tare: None,
            damaged_weight_deduction: None,
            moisture_percentage: None,
            fulfilled_quantity: Decimal::from(quantity),
            available_quantity: Decimal::from(quantity),
            price_per_unit: None,
            damaged_price_deduction: None,
            final_price_discount: None,
            paid: None,
            currency: None,
            organic: true,
            traceability: TraceabilityAttributes::default(),
            created_at: None,
        }
    }

    fn request(transformation_type: &str, inputs: &[(Uuid, i64)], outputs: &[i64]) -> TransformationRequest {
        TransformationRequest {
            transformation_type: transformation_type.to_string(),
            facility_id: Uuid::new_v4(),
            output_product: ProductRef::FinalProduct(Uuid::new_v4()),
            measure_unit: None,
            processing_date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            creator_id: None,
            inputs: inputs
                .iter()
                .map(|(lot_id, q)| InputSelection {
                    lot_id: *lot_id,
                    quantity: Decimal::from(*q),
                })
                .collect(),
            outputs: outputs.iter().map(|q| OutputDraft::new(Decimal::from(*q))).collect(),
        }
    }

    #[tokio::test]
    async fn test_inconsistent_input_lot_is_refused() {
        let mut broken = lot(10, "BROKEN");
        broken.available_quantity = Decimal::from(25);
        let broken_id = broken.id;
        let ledger = Arc::new(InMemoryLedger::with_lots(vec![broken]));
        let service = TransformationService::new(ledger.clone(), "EUR".to_string());

        let result = service
            .submit(request("PROCESSING", &[(broken_id, 20)], &[20]))
            .await;
        assert!(matches!(result, Err(AppError::RemoteFailure(_))));
        assert_eq!(
            ledger.lot(broken_id).map(|l| l.available_quantity),
            Some(Decimal::from(25))
        );
    }

    #[tokio::test]
    async fn test_qr_code_preview_passes_quantity_through() {
        let a = lot(40, "A");
        let b = lot(60, "B");
        let ledger = Arc::new(InMemoryLedger::with_lots(vec![a.clone(), b.clone()]));
        let service = TransformationService::new(ledger, "EUR".to_string());

        let outcome = service
            .preview(request("GENERATE_QR_CODE", &[(a.id, 40), (b.id, 60)], &[100]))
            .await
            .unwrap();

        let order = outcome.processing_order;
        assert_eq!(order.target_lots.len(), 1);
        assert_eq!(order.target_lots[0].available_quantity, Decimal::from(100));
        assert_eq!(order.target_lots[0].currency.as_deref(), Some("EUR"));
        assert!(order
            .input_transactions
            .iter()
            .all(|t| t.status == TransactionStatus::Executed));
    }

    #[tokio::test]
    async fn test_unknown_type_is_unsupported() {
        let service = TransformationService::new(Arc::new(InMemoryLedger::default()), "EUR".into());
        let result = service.preview(request("BLEND", &[], &[10])).await;
        assert!(matches!(result, Err(AppError::UnsupportedOperation(_))));
    }

    #[tokio::test]
    async fn test_submit_consumes_inputs_in_ledger() {
        let a = lot(80, "A");
        let ledger = Arc::new(InMemoryLedger::with_lots(vec![a.clone()]));
        let service = TransformationService::new(ledger.clone(), "EUR".into());

        let response = service
            .submit(request("PROCESSING", &[(a.id, 50)], &[45]))
            .await
            .unwrap();

        assert_eq!(response.receipt.created_lot_ids.len(), 1);
        assert_eq!(response.receipt.transaction_ids.len(), 1);
        assert_eq!(ledger.lot(a.id).unwrap().available_quantity, Decimal::from(30));
    }

    #[tokio::test]
    async fn test_invalid_draft_never_reaches_ledger() {
        let a = lot(10, "A");
        let ledger = Arc::new(InMemoryLedger::with_lots(vec![a.clone()]));
        let service = TransformationService::new(ledger.clone(), "EUR".into());

        let result = service.submit(request("PROCESSING", &[(a.id, 20)], &[5])).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(ledger.lot(a.id).unwrap().available_quantity, Decimal::from(10));
    }

    #[tokio::test]
    async fn test_remote_failure_surfaces() {
        let service = TransformationService::new(Arc::new(InMemoryLedger::offline()), "EUR".into());
        let result = service.delete(Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::RemoteFailure(_))));
    }

    #[test]
    fn test_clip_shipment_scenario() {
        let service = TransformationService::new(Arc::new(InMemoryLedger::default()), "EUR".into());
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        let result = service.clip(&ClipRequest {
            target_quantity: Decimal::from(100),
            already_committed: Decimal::ZERO,
            candidates: vec![
                CandidateLot {
                    lot_id: first,
                    available_quantity: Decimal::from(50),
                    selected: true,
                },
                CandidateLot {
                    lot_id: second,
                    available_quantity: Decimal::from(80),
                    selected: true,
                },
            ],
        });
        assert_eq!(result.inputs[0].selected_quantity, Decimal::from(50));
        assert_eq!(result.inputs[1].selected_quantity, Decimal::from(50));
        assert_eq!(result.remaining, Decimal::ZERO);
    }
}
