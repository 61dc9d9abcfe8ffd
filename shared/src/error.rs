//! Error taxonomy for the ledger core
//!
//! The pure core only ever produces two kinds of failure: a validation
//! failure listing every violated rule, or an unsupported operation.
//! Remote failures belong to the service boundary.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by the ledger core
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),
}

/// Which rule a validation issue violated
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationRule {
    MinimumInputs,
    OutputCardinality,
    QuantityEquality,
    QuantityExceedsInput,
    QuantityExceedsAvailable,
    NonPositiveQuantity,
    DuplicateInput,
    DeductionExceedsBase,
    NegativeValue,
    OutOfRange,
    Format,
}

/// A single violated rule, tied to the field it concerns
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidationIssue {
    pub field: String,
    pub rule: ValidationRule,
    pub message: String,
}

/// All violations found in one validation pass
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ValidationErrors {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, rule: ValidationRule, message: impl Into<String>) {
        self.issues.push(ValidationIssue {
            field: field.into(),
            rule,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    /// True if any issue violates `rule`
    pub fn has_rule(&self, rule: ValidationRule) -> bool {
        self.issues.iter().any(|i| i.rule == rule)
    }

    /// Fields flagged by at least one issue, in first-seen order
    pub fn fields(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = Vec::new();
        for issue in &self.issues {
            if !fields.contains(&issue.field.as_str()) {
                fields.push(issue.field.as_str());
            }
        }
        fields
    }

    /// `Ok(())` when nothing was flagged, otherwise a validation error
    pub fn into_result(self) -> LedgerResult<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(LedgerError::Validation(self))
        }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let messages: Vec<String> = self
            .issues
            .iter()
            .map(|i| format!("{}: {}", i.field, i.message))
            .collect();
        write!(f, "{}", messages.join("; "))
    }
}

/// Result type alias for core operations
pub type LedgerResult<T> = Result<T, LedgerError>;
