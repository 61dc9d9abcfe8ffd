//! HTTP handlers for the stock-order ledger API

pub mod deduction;
pub mod field_requirements;
pub mod health;
pub mod lot;
pub mod traceability;
pub mod transformation;

pub use deduction::*;
pub use field_requirements::*;
pub use health::*;
pub use lot::*;
pub use traceability::*;
pub use transformation::*;
