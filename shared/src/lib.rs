//! Stock-order transformation ledger core
//!
//! Pure, synchronous logic shared by the backend service and the WASM
//! module: deduction and pricing, input clipping, transformation rules,
//! batch history grouping and field requirement strategies. Nothing in
//! this crate performs I/O.

pub mod clipping;
pub mod deduction;
pub mod delivery;
pub mod error;
pub mod field_requirements;
pub mod history;
pub mod models;
pub mod transformation;
pub mod types;
pub mod validation;

pub use clipping::*;
pub use deduction::*;
pub use delivery::*;
pub use error::*;
pub use field_requirements::*;
pub use history::*;
pub use models::*;
pub use transformation::*;
pub use types::*;
pub use validation::*;
