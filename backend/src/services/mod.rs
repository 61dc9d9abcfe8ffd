//! Business logic services for the stock-order ledger

pub mod lot;
pub mod traceability;
pub mod transformation;

pub use lot::LotService;
pub use traceability::TraceabilityService;
pub use transformation::TransformationService;
