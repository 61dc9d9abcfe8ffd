//! Domain models for the stock-order ledger

mod commodity;
mod lot;
mod processing;
mod timeline;
mod transaction;

pub use commodity::*;
pub use lot::*;
pub use processing::*;
pub use timeline::*;
pub use transaction::*;

#[cfg(test)]
pub(crate) use lot::fixtures;
