//! Native-side error types for off-circuit bookkeeping helpers.
//!
//! Constraint generation itself reports failures through `SynthesisError`;
//! this type covers the plain-Rust helpers (`InventoryState` and friends)
//! that run before a circuit is ever built.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CircuitError {
    #[error("volume underflow: current {current} < delta {delta}")]
    VolumeUnderflow { current: u64, delta: u64 },

    #[error("volume overflow: {current} + {delta} exceeds u64 range")]
    VolumeOverflow { current: u64, delta: u64 },

    #[error("item_id {item_id} exceeds tree capacity of depth {depth}")]
    ItemIdOutOfRange { item_id: u64, depth: usize },
}
