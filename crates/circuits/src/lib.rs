//! ZK circuits for private inventory operations using Sparse Merkle Trees.
//!
//! This crate provides SMT-based circuits for:
//! - `StateTransitionCircuit`: Prove valid deposit/withdraw with capacity checking
//! - `ItemExistsSMTCircuit`: Prove inventory contains >= N of item X
//! - `CapacitySMTCircuit`: Prove inventory volume is within capacity

// Core modules
pub mod error;
pub mod poseidon;
pub mod range_check;
pub mod signal;
pub mod smt;
pub mod smt_commitment;

// Circuit modules
pub mod capacity_smt;
pub mod item_exists_smt;
pub mod state_transition;


// Poseidon configuration and hashing (shared utility)
pub use poseidon::{
    poseidon_config, poseidon_hash, poseidon_hash_many, poseidon_hash_two, poseidon_hash_many_var,
    poseidon_hash_two_var, poseidon_hash_var,
};

// Range checks
pub use range_check::{enforce_geq, enforce_in_range, enforce_u32};

// Error types
pub use error::CircuitError;

// SMT infrastructure
pub use smt::{
    compute_root_from_path, verify_and_update, verify_membership, MerkleProof, MerkleProofVar,
    SparseMerkleTree, DEFAULT_DEPTH,
};

// Signal hash (public input compression)
pub use signal::{
    compute_signal_hash, compute_signal_hash_var, OpType, SignalInputs, SignalInputsVar,
};

// SMT commitment
pub use smt_commitment::{
    create_smt_commitment, create_smt_commitment_var, InventoryState, InventoryStateVar,
};

// Circuit exports
pub use state_transition::StateTransitionCircuit;
pub use item_exists_smt::{compute_item_exists_hash, ItemExistsSMTCircuit};
pub use capacity_smt::{compute_capacity_hash, CapacitySMTCircuit};

use ark_bn254::Fr;

/// Common type aliases
pub type ConstraintF = Fr;
