//! Explicit, injectable proving context (Design Notes, §9: "no process-wide
//! mutable state").
//!
//! The teacher crate's [`crate::setup::CircuitKeys`] already bundles the
//! three circuits' key pairs; `ProvingContext` wraps it in an `Arc` so the
//! same read-only keys can be shared across a `rayon` worker pool without
//! cloning the (large) proving keys per task, and offers one call per
//! circuit so callers don't have to reach into `.state_transition.proving_key`
//! at every call site.

use std::path::Path;
use std::sync::Arc;

use ark_bn254::Fr;

use inventory_circuits::signal::OpType;

use crate::batch::{
    prove_independent_batch, prove_sequential_batch, IndependentJob, SequentialStep,
};
use crate::prove::{
    prove_capacity, prove_item_exists, prove_state_transition, InventoryState, ProofWithInputs,
    ProveError, StateTransitionResult,
};
use crate::setup::{setup_all_circuits, CircuitKeys, SetupError};

/// Owns all three circuits' proving and verifying keys. Read-only after
/// construction; cheap to clone (an `Arc` bump) and safe to share across
/// threads.
#[derive(Clone)]
pub struct ProvingContext {
    keys: Arc<CircuitKeys>,
}

impl ProvingContext {
    /// Run trusted setup for all three circuits and wrap the resulting keys.
    pub fn setup() -> Result<Self, SetupError> {
        Ok(Self {
            keys: Arc::new(setup_all_circuits()?),
        })
    }

    /// Load previously generated keys from a directory (as written by
    /// [`CircuitKeys::save_to_directory`]).
    pub fn load_from_directory(dir: &Path) -> Result<Self, SetupError> {
        Ok(Self {
            keys: Arc::new(CircuitKeys::load_from_directory(dir)?),
        })
    }

    /// Wrap an already-constructed set of keys (e.g. from a key ceremony
    /// output outside this crate).
    pub fn from_keys(keys: CircuitKeys) -> Self {
        Self { keys: Arc::new(keys) }
    }

    pub fn keys(&self) -> &CircuitKeys {
        &self.keys
    }

    #[allow(clippy::too_many_arguments)]
    pub fn prove_state_transition(
        &self,
        old_state: &InventoryState,
        new_blinding: Fr,
        item_id: u64,
        amount: u64,
        item_volume: u64,
        registry_root: Fr,
        max_capacity: u64,
        nonce: u64,
        instance_id: Fr,
        op_type: OpType,
    ) -> Result<StateTransitionResult, ProveError> {
        prove_state_transition(
            &self.keys.state_transition.proving_key,
            old_state,
            new_blinding,
            item_id,
            amount,
            item_volume,
            registry_root,
            max_capacity,
            nonce,
            instance_id,
            op_type,
        )
    }

    pub fn prove_item_exists(
        &self,
        state: &InventoryState,
        item_id: u64,
        min_quantity: u64,
    ) -> Result<ProofWithInputs, ProveError> {
        prove_item_exists(&self.keys.item_exists.proving_key, state, item_id, min_quantity)
    }

    pub fn prove_capacity(
        &self,
        state: &InventoryState,
        max_capacity: u64,
    ) -> Result<ProofWithInputs, ProveError> {
        prove_capacity(&self.keys.capacity.proving_key, state, max_capacity)
    }

    /// Dispatch independent `StateTransition` proofs across the `rayon`
    /// worker pool (spec §5's "worker pool contract" for unrelated
    /// inventories).
    pub fn prove_independent_batch(
        &self,
        jobs: &[IndependentJob],
    ) -> Vec<Result<StateTransitionResult, ProveError>> {
        prove_independent_batch(&self.keys.state_transition.proving_key, jobs)
    }

    /// Run a nonce-ordered batch of `StateTransition` proofs for a single
    /// inventory (spec §5's per-inventory sequential-nonce rule).
    pub fn prove_sequential_batch(
        &self,
        starting_state: &InventoryState,
        starting_nonce: u64,
        steps: &[SequentialStep],
    ) -> Vec<Result<StateTransitionResult, ProveError>> {
        prove_sequential_batch(
            &self.keys.state_transition.proving_key,
            starting_state,
            starting_nonce,
            steps,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fr;

    #[test]
    fn context_proves_and_shares_cheaply() {
        let ctx = ProvingContext::setup().unwrap();
        let ctx_clone = ctx.clone();

        let state = InventoryState::new(Fr::from(1u64));
        let result = ctx_clone.prove_capacity(&state, 100);
        assert!(result.is_ok());
    }
}
