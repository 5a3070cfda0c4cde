//! Capacity Proof Circuit for SMT-based inventory.
//!
//! Proves that an inventory's total volume is within capacity limits.
//! This is much simpler than the old circuit since volume is tracked incrementally.
//!
//! Public input: Poseidon(commitment, max_capacity)
//!
//! This allows proving compliance without revealing actual volume.

use ark_bn254::Fr;
use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::prelude::*;
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystemRef, SynthesisError};

use crate::poseidon::{poseidon_hash_many, poseidon_hash_many_var};
use crate::range_check::enforce_geq;
use crate::smt_commitment::{create_smt_commitment, create_smt_commitment_var};

/// Compute the public input hash for Capacity proof.
pub fn compute_capacity_hash(
    commitment: Fr,
    max_capacity: u64,
) -> Fr {
    let inputs = vec![
        commitment,
        Fr::from(max_capacity),
    ];
    poseidon_hash_many(&inputs)
}

/// Capacity Proof Circuit for SMT-based inventory.
///
/// Proves current_volume <= max_capacity.
#[derive(Clone)]
pub struct CapacitySMTCircuit {
    /// Public input hash
    pub public_hash: Option<Fr>,

    // Commitment components (witnesses)
    /// Inventory SMT root
    pub inventory_root: Option<Fr>,
    /// Current volume (witness - what we're proving about)
    pub current_volume: Option<u64>,
    /// Blinding factor
    pub blinding: Option<Fr>,

    // Capacity (witness, but bound by public hash)
    /// Maximum allowed capacity
    pub max_capacity: Option<u64>,
}

impl CapacitySMTCircuit {
    /// Create an empty circuit for setup.
    /// Uses dummy values that produce valid constraint structure.
    pub fn empty() -> Self {
        Self {
            public_hash: Some(Fr::from(0u64)),
            inventory_root: Some(Fr::from(0u64)),
            current_volume: Some(0),
            blinding: Some(Fr::from(0u64)),
            max_capacity: Some(0),
        }
    }

    /// Create a new circuit with witnesses.
    pub fn new(
        inventory_root: Fr,
        current_volume: u64,
        blinding: Fr,
        max_capacity: u64,
    ) -> Self {
        let commitment = create_smt_commitment(
            inventory_root,
            current_volume,
            blinding,
        );

        let public_hash = compute_capacity_hash(
            commitment,
            max_capacity,
        );

        Self {
            public_hash: Some(public_hash),
            inventory_root: Some(inventory_root),
            current_volume: Some(current_volume),
            blinding: Some(blinding),
            max_capacity: Some(max_capacity),
        }
    }
}

impl ConstraintSynthesizer<Fr> for CapacitySMTCircuit {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
        // === Allocate public input ===
        let public_hash_var = FpVar::new_input(cs.clone(), || {
            self.public_hash.ok_or(SynthesisError::AssignmentMissing)
        })?;

        // === Allocate commitment witnesses ===
        let root_var = FpVar::new_witness(cs.clone(), || {
            self.inventory_root.ok_or(SynthesisError::AssignmentMissing)
        })?;
        let volume_var = FpVar::new_witness(cs.clone(), || {
            self.current_volume
                .map(Fr::from)
                .ok_or(SynthesisError::AssignmentMissing)
        })?;
        let blinding_var = FpVar::new_witness(cs.clone(), || {
            self.blinding.ok_or(SynthesisError::AssignmentMissing)
        })?;

        // === Allocate capacity witness ===
        let max_capacity_var = FpVar::new_witness(cs.clone(), || {
            self.max_capacity
                .map(Fr::from)
                .ok_or(SynthesisError::AssignmentMissing)
        })?;

        // === Constraint 1: Compute commitment ===
        let commitment_var = create_smt_commitment_var(
            cs.clone(),
            &root_var,
            &volume_var,
            &blinding_var,
        )?;

        // === Constraint 2: Compute and verify public hash ===
        let inputs = vec![
            commitment_var,
            max_capacity_var.clone(),
        ];
        let computed_hash = poseidon_hash_many_var(cs.clone(), &inputs)?;

        computed_hash.enforce_equal(&public_hash_var)?;

        // === Constraint 3: current_volume <= max_capacity ===
        enforce_geq(cs.clone(), &max_capacity_var, &volume_var)?;

        Ok(())
    }
}
