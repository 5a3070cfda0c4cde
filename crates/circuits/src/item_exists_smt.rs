//! ItemExists Circuit for SMT-based inventory.
//!
//! Proves that an inventory contains at least a minimum quantity of a specific item.
//! Uses a single SMT membership proof.
//!
//! Public input: Poseidon(commitment, item_id, min_quantity)
//!
//! This allows proving ownership without revealing exact quantities.

use ark_bn254::Fr;
use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::prelude::*;
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystemRef, SynthesisError};

use crate::poseidon::{poseidon_hash_many, poseidon_hash_many_var};
use crate::range_check::enforce_geq;
use crate::smt::{verify_membership, MerkleProof, MerkleProofVar};
use crate::smt_commitment::{create_smt_commitment, create_smt_commitment_var};

/// Compute the public input hash for ItemExists proof.
pub fn compute_item_exists_hash(
    commitment: Fr,
    item_id: u64,
    min_quantity: u64,
) -> Fr {
    let inputs = vec![
        commitment,
        Fr::from(item_id),
        Fr::from(min_quantity),
    ];
    poseidon_hash_many(&inputs)
}

/// ItemExists Circuit for SMT-based inventory.
#[derive(Clone)]
pub struct ItemExistsSMTCircuit {
    /// Public input hash
    pub public_hash: Option<Fr>,

    // Commitment components (witnesses)
    /// Inventory SMT root
    pub inventory_root: Option<Fr>,
    /// Current volume
    pub current_volume: Option<u64>,
    /// Blinding factor
    pub blinding: Option<Fr>,

    // Item details (witnesses)
    /// Item ID to prove
    pub item_id: Option<u64>,
    /// Actual quantity (must be >= min_quantity)
    pub actual_quantity: Option<u64>,
    /// Minimum quantity to prove
    pub min_quantity: Option<u64>,

    // Merkle proof
    /// Proof for item in SMT
    pub proof: Option<MerkleProof<Fr>>,
}

impl ItemExistsSMTCircuit {
    /// Create an empty circuit for setup.
    /// Uses dummy values that produce valid constraint structure.
    pub fn empty() -> Self {
        use crate::smt::DEFAULT_DEPTH;

        let dummy_proof = MerkleProof::new(
            vec![Fr::from(0u64); DEFAULT_DEPTH],
            vec![false; DEFAULT_DEPTH],
        );

        Self {
            public_hash: Some(Fr::from(0u64)),
            inventory_root: Some(Fr::from(0u64)),
            current_volume: Some(0),
            blinding: Some(Fr::from(0u64)),
            item_id: Some(0),
            actual_quantity: Some(0),
            min_quantity: Some(0),
            proof: Some(dummy_proof),
        }
    }

    /// Create a new circuit with witnesses.
    pub fn new(
        inventory_root: Fr,
        current_volume: u64,
        blinding: Fr,
        item_id: u64,
        actual_quantity: u64,
        min_quantity: u64,
        proof: MerkleProof<Fr>,
    ) -> Self {
        let commitment = create_smt_commitment(
            inventory_root,
            current_volume,
            blinding,
        );

        let public_hash = compute_item_exists_hash(
            commitment,
            item_id,
            min_quantity,
        );

        Self {
            public_hash: Some(public_hash),
            inventory_root: Some(inventory_root),
            current_volume: Some(current_volume),
            blinding: Some(blinding),
            item_id: Some(item_id),
            actual_quantity: Some(actual_quantity),
            min_quantity: Some(min_quantity),
            proof: Some(proof),
        }
    }
}

impl ConstraintSynthesizer<Fr> for ItemExistsSMTCircuit {
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

        // === Allocate item witnesses ===
        let item_id_var = FpVar::new_witness(cs.clone(), || {
            self.item_id
                .map(Fr::from)
                .ok_or(SynthesisError::AssignmentMissing)
        })?;
        let actual_qty_var = FpVar::new_witness(cs.clone(), || {
            self.actual_quantity
                .map(Fr::from)
                .ok_or(SynthesisError::AssignmentMissing)
        })?;
        let min_qty_var = FpVar::new_witness(cs.clone(), || {
            self.min_quantity
                .map(Fr::from)
                .ok_or(SynthesisError::AssignmentMissing)
        })?;

        // === Allocate Merkle proof ===
        let proof_var = MerkleProofVar::new_witness(
            cs.clone(),
            self.proof.as_ref().unwrap(),
        )?;

        // === Constraint 1: Verify membership in SMT ===
        verify_membership(
            cs.clone(),
            &root_var,
            &item_id_var,
            &actual_qty_var,
            &proof_var,
        )?;

        // === Constraint 2: actual_quantity >= min_quantity ===
        enforce_geq(cs.clone(), &actual_qty_var, &min_qty_var)?;

        // === Constraint 3: Compute and verify commitment ===
        let commitment_var = create_smt_commitment_var(
            cs.clone(),
            &root_var,
            &volume_var,
            &blinding_var,
        )?;

        // === Constraint 4: Compute and verify public hash ===
        let inputs = vec![
            commitment_var,
            item_id_var,
            min_qty_var,
        ];
        let computed_hash = poseidon_hash_many_var(cs.clone(), &inputs)?;

        computed_hash.enforce_equal(&public_hash_var)?;

        Ok(())
    }
}
