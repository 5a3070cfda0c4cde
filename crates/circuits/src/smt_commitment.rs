//! SMT-based commitment scheme for inventories.
//!
//! The commitment scheme uses Poseidon hash:
//! commitment = Poseidon(inventory_root, current_volume, blinding)
//!
//! Where:
//! - inventory_root: Root of the Sparse Merkle Tree containing all items
//! - current_volume: Total volume of all items in the inventory
//! - blinding: Random value for hiding the commitment

use ark_bn254::Fr;
use ark_r1cs_std::fields::fp::FpVar;
use ark_relations::r1cs::{ConstraintSystemRef, SynthesisError};

use crate::error::CircuitError;
use crate::poseidon::{poseidon_hash_many, poseidon_hash_many_var};

/// Create an SMT-based inventory commitment.
///
/// commitment = Poseidon(inventory_root, current_volume, blinding)
pub fn create_smt_commitment(
    inventory_root: Fr,
    current_volume: u64,
    blinding: Fr,
) -> Fr {
    let inputs = vec![
        inventory_root,
        Fr::from(current_volume),
        blinding,
    ];
    poseidon_hash_many(&inputs)
}

/// Compute SMT commitment in-circuit.
pub fn create_smt_commitment_var(
    cs: ConstraintSystemRef<Fr>,
    inventory_root: &FpVar<Fr>,
    current_volume: &FpVar<Fr>,
    blinding: &FpVar<Fr>,
) -> Result<FpVar<Fr>, SynthesisError> {
    let inputs = vec![
        inventory_root.clone(),
        current_volume.clone(),
        blinding.clone(),
    ];
    poseidon_hash_many_var(cs, &inputs)
}

/// Inventory state for SMT-based design.
///
/// This tracks all the information needed to generate proofs.
#[derive(Clone, Debug)]
pub struct InventoryState {
    /// Root of the inventory SMT
    pub inventory_root: Fr,
    /// Current total volume of the inventory
    pub current_volume: u64,
    /// Blinding factor for the commitment
    pub blinding: Fr,
}

impl InventoryState {
    /// Create a new inventory state.
    pub fn new(inventory_root: Fr, current_volume: u64, blinding: Fr) -> Self {
        Self {
            inventory_root,
            current_volume,
            blinding,
        }
    }

    /// Create an empty inventory state.
    pub fn empty(empty_root: Fr, blinding: Fr) -> Self {
        Self {
            inventory_root: empty_root,
            current_volume: 0,
            blinding,
        }
    }

    /// Compute the commitment for this state.
    pub fn commitment(&self) -> Fr {
        create_smt_commitment(
            self.inventory_root,
            self.current_volume,
            self.blinding,
        )
    }

    /// Update state after a deposit.
    pub fn after_deposit(
        &self,
        new_root: Fr,
        item_volume: u64,
        amount: u64,
        new_blinding: Fr,
    ) -> Result<Self, CircuitError> {
        let delta = item_volume
            .checked_mul(amount)
            .ok_or(CircuitError::VolumeOverflow { current: self.current_volume, delta: u64::MAX })?;
        let new_volume = self.current_volume.checked_add(delta).ok_or(
            CircuitError::VolumeOverflow { current: self.current_volume, delta },
        )?;

        Ok(Self {
            inventory_root: new_root,
            current_volume: new_volume,
            blinding: new_blinding,
        })
    }

    /// Update state after a withdrawal.
    pub fn after_withdraw(
        &self,
        new_root: Fr,
        item_volume: u64,
        amount: u64,
        new_blinding: Fr,
    ) -> Result<Self, CircuitError> {
        let delta = item_volume
            .checked_mul(amount)
            .ok_or(CircuitError::VolumeOverflow { current: self.current_volume, delta: u64::MAX })?;
        let new_volume = self.current_volume.checked_sub(delta).ok_or(
            CircuitError::VolumeUnderflow { current: self.current_volume, delta },
        )?;

        Ok(Self {
            inventory_root: new_root,
            current_volume: new_volume,
            blinding: new_blinding,
        })
    }
}

/// Circuit variables for inventory state.
#[derive(Clone)]
pub struct InventoryStateVar {
    /// Root of the inventory SMT
    pub inventory_root: FpVar<Fr>,
    /// Current total volume
    pub current_volume: FpVar<Fr>,
    /// Blinding factor
    pub blinding: FpVar<Fr>,
}

impl InventoryStateVar {
    /// Create new inventory state variables.
    pub fn new(
        inventory_root: FpVar<Fr>,
        current_volume: FpVar<Fr>,
        blinding: FpVar<Fr>,
    ) -> Self {
        Self {
            inventory_root,
            current_volume,
            blinding,
        }
    }

    /// Compute the commitment in-circuit.
    pub fn commitment(
        &self,
        cs: ConstraintSystemRef<Fr>,
    ) -> Result<FpVar<Fr>, SynthesisError> {
        create_smt_commitment_var(
            cs,
            &self.inventory_root,
            &self.current_volume,
            &self.blinding,
        )
    }
}
