//! Signal hash for collapsing public inputs.
//!
//! The target chain's verifier caps the number of public proof inputs. The
//! signal hash pattern compresses every semantically-relevant value into a
//! single hash that is checked on-chain alongside the small set of values
//! (nonce, inventory id, registry root) that must remain individually
//! addressable.
//!
//! signal_hash = Poseidon(
//!     old_commitment,
//!     new_commitment,
//!     registry_root,
//!     max_capacity,
//!     item_id,
//!     amount,
//!     op_type,
//!     nonce,
//!     instance_id
//! )

use ark_bn254::Fr;
use ark_crypto_primitives::sponge::poseidon::constraints::PoseidonSpongeVar;
use ark_crypto_primitives::sponge::poseidon::PoseidonSponge;
use ark_crypto_primitives::sponge::constraints::CryptographicSpongeVar;
use ark_crypto_primitives::sponge::CryptographicSponge;
use ark_r1cs_std::prelude::*;
use ark_r1cs_std::fields::fp::FpVar;
use ark_relations::r1cs::{ConstraintSystemRef, SynthesisError};

use crate::poseidon::poseidon_config;

/// Operation types for state transitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum OpType {
    /// Deposit: add items to inventory
    Deposit = 0,
    /// Withdraw: remove items from inventory
    Withdraw = 1,
}

impl OpType {
    /// Convert to field element.
    pub fn to_field(self) -> Fr {
        Fr::from(self as u64)
    }
}

/// Inputs for computing the signal hash.
#[derive(Clone, Debug)]
pub struct SignalInputs {
    /// Old inventory commitment
    pub old_commitment: Fr,
    /// New inventory commitment
    pub new_commitment: Fr,
    /// Volume registry root (for item volume lookups)
    pub registry_root: Fr,
    /// Maximum capacity for the inventory
    pub max_capacity: u64,
    /// Item ID being operated on
    pub item_id: u64,
    /// Amount being deposited/withdrawn
    pub amount: u64,
    /// Operation type (deposit/withdraw)
    pub op_type: OpType,
    /// Per-inventory replay-protection counter
    pub nonce: u64,
    /// Identifier binding this signal to a specific inventory instance
    pub instance_id: Fr,
}

impl SignalInputs {
    /// Compute the signal hash from these inputs.
    pub fn compute_hash(&self) -> Fr {
        let inputs = vec![
            self.old_commitment,
            self.new_commitment,
            self.registry_root,
            Fr::from(self.max_capacity),
            Fr::from(self.item_id),
            Fr::from(self.amount),
            self.op_type.to_field(),
            Fr::from(self.nonce),
            self.instance_id,
        ];

        let config = poseidon_config();
        let mut sponge = PoseidonSponge::new(&config);
        sponge.absorb(&inputs);
        sponge.squeeze_field_elements(1)[0]
    }
}

/// Circuit variable representation of signal inputs.
#[derive(Clone)]
pub struct SignalInputsVar {
    /// Old inventory commitment
    pub old_commitment: FpVar<Fr>,
    /// New inventory commitment
    pub new_commitment: FpVar<Fr>,
    /// Volume registry root
    pub registry_root: FpVar<Fr>,
    /// Maximum capacity
    pub max_capacity: FpVar<Fr>,
    /// Item ID
    pub item_id: FpVar<Fr>,
    /// Amount
    pub amount: FpVar<Fr>,
    /// Operation type
    pub op_type: FpVar<Fr>,
    /// Replay-protection counter
    pub nonce: FpVar<Fr>,
    /// Inventory instance identifier
    pub instance_id: FpVar<Fr>,
}

impl SignalInputsVar {
    /// Create signal inputs from individual field variables.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        old_commitment: FpVar<Fr>,
        new_commitment: FpVar<Fr>,
        registry_root: FpVar<Fr>,
        max_capacity: FpVar<Fr>,
        item_id: FpVar<Fr>,
        amount: FpVar<Fr>,
        op_type: FpVar<Fr>,
        nonce: FpVar<Fr>,
        instance_id: FpVar<Fr>,
    ) -> Self {
        Self {
            old_commitment,
            new_commitment,
            registry_root,
            max_capacity,
            item_id,
            amount,
            op_type,
            nonce,
            instance_id,
        }
    }

    /// Compute the signal hash in-circuit.
    pub fn compute_hash(
        &self,
        cs: ConstraintSystemRef<Fr>,
    ) -> Result<FpVar<Fr>, SynthesisError> {
        let inputs = vec![
            self.old_commitment.clone(),
            self.new_commitment.clone(),
            self.registry_root.clone(),
            self.max_capacity.clone(),
            self.item_id.clone(),
            self.amount.clone(),
            self.op_type.clone(),
            self.nonce.clone(),
            self.instance_id.clone(),
        ];

        let config = poseidon_config();
        let mut sponge = PoseidonSpongeVar::new(cs, &config);
        sponge.absorb(&inputs)?;
        let result = sponge.squeeze_field_elements(1)?;
        Ok(result[0].clone())
    }
}

/// Compute signal hash from raw field elements.
#[allow(clippy::too_many_arguments)]
pub fn compute_signal_hash(
    old_commitment: Fr,
    new_commitment: Fr,
    registry_root: Fr,
    max_capacity: u64,
    item_id: u64,
    amount: u64,
    op_type: OpType,
    nonce: u64,
    instance_id: Fr,
) -> Fr {
    let inputs = SignalInputs {
        old_commitment,
        new_commitment,
        registry_root,
        max_capacity,
        item_id,
        amount,
        op_type,
        nonce,
        instance_id,
    };
    inputs.compute_hash()
}

/// Compute signal hash in-circuit.
#[allow(clippy::too_many_arguments)]
pub fn compute_signal_hash_var(
    cs: ConstraintSystemRef<Fr>,
    old_commitment: &FpVar<Fr>,
    new_commitment: &FpVar<Fr>,
    registry_root: &FpVar<Fr>,
    max_capacity: &FpVar<Fr>,
    item_id: &FpVar<Fr>,
    amount: &FpVar<Fr>,
    op_type: &FpVar<Fr>,
    nonce: &FpVar<Fr>,
    instance_id: &FpVar<Fr>,
) -> Result<FpVar<Fr>, SynthesisError> {
    let inputs = SignalInputsVar::new(
        old_commitment.clone(),
        new_commitment.clone(),
        registry_root.clone(),
        max_capacity.clone(),
        item_id.clone(),
        amount.clone(),
        op_type.clone(),
        nonce.clone(),
        instance_id.clone(),
    );
    inputs.compute_hash(cs)
}
