//! Proof generation for SMT-based inventory circuits.

use std::sync::Arc;

use ark_bn254::{Bn254, Fr};
use ark_groth16::{Groth16, Proof, ProvingKey};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_snark::SNARK;
use ark_std::rand::{rngs::StdRng, SeedableRng};
use thiserror::Error;

use inventory_circuits::{
    poseidon::poseidon_config,
    signal::OpType,
    smt::{MerkleProof, SparseMerkleTree, DEFAULT_DEPTH},
    smt_commitment::create_smt_commitment,
    CapacitySMTCircuit, ItemExistsSMTCircuit, StateTransitionCircuit,
};

/// Errors during proof generation
#[derive(Error, Debug)]
pub enum ProveError {
    #[error("Proof generation failed: {0}")]
    ProofGeneration(String),
    #[error("Invalid inventory state: {0}")]
    InvalidState(String),
    #[error("Serialization failed: {0}")]
    Serialization(String),
    #[error("insufficient quantity: have {have}, need {need}")]
    InsufficientQuantity { have: u64, need: u64 },
    #[error("capacity exceeded: volume {volume} > max {max}")]
    CapacityExceeded { volume: u64, max: u64 },
    #[error("overflow: amount {amount} * item_volume {item_volume} exceeds u32 range")]
    Overflow { amount: u64, item_volume: u64 },
    #[error("invalid item: {0}")]
    InvalidItem(#[from] inventory_circuits::CircuitError),
}

/// `amount * item_volume`, guarded at the prover boundary per the u32 range
/// the `StateTransition` circuit's `enforce_u32(new_volume)` constraint
/// bounds new_volume to. A witness that overflows here would fail in-circuit
/// anyway; rejecting it before synthesis gives the caller a typed error
/// instead of an opaque unsatisfiable-constraint failure.
fn checked_volume_delta(amount: u64, item_volume: u64) -> Result<u64, ProveError> {
    amount
        .checked_mul(item_volume)
        .filter(|delta| *delta < (1u64 << 32))
        .ok_or(ProveError::Overflow { amount, item_volume })
}

/// A proof with its public inputs (signal hash)
#[derive(Clone)]
pub struct ProofWithInputs {
    pub proof: Proof<Bn254>,
    pub public_inputs: Vec<Fr>,
}

impl ProofWithInputs {
    /// Serialize proof to bytes
    pub fn serialize_proof(&self) -> Result<Vec<u8>, ProveError> {
        let mut bytes = Vec::new();
        self.proof
            .serialize_compressed(&mut bytes)
            .map_err(|e| ProveError::Serialization(e.to_string()))?;
        Ok(bytes)
    }

    /// Serialize public inputs to bytes (each Fr is 32 bytes)
    pub fn serialize_public_inputs(&self) -> Result<Vec<u8>, ProveError> {
        let mut bytes = Vec::new();
        for input in &self.public_inputs {
            input
                .serialize_compressed(&mut bytes)
                .map_err(|e| ProveError::Serialization(e.to_string()))?;
        }
        Ok(bytes)
    }

    /// Deserialize proof from bytes
    pub fn deserialize_proof(bytes: &[u8]) -> Result<Proof<Bn254>, ProveError> {
        Proof::deserialize_compressed(bytes).map_err(|e| ProveError::Serialization(e.to_string()))
    }
}

/// Client-side inventory state using SMT
#[derive(Clone)]
pub struct InventoryState {
    /// Sparse Merkle Tree storing items
    pub tree: SparseMerkleTree<Fr>,
    /// Current total volume
    pub current_volume: u64,
    /// Blinding factor for commitment
    pub blinding: Fr,
}

impl InventoryState {
    /// Create a new empty inventory state
    pub fn new(blinding: Fr) -> Self {
        Self {
            tree: SparseMerkleTree::new(DEFAULT_DEPTH, Arc::new(poseidon_config())),
            current_volume: 0,
            blinding,
        }
    }

    /// Create inventory state from items
    pub fn from_items(items: &[(u64, u64)], blinding: Fr) -> Self {
        let tree = SparseMerkleTree::from_items(items, DEFAULT_DEPTH, Arc::new(poseidon_config()));
        Self {
            tree,
            current_volume: 0, // Volume must be set separately
            blinding,
        }
    }

    /// Get the inventory SMT root
    pub fn root(&self) -> Fr {
        self.tree.root()
    }

    /// Get quantity of an item
    pub fn get_quantity(&self, item_id: u64) -> u64 {
        self.tree.get(item_id)
    }

    /// Get Merkle proof for an item
    pub fn get_proof(&self, item_id: u64) -> Result<MerkleProof<Fr>, ProveError> {
        Ok(self.tree.get_proof(item_id)?)
    }

    /// Compute the commitment for this inventory state
    pub fn commitment(&self) -> Fr {
        create_smt_commitment(
            self.tree.root(),
            self.current_volume,
            self.blinding,
        )
    }

    /// Deposit items (returns updated state and proof)
    pub fn deposit(
        &self,
        item_id: u64,
        amount: u64,
        item_volume: u64,
        new_blinding: Fr,
    ) -> Result<(InventoryState, MerkleProof<Fr>), ProveError> {
        let old_qty = self.get_quantity(item_id);
        let new_qty = old_qty.checked_add(amount)
            .ok_or_else(|| ProveError::InvalidState("Quantity overflow".into()))?;

        // Get proof before update
        let proof = self.get_proof(item_id)?;

        // Update tree
        let mut new_tree = self.tree.clone();
        new_tree.update(item_id, new_qty)?;

        // Update volume
        let volume_delta = checked_volume_delta(amount, item_volume)?;
        let new_volume = self.current_volume.checked_add(volume_delta)
            .ok_or_else(|| ProveError::InvalidState("Volume overflow".into()))?;

        Ok((
            InventoryState {
                tree: new_tree,
                current_volume: new_volume,
                blinding: new_blinding,
            },
            proof,
        ))
    }

    /// Withdraw items (returns updated state and proof)
    pub fn withdraw(
        &self,
        item_id: u64,
        amount: u64,
        item_volume: u64,
        new_blinding: Fr,
    ) -> Result<(InventoryState, MerkleProof<Fr>), ProveError> {
        let old_qty = self.get_quantity(item_id);
        if old_qty < amount {
            return Err(ProveError::InsufficientQuantity {
                have: old_qty,
                need: amount,
            });
        }
        let new_qty = old_qty - amount;

        // Get proof before update
        let proof = self.get_proof(item_id)?;

        // Update tree (setting to 0 removes the item)
        let mut new_tree = self.tree.clone();
        new_tree.update(item_id, new_qty)?;

        // Update volume
        let volume_delta = checked_volume_delta(amount, item_volume)?;
        let new_volume = self.current_volume.saturating_sub(volume_delta);

        Ok((
            InventoryState {
                tree: new_tree,
                current_volume: new_volume,
                blinding: new_blinding,
            },
            proof,
        ))
    }
}

/// Result of a state transition proof
pub struct StateTransitionResult {
    pub proof: ProofWithInputs,
    pub new_state: InventoryState,
    pub new_commitment: Fr,
    /// Nonce used in this proof (for on-chain verification)
    pub nonce: u64,
    /// Inventory ID used in this proof (for on-chain verification)
    pub inventory_id: Fr,
    /// Registry root used in this proof (for on-chain verification)
    pub registry_root: Fr,
}

/// Generate proof for StateTransitionCircuit (deposit or withdraw)
///
/// # Arguments
/// * `pk` - Proving key for StateTransitionCircuit
/// * `old_state` - Current inventory state
/// * `new_blinding` - New blinding factor for the updated commitment
/// * `item_id` - Item being deposited/withdrawn
/// * `amount` - Quantity being deposited/withdrawn
/// * `item_volume` - Volume per unit of this item type
/// * `registry_root` - VolumeRegistry hash (must match on-chain)
/// * `max_capacity` - Maximum allowed volume
/// * `nonce` - Current inventory nonce (must match on-chain, for replay protection)
/// * `inventory_id` - Inventory object ID as field element (must match on-chain)
/// * `op_type` - Deposit or Withdraw
#[allow(clippy::too_many_arguments)]
#[tracing::instrument(skip(pk, old_state, new_blinding, registry_root, inventory_id))]
pub fn prove_state_transition(
    pk: &ProvingKey<Bn254>,
    old_state: &InventoryState,
    new_blinding: Fr,
    item_id: u64,
    amount: u64,
    item_volume: u64,
    registry_root: Fr,
    max_capacity: u64,
    nonce: u64,
    inventory_id: Fr,
    op_type: OpType,
) -> Result<StateTransitionResult, ProveError> {
    // Get old quantities and proof
    let old_quantity = old_state.get_quantity(item_id);
    let inventory_proof = old_state.get_proof(item_id)?;

    // Compute new state
    let (new_quantity, new_volume) = match op_type {
        OpType::Deposit => {
            let new_qty = old_quantity.checked_add(amount)
                .ok_or_else(|| ProveError::InvalidState("Quantity overflow".into()))?;
            let volume_delta = checked_volume_delta(amount, item_volume)?;
            let new_vol = old_state.current_volume.checked_add(volume_delta)
                .ok_or_else(|| ProveError::InvalidState("Volume overflow".into()))?;
            if new_vol > max_capacity {
                return Err(ProveError::CapacityExceeded {
                    volume: new_vol,
                    max: max_capacity,
                });
            }
            (new_qty, new_vol)
        }
        OpType::Withdraw => {
            if old_quantity < amount {
                return Err(ProveError::InsufficientQuantity {
                    have: old_quantity,
                    need: amount,
                });
            }
            let new_qty = old_quantity - amount;
            let volume_delta = checked_volume_delta(amount, item_volume)?;
            let new_vol = old_state.current_volume.saturating_sub(volume_delta);
            (new_qty, new_vol)
        }
    };

    // Create new tree state
    let mut new_tree = old_state.tree.clone();
    new_tree.update(item_id, new_quantity)?;

    let new_state = InventoryState {
        tree: new_tree,
        current_volume: new_volume,
        blinding: new_blinding,
    };

    let new_commitment = new_state.commitment();

    // Create circuit with all security parameters
    let circuit = StateTransitionCircuit::new(
        old_state.tree.root(),
        old_state.current_volume,
        old_state.blinding,
        new_state.tree.root(),
        new_volume,
        new_blinding,
        item_id,
        old_quantity,
        new_quantity,
        amount,
        op_type,
        inventory_proof,
        item_volume,
        registry_root,
        max_capacity,
        nonce,
        inventory_id,
    );

    let signal_hash = circuit.signal_hash.unwrap();

    // Generate proof
    let mut rng = StdRng::from_entropy();
    let proof = Groth16::<Bn254>::prove(pk, circuit, &mut rng)
        .map_err(|e| ProveError::ProofGeneration(e.to_string()))?;

    tracing::debug!(new_volume, nonce, "state transition proof generated");

    // Return all 4 public inputs for on-chain verification
    // Order: signal_hash, nonce, inventory_id, registry_root
    Ok(StateTransitionResult {
        proof: ProofWithInputs {
            proof,
            public_inputs: vec![signal_hash, Fr::from(nonce), inventory_id, registry_root],
        },
        new_state,
        new_commitment,
        nonce,
        inventory_id,
        registry_root,
    })
}

/// Generate proof for ItemExistsSMTCircuit
#[tracing::instrument(skip(pk, state))]
pub fn prove_item_exists(
    pk: &ProvingKey<Bn254>,
    state: &InventoryState,
    item_id: u64,
    min_quantity: u64,
) -> Result<ProofWithInputs, ProveError> {
    // Get actual quantity and proof
    let actual_quantity = state.get_quantity(item_id);
    if actual_quantity < min_quantity {
        return Err(ProveError::InvalidState(format!(
            "Insufficient quantity: have {}, need >= {}",
            actual_quantity, min_quantity
        )));
    }

    let proof = state.get_proof(item_id)?;

    // Create circuit
    let circuit = ItemExistsSMTCircuit::new(
        state.tree.root(),
        state.current_volume,
        state.blinding,
        item_id,
        actual_quantity,
        min_quantity,
        proof,
    );

    let public_hash = circuit.public_hash.unwrap();

    // Generate proof
    let mut rng = StdRng::from_entropy();
    let zk_proof = Groth16::<Bn254>::prove(pk, circuit, &mut rng)
        .map_err(|e| ProveError::ProofGeneration(e.to_string()))?;

    Ok(ProofWithInputs {
        proof: zk_proof,
        public_inputs: vec![public_hash],
    })
}

/// Generate proof for CapacitySMTCircuit
#[tracing::instrument(skip(pk, state))]
pub fn prove_capacity(
    pk: &ProvingKey<Bn254>,
    state: &InventoryState,
    max_capacity: u64,
) -> Result<ProofWithInputs, ProveError> {
    // Verify capacity compliance
    if state.current_volume > max_capacity {
        return Err(ProveError::CapacityExceeded {
            volume: state.current_volume,
            max: max_capacity,
        });
    }

    // Create circuit
    let circuit = CapacitySMTCircuit::new(
        state.tree.root(),
        state.current_volume,
        state.blinding,
        max_capacity,
    );

    let public_hash = circuit.public_hash.unwrap();

    // Generate proof
    let mut rng = StdRng::from_entropy();
    let proof = Groth16::<Bn254>::prove(pk, circuit, &mut rng)
        .map_err(|e| ProveError::ProofGeneration(e.to_string()))?;

    Ok(ProofWithInputs {
        proof,
        public_inputs: vec![public_hash],
    })
}
