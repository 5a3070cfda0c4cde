//! Reference implementation of the host verifier's state-transition
//! acceptance rule (spec §6).
//!
//! The real acceptance check lives on the external verifier host (a smart
//! contract, per spec §1's "out of scope" list); that component is not part
//! of this crate. What *is* part of this crate's contract is the exact rule
//! the host must follow, so it is implemented once here against an
//! in-process [`PersistedInventory`] for integration testing (scenarios #7
//! and #8 of spec §8) rather than re-derived ad hoc by every caller.

use ark_bn254::{Bn254, Fr};
use ark_groth16::{Groth16, Proof, VerifyingKey};
use ark_snark::SNARK;
use thiserror::Error;

use inventory_circuits::signal::{compute_signal_hash, OpType};

/// On-chain-visible state for one inventory instance (spec §6, "Persisted
/// state"). Blinding, tree contents, and volume never appear here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PersistedInventory {
    pub commitment: Fr,
    pub nonce: u64,
    pub instance_id: Fr,
    pub max_capacity: u64,
}

/// The operation-specific fields a submitter declares alongside a proof.
/// Everything else the acceptance rule needs (`old_commitment`,
/// `max_capacity`, `nonce`, `instance_id`) is read from the stored
/// [`PersistedInventory`], never trusted from the submission.
#[derive(Clone, Debug)]
pub struct StateTransitionSubmission {
    pub new_commitment: Fr,
    pub op_type: OpType,
    pub item_id: u64,
    pub amount: u64,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AcceptError {
    #[error("stale nonce: expected {expected}, proof carries {actual}")]
    StaleNonce { expected: u64, actual: u64 },
    #[error("cross-instance proof: expected instance {expected:?}, proof carries {actual:?}")]
    WrongInstance { expected: Fr, actual: Fr },
    #[error("registry root mismatch: trusted {trusted:?}, proof carries {actual:?}")]
    WrongRegistryRoot { trusted: Fr, actual: Fr },
    #[error("signal hash mismatch: recomputed value does not match the proof's public input")]
    SignalHashMismatch,
    #[error("Groth16 verification rejected the proof")]
    ProofRejected,
    #[error("Groth16 verification errored: {0}")]
    VerificationError(String),
}

/// Check and, on success, apply a `StateTransition` proof against stored
/// per-inventory state, exactly per spec §6's five-point rule:
///
/// 1. `nonce` equals the stored per-instance nonce.
/// 2. `instance_id` equals the stored per-instance identity.
/// 3. `registry_root` equals the trusted registry digest.
/// 4. `signal_hash` was computed from the declared submission using
///    `old_commitment` = the stored commitment and `max_capacity` = the
///    stored capacity.
/// 5. Groth16 verifies.
///
/// On acceptance, `inventory.commitment` is replaced with `new_commitment`
/// and `inventory.nonce` is incremented. On any failure, `inventory` is left
/// unchanged.
#[allow(clippy::too_many_arguments)]
pub fn accept_state_transition(
    inventory: &mut PersistedInventory,
    trusted_registry_root: Fr,
    vk: &VerifyingKey<Bn254>,
    proof: &Proof<Bn254>,
    signal_hash: Fr,
    proof_nonce: u64,
    proof_instance_id: Fr,
    proof_registry_root: Fr,
    submission: &StateTransitionSubmission,
) -> Result<(), AcceptError> {
    if proof_nonce != inventory.nonce {
        return Err(AcceptError::StaleNonce {
            expected: inventory.nonce,
            actual: proof_nonce,
        });
    }
    if proof_instance_id != inventory.instance_id {
        return Err(AcceptError::WrongInstance {
            expected: inventory.instance_id,
            actual: proof_instance_id,
        });
    }
    if proof_registry_root != trusted_registry_root {
        return Err(AcceptError::WrongRegistryRoot {
            trusted: trusted_registry_root,
            actual: proof_registry_root,
        });
    }

    let expected_signal_hash = compute_signal_hash(
        inventory.commitment,
        submission.new_commitment,
        proof_registry_root,
        inventory.max_capacity,
        submission.item_id,
        submission.amount,
        submission.op_type,
        proof_nonce,
        proof_instance_id,
    );
    if expected_signal_hash != signal_hash {
        return Err(AcceptError::SignalHashMismatch);
    }

    let public_inputs = vec![signal_hash, Fr::from(proof_nonce), proof_instance_id, proof_registry_root];
    let verified = Groth16::<Bn254>::verify(vk, &public_inputs, proof)
        .map_err(|e| AcceptError::VerificationError(e.to_string()))?;
    if !verified {
        return Err(AcceptError::ProofRejected);
    }

    inventory.commitment = submission.new_commitment;
    inventory.nonce += 1;
    Ok(())
}
