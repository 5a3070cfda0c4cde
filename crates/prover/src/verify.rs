//! Local proof verification for testing SMT-based circuits.

use ark_bn254::{Bn254, Fr};
use ark_groth16::{Groth16, Proof, VerifyingKey};
use ark_snark::SNARK;
use thiserror::Error;

/// Errors during verification
#[derive(Error, Debug)]
pub enum VerifyError {
    #[error("Verification failed: {0}")]
    Verification(String),
    #[error("Invalid public inputs")]
    InvalidInputs,
}

/// Verify a StateTransition proof.
///
/// Public inputs must appear in the order the circuit allocates them:
/// signal hash, nonce, inventory ID, registry root.
pub fn verify_state_transition(
    vk: &VerifyingKey<Bn254>,
    proof: &Proof<Bn254>,
    signal_hash: Fr,
    nonce: u64,
    inventory_id: Fr,
    registry_root: Fr,
) -> Result<bool, VerifyError> {
    let public_inputs = vec![signal_hash, Fr::from(nonce), inventory_id, registry_root];

    Groth16::<Bn254>::verify(vk, &public_inputs, proof)
        .map_err(|e| VerifyError::Verification(e.to_string()))
}

/// Verify an ItemExists proof (uses public hash as single input)
pub fn verify_item_exists(
    vk: &VerifyingKey<Bn254>,
    proof: &Proof<Bn254>,
    public_hash: Fr,
) -> Result<bool, VerifyError> {
    let public_inputs = vec![public_hash];

    Groth16::<Bn254>::verify(vk, &public_inputs, proof)
        .map_err(|e| VerifyError::Verification(e.to_string()))
}

/// Verify a Capacity proof (uses public hash as single input)
pub fn verify_capacity(
    vk: &VerifyingKey<Bn254>,
    proof: &Proof<Bn254>,
    public_hash: Fr,
) -> Result<bool, VerifyError> {
    let public_inputs = vec![public_hash];

    Groth16::<Bn254>::verify(vk, &public_inputs, proof)
        .map_err(|e| VerifyError::Verification(e.to_string()))
}
