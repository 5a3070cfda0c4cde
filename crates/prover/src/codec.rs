//! Public-input byte layout for the three circuits.
//!
//! Each circuit's public inputs are a fixed-order vector of `Fr` elements.
//! The host verifier consumes these as 32-byte little-endian values; this
//! module is the one place that encodes/decodes that layout so the contract
//! in spec §6 has a single authoritative implementation instead of being
//! re-derived at every call site.

use ark_bn254::Fr;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use thiserror::Error;

/// Width, in bytes, of a single encoded field element.
pub const FIELD_ELEMENT_BYTES: usize = 32;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("expected {expected} public inputs, got {actual}")]
    WrongArity { expected: usize, actual: usize },
    #[error("public input buffer length {actual} is not a multiple of {FIELD_ELEMENT_BYTES}")]
    Misaligned { actual: usize },
    #[error("failed to decode field element at index {index}: {source}")]
    FieldDecode {
        index: usize,
        #[source]
        source: ark_serialize::SerializationError,
    },
}

/// Fixed public-input ordering for `StateTransitionCircuit`.
pub const STATE_TRANSITION_ARITY: usize = 4;
/// Index of `signal_hash` within `StateTransitionCircuit`'s public inputs.
pub const STATE_TRANSITION_SIGNAL_HASH: usize = 0;
/// Index of `nonce`.
pub const STATE_TRANSITION_NONCE: usize = 1;
/// Index of `instance_id`.
pub const STATE_TRANSITION_INSTANCE_ID: usize = 2;
/// Index of `registry_root`.
pub const STATE_TRANSITION_REGISTRY_ROOT: usize = 3;

/// Fixed public-input ordering for `ItemExistsSMTCircuit` and `CapacitySMTCircuit`.
pub const SINGLE_HASH_ARITY: usize = 1;

/// Encode a public-input vector as concatenated 32-byte little-endian chunks.
///
/// This is the wire format a host verifier expects: each `Fr` is its
/// canonical compressed representative, zero-extended to 32 bytes.
pub fn encode_public_inputs(inputs: &[Fr]) -> Result<Vec<u8>, CodecError> {
    let mut bytes = Vec::with_capacity(inputs.len() * FIELD_ELEMENT_BYTES);
    for input in inputs {
        input
            .serialize_compressed(&mut bytes)
            .expect("Fr serialization into a Vec<u8> is infallible");
    }
    Ok(bytes)
}

/// Decode a concatenated public-input byte buffer back into field elements.
pub fn decode_public_inputs(bytes: &[u8]) -> Result<Vec<Fr>, CodecError> {
    if bytes.len() % FIELD_ELEMENT_BYTES != 0 {
        return Err(CodecError::Misaligned { actual: bytes.len() });
    }
    bytes
        .chunks_exact(FIELD_ELEMENT_BYTES)
        .enumerate()
        .map(|(index, chunk)| {
            Fr::deserialize_compressed(chunk).map_err(|source| CodecError::FieldDecode { index, source })
        })
        .collect()
}

/// Decode and validate the public-input vector for `StateTransitionCircuit`,
/// returning `(signal_hash, nonce, instance_id, registry_root)` in that order.
pub fn decode_state_transition_inputs(bytes: &[u8]) -> Result<(Fr, Fr, Fr, Fr), CodecError> {
    let inputs = decode_public_inputs(bytes)?;
    if inputs.len() != STATE_TRANSITION_ARITY {
        return Err(CodecError::WrongArity {
            expected: STATE_TRANSITION_ARITY,
            actual: inputs.len(),
        });
    }
    Ok((
        inputs[STATE_TRANSITION_SIGNAL_HASH],
        inputs[STATE_TRANSITION_NONCE],
        inputs[STATE_TRANSITION_INSTANCE_ID],
        inputs[STATE_TRANSITION_REGISTRY_ROOT],
    ))
}

/// Decode and validate a single-`public_hash` circuit's public input vector
/// (`ItemExistsSMTCircuit` or `CapacitySMTCircuit`).
pub fn decode_single_hash_input(bytes: &[u8]) -> Result<Fr, CodecError> {
    let inputs = decode_public_inputs(bytes)?;
    if inputs.len() != SINGLE_HASH_ARITY {
        return Err(CodecError::WrongArity {
            expected: SINGLE_HASH_ARITY,
            actual: inputs.len(),
        });
    }
    Ok(inputs[0])
}
