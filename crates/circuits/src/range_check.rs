//! Range check gadgets for preventing field arithmetic wrap-around.
//!
//! In ZK circuits, all arithmetic happens in a finite field. Without range checks,
//! subtracting more than we have (e.g., 5 - 10) wraps around to a huge positive number.
//! These gadgets ensure values stay within expected bounds.
//!
//! Rather than decomposing a value into its full field-width bit representation
//! (`to_bits_le()`, ~254 constraints on BN254) and zeroing the high bits, we
//! allocate exactly `k` fresh boolean witnesses and constrain their weighted sum
//! to equal the value. A value that doesn't fit in `k` bits has no such witness,
//! so the constraint is unsatisfiable. This costs `k` constraints (booleanity)
//! plus one linear combination, instead of a full-width decomposition.

use ark_bn254::Fr;
use ark_ff::{BigInteger, PrimeField};
use ark_r1cs_std::prelude::*;
use ark_r1cs_std::fields::fp::FpVar;
use ark_relations::r1cs::{ConstraintSystemRef, SynthesisError};

/// Number of bits used for quantity/volume range checks.
/// Supports values up to 4,294,967,295 (~4.29 billion), sufficient for
/// inventory quantities and volumes.
pub const RANGE_BITS: usize = 32;

/// Enforce that `value` fits in `num_bits` bits by witnessing its bit
/// decomposition directly, rather than decomposing the full field element.
///
/// The prover supplies `num_bits` boolean witnesses; the circuit constrains
/// each to be 0/1 and their weighted sum to equal `value`. If `value` does
/// not fit in `num_bits` bits, no valid witness exists and the constraint
/// system becomes unsatisfiable.
pub fn enforce_in_range(
    cs: ConstraintSystemRef<Fr>,
    value: &FpVar<Fr>,
    num_bits: usize,
) -> Result<(), SynthesisError> {
    let raw = value.value().unwrap_or(Fr::from(0u64));
    let raw_bigint = raw.into_bigint();

    let mut bits = Vec::with_capacity(num_bits);
    for i in 0..num_bits {
        let bit_val = raw_bigint.get_bit(i);
        bits.push(Boolean::new_witness(cs.clone(), || Ok(bit_val))?);
    }

    let reconstructed = Boolean::le_bits_to_fp_var(&bits)?;
    reconstructed.enforce_equal(value)?;

    Ok(())
}

/// Enforce that a value fits in 32 bits.
///
/// This prevents underflow attacks where (small - large) wraps to a huge number.
pub fn enforce_u32(
    cs: ConstraintSystemRef<Fr>,
    value: &FpVar<Fr>,
) -> Result<(), SynthesisError> {
    enforce_in_range(cs, value, RANGE_BITS)
}

/// Enforce that a >= b (non-negative difference).
///
/// This is done by checking that (a - b) fits in 32 bits.
/// If b > a, then (a - b) would wrap around to a huge number that doesn't fit.
pub fn enforce_geq(
    cs: ConstraintSystemRef<Fr>,
    a: &FpVar<Fr>,
    b: &FpVar<Fr>,
) -> Result<(), SynthesisError> {
    let diff = a - b;
    enforce_u32(cs, &diff)
}
