//! Internal traits for curve capabilities.

use std::fmt;

use num_bigint::BigUint;

use crate::{
    error::{Error, Result},
    utils, Signature,
};

pub(super) mod bls12_381;
pub(super) mod ed25519;
pub(super) mod nistp256;
mod nonce;
pub(super) mod secp256k1;

/// Sizes and the base58 prefixes handed to the encoding layer.
pub(super) trait Key: fmt::Debug {
    /// Length of the raw private scalar.
    fn scalar_size(&self) -> usize;

    /// Length of an encoded public key.
    fn public_key_size(&self) -> usize;

    /// Length of `r || s`.
    fn signature_size(&self) -> usize {
        2 * self.scalar_size()
    }

    fn address_prefix(&self) -> &'static [u8];
    fn public_key_prefix(&self) -> &'static [u8];
    fn private_key_prefix(&self) -> &'static [u8];
    fn signature_prefix(&self) -> &'static [u8];
}

/// Trait for signing messages.
pub(super) trait Sign: Key {
    /// Signs a message with private key bytes already validated for the curve.
    fn sign(&self, private_key: &[u8], message: &[u8]) -> Result<Signature>;
}

/// Trait for verifying signatures.
pub(super) trait Verify: Key {
    /// `Ok(false)` for a well-formed signature that does not verify,
    /// [`Error::InvalidEncoding`] for malformed input.
    fn verify(&self, public_key: &[u8], message: &[u8], signature: &[u8]) -> Result<bool>;
}

/// Trait for key construction and derivation.
pub(super) trait Derive: Key {
    /// Checks imported private key bytes.
    fn validate_private_key(&self, bytes: &[u8]) -> Result<()>;

    /// Checks that `bytes` encode a point on the curve.
    fn validate_public_key(&self, bytes: &[u8]) -> Result<()>;

    /// Maps seed material to a private scalar.
    fn derive_private_key(&self, seed: &[u8]) -> Result<Vec<u8>>;

    /// Computes the encoded public key of a validated private key.
    fn derive_public_key(&self, private_key: &[u8]) -> Result<Vec<u8>>;
}

/// Everything a curve offers, as one dispatch table.
pub(super) trait Capability: Sign + Verify + Derive + Send + Sync {}

impl<T: Sign + Verify + Derive + Send + Sync> Capability for T {}

/// Reads a hexadecimal group order.
fn parse_order(hex: &str) -> BigUint {
    BigUint::parse_bytes(hex.as_bytes(), 16).expect("curve order is valid hex")
}

/// Rejects private scalars of the wrong length, zero, or at least `order`.
fn check_scalar(bytes: &[u8], size: usize, order: &BigUint) -> Result<()> {
    if bytes.len() != size {
        return Err(Error::InvalidKeyMaterial("wrong private key length"));
    }

    let d = BigUint::from_bytes_be(bytes);
    if d.bits() == 0 || &d >= order {
        return Err(Error::InvalidKeyMaterial("private scalar out of range"));
    }

    Ok(())
}

/// First `size` seed bytes reduced modulo `order`.
fn reduce_seed(seed: &[u8], size: usize, order: &BigUint) -> Result<Vec<u8>> {
    let seed = seed
        .get(..size)
        .ok_or(Error::InvalidKeyMaterial("seed shorter than private key"))?;

    let d = BigUint::from_bytes_be(seed) % order;
    if d.bits() == 0 {
        return Err(Error::InvalidKeyMaterial("seed reduces to zero"));
    }

    Ok(utils::to_fixed_be(&d, size))
}

/// Splits `r || s`, checking the total length.
fn split_signature(signature: &[u8], size: usize) -> Result<(&[u8], &[u8])> {
    if signature.len() != 2 * size {
        return Err(Error::InvalidEncoding("wrong signature length"));
    }
    Ok(signature.split_at(size))
}
