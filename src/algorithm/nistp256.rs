//! NIST P-256 with Blake2b-256 message digests.

use ecdsa::hazmat::SignPrimitive;
use num_bigint::BigUint;
use once_cell::sync::Lazy;
use p256::{
    ecdsa::{signature::hazmat::PrehashVerifier, Signature as P256Signature, VerifyingKey},
    elliptic_curve::{ff::PrimeField, sec1::ToEncodedPoint},
    FieldBytes, PublicKey as P256PublicKey, Scalar, SecretKey,
};
use tracing::trace;

use super::{
    check_scalar, nonce::NonceGenerator, parse_order, reduce_seed, split_signature, Derive, Key,
    Sign, Verify,
};
use crate::{
    error::{Error, Result},
    keyed_hash::{HmacBlake2b256, KeyedHash},
    utils, Signature,
};

const SCALAR_SIZE: usize = 32;
const PUBLIC_KEY_SIZE: usize = 33;

static ORDER: Lazy<BigUint> =
    Lazy::new(|| parse_order("FFFFFFFF00000000FFFFFFFFFFFFFFFFBCE6FAADA7179E84F3B9CAC2FC632551"));

#[derive(Debug)]
pub(crate) struct CapabilityNistP256;

impl Key for CapabilityNistP256 {
    fn scalar_size(&self) -> usize { SCALAR_SIZE }
    fn public_key_size(&self) -> usize { PUBLIC_KEY_SIZE }
    fn address_prefix(&self) -> &'static [u8] { &[6, 161, 164] }
    fn public_key_prefix(&self) -> &'static [u8] { &[3, 178, 139, 127] }
    fn private_key_prefix(&self) -> &'static [u8] { &[16, 81, 238, 189] }
    fn signature_prefix(&self) -> &'static [u8] { &[54, 240, 44, 52] }
}

impl Sign for CapabilityNistP256 {
    fn sign(&self, private_key: &[u8], message: &[u8]) -> Result<Signature> {
        sign_digest::<HmacBlake2b256>(private_key, &utils::blake2b_256(message))
    }
}

impl Verify for CapabilityNistP256 {
    fn verify(&self, public_key: &[u8], message: &[u8], signature: &[u8]) -> Result<bool> {
        split_signature(signature, SCALAR_SIZE)?;
        let verifying_key = VerifyingKey::from(parse_public_key(public_key)?);

        let signature = match P256Signature::from_slice(signature) {
            Ok(signature) => signature,
            Err(_) => return Ok(false),
        };

        Ok(verifying_key
            .verify_prehash(&utils::blake2b_256(message), &signature)
            .is_ok())
    }
}

impl Derive for CapabilityNistP256 {
    fn validate_private_key(&self, bytes: &[u8]) -> Result<()> {
        check_scalar(bytes, SCALAR_SIZE, &ORDER)
    }

    fn validate_public_key(&self, bytes: &[u8]) -> Result<()> {
        parse_public_key(bytes).map(|_| ())
    }

    fn derive_private_key(&self, seed: &[u8]) -> Result<Vec<u8>> {
        reduce_seed(seed, SCALAR_SIZE, &ORDER)
    }

    fn derive_public_key(&self, private_key: &[u8]) -> Result<Vec<u8>> {
        let point = secret_key(private_key)?.public_key().to_encoded_point(true);
        Ok(point.as_bytes().to_vec())
    }
}

/// ECDSA over a 32-byte digest with the nonce drawn from an RFC 6979
/// generator keyed by `H`. `s` is left as computed.
pub(crate) fn sign_digest<H: KeyedHash>(private_key: &[u8], digest: &[u8; 32]) -> Result<Signature> {
    let d = secret_key(private_key)?.to_nonzero_scalar();
    let z = FieldBytes::clone_from_slice(digest);
    let mut nonces = NonceGenerator::<H>::new(private_key, digest, &ORDER);

    let mut attempt = 0u32;
    loop {
        attempt += 1;
        let k = FieldBytes::clone_from_slice(&nonces.next_nonce());
        let k = Option::<Scalar>::from(Scalar::from_repr(k))
            .ok_or(Error::InvalidKeyMaterial("nonce out of range"))?;

        match d.try_sign_prehashed(k, &z) {
            Ok((signature, _)) => return Signature::from_slice(signature.to_bytes()),
            Err(_) => trace!(attempt, "zero signature component, drawing another nonce"),
        }
    }
}

fn secret_key(bytes: &[u8]) -> Result<SecretKey> {
    if bytes.len() != SCALAR_SIZE {
        return Err(Error::InvalidKeyMaterial("wrong private key length"));
    }
    SecretKey::from_slice(bytes).map_err(|_| Error::InvalidKeyMaterial("private scalar out of range"))
}

fn parse_public_key(bytes: &[u8]) -> Result<P256PublicKey> {
    if bytes.len() != PUBLIC_KEY_SIZE {
        return Err(Error::InvalidEncoding("wrong public key length"));
    }
    P256PublicKey::from_sec1_bytes(bytes)
        .map_err(|_| Error::InvalidEncoding("public key is not a point on p256"))
}
