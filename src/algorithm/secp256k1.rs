//! Secp256k1 with Blake2b-256 message digests.

use libsecp256k1::{
    curve::Scalar, verify, Message, PublicKey as SecPublicKey, SecretKey as SecPrivateKey,
    Signature as SecSignature, ECMULT_GEN_CONTEXT,
};
use num_bigint::BigUint;
use once_cell::sync::Lazy;
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

static ORDER: Lazy<BigUint> =
    Lazy::new(|| parse_order("FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141"));

#[derive(Debug)]
pub(crate) struct CapabilitySecP256K1;

impl Key for CapabilitySecP256K1 {
    fn scalar_size(&self) -> usize { SCALAR_SIZE }
    fn public_key_size(&self) -> usize { 33 }
    fn address_prefix(&self) -> &'static [u8] { &[6, 161, 161] }
    fn public_key_prefix(&self) -> &'static [u8] { &[3, 254, 226, 86] }
    fn private_key_prefix(&self) -> &'static [u8] { &[17, 162, 224, 201] }
    fn signature_prefix(&self) -> &'static [u8] { &[13, 115, 101, 19, 63] }
}

impl Sign for CapabilitySecP256K1 {
    fn sign(&self, private_key: &[u8], message: &[u8]) -> Result<Signature> {
        sign_digest::<HmacBlake2b256>(private_key, &utils::blake2b_256(message))
    }
}

impl Verify for CapabilitySecP256K1 {
    fn verify(&self, public_key: &[u8], message: &[u8], signature: &[u8]) -> Result<bool> {
        split_signature(signature, SCALAR_SIZE)?;
        let public_key = parse_public_key(public_key)?;

        // r or s at or above the order
        let signature = match SecSignature::parse_standard_slice(signature) {
            Ok(signature) => signature,
            Err(_) => return Ok(false),
        };

        let message = Message::parse(&utils::blake2b_256(message));
        Ok(verify(&message, &signature, &public_key))
    }
}

impl Derive for CapabilitySecP256K1 {
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
        let secret = SecPrivateKey::parse_slice(private_key)
            .map_err(|_| Error::InvalidKeyMaterial("private scalar out of range"))?;
        Ok(SecPublicKey::from_secret_key(&secret)
            .serialize_compressed()
            .to_vec())
    }
}

/// Low-S ECDSA over a 32-byte digest with the nonce drawn from an
/// RFC 6979 generator keyed by `H`.
pub(crate) fn sign_digest<H: KeyedHash>(private_key: &[u8], digest: &[u8; 32]) -> Result<Signature> {
    let mut d = to_scalar(private_key)?;
    let message = Message::parse(digest);
    let mut nonces = NonceGenerator::<H>::new(private_key, digest, &ORDER);

    let mut attempt = 0u32;
    let (r, s) = loop {
        attempt += 1;
        let mut k = to_scalar(&nonces.next_nonce())?;
        let signed = ECMULT_GEN_CONTEXT.sign_raw(&d, &message.0, &k);
        k.clear();

        match signed {
            Ok((r, s, _)) => break (r, s),
            Err(_) => trace!(attempt, "zero signature component, drawing another nonce"),
        }
    };
    d.clear();

    let s = if s.is_high() { -s } else { s };
    Signature::from_parts(&r.b32(), &s.b32())
}

fn to_scalar(bytes: &[u8]) -> Result<Scalar> {
    let bytes: &[u8; SCALAR_SIZE] = bytes
        .try_into()
        .map_err(|_| Error::InvalidKeyMaterial("wrong private key length"))?;

    let mut scalar = Scalar::default();
    if bool::from(scalar.set_b32(bytes)) {
        scalar.clear();
        return Err(Error::InvalidKeyMaterial("scalar not below the group order"));
    }
    Ok(scalar)
}

fn parse_public_key(bytes: &[u8]) -> Result<SecPublicKey> {
    let bytes: &[u8; 33] = bytes
        .try_into()
        .map_err(|_| Error::InvalidEncoding("wrong public key length"))?;
    SecPublicKey::parse_compressed(bytes)
        .map_err(|_| Error::InvalidEncoding("public key is not a point on secp256k1"))
}
