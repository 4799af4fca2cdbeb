//! Ed25519 over Blake2b-256 message digests.

use ed25519_dalek::{Signature as EdSignature, Signer, SigningKey, Verifier, VerifyingKey};
use zeroize::Zeroizing;

use super::{split_signature, Derive, Key, Sign, Verify};
use crate::{
    error::{Error, Result},
    utils, Signature,
};

const SCALAR_SIZE: usize = 32;

#[derive(Debug)]
pub(crate) struct CapabilityEd25519;

impl Key for CapabilityEd25519 {
    fn scalar_size(&self) -> usize { SCALAR_SIZE }
    fn public_key_size(&self) -> usize { 32 }
    fn address_prefix(&self) -> &'static [u8] { &[6, 161, 159] }
    fn public_key_prefix(&self) -> &'static [u8] { &[13, 15, 37, 217] }
    fn private_key_prefix(&self) -> &'static [u8] { &[13, 15, 58, 7] }
    fn signature_prefix(&self) -> &'static [u8] { &[9, 245, 205, 134, 18] }
}

impl Sign for CapabilityEd25519 {
    fn sign(&self, private_key: &[u8], message: &[u8]) -> Result<Signature> {
        let signing_key = signing_key(private_key)?;
        let signature = signing_key.sign(&utils::blake2b_256(message));
        Signature::from_slice(signature.to_bytes())
    }
}

impl Verify for CapabilityEd25519 {
    fn verify(&self, public_key: &[u8], message: &[u8], signature: &[u8]) -> Result<bool> {
        split_signature(signature, SCALAR_SIZE)?;
        let verifying_key = parse_public_key(public_key)?;

        let signature = EdSignature::from_slice(signature)
            .map_err(|_| Error::InvalidEncoding("wrong signature length"))?;

        Ok(verifying_key
            .verify(&utils::blake2b_256(message), &signature)
            .is_ok())
    }
}

impl Derive for CapabilityEd25519 {
    fn validate_private_key(&self, bytes: &[u8]) -> Result<()> {
        signing_key(bytes).map(|_| ())
    }

    fn validate_public_key(&self, bytes: &[u8]) -> Result<()> {
        parse_public_key(bytes).map(|_| ())
    }

    fn derive_private_key(&self, seed: &[u8]) -> Result<Vec<u8>> {
        seed.get(..SCALAR_SIZE)
            .map(<[u8]>::to_vec)
            .ok_or(Error::InvalidKeyMaterial("seed shorter than private key"))
    }

    fn derive_public_key(&self, private_key: &[u8]) -> Result<Vec<u8>> {
        Ok(signing_key(private_key)?.verifying_key().to_bytes().to_vec())
    }
}

fn signing_key(bytes: &[u8]) -> Result<SigningKey> {
    let secret: Zeroizing<[u8; SCALAR_SIZE]> = Zeroizing::new(
        bytes
            .try_into()
            .map_err(|_| Error::InvalidKeyMaterial("wrong private key length"))?,
    );
    Ok(SigningKey::from_bytes(&secret))
}

fn parse_public_key(bytes: &[u8]) -> Result<VerifyingKey> {
    let bytes: &[u8; 32] = bytes
        .try_into()
        .map_err(|_| Error::InvalidEncoding("wrong public key length"))?;
    VerifyingKey::from_bytes(bytes)
        .map_err(|_| Error::InvalidEncoding("public key is not a point on ed25519"))
}
