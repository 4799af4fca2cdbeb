//! BLS12-381 prefixes. No operation is implemented for this curve.

use super::{Derive, Key, Sign, Verify};
use crate::{
    error::{Error, Result},
    Curve, Signature,
};

#[derive(Debug)]
pub(crate) struct CapabilityBls12381;

impl CapabilityBls12381 {
    fn unsupported<T>(operation: &'static str) -> Result<T> {
        Err(Error::UnsupportedCurveOperation {
            curve: Curve::Bls12_381,
            operation,
        })
    }
}

impl Key for CapabilityBls12381 {
    fn scalar_size(&self) -> usize { 32 }
    fn public_key_size(&self) -> usize { 48 }
    fn signature_size(&self) -> usize { 96 }
    fn address_prefix(&self) -> &'static [u8] { &[6, 161, 166] }
    fn public_key_prefix(&self) -> &'static [u8] { &[6, 149, 135, 204] }
    fn private_key_prefix(&self) -> &'static [u8] { &[3, 150, 192, 40] }
    fn signature_prefix(&self) -> &'static [u8] { &[40, 171, 64, 207] }
}

impl Sign for CapabilityBls12381 {
    fn sign(&self, _private_key: &[u8], _message: &[u8]) -> Result<Signature> {
        Self::unsupported("sign")
    }
}

impl Verify for CapabilityBls12381 {
    fn verify(&self, _public_key: &[u8], _message: &[u8], _signature: &[u8]) -> Result<bool> {
        Self::unsupported("verify")
    }
}

impl Derive for CapabilityBls12381 {
    fn validate_private_key(&self, _bytes: &[u8]) -> Result<()> {
        Self::unsupported("import private key")
    }

    fn validate_public_key(&self, _bytes: &[u8]) -> Result<()> {
        Self::unsupported("import public key")
    }

    fn derive_private_key(&self, _seed: &[u8]) -> Result<Vec<u8>> {
        Self::unsupported("derive private key")
    }

    fn derive_public_key(&self, _private_key: &[u8]) -> Result<Vec<u8>> {
        Self::unsupported("derive public key")
    }
}
