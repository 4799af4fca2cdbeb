//! Curve-agnostic keys for Tezos clients
//!
//! Deterministic signatures over Ed25519, secp256k1 and NIST P-256, the
//! base58 prefixes each curve uses, and a seekable PBKDF2 stream that turns
//! passwords and mnemonics into seed material.
//!
//! Every message is hashed with Blake2b-256 before signing. The ECDSA curves
//! draw their nonce from an RFC 6979 generator keyed with HMAC-Blake2b-256,
//! so signing the same message twice gives the same bytes.
//!
//! # Examples
//!
//! ## Sign and verify
//!
//! ```
//! # use std::error::Error;
//! # fn main() -> Result<(), Box<dyn Error>> {
//! #
//! use tezos_keys::{Curve, Key};
//!
//! let key = Key::from_seed(&[7u8; 32], Curve::Secp256k1)?;
//! let signature = key.sign(b"payload")?;
//!
//! assert_eq!(signature.len(), 64);
//! assert!(key.verify(b"payload", &signature)?);
//! assert!(!key.verify(b"tampered", &signature)?);
//! #
//! # Ok(())
//! # }
//! ```
//!
//! ## Keys from a mnemonic
//!
//! ```
//! # use std::error::Error;
//! # fn main() -> Result<(), Box<dyn Error>> {
//! #
//! use tezos_keys::{Curve, Key};
//!
//! let phrase = "abandon abandon abandon abandon abandon abandon \
//!               abandon abandon abandon abandon abandon about";
//! let key = Key::from_mnemonic(phrase, "", Curve::Ed25519)?;
//!
//! assert_eq!(key.public_key()?.as_bytes().len(), 32);
//! assert_eq!(Curve::Ed25519.public_key_prefix(), &[13, 15, 37, 217]);
//! #
//! # Ok(())
//! # }
//! ```

#![deny(
    warnings,
    clippy::all,
    missing_debug_implementations,
    missing_copy_implementations,
    missing_docs,
    rustdoc::missing_crate_level_docs,
    non_ascii_idents,
    unreachable_pub
)]
#![doc(test(attr(deny(warnings))))]

use std::{fmt, str::FromStr};

use getrandom::getrandom;
use once_cell::sync::OnceCell;
use subtle::ConstantTimeEq;
use tracing::debug;
use zeroize::{Zeroize, Zeroizing};

mod utils;

mod algorithm;
use algorithm as alg;

pub mod config;
pub mod error;
pub mod keyed_hash;
pub mod mnemonic;
pub mod pbkdf2;

mod signature;
pub use signature::Signature;

use config::DerivationParams;
use error::{Error, Result};
use keyed_hash::{HmacSha512, KeyedHash};
use pbkdf2::Pbkdf2;

use Curve::*;

/// Elliptic curves a key can live on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Curve {
    /// Ed25519 (`tz1`)
    Ed25519,
    /// secp256k1 (`tz2`)
    Secp256k1,
    /// NIST P-256 (`tz3`)
    NistP256,
    /// BLS12-381 (`tz4`), prefixes only
    Bls12_381,
}

impl Curve {
    /// Every curve, in address order
    pub const ALL: [Curve; 4] = [Ed25519, Secp256k1, NistP256, Bls12_381];

    /// Name used by [`fmt::Display`] and [`FromStr`]
    pub fn name(&self) -> &'static str {
        match self {
            Ed25519 => "ed25519",
            Secp256k1 => "secp256k1",
            NistP256 => "p256",
            Bls12_381 => "bls12_381",
        }
    }

    /// Length of a raw private key
    pub fn scalar_size(&self) -> usize {
        self.method().scalar_size()
    }

    /// Length of an encoded public key
    pub fn public_key_size(&self) -> usize {
        self.method().public_key_size()
    }

    /// Length of a raw signature
    pub fn signature_size(&self) -> usize {
        self.method().signature_size()
    }

    /// Base58 prefix of addresses (public key hashes)
    pub fn address_prefix(&self) -> &'static [u8] {
        self.method().address_prefix()
    }

    /// Base58 prefix of public keys
    pub fn public_key_prefix(&self) -> &'static [u8] {
        self.method().public_key_prefix()
    }

    /// Base58 prefix of private keys
    pub fn private_key_prefix(&self) -> &'static [u8] {
        self.method().private_key_prefix()
    }

    /// Base58 prefix of signatures
    pub fn signature_prefix(&self) -> &'static [u8] {
        self.method().signature_prefix()
    }

    /// Verify `signature` over `message` against raw public key bytes.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidEncoding`] when the public key or signature is
    /// malformed, [`Error::UnsupportedCurveOperation`] for BLS12-381.
    pub fn verify(&self, public_key: &[u8], message: &[u8], signature: &[u8]) -> Result<bool> {
        let valid = self.method().verify(public_key, message, signature)?;
        debug!(curve = %self, valid, "verified signature");
        Ok(valid)
    }

    fn method(&self) -> &'static dyn alg::Capability {
        match self {
            Ed25519 => &alg::ed25519::CapabilityEd25519,
            Secp256k1 => &alg::secp256k1::CapabilitySecP256K1,
            NistP256 => &alg::nistp256::CapabilityNistP256,
            Bls12_381 => &alg::bls12_381::CapabilityBls12381,
        }
    }
}

impl fmt::Display for Curve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Curve {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Curve::ALL
            .into_iter()
            .find(|curve| curve.name() == s)
            .ok_or(Error::InvalidEncoding("unknown curve name"))
    }
}

/// A private key that can be used to sign messages.
///
/// The bytes are not wiped on drop; call [`Zeroize::zeroize`] when the key
/// is no longer needed.
#[derive(Clone, Zeroize)]
pub struct PrivateKey {
    bytes: Vec<u8>,
    #[zeroize(skip)]
    curve: Curve,
}

impl PrivateKey {
    /// Import raw private key bytes.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidKeyMaterial`] for a wrong length, or for the ECDSA
    /// curves a scalar equal to zero or not below the group order.
    pub fn from_slice<S: AsRef<[u8]>>(bytes: S, curve: Curve) -> Result<Self> {
        let bytes = bytes.as_ref();
        curve.method().validate_private_key(bytes)?;

        Ok(Self {
            bytes: bytes.to_vec(),
            curve,
        })
    }

    /// Map seed material to a private key.
    ///
    /// Uses the first [`Curve::scalar_size`] bytes of `seed`; the ECDSA
    /// curves reduce them modulo the group order.
    pub fn from_seed<S: AsRef<[u8]>>(seed: S, curve: Curve) -> Result<Self> {
        let bytes = curve.method().derive_private_key(seed.as_ref())?;
        Ok(Self { bytes, curve })
    }

    /// Curve of this key
    pub fn curve(&self) -> Curve {
        self.curve
    }

    /// Raw scalar bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Sign `message` deterministically
    pub fn sign(&self, message: &impl AsRef<[u8]>) -> Result<Signature> {
        let message = message.as_ref();
        debug!(curve = %self.curve, message_len = message.len(), "signing");
        self.curve.method().sign(&self.bytes, message)
    }

    /// Compute the matching public key
    pub fn public_key(&self) -> Result<PublicKey> {
        let bytes = self.curve.method().derive_public_key(&self.bytes)?;
        Ok(PublicKey {
            bytes,
            curve: self.curve,
        })
    }
}

impl PartialEq for PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.curve == other.curve && bool::from(self.bytes.as_slice().ct_eq(other.bytes.as_slice()))
    }
}

impl Eq for PrivateKey {}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("curve", &self.curve)
            .finish_non_exhaustive()
    }
}

/// A public key that can be used to verify signatures
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PublicKey {
    bytes: Vec<u8>,
    curve: Curve,
}

impl PublicKey {
    /// Import an encoded public key: 32 bytes for Ed25519, a 33-byte
    /// compressed point for secp256k1 and P-256.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidEncoding`] when the bytes are not a point on `curve`.
    pub fn from_slice<S: AsRef<[u8]>>(bytes: S, curve: Curve) -> Result<Self> {
        let bytes = bytes.as_ref();
        curve.method().validate_public_key(bytes)?;

        Ok(Self {
            bytes: bytes.to_vec(),
            curve,
        })
    }

    /// Curve of this key
    pub fn curve(&self) -> Curve {
        self.curve
    }

    /// Encoded point
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Blake2b-160 of the encoded point, the payload of an address
    pub fn hash(&self) -> [u8; 20] {
        utils::blake2b_160(&self.bytes)
    }

    /// Verify a signature
    pub fn verify(&self, message: &impl AsRef<[u8]>, signature: &impl AsRef<[u8]>) -> Result<bool> {
        self.curve
            .verify(&self.bytes, message.as_ref(), signature.as_ref())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublicKey")
            .field("hex", &self.to_string())
            .field("curve", &self.curve)
            .finish()
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode_upper(&self.bytes))
    }
}

impl AsRef<[u8]> for PublicKey {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

/// Key material: a private key bound to its curve, with the public key
/// computed on first use.
#[derive(Debug)]
pub struct Key {
    private_key: PrivateKey,
    public_key: OnceCell<PublicKey>,
}

impl Key {
    /// Import raw private key bytes
    pub fn from_bytes<S: AsRef<[u8]>>(bytes: S, curve: Curve) -> Result<Self> {
        let key = Self::new(PrivateKey::from_slice(bytes, curve)?);
        debug!(curve = %curve, "imported key");
        Ok(key)
    }

    /// Build a key from seed material
    pub fn from_seed<S: AsRef<[u8]>>(seed: S, curve: Curve) -> Result<Self> {
        let key = Self::new(PrivateKey::from_seed(seed, curve)?);
        debug!(curve = %curve, "derived key from seed");
        Ok(key)
    }

    /// Read [`Curve::scalar_size`] bytes of seed from a derivation stream.
    ///
    /// # Errors
    ///
    /// [`Error::InsufficientDerivedBytes`] when the stream runs out.
    pub fn from_stream<H: KeyedHash>(stream: &mut Pbkdf2<H>, curve: Curve) -> Result<Self> {
        let seed = Zeroizing::new(stream.read_bytes(curve.scalar_size())?);
        Self::from_seed(&*seed, curve)
    }

    /// Stretch a password with PBKDF2-HMAC-SHA512 and build a key from the
    /// derived bytes.
    ///
    /// `params.length` is checked against the stream but only the first
    /// [`Curve::scalar_size`] bytes are computed; a longer derivation would
    /// start with the same bytes.
    ///
    /// # Errors
    ///
    /// [`Error::InsufficientDerivedBytes`] when `params.length` exceeds
    /// [`Pbkdf2::max_len`] and [`Error::InvalidKeyMaterial`] when it is
    /// shorter than a private key.
    pub fn from_password(
        password: &[u8],
        salt: &[u8],
        params: DerivationParams,
        curve: Curve,
    ) -> Result<Self> {
        let mut stream = Pbkdf2::<HmacSha512>::new(password, salt, params.iterations)?;

        let remaining = stream.remaining();
        if params.length as u64 > remaining {
            return Err(Error::InsufficientDerivedBytes {
                requested: params.length,
                available: usize::try_from(remaining).unwrap_or(usize::MAX),
            });
        }
        if params.length < curve.scalar_size() {
            return Err(Error::InvalidKeyMaterial("seed shorter than private key"));
        }

        Self::from_stream(&mut stream, curve)
    }

    /// Build a key from the BIP-39 seed of a mnemonic phrase
    pub fn from_mnemonic(phrase: &str, passphrase: &str, curve: Curve) -> Result<Self> {
        let seed = mnemonic::seed_from_phrase(phrase, passphrase)?;
        Self::from_seed(&seed[..], curve)
    }

    /// Generate a key from operating system entropy
    pub fn random(curve: Curve) -> Result<Self> {
        loop {
            let mut seed = Zeroizing::new(vec![0u8; curve.scalar_size()]);
            getrandom(&mut seed).expect("unspecified random generator error");

            match Self::from_seed(&*seed, curve) {
                Err(Error::InvalidKeyMaterial(_)) => continue,
                result => return result,
            }
        }
    }

    /// Curve of this key
    pub fn curve(&self) -> Curve {
        self.private_key.curve
    }

    /// Private half
    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }

    /// Public half, computed once
    pub fn public_key(&self) -> Result<&PublicKey> {
        self.public_key
            .get_or_try_init(|| self.private_key.public_key())
    }

    /// Sign `message` deterministically
    pub fn sign(&self, message: &impl AsRef<[u8]>) -> Result<Signature> {
        self.private_key.sign(message)
    }

    /// Verify a signature against this key's public half
    pub fn verify(&self, message: &impl AsRef<[u8]>, signature: &impl AsRef<[u8]>) -> Result<bool> {
        self.public_key()?.verify(message, signature)
    }

    fn new(private_key: PrivateKey) -> Self {
        Self {
            private_key,
            public_key: OnceCell::new(),
        }
    }
}

impl From<PrivateKey> for Key {
    fn from(private_key: PrivateKey) -> Self {
        Self::new(private_key)
    }
}
