//! Keyed-hash primitive shared by nonce generation and PBKDF2.
//!
//! [`Hmac`] adapts any block digest from the RustCrypto family; the aliases
//! cover the digests this crate needs.

use std::fmt;

use blake2::{digest::consts::U32, Blake2b};
use hmac::{
    digest::{core_api::BlockSizeUser, Digest, KeyInit},
    Mac, SimpleHmac,
};
use sha2::{Sha256, Sha512};

/// A keyed pseudorandom function.
///
/// An instance is bound to its key at construction, so one instance can be
/// reused for every computation under that key.
pub trait KeyedHash: Clone {
    /// Size of one output in bytes.
    fn output_size() -> usize;

    /// Key a new instance.
    fn new(key: &[u8]) -> Self;

    /// MAC over the concatenation of `parts`, written to `out`.
    ///
    /// `out` must be exactly [`KeyedHash::output_size`] bytes long.
    fn compute(&self, parts: &[&[u8]], out: &mut [u8]);

    /// Replace the contents of `buf` with the MAC of `buf`.
    fn compute_in_place(&self, buf: &mut [u8]) {
        let input = buf.to_vec();
        self.compute(&[&input[..]], buf);
    }

    /// MAC over the concatenation of `parts` as a new buffer.
    fn mac(&self, parts: &[&[u8]]) -> Vec<u8> {
        let mut out = vec![0u8; Self::output_size()];
        self.compute(parts, &mut out);
        out
    }
}

/// HMAC over the digest `D`.
#[derive(Clone)]
pub struct Hmac<D>
where
    D: Digest + BlockSizeUser + Clone,
{
    inner: SimpleHmac<D>,
}

/// HMAC-SHA-256
pub type HmacSha256 = Hmac<Sha256>;

/// HMAC-SHA-512, the PRF of BIP-39 seed derivation
pub type HmacSha512 = Hmac<Sha512>;

/// HMAC-Blake2b-256, the PRF of the deterministic signing nonce
pub type HmacBlake2b256 = Hmac<Blake2b<U32>>;

impl<D> KeyedHash for Hmac<D>
where
    D: Digest + BlockSizeUser + Clone,
{
    fn output_size() -> usize {
        <D as Digest>::output_size()
    }

    fn new(key: &[u8]) -> Self {
        let inner = <SimpleHmac<D> as KeyInit>::new_from_slice(key)
            .expect("HMAC accepts keys of any length");
        Self { inner }
    }

    fn compute(&self, parts: &[&[u8]], out: &mut [u8]) {
        let mut mac = self.inner.clone();
        for part in parts {
            Mac::update(&mut mac, part);
        }
        out.copy_from_slice(&mac.finalize().into_bytes());
    }

    fn compute_in_place(&self, buf: &mut [u8]) {
        let mut mac = self.inner.clone();
        Mac::update(&mut mac, buf);
        buf.copy_from_slice(&mac.finalize().into_bytes());
    }
}

impl<D> fmt::Debug for Hmac<D>
where
    D: Digest + BlockSizeUser + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hmac")
            .field("output_size", &Self::output_size())
            .finish_non_exhaustive()
    }
}
