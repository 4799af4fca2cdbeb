//! Raw `r || s` signatures.

use std::{fmt, str::FromStr};

use crate::error::{Error, Result};

/// Two fixed-width big-endian scalars, `r` then `s`, without a recovery id.
///
/// For Ed25519 the halves are the encoded point `R` and the scalar `S`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    bytes: Vec<u8>,
}

impl Signature {
    /// Concatenate two scalars of equal width.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidEncoding`] when the halves differ in length or are empty.
    pub fn from_parts(r: &[u8], s: &[u8]) -> Result<Self> {
        if r.is_empty() || r.len() != s.len() {
            return Err(Error::InvalidEncoding("signature halves differ in width"));
        }
        Ok(Self {
            bytes: [r, s].concat(),
        })
    }

    /// Wrap raw `r || s` bytes.
    ///
    /// Only the shape is checked here; the exact width is checked against
    /// the curve at verification.
    pub fn from_slice<S: AsRef<[u8]>>(bytes: S) -> Result<Self> {
        let bytes = bytes.as_ref();
        if bytes.is_empty() || bytes.len() % 2 != 0 {
            return Err(Error::InvalidEncoding("signature length must be even"));
        }
        Ok(Self {
            bytes: bytes.to_vec(),
        })
    }

    /// Raw `r || s`
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// First half
    pub fn r(&self) -> &[u8] {
        &self.bytes[..self.bytes.len() / 2]
    }

    /// Second half
    pub fn s(&self) -> &[u8] {
        &self.bytes[self.bytes.len() / 2..]
    }

    /// Total length in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always false for a constructed signature
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode_upper(&self.bytes))
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Signature").field(&self.to_string()).finish()
    }
}

impl AsRef<[u8]> for Signature {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl From<Signature> for Vec<u8> {
    fn from(signature: Signature) -> Self {
        signature.bytes
    }
}

impl FromStr for Signature {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let bytes = hex::decode(s).map_err(|_| Error::InvalidEncoding("signature is not hex"))?;
        Self::from_slice(bytes)
    }
}
