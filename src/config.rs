//! Parameters for password-based derivation.

/// Iteration count of BIP-39 seed derivation
pub const BIP39_ITERATIONS: u32 = 2048;

/// Length of a BIP-39 seed in bytes
pub const BIP39_SEED_LEN: usize = 64;

/// Iteration count and output length of a PBKDF2 derivation.
///
/// With the `serde` feature enabled the struct can be embedded in a host
/// application's configuration; missing fields fall back to the BIP-39
/// defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DerivationParams {
    /// Number of PRF iterations per block
    pub iterations: u32,
    /// Number of bytes to derive
    pub length: usize,
}

impl DerivationParams {
    /// Custom parameters
    pub const fn new(iterations: u32, length: usize) -> Self {
        Self { iterations, length }
    }

    /// 2048 iterations, 64 bytes
    pub const fn bip39() -> Self {
        Self::new(BIP39_ITERATIONS, BIP39_SEED_LEN)
    }
}

impl Default for DerivationParams {
    fn default() -> Self {
        Self::bip39()
    }
}
