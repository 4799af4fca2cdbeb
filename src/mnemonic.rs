//! BIP-39 mnemonic seeds.
//!
//! Phrases are checked against the English word list and checksum by the
//! `bip39` crate; the seed itself comes out of the streaming [`Pbkdf2`]
//! engine. Phrase and passphrase are expected in NFKD form, which plain
//! ASCII always is.

use bip39::Mnemonic;
use tracing::debug;
use zeroize::Zeroizing;

use crate::{
    config::{BIP39_ITERATIONS, BIP39_SEED_LEN},
    error::{Error, Result},
    keyed_hash::HmacSha512,
    pbkdf2::Pbkdf2,
};

/// Derive the 64-byte BIP-39 seed of `phrase`.
///
/// Runs of whitespace between words are collapsed before validation.
///
/// # Errors
///
/// [`Error::InvalidMnemonic`] when a word is unknown, the word count is
/// wrong or the checksum does not match.
pub fn seed_from_phrase(phrase: &str, passphrase: &str) -> Result<Zeroizing<[u8; BIP39_SEED_LEN]>> {
    let mnemonic = parse(phrase)?;
    debug!(words = mnemonic.word_count(), "deriving mnemonic seed");

    let password = Zeroizing::new(mnemonic.to_string());
    let salt = Zeroizing::new(format!("mnemonic{passphrase}"));
    let mut stream =
        Pbkdf2::<HmacSha512>::new(password.as_bytes(), salt.as_bytes(), BIP39_ITERATIONS)?;

    let mut seed = Zeroizing::new([0u8; BIP39_SEED_LEN]);
    let available = stream.read(&mut seed[..]);
    if available < BIP39_SEED_LEN {
        return Err(Error::InsufficientDerivedBytes {
            requested: BIP39_SEED_LEN,
            available,
        });
    }

    Ok(seed)
}

/// Whether `phrase` is a valid English BIP-39 mnemonic
pub fn is_valid(phrase: &str) -> bool {
    parse(phrase).is_ok()
}

fn parse(phrase: &str) -> Result<Mnemonic> {
    let words = Zeroizing::new(phrase.split_whitespace().collect::<Vec<_>>().join(" "));
    Mnemonic::parse_normalized(&words).map_err(|e| Error::InvalidMnemonic(e.to_string()))
}
