//! Deterministic ECDSA nonces (RFC 6979, section 3.2) over any keyed hash.

use num_bigint::BigUint;
use zeroize::Zeroize;

use crate::{keyed_hash::KeyedHash, utils};

/// HMAC-DRBG instantiated from a private scalar and a message digest.
///
/// Each call to [`NonceGenerator::next_nonce`] yields the next candidate in
/// `[1, n)`. Callers draw again when the candidate yields `r = 0` or `s = 0`.
pub(crate) struct NonceGenerator<H: KeyedHash> {
    prf: H,
    v: Vec<u8>,
    order: BigUint,
    qlen: u64,
    rlen: usize,
    drawn: bool,
}

impl<H: KeyedHash> NonceGenerator<H> {
    pub(crate) fn new(secret: &[u8], digest: &[u8], order: &BigUint) -> Self {
        let qlen = order.bits();
        let rlen = ((qlen + 7) / 8) as usize;
        let hlen = H::output_size();

        let mut x = utils::to_fixed_be(&BigUint::from_bytes_be(secret), rlen);
        let mut h1 = utils::to_fixed_be(&(utils::bits_to_int(digest, qlen) % order), rlen);

        let mut v = vec![0x01; hlen];
        let prf = H::new(&vec![0x00; hlen]);

        let prf = H::new(&prf.mac(&[&v[..], &[0x00u8][..], &x[..], &h1[..]]));
        prf.compute_in_place(&mut v);
        let prf = H::new(&prf.mac(&[&v[..], &[0x01u8][..], &x[..], &h1[..]]));
        prf.compute_in_place(&mut v);

        x.zeroize();
        h1.zeroize();

        Self {
            prf,
            v,
            order: order.clone(),
            qlen,
            rlen,
            drawn: false,
        }
    }

    /// Next nonce candidate as a big-endian scalar of the order's byte width.
    pub(crate) fn next_nonce(&mut self) -> Vec<u8> {
        loop {
            if self.drawn {
                self.prf = H::new(&self.prf.mac(&[&self.v[..], &[0x00u8][..]]));
                self.prf.compute_in_place(&mut self.v);
            }
            self.drawn = true;

            let mut t = Vec::with_capacity(self.rlen + self.v.len());
            while t.len() < self.rlen {
                self.prf.compute_in_place(&mut self.v);
                t.extend_from_slice(&self.v);
            }

            let k = utils::bits_to_int(&t, self.qlen);
            t.zeroize();

            if k.bits() > 0 && k < self.order {
                return utils::to_fixed_be(&k, self.rlen);
            }
        }
    }
}

impl<H: KeyedHash> Drop for NonceGenerator<H> {
    fn drop(&mut self) {
        self.v.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyed_hash::HmacSha256;

    fn order(hex: &str) -> BigUint {
        BigUint::parse_bytes(hex.as_bytes(), 16).unwrap()
    }

    fn sha256(data: &[u8]) -> Vec<u8> {
        use sha2::{Digest, Sha256};
        Sha256::digest(data).to_vec()
    }

    #[test]
    fn p256_sha256_sample() {
        // RFC 6979, appendix A.2.5
        let n = order("FFFFFFFF00000000FFFFFFFFFFFFFFFFBCE6FAADA7179E84F3B9CAC2FC632551");
        let x = hex::decode("C9AFA9D845BA75166B5C215767B1D6934E50C3DB36E89B127B8A622B120F6721")
            .unwrap();

        let mut nonces = NonceGenerator::<HmacSha256>::new(&x, &sha256(b"sample"), &n);
        assert_eq!(
            hex::encode_upper(nonces.next_nonce()),
            "A6E3C57DD01ABE90086538398355DD4C3B17AA873382B0F24D6129493D8AAD60"
        );
    }

    #[test]
    fn secp256k1_sha256_satoshi() {
        let n = order("FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141");
        let mut x = [0u8; 32];
        x[31] = 1;

        let mut nonces = NonceGenerator::<HmacSha256>::new(&x, &sha256(b"Satoshi Nakamoto"), &n);
        assert_eq!(
            hex::encode_upper(nonces.next_nonce()),
            "8F8A276C19F4149656B280621E358CCE24F5F52542772691EE69063B74F15D15"
        );
    }

    #[test]
    fn successive_candidates_differ_and_stay_in_range() {
        let n = order("FFFFFFFF00000000FFFFFFFFFFFFFFFFBCE6FAADA7179E84F3B9CAC2FC632551");
        let mut nonces = NonceGenerator::<HmacSha256>::new(&[7u8; 32], &sha256(b""), &n);

        let first = nonces.next_nonce();
        let second = nonces.next_nonce();
        assert_ne!(first, second);
        for k in [first, second] {
            assert_eq!(k.len(), 32);
            assert!(BigUint::from_bytes_be(&k) < n);
        }
    }
}
