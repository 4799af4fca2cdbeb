use blake2::{
    digest::consts::{U20, U32},
    Blake2b, Digest,
};
use num_bigint::BigUint;

pub(super) fn blake2b_256(data: &[u8]) -> [u8; 32] {
    Blake2b::<U32>::digest(data).into()
}

pub(super) fn blake2b_160(data: &[u8]) -> [u8; 20] {
    Blake2b::<U20>::digest(data).into()
}

/// Big-endian encoding left-padded to `size` bytes. `value` must fit.
pub(super) fn to_fixed_be(value: &BigUint, size: usize) -> Vec<u8> {
    let bytes = value.to_bytes_be();
    let mut out = vec![0u8; size];
    out[size - bytes.len()..].copy_from_slice(&bytes);
    out
}

/// Leftmost `qlen` bits of `bytes` as an unsigned integer.
pub(super) fn bits_to_int(bytes: &[u8], qlen: u64) -> BigUint {
    let value = BigUint::from_bytes_be(bytes);
    let blen = bytes.len() as u64 * 8;
    if blen > qlen {
        value >> (blen - qlen)
    } else {
        value
    }
}
