//! PBKDF2 (RFC 8018) as a seekable, lazily computed byte stream.
//!
//! The derived key is treated as a sequence of `hLen`-byte blocks. Only the
//! block under the cursor is ever computed and it is cached until the cursor
//! leaves it, so callers can pull exactly as many bytes as they need and come
//! back for more later. The output is the same however reads are split.
//!
//! ```
//! use std::io::SeekFrom;
//! use tezos_keys::{keyed_hash::HmacSha256, pbkdf2::Pbkdf2};
//!
//! # fn main() -> Result<(), tezos_keys::error::Error> {
//! let mut stream = Pbkdf2::<HmacSha256>::new(b"password", b"salt", 1)?;
//!
//! stream.seek(SeekFrom::Start(16))?;
//! let tail = stream.read_bytes(16)?;
//! let whole = Pbkdf2::<HmacSha256>::derive(b"password", b"salt", 1, 32)?;
//!
//! assert_eq!(&whole[16..], &tail[..]);
//! # Ok(())
//! # }
//! ```

use std::{
    fmt,
    io::{self, SeekFrom},
};

use tracing::{debug, trace};
use zeroize::Zeroize;

use crate::{
    error::{Error, Result},
    keyed_hash::{HmacSha512, KeyedHash},
};

/// Width of the big-endian block counter appended to the salt
const COUNTER_LEN: usize = 4;

/// Derived key stream over the PRF `H`.
///
/// A stream belongs to one derivation request. Reads and seeks take
/// `&mut self`, so an instance cannot be shared between concurrent callers.
pub struct Pbkdf2<H: KeyedHash = HmacSha512> {
    prf: H,
    /// Caller salt followed by the block counter
    salt: Vec<u8>,
    iterations: u32,
    /// Bytes of the active block
    block: Vec<u8>,
    /// Running `U` value while a block is computed
    scratch: Vec<u8>,
    block_start: u64,
    block_end: u64,
    position: u64,
}

impl<H: KeyedHash> Pbkdf2<H> {
    /// Open a stream for `password` and `salt`.
    ///
    /// The salt is copied; the caller's buffer is never touched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIterations`] when `iterations` is zero.
    pub fn new(password: &[u8], salt: &[u8], iterations: u32) -> Result<Self> {
        if iterations == 0 {
            return Err(Error::InvalidIterations);
        }

        let block_size = H::output_size();
        let mut salt_buffer = Vec::with_capacity(salt.len() + COUNTER_LEN);
        salt_buffer.extend_from_slice(salt);
        salt_buffer.extend_from_slice(&[0; COUNTER_LEN]);

        debug!(
            iterations,
            salt_len = salt.len(),
            block_size,
            "opened pbkdf2 stream"
        );

        Ok(Self {
            prf: H::new(password),
            salt: salt_buffer,
            iterations,
            block: vec![0; block_size],
            scratch: vec![0; block_size],
            block_start: 0,
            block_end: 0,
            position: 0,
        })
    }

    /// Derive `length` bytes in one go.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidIterations`] for a zero iteration count and
    /// [`Error::InsufficientDerivedBytes`] when `length` exceeds
    /// [`Pbkdf2::max_len`].
    pub fn derive(password: &[u8], salt: &[u8], iterations: u32, length: usize) -> Result<Vec<u8>> {
        Self::new(password, salt, iterations)?.read_bytes(length)
    }

    /// Size of one block, the PRF output size
    pub fn block_size(&self) -> usize {
        self.block.len()
    }

    /// Iteration count
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Number of bytes the stream can produce: one block per value of the
    /// 4-byte counter, which starts at 1.
    pub fn max_len(&self) -> u64 {
        self.block.len() as u64 * u64::from(u32::MAX)
    }

    /// Current cursor
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Bytes left between the cursor and [`Pbkdf2::max_len`]
    pub fn remaining(&self) -> u64 {
        self.max_len().saturating_sub(self.position)
    }

    /// Fill `buf` from the cursor onwards and return the number of bytes read.
    ///
    /// The count is short only when the cursor reaches [`Pbkdf2::max_len`].
    /// An empty `buf` leaves the cursor where it is.
    pub fn read(&mut self, buf: &mut [u8]) -> usize {
        let block_size = self.block.len() as u64;
        let mut filled = 0;

        while filled < buf.len() {
            if self.position < self.block_start || self.position >= self.block_end {
                if self.position >= self.max_len() {
                    break;
                }

                let index = self.position / block_size;
                // index < u32::MAX since position < max_len
                self.compute_block(index as u32 + 1);
                self.block_start = index * block_size;
                self.block_end = self.block_start + block_size;
            }

            let offset = (self.position - self.block_start) as usize;
            let count = (self.block.len() - offset).min(buf.len() - filled);
            buf[filled..filled + count].copy_from_slice(&self.block[offset..offset + count]);

            filled += count;
            self.position += count as u64;
        }

        filled
    }

    /// Read exactly `count` bytes.
    ///
    /// # Errors
    ///
    /// [`Error::InsufficientDerivedBytes`] when fewer than `count` bytes are
    /// [`remaining`](Pbkdf2::remaining). Nothing is computed or allocated and
    /// the cursor stays put.
    pub fn read_bytes(&mut self, count: usize) -> Result<Vec<u8>> {
        let remaining = self.remaining();
        if count as u64 > remaining {
            return Err(Error::InsufficientDerivedBytes {
                requested: count,
                available: usize::try_from(remaining).unwrap_or(usize::MAX),
            });
        }

        let mut out = vec![0; count];
        let filled = self.read(&mut out);
        debug_assert_eq!(filled, count);
        Ok(out)
    }

    /// Move the cursor. Nothing is computed until the next read and the
    /// target is not checked against [`Pbkdf2::max_len`].
    ///
    /// # Errors
    ///
    /// [`Error::SeekOutOfRange`] when the target lies before the start.
    pub fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        let target = match pos {
            SeekFrom::Start(offset) => i128::from(offset),
            SeekFrom::Current(offset) => i128::from(self.position) + i128::from(offset),
            SeekFrom::End(offset) => i128::from(self.max_len()) + i128::from(offset),
        };

        self.position = u64::try_from(target).map_err(|_| Error::SeekOutOfRange)?;
        Ok(self.position)
    }

    /// The stream is read-only.
    ///
    /// # Errors
    ///
    /// Always [`Error::UnsupportedOperation`].
    pub fn write(&mut self, _buf: &[u8]) -> Result<usize> {
        Err(Error::UnsupportedOperation("write to a derived key stream"))
    }

    /// The stream length is fixed by the PRF.
    ///
    /// # Errors
    ///
    /// Always [`Error::UnsupportedOperation`].
    pub fn truncate(&mut self, _len: u64) -> Result<()> {
        Err(Error::UnsupportedOperation("truncate a derived key stream"))
    }

    fn compute_block(&mut self, counter: u32) {
        trace!(counter, "computing pbkdf2 block");

        let counter_at = self.salt.len() - COUNTER_LEN;
        self.salt[counter_at..].copy_from_slice(&counter.to_be_bytes());

        self.prf.compute(&[self.salt.as_slice()], &mut self.scratch);
        self.block.copy_from_slice(&self.scratch);

        for _ in 1..self.iterations {
            self.prf.compute_in_place(&mut self.scratch);
            for (acc, u) in self.block.iter_mut().zip(&self.scratch) {
                *acc ^= u;
            }
        }

        self.scratch.as_mut_slice().zeroize();
    }
}

impl<H: KeyedHash> Drop for Pbkdf2<H> {
    fn drop(&mut self) {
        self.block.zeroize();
        self.scratch.zeroize();
    }
}

impl<H: KeyedHash> fmt::Debug for Pbkdf2<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pbkdf2")
            .field("block_size", &self.block.len())
            .field("iterations", &self.iterations)
            .field("position", &self.position)
            .finish_non_exhaustive()
    }
}

impl<H: KeyedHash> io::Read for Pbkdf2<H> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(Pbkdf2::read(self, buf))
    }
}

impl<H: KeyedHash> io::Seek for Pbkdf2<H> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        Pbkdf2::seek(self, pos).map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))
    }
}

impl<H: KeyedHash> io::Write for Pbkdf2<H> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Pbkdf2::write(self, buf).map_err(|e| io::Error::new(io::ErrorKind::Unsupported, e))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
