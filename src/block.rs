//! Fixed-size storage units backing file data.

use crate::config::BLOCK_SIZE;

/// A fixed-capacity unit of file storage, owned exclusively by one file.
/// Only the last block of a chain may be partially occupied; bytes past
/// `occupied` are always zero.
pub(crate) struct Block {
    data: Box<[u8; BLOCK_SIZE]>,
    /// How many bytes are occupied.
    pub occupied: usize,
}

impl Block {
    pub fn new() -> Self {
        Self {
            data: Box::new([0; BLOCK_SIZE]),
            occupied: 0,
        }
    }

    /// Copies as much of `buf` as fits starting at `pos` and returns the
    /// number of bytes copied. Never shrinks `occupied`, so overwriting
    /// earlier data cannot truncate the block.
    pub fn write_at(&mut self, pos: usize, buf: &[u8]) -> usize {
        let n = (BLOCK_SIZE - pos).min(buf.len());
        self.data[pos..pos + n].copy_from_slice(&buf[..n]);
        self.occupied = self.occupied.max(pos + n);
        n
    }

    /// Copies up to `buf.len()` occupied bytes starting at `pos`.
    /// Returns the number of bytes copied, which is 0 at end of block.
    pub fn read_at(&self, pos: usize, buf: &mut [u8]) -> usize {
        let n = self.occupied.saturating_sub(pos).min(buf.len());
        buf[..n].copy_from_slice(&self.data[pos..pos + n]);
        n
    }

    /// Zeroes everything past `occupied` so that growing the block again
    /// exposes zeros rather than stale contents.
    pub fn scrub_tail(&mut self) {
        self.data[self.occupied..].fill(0);
    }
}
