//! Named files and their block chains.

use log::trace;

use crate::block::Block;
use crate::config::*;
use crate::error::{FsError, Result};

pub(crate) struct File {
    pub name: String,
    /// Ordered block chain. Growing and truncating happen at the tail
    /// only, which keeps both O(1).
    pub blocks: Vec<Block>,
    /// Tombstone: the file was unlinked from the namespace but stays
    /// alive while descriptors still reference it.
    pub deleted: bool,
}

impl File {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            blocks: Vec::new(),
            deleted: false,
        }
    }

    /// Appends one zeroed block to the chain. Fails with `NoMem` when the
    /// chain is already at the per-file cap; the chain is left unmodified
    /// on failure.
    pub fn allocate_block(&mut self) -> Result<()> {
        if self.blocks.len() >= MAX_BLOCKS {
            return Err(FsError::NoMem);
        }
        self.blocks.push(Block::new());
        trace!("file '{}': grew to {} blocks", self.name, self.blocks.len());
        Ok(())
    }

    /// Releases up to `n` blocks from the tail.
    pub fn truncate_blocks(&mut self, n: usize) {
        let keep = self.blocks.len().saturating_sub(n);
        self.blocks.truncate(keep);
    }

    /// Logical size: every non-last block is exactly full, the tail may
    /// not be.
    pub fn size(&self) -> usize {
        match self.blocks.split_last() {
            Some((last, rest)) => rest.len() * BLOCK_SIZE + last.occupied,
            None => 0,
        }
    }
}
