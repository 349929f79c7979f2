//! Open-file descriptors and the growable descriptor slot table.

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::FD_TABLE_FLOOR;
use crate::file::File;

/// An open reference to a file: a shared handle on the storage plus an
/// independent read/write cursor. Descriptors share data, not position.
pub(crate) struct FileDesc {
    pub file: Rc<RefCell<File>>,
    pub readable: bool,
    pub writeable: bool,
    /// Zero-based index of the cursor's block within the chain.
    pub block_id: usize,
    /// Byte offset inside that block.
    pub block_pos: usize,
}

impl FileDesc {
    pub fn new(file: Rc<RefCell<File>>, readable: bool, writeable: bool) -> Self {
        Self {
            file,
            readable,
            writeable,
            block_id: 0,
            block_pos: 0,
        }
    }

    /// Re-clamps the cursor against the file's current chain. Applied
    /// lazily before every read and write so a descriptor tolerates
    /// out-of-band shrinkage through another handle.
    pub fn clamp(&mut self, file: &File) {
        if file.blocks.is_empty() {
            self.block_id = 0;
            self.block_pos = 0;
            return;
        }
        if self.block_id >= file.blocks.len() {
            self.block_id = file.blocks.len() - 1;
        }
        let occupied = file.blocks[self.block_id].occupied;
        if self.block_pos > occupied {
            self.block_pos = occupied;
        }
    }
}

/// Slot array mapping small integer handles to open descriptors. A
/// closed slot is nulled and reused by the lowest-numbered free slot on
/// the next open; capacity doubles from the floor and never shrinks.
#[derive(Default)]
pub(crate) struct FdTable {
    slots: Vec<Option<FileDesc>>,
}

impl FdTable {
    /// Places `desc` in the lowest free slot and returns its index.
    pub fn acquire(&mut self, desc: FileDesc) -> usize {
        let slot = match self.slots.iter().position(Option::is_none) {
            Some(i) => i,
            None => {
                let grown = FD_TABLE_FLOOR.max(self.slots.len() * 2);
                let first_new = self.slots.len();
                self.slots.resize_with(grown, || None);
                first_new
            }
        };
        self.slots[slot] = Some(desc);
        slot
    }

    pub fn get_mut(&mut self, fd: usize) -> Option<&mut FileDesc> {
        self.slots.get_mut(fd).and_then(Option::as_mut)
    }

    /// Frees the slot, returning the descriptor that occupied it.
    pub fn release(&mut self, fd: usize) -> Option<FileDesc> {
        self.slots.get_mut(fd).and_then(Option::take)
    }

    /// Takes every live descriptor out of the table.
    pub fn drain(&mut self) -> impl Iterator<Item = FileDesc> + '_ {
        self.slots.drain(..).flatten()
    }
}
