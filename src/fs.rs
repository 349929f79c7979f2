//! The storage engine: the file namespace, the descriptor table, and
//! the public open/read/write/resize/close/delete surface.

use std::cell::RefCell;
use std::rc::Rc;

use enumflags2::BitFlags;
use log::{debug, trace};

use crate::config::*;
use crate::error::{FsError, Result};
use crate::fd::{FdTable, FileDesc};
use crate::file::File;
use crate::flags::{OpenFlag, resolve_access};

/// Process-local in-memory file store. Single-threaded: all state lives
/// behind this context object, with no locks and no global singletons.
#[derive(Default)]
pub struct UserFs {
    /// Live namespace, scanned linearly on lookup. Deleted files are
    /// unlinked from here immediately and survive only through open
    /// descriptors.
    files: Vec<Rc<RefCell<File>>>,
    fds: FdTable,
    /// Cleared at the entry of every public call, set again on failure.
    last_error: Option<FsError>,
}

/// Records `err` as the engine's last error and returns it. A free
/// function over the field so it stays callable while a descriptor is
/// borrowed out of the table.
fn fail<T>(slot: &mut Option<FsError>, err: FsError) -> Result<T> {
    *slot = Some(err);
    Err(err)
}

impl UserFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Error kind of the most recent call: `None` right after a
    /// successful call, the failure kind after a failed one. A partial
    /// write reports `NoMem` here alongside its `Ok` byte count.
    pub fn last_error(&self) -> Option<FsError> {
        self.last_error
    }

    fn lookup(&self, name: &str) -> Option<Rc<RefCell<File>>> {
        self.files.iter().find(|f| f.borrow().name == name).cloned()
    }

    /// Opens `name`, creating it when `Create` is set and no live file
    /// of that name exists. Returns the descriptor handle: the lowest
    /// free slot in the table. The cursor starts at the head of the
    /// chain; capabilities are fixed for the descriptor's lifetime.
    pub fn open(&mut self, name: &str, flags: impl Into<BitFlags<OpenFlag>>) -> Result<usize> {
        self.last_error = None;
        let flags = flags.into();
        let (readable, writeable) = match resolve_access(flags) {
            Ok(caps) => caps,
            Err(e) => return fail(&mut self.last_error, e),
        };
        let file = match self.lookup(name) {
            Some(file) => file,
            None if flags.contains(OpenFlag::Create) => {
                debug!("create file '{name}'");
                let file = Rc::new(RefCell::new(File::new(name)));
                self.files.push(Rc::clone(&file));
                file
            }
            None => return fail(&mut self.last_error, FsError::NoFile),
        };
        let fd = self.fds.acquire(FileDesc::new(file, readable, writeable));
        trace!("open '{name}' -> fd {fd} (r={readable} w={writeable})");
        Ok(fd)
    }

    /// Reads up to `buf.len()` bytes from the descriptor's cursor,
    /// advancing it. Returns the number of bytes copied; 0 at end of
    /// file is not an error.
    pub fn read(&mut self, fd: usize, buf: &mut [u8]) -> Result<usize> {
        self.last_error = None;
        let Some(desc) = self.fds.get_mut(fd) else {
            return fail(&mut self.last_error, FsError::NoFile);
        };
        if buf.is_empty() {
            return Ok(0);
        }
        if !desc.readable {
            return fail(&mut self.last_error, FsError::NoPermission);
        }
        let file = Rc::clone(&desc.file);
        let file = file.borrow();
        if file.blocks.is_empty() {
            return Ok(0);
        }
        desc.clamp(&file);

        let mut total = 0;
        loop {
            let n = file.blocks[desc.block_id].read_at(desc.block_pos, &mut buf[total..]);
            total += n;
            desc.block_pos += n;
            if total == buf.len() || desc.block_id + 1 == file.blocks.len() {
                break;
            }
            desc.block_id += 1;
            desc.block_pos = 0;
        }
        Ok(total)
    }

    /// Writes `buf` at the descriptor's cursor, advancing it and growing
    /// the chain past the tail as needed. Returns the number of bytes
    /// written: the full input on success, the partial count when the
    /// chain hit the size cap partway (with `NoMem` left in
    /// [`last_error`](Self::last_error)), or `NoMem` when nothing landed.
    pub fn write(&mut self, fd: usize, buf: &[u8]) -> Result<usize> {
        self.last_error = None;
        let Some(desc) = self.fds.get_mut(fd) else {
            return fail(&mut self.last_error, FsError::NoFile);
        };
        if buf.is_empty() {
            return Ok(0);
        }
        if !desc.writeable {
            return fail(&mut self.last_error, FsError::NoPermission);
        }
        let file = Rc::clone(&desc.file);
        let mut file = file.borrow_mut();
        desc.clamp(&file);
        if file.blocks.is_empty() {
            if let Err(e) = file.allocate_block() {
                return fail(&mut self.last_error, e);
            }
        }

        let mut total = 0;
        while total < buf.len() {
            let n = file.blocks[desc.block_id].write_at(desc.block_pos, &buf[total..]);
            total += n;
            desc.block_pos += n;
            if total == buf.len() {
                break;
            }
            // Cursor block is full: step to the next block, or grow the
            // chain when the cursor sits at the tail.
            if desc.block_id + 1 == file.blocks.len() {
                if let Err(e) = file.allocate_block() {
                    if total == 0 {
                        return fail(&mut self.last_error, e);
                    }
                    // Partial progress is reported through the count.
                    self.last_error = Some(e);
                    break;
                }
            }
            desc.block_id += 1;
            desc.block_pos = 0;
        }
        trace!("write fd {fd}: {total}/{} bytes, file now {} bytes", buf.len(), file.size());
        Ok(total)
    }

    /// Resizes the descriptor's file to exactly `new_size` bytes.
    /// Shrinking truncates whole blocks from the tail and re-clamps this
    /// descriptor's cursor; growing allocates zeroed blocks one at a
    /// time and leaves a partially grown chain when the cap is hit.
    pub fn resize(&mut self, fd: usize, new_size: usize) -> Result<()> {
        self.last_error = None;
        let Some(desc) = self.fds.get_mut(fd) else {
            return fail(&mut self.last_error, FsError::NoFile);
        };
        if new_size > MAX_FILE_SIZE {
            return fail(&mut self.last_error, FsError::NoMem);
        }
        if !desc.writeable {
            return fail(&mut self.last_error, FsError::NoPermission);
        }
        let file = Rc::clone(&desc.file);
        let mut file = file.borrow_mut();
        let old_size = file.size();

        let target = new_size.div_ceil(BLOCK_SIZE);
        if target <= file.blocks.len() {
            let excess = file.blocks.len() - target;
            file.truncate_blocks(excess);
        } else {
            while file.blocks.len() < target {
                // The old tail stops being the last block, so it becomes
                // exactly full; its unwritten bytes are already zero.
                if let Some(last) = file.blocks.last_mut() {
                    last.occupied = BLOCK_SIZE;
                }
                if let Err(e) = file.allocate_block() {
                    desc.clamp(&file);
                    return fail(&mut self.last_error, e);
                }
            }
        }

        if let Some(last) = file.blocks.last_mut() {
            let tail = new_size % BLOCK_SIZE;
            last.occupied = if tail == 0 { BLOCK_SIZE } else { tail };
            // Scrubbed so that regrowing the file reads back zeros, never
            // the previous contents.
            last.scrub_tail();
        }
        desc.clamp(&file);
        debug!("resize fd {fd}: {old_size} -> {} bytes", file.size());
        Ok(())
    }

    /// Closes the descriptor and frees its slot for reuse. A tombstoned
    /// file whose last descriptor goes away is released here.
    pub fn close(&mut self, fd: usize) -> Result<()> {
        self.last_error = None;
        let Some(desc) = self.fds.release(fd) else {
            return fail(&mut self.last_error, FsError::NoFile);
        };
        {
            let file = desc.file.borrow();
            if file.deleted && Rc::strong_count(&desc.file) == 1 {
                debug!(
                    "close fd {fd}: releasing deleted file '{}' ({} bytes)",
                    file.name,
                    file.size()
                );
            }
        }
        trace!("close fd {fd}");
        Ok(())
    }

    /// Unlinks `name` from the namespace immediately; the name is
    /// reusable by the next create. Storage is freed now when no
    /// descriptor is open, otherwise when the last one closes.
    pub fn delete(&mut self, name: &str) -> Result<()> {
        self.last_error = None;
        let Some(idx) = self.files.iter().position(|f| f.borrow().name == name) else {
            return fail(&mut self.last_error, FsError::NoFile);
        };
        let file = self.files.remove(idx);
        file.borrow_mut().deleted = true;
        let open_refs = Rc::strong_count(&file) - 1;
        if open_refs == 0 {
            debug!("delete '{name}': freed immediately");
        } else {
            debug!("delete '{name}': deferred, {open_refs} descriptor(s) still open");
        }
        Ok(())
    }

    /// Hard teardown: closes every live descriptor, then frees every
    /// file regardless of outstanding references. Dropping the engine
    /// has the same effect through plain ownership.
    pub fn destroy(&mut self) {
        let closed = self.fds.drain().count();
        let freed = self.files.len();
        self.files.clear();
        self.last_error = None;
        debug!("destroy: closed {closed} descriptor(s), freed {freed} file(s)");
    }
}
