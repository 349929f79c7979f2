//! Userfs is a process-local, in-memory file storage engine.
//! Files are named byte sequences assembled from fixed-size blocks held
//! entirely on the heap; there is no backing store, no persistence, and
//! no directories — the namespace is a flat set of unique names.
//!
//! The engine's layers (from bottom to top):
//! 1. Block: fixed-capacity storage unit, owned by exactly one file.
//! 2. File: named chain of blocks; grows and truncates at the tail only.
//! 3. Descriptor: open handle with an independent read/write cursor;
//!    many descriptors may share one file's storage.
//! 4. UserFs: the engine object owning the namespace and the descriptor
//!    table; the whole public surface lives on it.
//!
//! Single-threaded by design: no locks, no atomics. Callers needing
//! concurrency must serialize access externally.

mod block;
mod config;
mod error;
mod fd;
mod file;
mod flags;
mod fs;

pub use config::{BLOCK_SIZE, MAX_FILE_SIZE};
pub use error::FsError as Error;
pub use error::Result;
pub use flags::OpenFlag;
pub use fs::UserFs;
