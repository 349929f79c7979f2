//! Open flags and their resolution into descriptor capabilities.

use enumflags2::{BitFlags, bitflags};

use crate::error::{FsError, Result};

#[bitflags]
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenFlag {
    ReadOnly = 0b0001,
    WriteOnly = 0b0010,
    ReadWrite = 0b0100,
    Create = 0b1000,
}

/// Resolves the access bits of `flags` into `(readable, writeable)`.
/// No access flag at all defaults to read-write; mixing access flags is
/// rejected.
pub(crate) fn resolve_access(flags: BitFlags<OpenFlag>) -> Result<(bool, bool)> {
    let access = flags & (OpenFlag::ReadOnly | OpenFlag::WriteOnly | OpenFlag::ReadWrite);
    if access == OpenFlag::ReadOnly {
        Ok((true, false))
    } else if access == OpenFlag::WriteOnly {
        Ok((false, true))
    } else if access.is_empty() || access == OpenFlag::ReadWrite {
        Ok((true, true))
    } else {
        Err(FsError::NoPermission)
    }
}
