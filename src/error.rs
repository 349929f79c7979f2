use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FsError {
    /// The handle or name does not resolve to a live file.
    #[error("no such file or descriptor")]
    NoFile,
    /// Allocation failure, including the per-file size cap.
    #[error("out of memory or file size limit reached")]
    NoMem,
    /// The descriptor's capability flags forbid the operation.
    #[error("operation not permitted")]
    NoPermission,
}

pub type Result<T> = core::result::Result<T, FsError>;
