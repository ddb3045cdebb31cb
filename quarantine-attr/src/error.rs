//! Per-target failure kinds.

use std::io;

use thiserror::Error;

/// Why an operation on a single target failed.
///
/// These never abort a run; each one ends up in the report next to the path
/// it belongs to.
#[derive(Debug, Error)]
pub enum QuarantineError {
    /// The path does not exist, or vanished while the run was in progress.
    #[error("not found")]
    NotFound,

    /// The OS refused the attribute operation.
    #[error("permission denied")]
    PermissionDenied,

    /// The filesystem or platform has no extended attribute support.
    #[error("extended attributes not supported")]
    Unsupported,

    /// The run was cancelled before this target was processed.
    #[error("interrupted before processing")]
    Interrupted,

    #[error("{0}")]
    Io(io::Error),
}

impl From<io::Error> for QuarantineError {
    fn from(e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::NotFound => return QuarantineError::NotFound,
            io::ErrorKind::PermissionDenied => return QuarantineError::PermissionDenied,
            io::ErrorKind::Unsupported => return QuarantineError::Unsupported,
            _ => {}
        }
        match e.raw_os_error() {
            Some(code) if code == libc::ENOTSUP || code == libc::EOPNOTSUPP => {
                QuarantineError::Unsupported
            }
            Some(libc::EPERM) => QuarantineError::PermissionDenied,
            // a file used as a directory component, e.g. 'notes.txt/child'
            Some(libc::ENOTDIR) => QuarantineError::NotFound,
            _ => QuarantineError::Io(e),
        }
    }
}
