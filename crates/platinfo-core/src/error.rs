//! Error types for platform queries.

use std::io;
use std::path::{Path, PathBuf};

/// Coarse classification of a [`PlatformError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A file could not be opened or an OS call failed.
    Io,
    /// A required field was not in the expected format.
    Parse,
    /// The platform has no mechanism for the operation.
    NotSupported,
}

/// Errors returned by the readers in this crate.
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    /// Failed to read a procfs/sysfs file or resolve a link.
    #[error("failed to read {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },

    /// An OS call returned an error.
    #[error("{call} failed: {source}")]
    Os {
        call: &'static str,
        source: io::Error,
    },

    /// A field could not be scanned in the expected format.
    #[error("failed to parse {what}: {detail}")]
    Parse { what: &'static str, detail: String },

    /// The operation has no platform mechanism.
    #[error("{0} is not supported on this platform")]
    NotSupported(&'static str),
}

impl PlatformError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PlatformError::Io { .. } | PlatformError::Os { .. } => ErrorKind::Io,
            PlatformError::Parse { .. } => ErrorKind::Parse,
            PlatformError::NotSupported(_) => ErrorKind::NotSupported,
        }
    }

    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        PlatformError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Wraps `errno` of the last failed libc call.
    pub(crate) fn last_os_error(call: &'static str) -> Self {
        PlatformError::Os {
            call,
            source: io::Error::last_os_error(),
        }
    }

    pub(crate) fn parse(what: &'static str, detail: impl Into<String>) -> Self {
        PlatformError::Parse {
            what,
            detail: detail.into(),
        }
    }
}
