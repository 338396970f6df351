//! Abstractions for filesystem access to enable testing and mocking.
//!
//! The `FileSystem` trait allows the readers to work with both the real
//! `/proc` and `/sys` trees on Linux and in-memory fixtures in tests.

use std::io;
use std::path::{Path, PathBuf};

/// Abstraction for the filesystem operations the readers need.
pub trait FileSystem: Send + Sync {
    /// Reads the entire contents of a file as a string.
    ///
    /// The file is opened and closed within the call.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Returns the target of a symbolic link.
    fn read_link(&self, path: &Path) -> io::Result<PathBuf>;
}

/// Real filesystem implementation that delegates to `std::fs`.
///
/// Use this in production to read from the actual `/proc` and `/sys` trees.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFs;

impl RealFs {
    /// Creates a new `RealFs` instance.
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for RealFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn read_link(&self, path: &Path) -> io::Result<PathBuf> {
        std::fs::read_link(path)
    }
}
