//! Process collector for the current process (`/proc/self/*`).

use std::io;
use std::path::PathBuf;

use crate::collector::os::OsApi;
use crate::collector::procfs::parser::parse_proc_stat;
use crate::collector::traits::FileSystem;
use crate::error::PlatformError;
use crate::model::ProcessMemoryInfo;

/// Default capacity for [`ProcessCollector::executable_path`]: `PATH_MAX`
/// plus the terminator byte.
pub const EXE_PATH_CAPACITY: usize = 4097;

/// Collects information about the current process from `/proc/self/`.
pub struct ProcessCollector<F: FileSystem, O: OsApi> {
    fs: F,
    os: O,
    proc_path: PathBuf,
}

impl<F: FileSystem, O: OsApi> ProcessCollector<F, O> {
    /// Creates a new process collector.
    ///
    /// # Arguments
    /// * `fs` - Filesystem implementation (real or mock)
    /// * `os` - OS facilities, used for the page size
    /// * `proc_path` - Base path to proc filesystem (usually "/proc")
    pub fn new(fs: F, os: O, proc_path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            os,
            proc_path: proc_path.into(),
        }
    }

    /// Reads virtual size and resident set size from `/proc/self/stat`.
    ///
    /// Any field that fails to scan aborts the read; no partial result is
    /// returned.
    pub fn collect_memory(&self) -> Result<ProcessMemoryInfo, PlatformError> {
        let path = self.proc_path.join("self/stat");
        let content = self
            .fs
            .read_to_string(&path)
            .map_err(|e| PlatformError::io(&path, e))?;
        let stat =
            parse_proc_stat(&content).map_err(|e| PlatformError::parse("process stat", e.message))?;

        let page_size = self.os.page_size()?;
        let resident_bytes = stat.rss.checked_mul(page_size).ok_or_else(|| {
            PlatformError::parse(
                "process stat",
                format!("rss of {} pages overflows", stat.rss),
            )
        })?;

        Ok(ProcessMemoryInfo {
            resident_bytes,
            virtual_bytes: stat.vsize,
        })
    }

    /// Resolves `/proc/self/exe`.
    ///
    /// `capacity` is the size of the caller's buffer including one byte for
    /// the terminator, so at most `capacity - 1` bytes of path fit. Fails if
    /// the link is unreadable, resolves to an empty path, or does not fit.
    pub fn executable_path(&self, capacity: usize) -> Result<String, PlatformError> {
        let path = self.proc_path.join("self/exe");
        let target = self
            .fs
            .read_link(&path)
            .map_err(|e| PlatformError::io(&path, e))?;
        let resolved = target.to_string_lossy();

        if resolved.is_empty() {
            return Err(PlatformError::io(
                &path,
                io::Error::new(io::ErrorKind::InvalidData, "link resolves to an empty path"),
            ));
        }
        let limit = capacity.saturating_sub(1);
        if resolved.len() > limit {
            return Err(PlatformError::io(
                &path,
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!(
                        "path of {} bytes does not fit in a buffer of {capacity}",
                        resolved.len()
                    ),
                ),
            ));
        }

        Ok(resolved.into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use crate::collector::mock::{MockFs, MockOs, self_stat_line};

    fn collector(fs: MockFs) -> ProcessCollector<MockFs, MockOs> {
        ProcessCollector::new(fs, MockOs::new(), "/proc")
    }

    #[test]
    fn test_collect_memory() {
        let info = collector(MockFs::four_core_system())
            .collect_memory()
            .unwrap();
        assert_eq!(info.virtual_bytes, 1_073_741_824);
        assert_eq!(info.resident_bytes, 12_800 * 4096);
    }

    #[test]
    fn test_collect_memory_uses_os_page_size() {
        let os = MockOs {
            page_size: 16384,
            ..MockOs::new()
        };
        let collector = ProcessCollector::new(MockFs::single_core_vm(), os, "/proc");
        let info = collector.collect_memory().unwrap();
        assert_eq!(info.resident_bytes, 2_048 * 16384);
        assert_eq!(info.virtual_bytes, 268_435_456);
    }

    #[test]
    fn test_collect_memory_tricky_comm() {
        let mut fs = MockFs::new();
        fs.add_file("/proc/self/stat", self_stat_line(9, "a) (b", 5_000_000, 7));
        let info = collector(fs).collect_memory().unwrap();
        assert_eq!(info.virtual_bytes, 5_000_000);
        assert_eq!(info.resident_bytes, 7 * 4096);
    }

    #[test]
    fn test_collect_memory_missing_file() {
        let err = collector(MockFs::new()).collect_memory().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_collect_memory_parse_failure() {
        let mut fs = MockFs::new();
        fs.add_file("/proc/self/stat", "42 (sh) S 1 42 42 0 -1 bogus\n");
        let err = collector(fs).collect_memory().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[test]
    fn test_executable_path() {
        let path = collector(MockFs::four_core_system())
            .executable_path(EXE_PATH_CAPACITY)
            .unwrap();
        assert_eq!(path, "/usr/local/bin/node");
    }

    #[test]
    fn test_executable_path_exact_fit() {
        let collector = collector(MockFs::four_core_system());
        let len = "/usr/local/bin/node".len();
        assert!(collector.executable_path(len + 1).is_ok());

        let err = collector.executable_path(len).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(collector.executable_path(0).is_err());
    }

    #[test]
    fn test_executable_path_broken_link() {
        let err = collector(MockFs::new())
            .executable_path(EXE_PATH_CAPACITY)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);

        let mut fs = MockFs::new();
        fs.add_link("/proc/self/exe", "");
        assert!(collector(fs).executable_path(EXE_PATH_CAPACITY).is_err());
    }

    #[test]
    fn test_real_self_stat() {
        if !std::path::Path::new("/proc/self/stat").exists() {
            return;
        }
        #[cfg(target_os = "linux")]
        {
            use crate::collector::os::LinuxOs;
            use crate::collector::traits::RealFs;

            let collector = ProcessCollector::new(RealFs::new(), LinuxOs::new(), "/proc");
            let info = collector.collect_memory().unwrap();
            assert!(info.resident_bytes > 0);
            assert!(info.virtual_bytes >= info.resident_bytes);
            assert!(!collector.executable_path(EXE_PATH_CAPACITY).unwrap().is_empty());
        }
    }
}
