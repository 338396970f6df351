//! In-memory mock filesystem for testing readers without real `/proc`.

use crate::collector::traits::FileSystem;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

/// In-memory filesystem for testing.
///
/// Stores files and symbolic links in memory, allowing tests to simulate
/// various `/proc` and `/sys` states without needing actual Linux access.
#[derive(Debug, Clone, Default)]
pub struct MockFs {
    /// Map from path to file contents.
    files: HashMap<PathBuf, String>,
    /// Map from link path to link target.
    links: HashMap<PathBuf, PathBuf>,
}

impl MockFs {
    /// Creates a new empty mock filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file with the given content, replacing any previous one.
    pub fn add_file(&mut self, path: impl AsRef<Path>, content: impl Into<String>) {
        self.files
            .insert(path.as_ref().to_path_buf(), content.into());
    }

    /// Adds a symbolic link pointing at `target`.
    pub fn add_link(&mut self, path: impl AsRef<Path>, target: impl AsRef<Path>) {
        self.links
            .insert(path.as_ref().to_path_buf(), target.as_ref().to_path_buf());
    }

    /// Removes a file, simulating a pseudo-file that is absent on this host.
    pub fn remove_file(&mut self, path: impl AsRef<Path>) {
        self.files.remove(path.as_ref());
    }

    /// Adds `cpuinfo_max_freq` for one core under `/sys`.
    pub fn add_cpu_max_freq(&mut self, cpu: u32, khz: u64) {
        self.add_file(
            format!("/sys/devices/system/cpu/cpu{cpu}/cpufreq/cpuinfo_max_freq"),
            format!("{khz}\n"),
        );
    }
}

fn not_found(what: &str, path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("{what} not found: {:?}", path),
    )
}

impl FileSystem for MockFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| not_found("file", path))
    }

    fn read_link(&self, path: &Path) -> io::Result<PathBuf> {
        self.links
            .get(path)
            .cloned()
            .ok_or_else(|| not_found("link", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_fs_add_file() {
        let mut fs = MockFs::new();
        fs.add_file("/proc/loadavg", "0.15 0.10 0.05 1/150 1234\n");

        let content = fs.read_to_string(Path::new("/proc/loadavg")).unwrap();
        assert_eq!(content, "0.15 0.10 0.05 1/150 1234\n");
    }

    #[test]
    fn test_mock_fs_remove_file() {
        let mut fs = MockFs::new();
        fs.add_file("/proc/cpuinfo", "model name\t: x\n");
        fs.remove_file("/proc/cpuinfo");

        let err = fs.read_to_string(Path::new("/proc/cpuinfo")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_mock_fs_links() {
        let mut fs = MockFs::new();
        fs.add_link("/proc/self/exe", "/usr/bin/node");

        assert_eq!(
            fs.read_link(Path::new("/proc/self/exe")).unwrap(),
            PathBuf::from("/usr/bin/node")
        );
        assert!(fs.read_link(Path::new("/proc/1/exe")).is_err());
    }

    #[test]
    fn test_mock_fs_cpu_max_freq_path() {
        let mut fs = MockFs::new();
        fs.add_cpu_max_freq(3, 2_800_000);

        let content = fs
            .read_to_string(Path::new(
                "/sys/devices/system/cpu/cpu3/cpufreq/cpuinfo_max_freq",
            ))
            .unwrap();
        assert_eq!(content.trim(), "2800000");
    }
}
