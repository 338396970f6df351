//! The [`Platform`] facade and the aggregate [`Snapshot`].
//!
//! A `Platform` wires the individual collectors to one filesystem, one OS
//! implementation and one [`PlatformConfig`]. Every call re-reads live
//! state.

use std::path::PathBuf;
use std::sync::{Arc, OnceLock};
use std::time::Instant;

use serde::Serialize;
use tracing::debug;

use crate::collector::os::OsApi;
use crate::collector::procfs::EXE_PATH_CAPACITY;
use crate::collector::system::UPTIME_UNAVAILABLE;
use crate::collector::traits::FileSystem;
use crate::collector::{
    CpuCollector, InterfaceCollector, ProcessCollector, SystemCollector, UptimeSource,
};
use crate::error::PlatformError;
use crate::model::{CpuRecord, InterfaceTable, LoadAverage, ProcessMemoryInfo};
use crate::title;

/// Uptime at the moment the first [`Platform`] was built.
static START_TIME: OnceLock<f64> = OnceLock::new();

/// Uptime captured when the first [`Platform`] of this process was built.
///
/// `None` until then. The value is negative if no clock was available.
pub fn process_start_time() -> Option<f64> {
    START_TIME.get().copied()
}

/// Filesystem roots the readers use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformConfig {
    /// Base path to proc filesystem (usually "/proc").
    pub proc_path: PathBuf,
    /// Base path to sysfs (usually "/sys").
    pub sys_path: PathBuf,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            proc_path: PathBuf::from("/proc"),
            sys_path: PathBuf::from("/sys"),
        }
    }
}

/// Entry point for every query in this crate.
pub struct Platform<F: FileSystem + Clone, O: OsApi + Clone> {
    os: O,
    process: ProcessCollector<F, O>,
    cpu: CpuCollector<F, O>,
    system: SystemCollector<O>,
    interfaces: InterfaceCollector<O>,
}

#[cfg(target_os = "linux")]
impl Platform<crate::collector::RealFs, crate::collector::LinuxOs> {
    /// Platform reading the running host with default paths.
    pub fn linux() -> Self {
        Self::new(
            crate::collector::RealFs::new(),
            crate::collector::LinuxOs::new(),
            PlatformConfig::default(),
        )
    }
}

impl<F: FileSystem + Clone, O: OsApi + Clone> Platform<F, O> {
    /// Creates a platform and selects its uptime source.
    ///
    /// The first platform built in a process also records
    /// [`process_start_time`].
    pub fn new(fs: F, os: O, config: PlatformConfig) -> Self {
        let system = SystemCollector::new(os.clone());
        START_TIME.get_or_init(|| system.uptime());

        Self {
            process: ProcessCollector::new(fs.clone(), os.clone(), &config.proc_path),
            cpu: CpuCollector::new(fs, os.clone(), &config.proc_path, &config.sys_path),
            interfaces: InterfaceCollector::new(os.clone()),
            system,
            os,
        }
    }

    pub fn uptime_source(&self) -> UptimeSource {
        self.system.uptime_source()
    }

    /// Memory footprint of the current process.
    pub fn process_memory(&self) -> Result<ProcessMemoryInfo, PlatformError> {
        self.process.collect_memory()
    }

    /// One record per logical CPU.
    pub fn cpus(&self) -> Result<Vec<CpuRecord>, PlatformError> {
        self.cpu.collect()
    }

    /// Available physical memory in bytes.
    pub fn free_memory(&self) -> Result<f64, PlatformError> {
        self.system.free_memory()
    }

    /// Total physical memory in bytes.
    pub fn total_memory(&self) -> Result<f64, PlatformError> {
        self.system.total_memory()
    }

    /// Seconds since boot; negative when no clock source is available.
    pub fn uptime(&self) -> f64 {
        self.system.uptime()
    }

    pub fn load_average(&self) -> Result<LoadAverage, PlatformError> {
        self.system.load_average()
    }

    /// Seconds since [`process_start_time`]; negative when unknown.
    pub fn process_age(&self) -> f64 {
        let now = self.uptime();
        match process_start_time() {
            Some(start) if start >= 0.0 && now >= 0.0 => (now - start).max(0.0),
            _ => UPTIME_UNAVAILABLE,
        }
    }

    /// Path of the running executable, limited to `capacity - 1` bytes.
    pub fn executable_path(&self, capacity: usize) -> Result<String, PlatformError> {
        self.process.executable_path(capacity)
    }

    pub fn interface_addresses(&self) -> Result<InterfaceTable, PlatformError> {
        self.interfaces.collect()
    }

    /// Current process-wide title.
    pub fn title(&self) -> Arc<str> {
        title::title()
    }

    /// Sets the process-wide title and the OS-visible process name.
    pub fn set_title(&self, new_title: &str) -> Result<(), PlatformError> {
        title::set_title(&self.os, new_title)
    }

    /// Runs every query once.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(self)
    }
}

/// Result of every query at one point in time.
///
/// Queries that fail leave their field empty and add a message to `errors`.
#[derive(Debug, Clone, Serialize, Default)]
pub struct Snapshot {
    pub title: String,
    pub executable_path: Option<String>,
    pub memory: Option<ProcessMemoryInfo>,
    pub cpus: Vec<CpuRecord>,
    pub free_memory: Option<f64>,
    pub total_memory: Option<f64>,
    /// Seconds since boot; negative when unavailable.
    pub uptime: f64,
    /// Seconds since the process start time; negative when unavailable.
    pub process_age: f64,
    pub load_average: Option<LoadAverage>,
    pub interfaces: Option<InterfaceTable>,
    pub errors: Vec<String>,
}

impl Snapshot {
    pub fn capture<F: FileSystem + Clone, O: OsApi + Clone>(platform: &Platform<F, O>) -> Self {
        let started = Instant::now();
        let mut errors = Vec::new();
        let mut record = |section: &str, e: PlatformError| errors.push(format!("{section}: {e}"));

        let executable_path = platform
            .executable_path(EXE_PATH_CAPACITY)
            .map_err(|e| record("executable path", e))
            .ok();
        let memory = platform
            .process_memory()
            .map_err(|e| record("process memory", e))
            .ok();
        let cpus = platform
            .cpus()
            .map_err(|e| record("cpus", e))
            .unwrap_or_default();
        let free_memory = platform
            .free_memory()
            .map_err(|e| record("free memory", e))
            .ok();
        let total_memory = platform
            .total_memory()
            .map_err(|e| record("total memory", e))
            .ok();
        let load_average = platform
            .load_average()
            .map_err(|e| record("load average", e))
            .ok();
        let interfaces = platform
            .interface_addresses()
            .map_err(|e| record("interfaces", e))
            .ok();

        let snapshot = Snapshot {
            title: platform.title().to_string(),
            executable_path,
            memory,
            cpus,
            free_memory,
            total_memory,
            uptime: platform.uptime(),
            process_age: platform.process_age(),
            load_average,
            interfaces,
            errors,
        };
        debug!(
            elapsed_us = started.elapsed().as_micros() as u64,
            failed = snapshot.errors.len(),
            "snapshot captured"
        );
        snapshot
    }
}
