//! System-wide memory, uptime and load queries.

use tracing::debug;

use crate::collector::os::OsApi;
use crate::error::PlatformError;
use crate::model::LoadAverage;

/// Uptime value reported when no clock source is available.
pub const UPTIME_UNAVAILABLE: f64 = -1.0;

/// Clock used for uptime, selected once per collector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UptimeSource {
    /// `CLOCK_MONOTONIC`.
    Monotonic,
    /// `sysinfo.uptime`, whole seconds since boot.
    Sysinfo,
    Unavailable,
}

impl UptimeSource {
    /// Probes the OS, preferring the monotonic clock.
    pub fn detect<O: OsApi>(os: &O) -> Self {
        let source = if os.monotonic_time().is_ok() {
            UptimeSource::Monotonic
        } else if os.sysinfo().is_ok() {
            UptimeSource::Sysinfo
        } else {
            UptimeSource::Unavailable
        };
        debug!(?source, "selected uptime source");
        source
    }
}

/// Collects system-wide values from `sysconf`, `sysinfo` and the clocks.
pub struct SystemCollector<O: OsApi> {
    os: O,
    uptime_source: UptimeSource,
}

impl<O: OsApi> SystemCollector<O> {
    pub fn new(os: O) -> Self {
        let uptime_source = UptimeSource::detect(&os);
        Self { os, uptime_source }
    }

    pub fn uptime_source(&self) -> UptimeSource {
        self.uptime_source
    }

    /// Available physical memory in bytes.
    pub fn free_memory(&self) -> Result<f64, PlatformError> {
        let pages = self.os.available_pages()? as f64;
        Ok(pages * self.os.page_size()? as f64)
    }

    /// Total physical memory in bytes.
    pub fn total_memory(&self) -> Result<f64, PlatformError> {
        let pages = self.os.physical_pages()? as f64;
        Ok(pages * self.os.page_size()? as f64)
    }

    /// Seconds since boot, or [`UPTIME_UNAVAILABLE`] (negative) when the
    /// selected clock cannot be read.
    pub fn uptime(&self) -> f64 {
        let reading = match self.uptime_source {
            UptimeSource::Monotonic => self.os.monotonic_time().map(|d| d.as_secs_f64()),
            UptimeSource::Sysinfo => self.os.sysinfo().map(|info| info.uptime_secs as f64),
            UptimeSource::Unavailable => return UPTIME_UNAVAILABLE,
        };
        reading.unwrap_or(UPTIME_UNAVAILABLE)
    }

    /// Load averages from `sysinfo`.
    pub fn load_average(&self) -> Result<LoadAverage, PlatformError> {
        let info = self.os.sysinfo()?;
        Ok(LoadAverage::from_fixed_point(info.loads))
    }
}
