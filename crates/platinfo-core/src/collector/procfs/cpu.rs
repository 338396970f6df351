//! CPU collector combining `/proc/cpuinfo`, `/proc/stat` and cpufreq.
//!
//! The two procfs passes are independent: an unreadable `/proc/cpuinfo`
//! leaves model and speed empty, and an unreadable or garbled `/proc/stat` yields
//! one zero-counter record per `model name` line. The read only fails when
//! neither file produces a core.

use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::collector::os::OsApi;
use crate::collector::procfs::parser::{
    CpuInfoSummary, CpuTicks, parse_cpu_ticks, parse_cpuinfo, parse_max_freq_mhz,
};
use crate::collector::traits::FileSystem;
use crate::error::PlatformError;
use crate::model::{CpuRecord, CpuTimes};

/// Collects one [`CpuRecord`] per logical CPU.
pub struct CpuCollector<F: FileSystem, O: OsApi> {
    fs: F,
    os: O,
    proc_path: PathBuf,
    sys_path: PathBuf,
}

impl<F: FileSystem, O: OsApi> CpuCollector<F, O> {
    /// Creates a new CPU collector.
    ///
    /// # Arguments
    /// * `fs` - Filesystem implementation (real or mock)
    /// * `os` - OS facilities, used for the clock tick rate
    /// * `proc_path` - Base path to proc filesystem (usually "/proc")
    /// * `sys_path` - Base path to sysfs (usually "/sys")
    pub fn new(fs: F, os: O, proc_path: impl Into<PathBuf>, sys_path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            os,
            proc_path: proc_path.into(),
            sys_path: sys_path.into(),
        }
    }

    /// Reads all logical CPUs in the order `/proc/stat` lists them.
    pub fn collect(&self) -> Result<Vec<CpuRecord>, PlatformError> {
        let summary = self.read_cpuinfo();

        let stat_path = self.proc_path.join("stat");
        let ticks = match self.read_cpu_ticks(&stat_path) {
            Ok(ticks) => ticks,
            Err(e) if summary.count == 0 => return Err(PlatformError::io(&stat_path, e)),
            Err(e) => {
                debug!(
                    path = %stat_path.display(),
                    error = %e,
                    cores = summary.count,
                    "cpu counters unavailable, reporting zero times"
                );
                (0..summary.count as u32)
                    .map(|cpu_id| CpuTicks {
                        cpu_id,
                        ..CpuTicks::default()
                    })
                    .collect()
            }
        };

        let hz = self.os.clock_ticks_per_second()?;
        Ok(ticks
            .iter()
            .map(|t| CpuRecord {
                model: summary.model.clone(),
                speed_mhz: self.max_freq_mhz(t.cpu_id).unwrap_or(summary.speed_mhz),
                times: CpuTimes {
                    user: ticks_to_ms(t.user, hz),
                    nice: ticks_to_ms(t.nice, hz),
                    sys: ticks_to_ms(t.system, hz),
                    idle: ticks_to_ms(t.idle, hz),
                    irq: ticks_to_ms(t.irq, hz),
                },
            })
            .collect())
    }

    fn read_cpuinfo(&self) -> CpuInfoSummary {
        let path = self.proc_path.join("cpuinfo");
        match self.fs.read_to_string(&path) {
            Ok(content) => parse_cpuinfo(&content),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "cpuinfo unavailable");
                CpuInfoSummary::default()
            }
        }
    }

    /// Reads the per-core counters. A garbled file counts as unreadable.
    fn read_cpu_ticks(&self, path: &Path) -> io::Result<Vec<CpuTicks>> {
        let content = self.fs.read_to_string(path)?;
        parse_cpu_ticks(&content).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Reads `cpuinfo_max_freq` for one core; `None` when absent or garbled.
    fn max_freq_mhz(&self, cpu_id: u32) -> Option<u32> {
        let path = self
            .sys_path
            .join(format!("devices/system/cpu/cpu{cpu_id}/cpufreq/cpuinfo_max_freq"));
        let content = match self.fs.read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                trace!(cpu = cpu_id, error = %e, "no cpufreq max frequency");
                return None;
            }
        };
        match parse_max_freq_mhz(&content) {
            Ok(mhz) => Some(mhz),
            Err(e) => {
                debug!(cpu = cpu_id, error = %e, "ignoring cpufreq max frequency");
                None
            }
        }
    }
}

/// Exact conversion: multiplies before dividing, so rates that do not
/// divide 1000 keep their precision.
fn ticks_to_ms(ticks: u64, hz: u64) -> u64 {
    ticks.saturating_mul(1000) / hz.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use crate::collector::mock::{MockFs, MockOs};

    fn collector(fs: MockFs, os: MockOs) -> CpuCollector<MockFs, MockOs> {
        CpuCollector::new(fs, os, "/proc", "/sys")
    }

    #[test]
    fn test_four_cores_share_first_model() {
        let cpus = collector(MockFs::four_core_system(), MockOs::new())
            .collect()
            .unwrap();

        assert_eq!(cpus.len(), 4);
        assert!(
            cpus.iter()
                .all(|c| c.model == "Intel(R) Core(TM) i7-8700 CPU @ 3.20GHz")
        );
        assert!(cpus.iter().all(|c| c.speed_mhz == 4600));
    }

    #[test]
    fn test_ticks_converted_with_clock_rate() {
        let cpus = collector(MockFs::four_core_system(), MockOs::new())
            .collect()
            .unwrap();
        assert_eq!(
            cpus[1].times,
            CpuTimes {
                user: 26_000,
                nice: 1_300,
                sys: 7_600,
                idle: 199_000,
                irq: 600,
            }
        );

        let os = MockOs {
            clock_ticks: 250,
            ..MockOs::new()
        };
        let cpus = collector(MockFs::four_core_system(), os).collect().unwrap();
        assert_eq!(cpus[0].times.user, 10_000);
        assert_eq!(cpus[0].times.irq, 200);
    }

    #[test]
    fn test_missing_clock_rate_is_error() {
        let os = MockOs {
            clock_ticks: 0,
            ..MockOs::new()
        };
        let err = collector(MockFs::single_core_vm(), os)
            .collect()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(err.to_string().contains("_SC_CLK_TCK"));
    }

    #[test]
    fn test_missing_max_freq_uses_cpuinfo_speed() {
        let cpus = collector(MockFs::single_core_vm(), MockOs::new())
            .collect()
            .unwrap();
        assert_eq!(cpus.len(), 1);
        assert_eq!(cpus[0].model, "AMD EPYC 7B13");
        assert_eq!(cpus[0].speed_mhz, 2449);
    }

    #[test]
    fn test_partial_max_freq() {
        let mut fs = MockFs::four_core_system();
        fs.remove_file("/sys/devices/system/cpu/cpu2/cpufreq/cpuinfo_max_freq");
        fs.add_file(
            "/sys/devices/system/cpu/cpu3/cpufreq/cpuinfo_max_freq",
            "garbage",
        );
        let cpus = collector(fs, MockOs::new()).collect().unwrap();
        assert_eq!(
            cpus.iter().map(|c| c.speed_mhz).collect::<Vec<_>>(),
            vec![4600, 4600, 3192, 3192]
        );
    }

    #[test]
    fn test_unreadable_cpuinfo() {
        let mut fs = MockFs::four_core_system();
        fs.remove_file("/proc/cpuinfo");
        let cpus = collector(fs, MockOs::new()).collect().unwrap();
        assert_eq!(cpus.len(), 4);
        assert!(cpus.iter().all(|c| c.model.is_empty()));
        assert_eq!(cpus[0].speed_mhz, 4600);
    }

    #[test]
    fn test_unreadable_stat_uses_cpuinfo_count() {
        let mut fs = MockFs::four_core_system();
        fs.remove_file("/proc/stat");
        let cpus = collector(fs, MockOs::new()).collect().unwrap();
        assert_eq!(cpus.len(), 4);
        assert!(cpus.iter().all(|c| c.times == CpuTimes::default()));
    }

    #[test]
    fn test_short_stat_line_keeps_cpuinfo_cores() {
        let mut fs = MockFs::four_core_system();
        fs.add_file("/proc/stat", "cpu  1 2 3 4\ncpu0 1 2 3 4\ncpu1 1 2 3 4\n");
        let cpus = collector(fs, MockOs::new()).collect().unwrap();
        assert_eq!(cpus.len(), 4);
        assert!(
            cpus.iter()
                .all(|c| c.model == "Intel(R) Core(TM) i7-8700 CPU @ 3.20GHz")
        );
        assert!(cpus.iter().all(|c| c.times == CpuTimes::default()));
    }

    #[test]
    fn test_garbled_stat_without_cpuinfo_is_io_error() {
        let mut fs = MockFs::new();
        fs.add_file("/proc/stat", "cpu0 1 2 three 4 5 6\n");
        let err = collector(fs, MockOs::new()).collect().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_both_files_missing_is_io_error() {
        let err = collector(MockFs::new(), MockOs::new())
            .collect()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_stat_core_count_wins_over_cpuinfo() {
        let mut fs = MockFs::four_core_system();
        fs.add_file(
            "/proc/stat",
            "cpu  1 1 1 1 1 1\ncpu0 1 1 1 1 1 1\ncpu1 1 1 1 1 1 1\nintr 0\n",
        );
        let cpus = collector(fs, MockOs::new()).collect().unwrap();
        assert_eq!(cpus.len(), 2);
    }

    #[test]
    fn test_ticks_to_ms() {
        assert_eq!(ticks_to_ms(123, 100), 1230);
        assert_eq!(ticks_to_ms(1, 1000), 1);
        // 300 Hz: 3 ticks are exactly 10 ms.
        assert_eq!(ticks_to_ms(3, 300), 10);
        assert_eq!(ticks_to_ms(u64::MAX, 100), u64::MAX / 100);
    }
}
