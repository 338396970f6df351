//! Readers for process and system state on Linux.
//!
//! Pseudo-files are read through the [`FileSystem`] trait and everything
//! else (`sysconf`, `sysinfo`, clocks, `prctl`, `getifaddrs`) through
//! [`OsApi`], so every reader can run against fixtures.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          Platform                            │
//! │  ┌──────────────────┐ ┌──────────────┐ ┌──────────────────┐  │
//! │  │ ProcessCollector │ │ CpuCollector │ │ SystemCollector  │  │
//! │  │ - /proc/self/*   │ │ - cpuinfo    │ │ - sysconf        │  │
//! │  └────────┬─────────┘ │ - stat       │ │ - sysinfo, clock │  │
//! │           │           │ - cpufreq    │ └────────┬─────────┘  │
//! │           │           └──────┬───────┘          │            │
//! │    ┌──────▼──────┐           │     ┌────────────▼────────┐   │
//! │    │ FileSystem  │◄──────────┴────►│        OsApi        │   │
//! │    └──────┬──────┘                 └────────────┬────────┘   │
//! └───────────┼─────────────────────────────────────┼────────────┘
//!      ┌──────┴──────┐                     ┌────────┴───────┐
//!      │RealFs/MockFs│                     │ LinuxOs/MockOs │
//!      └─────────────┘                     └────────────────┘
//! ```
//!
//! # Usage
//!
//! ```
//! use platinfo_core::collector::mock::{MockFs, MockOs};
//! use platinfo_core::collector::CpuCollector;
//!
//! let collector = CpuCollector::new(MockFs::four_core_system(), MockOs::new(), "/proc", "/sys");
//! let cpus = collector.collect().unwrap();
//! assert_eq!(cpus.len(), 4);
//! ```

pub mod mock;
pub mod net;
pub mod os;
pub mod procfs;
pub mod system;
pub mod traits;

pub use net::InterfaceCollector;
#[cfg(target_os = "linux")]
pub use os::LinuxOs;
pub use os::OsApi;
pub use procfs::{CpuCollector, ProcessCollector};
pub use system::{SystemCollector, UptimeSource};
pub use traits::{FileSystem, RealFs};
