//! OS facilities that are not exposed as files.
//!
//! [`OsApi`] covers `sysconf`, `sysinfo`, the monotonic clock, `prctl` and
//! the interface-address list. [`LinuxOs`] talks to the kernel through
//! `libc`; `MockOs` (in `collector::mock`) returns fixed values for tests.

#[cfg(target_os = "linux")]
mod linux;

#[cfg(target_os = "linux")]
pub use linux::LinuxOs;

use std::net::{Ipv4Addr, Ipv6Addr};
use std::time::Duration;

use bitflags::bitflags;

use crate::error::PlatformError;

bitflags! {
    /// Interface flags as reported in `ifa_flags` (`IFF_*`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct IfFlags: u32 {
        const UP = 0x1;
        const LOOPBACK = 0x8;
        const RUNNING = 0x40;
    }
}

/// Address attached to an interface record, decoded from its `sockaddr`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawAddress {
    V4(Ipv4Addr),
    V6(Ipv6Addr),
    /// `AF_PACKET` link-layer record.
    Packet,
    /// Any other `sa_family` value.
    Other(u16),
}

/// One entry of the OS interface-address list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IfAddrRecord {
    pub name: String,
    pub flags: IfFlags,
    /// `None` when the record has no assigned address.
    pub address: Option<RawAddress>,
}

/// Values read from `sysinfo(2)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SysInfo {
    /// Seconds since boot.
    pub uptime_secs: u64,
    /// 1, 5 and 15 minute load averages, fixed point with 16 fractional bits.
    pub loads: [u64; 3],
}

/// Abstraction over the non-file OS facilities.
pub trait OsApi: Send + Sync {
    /// Size of a memory page in bytes.
    fn page_size(&self) -> Result<u64, PlatformError>;

    /// Clock ticks per second (`USER_HZ`).
    fn clock_ticks_per_second(&self) -> Result<u64, PlatformError>;

    /// Total physical memory pages.
    fn physical_pages(&self) -> Result<u64, PlatformError>;

    /// Currently available physical memory pages.
    fn available_pages(&self) -> Result<u64, PlatformError>;

    /// Reading of the monotonic clock.
    fn monotonic_time(&self) -> Result<Duration, PlatformError>;

    fn sysinfo(&self) -> Result<SysInfo, PlatformError>;

    /// Renames the OS-visible process (`PR_SET_NAME`).
    ///
    /// Returns [`PlatformError::NotSupported`] when the platform has no such
    /// mechanism.
    fn set_process_name(&self, name: &str) -> Result<(), PlatformError>;

    /// Enumerates the interface-address list in OS order.
    fn interface_addresses(&self) -> Result<Vec<IfAddrRecord>, PlatformError>;
}
