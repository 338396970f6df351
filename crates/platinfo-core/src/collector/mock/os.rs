//! Fixed-value implementation of [`OsApi`] for tests.

use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use crate::collector::os::{IfAddrRecord, IfFlags, OsApi, RawAddress, SysInfo};
use crate::error::PlatformError;

/// Mock OS with configurable values.
///
/// Fields left as `None` behave as if the facility were missing: the
/// corresponding call fails with an OS error, or `NotSupported` for
/// `set_process_name` and `interface_addresses`.
#[derive(Debug, Clone)]
pub struct MockOs {
    pub page_size: u64,
    pub clock_ticks: u64,
    pub physical_pages: u64,
    pub available_pages: u64,
    pub monotonic: Option<Duration>,
    pub sysinfo: Option<SysInfo>,
    pub interfaces: Option<Vec<IfAddrRecord>>,
    pub supports_process_name: bool,
    /// Names passed to successful `set_process_name` calls.
    pub(crate) names: Arc<Mutex<Vec<String>>>,
}

impl Default for MockOs {
    fn default() -> Self {
        Self {
            page_size: 4096,
            clock_ticks: 100,
            physical_pages: 4_194_304,
            available_pages: 1_048_576,
            monotonic: Some(Duration::from_millis(12_345_670)),
            sysinfo: Some(SysInfo {
                uptime_secs: 12_345,
                loads: [65536, 32768, 16384],
            }),
            interfaces: Some(Vec::new()),
            supports_process_name: true,
            names: Arc::default(),
        }
    }
}

impl MockOs {
    pub fn new() -> Self {
        Self::default()
    }

    /// A host with a loopback and one Ethernet interface, plus a link-layer
    /// record and a downed interface that must both be filtered out.
    pub fn with_typical_interfaces() -> Self {
        let up = IfFlags::UP | IfFlags::RUNNING;
        let records = vec![
            IfAddrRecord {
                name: "lo".to_string(),
                flags: up | IfFlags::LOOPBACK,
                address: Some(RawAddress::Packet),
            },
            IfAddrRecord {
                name: "lo".to_string(),
                flags: up | IfFlags::LOOPBACK,
                address: Some(RawAddress::V4(Ipv4Addr::LOCALHOST)),
            },
            IfAddrRecord {
                name: "eth0".to_string(),
                flags: up,
                address: Some(RawAddress::V4(Ipv4Addr::new(192, 168, 1, 20))),
            },
            IfAddrRecord {
                name: "docker0".to_string(),
                flags: IfFlags::UP,
                address: Some(RawAddress::V4(Ipv4Addr::new(172, 17, 0, 1))),
            },
            IfAddrRecord {
                name: "lo".to_string(),
                flags: up | IfFlags::LOOPBACK,
                address: Some(RawAddress::V6(Ipv6Addr::LOCALHOST)),
            },
            IfAddrRecord {
                name: "eth0".to_string(),
                flags: up,
                address: Some(RawAddress::V6(Ipv6Addr::new(0xfe80, 0, 0, 0, 0, 0, 0, 0x1))),
            },
        ];
        Self {
            interfaces: Some(records),
            ..Self::default()
        }
    }

    /// Names successfully applied through `set_process_name`, oldest first.
    pub fn applied_names(&self) -> Vec<String> {
        self.names
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

fn unavailable(call: &'static str) -> PlatformError {
    PlatformError::Os {
        call,
        source: std::io::Error::from(std::io::ErrorKind::Unsupported),
    }
}

impl OsApi for MockOs {
    fn page_size(&self) -> Result<u64, PlatformError> {
        Ok(self.page_size)
    }

    fn clock_ticks_per_second(&self) -> Result<u64, PlatformError> {
        if self.clock_ticks == 0 {
            return Err(unavailable("sysconf(_SC_CLK_TCK)"));
        }
        Ok(self.clock_ticks)
    }

    fn physical_pages(&self) -> Result<u64, PlatformError> {
        Ok(self.physical_pages)
    }

    fn available_pages(&self) -> Result<u64, PlatformError> {
        Ok(self.available_pages)
    }

    fn monotonic_time(&self) -> Result<Duration, PlatformError> {
        self.monotonic
            .ok_or_else(|| unavailable("clock_gettime(CLOCK_MONOTONIC)"))
    }

    fn sysinfo(&self) -> Result<SysInfo, PlatformError> {
        self.sysinfo.ok_or_else(|| unavailable("sysinfo"))
    }

    fn set_process_name(&self, name: &str) -> Result<(), PlatformError> {
        if !self.supports_process_name {
            return Err(PlatformError::NotSupported("setting the process title"));
        }
        self.names
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(name.to_string());
        Ok(())
    }

    fn interface_addresses(&self) -> Result<Vec<IfAddrRecord>, PlatformError> {
        self.interfaces
            .clone()
            .ok_or(PlatformError::NotSupported("interface enumeration"))
    }
}
