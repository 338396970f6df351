//! Result entities returned by the platform queries.
//!
//! These are plain data types with no ties to any host runtime. A host
//! adapter (the `platinfo` binary, for instance) converts them into whatever
//! representation it needs; all of them serialize with `serde`.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Memory footprint of the current process.
///
/// Source: `/proc/self/stat` fields `vsize` (bytes) and `rss` (pages).
#[derive(Clone, Copy, Serialize, Debug, PartialEq, Eq, Default)]
pub struct ProcessMemoryInfo {
    /// Resident set size in bytes (`rss` pages × page size).
    pub resident_bytes: u64,
    /// Virtual memory size in bytes, as reported by the kernel.
    pub virtual_bytes: u64,
}

/// Cumulative CPU time counters for one logical CPU, in milliseconds.
///
/// Source: `/proc/stat` `cpuN` lines, converted from clock ticks.
#[derive(Clone, Copy, Serialize, Debug, PartialEq, Eq, Default)]
pub struct CpuTimes {
    pub user: u64,
    pub nice: u64,
    pub sys: u64,
    pub idle: u64,
    pub irq: u64,
}

impl CpuTimes {
    /// Sum of all counters.
    pub fn total_ms(&self) -> u64 {
        self.user
            .saturating_add(self.nice)
            .saturating_add(self.sys)
            .saturating_add(self.idle)
            .saturating_add(self.irq)
    }
}

/// Identity, clock speed and usage of one logical CPU.
#[derive(Clone, Serialize, Debug, PartialEq, Eq, Default)]
pub struct CpuRecord {
    /// Model name. The first model seen in `/proc/cpuinfo` is used for every
    /// core.
    pub model: String,
    /// Clock speed in MHz: the core's `cpuinfo_max_freq` when present,
    /// otherwise the `cpu MHz` value of the first core in `/proc/cpuinfo`.
    #[serde(rename = "speed")]
    pub speed_mhz: u32,
    pub times: CpuTimes,
}

/// System load averages over 1, 5 and 15 minutes.
#[derive(Clone, Copy, Serialize, Debug, PartialEq, Default)]
pub struct LoadAverage {
    pub load1: f64,
    pub load5: f64,
    pub load15: f64,
}

impl LoadAverage {
    /// Kernel fixed-point scale (`1 << SI_LOAD_SHIFT`).
    pub const FIXED_POINT_SCALE: f64 = 65536.0;

    /// Converts the raw `sysinfo.loads` values.
    pub fn from_fixed_point(raw: [u64; 3]) -> Self {
        Self {
            load1: raw[0] as f64 / Self::FIXED_POINT_SCALE,
            load5: raw[1] as f64 / Self::FIXED_POINT_SCALE,
            load15: raw[2] as f64 / Self::FIXED_POINT_SCALE,
        }
    }

    pub fn as_array(&self) -> [f64; 3] {
        [self.load1, self.load5, self.load15]
    }
}

/// Address family of an interface address.
#[derive(Clone, Copy, Serialize, Debug, PartialEq, Eq, Hash)]
pub enum AddressFamily {
    #[serde(rename = "IPv4")]
    Ipv4,
    #[serde(rename = "IPv6")]
    Ipv6,
    #[serde(rename = "<unknown>")]
    Unknown,
}

impl AddressFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            AddressFamily::Ipv4 => "IPv4",
            AddressFamily::Ipv6 => "IPv6",
            AddressFamily::Unknown => "<unknown>",
        }
    }
}

impl std::fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// One address assigned to a network interface.
#[derive(Clone, Serialize, Debug, PartialEq, Eq)]
pub struct InterfaceAddress {
    /// Printable address, or [`InterfaceAddress::UNKNOWN_ADDRESS`] for
    /// families other than IPv4/IPv6.
    pub address: String,
    pub family: AddressFamily,
    /// `true` exactly when the interface carries the loopback flag.
    pub internal: bool,
}

impl InterfaceAddress {
    pub const UNKNOWN_ADDRESS: &'static str = "<unknown sa family>";
}

/// Interface addresses grouped by interface name.
///
/// Names keep the order in which they were first seen and each name maps to
/// its addresses in enumeration order. Serializes as a JSON object.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct InterfaceTable {
    entries: Vec<(String, Vec<InterfaceAddress>)>,
}

impl InterfaceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `address` under `name`, creating the entry on first sight.
    pub fn push(&mut self, name: &str, address: InterfaceAddress) {
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some((_, addrs)) => addrs.push(address),
            None => self.entries.push((name.to_string(), vec![address])),
        }
    }

    pub fn get(&self, name: &str) -> Option<&[InterfaceAddress]> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, addrs)| addrs.as_slice())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[InterfaceAddress])> {
        self.entries
            .iter()
            .map(|(n, addrs)| (n.as_str(), addrs.as_slice()))
    }

    /// Number of distinct interface names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for InterfaceTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, addrs) in &self.entries {
            map.serialize_entry(name, addrs)?;
        }
        map.end()
    }
}
