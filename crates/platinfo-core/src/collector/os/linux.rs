//! `libc`-backed implementation of [`OsApi`].

use std::ffi::{CStr, CString};
use std::net::{Ipv4Addr, Ipv6Addr};
use std::ptr;
use std::time::Duration;

use super::{IfAddrRecord, IfFlags, OsApi, RawAddress, SysInfo};
use crate::error::PlatformError;

/// The running Linux kernel.
#[derive(Debug, Default, Clone, Copy)]
pub struct LinuxOs;

impl LinuxOs {
    pub fn new() -> Self {
        Self
    }
}

fn sysconf(name: libc::c_int, call: &'static str) -> Result<u64, PlatformError> {
    // SAFETY: sysconf only reads a configuration value and has no side effects.
    let value = unsafe { libc::sysconf(name) };
    if value <= 0 {
        return Err(PlatformError::last_os_error(call));
    }
    Ok(value as u64)
}

/// Owns the list returned by `getifaddrs` and frees it on drop.
struct IfAddrs(*mut libc::ifaddrs);

impl IfAddrs {
    fn new() -> Result<Self, PlatformError> {
        let mut head: *mut libc::ifaddrs = ptr::null_mut();
        // SAFETY: `head` is a valid out-pointer; on success the list is owned
        // by the returned guard.
        if unsafe { libc::getifaddrs(&mut head) } != 0 {
            return Err(PlatformError::last_os_error("getifaddrs"));
        }
        Ok(Self(head))
    }

    fn records(&self) -> Vec<IfAddrRecord> {
        let mut out = Vec::new();
        let mut cursor = self.0;
        while !cursor.is_null() {
            // SAFETY: every node of the list stays valid until freeifaddrs.
            let ent = unsafe { &*cursor };
            cursor = ent.ifa_next;

            let name = if ent.ifa_name.is_null() {
                String::new()
            } else {
                // SAFETY: ifa_name is a NUL-terminated string owned by the list.
                unsafe { CStr::from_ptr(ent.ifa_name) }
                    .to_string_lossy()
                    .into_owned()
            };

            out.push(IfAddrRecord {
                name,
                flags: IfFlags::from_bits_truncate(ent.ifa_flags),
                // SAFETY: ifa_addr is either null or points to a sockaddr of
                // the advertised family.
                address: unsafe { decode_sockaddr(ent.ifa_addr) },
            });
        }
        out
    }
}

impl Drop for IfAddrs {
    fn drop(&mut self) {
        if !self.0.is_null() {
            // SAFETY: the pointer came from a successful getifaddrs call and
            // is freed exactly once.
            unsafe { libc::freeifaddrs(self.0) };
        }
    }
}

/// # Safety
/// `addr` must be null or point to a valid `sockaddr` whose concrete type
/// matches `sa_family`.
unsafe fn decode_sockaddr(addr: *const libc::sockaddr) -> Option<RawAddress> {
    if addr.is_null() {
        return None;
    }
    let family = unsafe { (*addr).sa_family } as libc::c_int;
    let raw = match family {
        libc::AF_INET => {
            let sin = unsafe { &*(addr as *const libc::sockaddr_in) };
            RawAddress::V4(Ipv4Addr::from(u32::from_be(sin.sin_addr.s_addr)))
        }
        libc::AF_INET6 => {
            let sin6 = unsafe { &*(addr as *const libc::sockaddr_in6) };
            RawAddress::V6(Ipv6Addr::from(sin6.sin6_addr.s6_addr))
        }
        libc::AF_PACKET => RawAddress::Packet,
        other => RawAddress::Other(other as u16),
    };
    Some(raw)
}

impl OsApi for LinuxOs {
    fn page_size(&self) -> Result<u64, PlatformError> {
        sysconf(libc::_SC_PAGESIZE, "sysconf(_SC_PAGESIZE)")
    }

    fn clock_ticks_per_second(&self) -> Result<u64, PlatformError> {
        sysconf(libc::_SC_CLK_TCK, "sysconf(_SC_CLK_TCK)")
    }

    fn physical_pages(&self) -> Result<u64, PlatformError> {
        sysconf(libc::_SC_PHYS_PAGES, "sysconf(_SC_PHYS_PAGES)")
    }

    fn available_pages(&self) -> Result<u64, PlatformError> {
        sysconf(libc::_SC_AVPHYS_PAGES, "sysconf(_SC_AVPHYS_PAGES)")
    }

    fn monotonic_time(&self) -> Result<Duration, PlatformError> {
        let mut ts = libc::timespec {
            tv_sec: 0,
            tv_nsec: 0,
        };
        // SAFETY: `ts` is a valid out-pointer for the duration of the call.
        if unsafe { libc::clock_gettime(libc::CLOCK_MONOTONIC, &mut ts) } != 0 {
            return Err(PlatformError::last_os_error("clock_gettime(CLOCK_MONOTONIC)"));
        }
        Ok(Duration::new(ts.tv_sec as u64, ts.tv_nsec as u32))
    }

    fn sysinfo(&self) -> Result<SysInfo, PlatformError> {
        // SAFETY: sysinfo is plain old data; all-zero is a valid value.
        let mut info: libc::sysinfo = unsafe { std::mem::zeroed() };
        // SAFETY: `info` is a valid out-pointer for the duration of the call.
        if unsafe { libc::sysinfo(&mut info) } != 0 {
            return Err(PlatformError::last_os_error("sysinfo"));
        }
        Ok(SysInfo {
            uptime_secs: info.uptime.max(0) as u64,
            loads: [
                info.loads[0] as u64,
                info.loads[1] as u64,
                info.loads[2] as u64,
            ],
        })
    }

    fn set_process_name(&self, name: &str) -> Result<(), PlatformError> {
        let name = CString::new(name)
            .map_err(|e| PlatformError::parse("process title", e.to_string()))?;
        // SAFETY: PR_SET_NAME copies at most 16 bytes from a NUL-terminated
        // string that outlives the call.
        let rc = unsafe { libc::prctl(libc::PR_SET_NAME, name.as_ptr() as libc::c_ulong, 0, 0, 0) };
        if rc != 0 {
            return Err(PlatformError::last_os_error("prctl(PR_SET_NAME)"));
        }
        Ok(())
    }

    fn interface_addresses(&self) -> Result<Vec<IfAddrRecord>, PlatformError> {
        let list = IfAddrs::new()?;
        Ok(list.records())
    }
}
