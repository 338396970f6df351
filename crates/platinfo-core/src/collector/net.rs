//! Network interface enumeration.
//!
//! Walks the OS interface-address list and groups addresses by interface
//! name. Link-layer (`AF_PACKET`) records, address-less records and
//! interfaces that are not both up and running are dropped.

use crate::collector::os::{IfAddrRecord, IfFlags, OsApi, RawAddress};
use crate::error::PlatformError;
use crate::model::{AddressFamily, InterfaceAddress, InterfaceTable};

/// Collects interface addresses through an [`OsApi`].
pub struct InterfaceCollector<O: OsApi> {
    os: O,
}

impl<O: OsApi> InterfaceCollector<O> {
    pub fn new(os: O) -> Self {
        Self { os }
    }

    /// Enumerates the addresses of every up and running interface.
    pub fn collect(&self) -> Result<InterfaceTable, PlatformError> {
        let records = self.os.interface_addresses()?;
        Ok(group_interface_addresses(&records))
    }
}

/// Groups raw records into an [`InterfaceTable`], keeping OS order.
pub fn group_interface_addresses(records: &[IfAddrRecord]) -> InterfaceTable {
    let mut table = InterfaceTable::new();

    for record in records {
        if !record.flags.contains(IfFlags::UP | IfFlags::RUNNING) {
            continue;
        }
        let Some(raw) = record.address else {
            continue;
        };
        let (address, family) = match raw {
            RawAddress::Packet => continue,
            RawAddress::V6(ip) => (ip.to_string(), AddressFamily::Ipv6),
            RawAddress::V4(ip) => (ip.to_string(), AddressFamily::Ipv4),
            RawAddress::Other(_) => (
                InterfaceAddress::UNKNOWN_ADDRESS.to_string(),
                AddressFamily::Unknown,
            ),
        };

        table.push(
            &record.name,
            InterfaceAddress {
                address,
                family,
                internal: record.flags.contains(IfFlags::LOOPBACK),
            },
        );
    }

    table
}
