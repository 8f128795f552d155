//! Lease records and pure lease-table helpers.
//!
//! A lease binds a hardware address to an IPv4 address in the router's
//! DHCP server. Tables are snapshots: fetched fresh for every operation
//! and never cached across invocations.

use std::collections::HashMap;
use std::net::Ipv4Addr;

use log::debug;

/// One DHCP lease row as read from (or written to) the router.
#[derive(Debug, Clone)]
pub struct Lease {
    /// Router-assigned row identifier; present only on leases read from
    /// the table, and required for removal.
    pub id: Option<String>,
    pub address: Ipv4Addr,
    /// Hardware address, compared case-insensitively.
    pub mac: String,
    pub comment: Option<String>,
}

impl Lease {
    /// Build a lease from a reply's attribute mapping.
    ///
    /// Rows missing `address` or `mac-address` describe router-side
    /// entries this tool does not model (static reservations and the
    /// like); those yield `None` and are dropped by the caller.
    pub fn from_attributes(attributes: &HashMap<String, String>) -> Option<Self> {
        let address = attributes.get("address")?.parse::<Ipv4Addr>().ok()?;
        let mac = attributes.get("mac-address")?;
        if mac.is_empty() {
            return None;
        }

        Some(Lease {
            id: attributes.get(".id").cloned(),
            address,
            mac: mac.clone(),
            comment: attributes.get("comment").filter(|c| !c.is_empty()).cloned(),
        })
    }
}

/// Sort a table ascending by numeric address value.
pub fn sort_by_address(leases: &mut [Lease]) {
    leases.sort_by_key(|lease| u32::from(lease.address));
    debug!("Lease table holds {} entries", leases.len());
}

/// Exact-address lookup.
pub fn find_by_address(table: &[Lease], address: Ipv4Addr) -> Option<&Lease> {
    table.iter().find(|lease| lease.address == address)
}

/// Case-insensitive hardware-address lookup.
pub fn find_by_mac<'a>(table: &'a [Lease], mac: &str) -> Option<&'a Lease> {
    table.iter().find(|lease| lease.mac.eq_ignore_ascii_case(mac))
}
