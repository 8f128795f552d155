//! Address-assignment policy.
//!
//! Each operation is driven by one fresh table fetch; the router's table
//! is the single source of truth and no cursor or cache survives between
//! invocations. Allocation is first-fit: every call scans the configured
//! range from its start and takes the first address with no lease.
//!
//! Two invocations racing for different hardware addresses can both see
//! the same address as free between fetch and insert; nothing here
//! mitigates that, the router serializing its clients is the only
//! protection. Kept as-is to match observable behavior.

use std::net::Ipv4Addr;

use log::info;

use crate::backend::LeaseBackend;
use crate::config::NetworkConfig;
use crate::error::{Error, Result};
use crate::lease;

/// Printed when a lookup finds no lease for the hardware address.
pub const UNKNOWN_SENTINEL: &str = "_unknown_";

/// Find the address currently leased to `mac`, if any. Read-only.
pub fn lookup_ip<B: LeaseBackend>(backend: &mut B, mac: &str) -> Result<Option<Ipv4Addr>> {
    let table = backend.fetch_all()?;
    Ok(lease::find_by_mac(&table, mac).map(|entry| entry.address))
}

/// Return the address leased to `mac`, allocating one when necessary.
///
/// Re-assignment is idempotent: an existing lease is returned unchanged
/// and no insert is issued. Otherwise the first free address in the range
/// is claimed; a fully occupied range is an operational error, not a
/// protocol failure.
pub fn assign_ip<B: LeaseBackend>(
    backend: &mut B,
    network: &NetworkConfig,
    mac: &str,
    comment: &str,
) -> Result<Ipv4Addr> {
    let table = backend.fetch_all()?;

    if let Some(current) = lease::find_by_mac(&table, mac) {
        info!("Reusing existing lease {} for {}", current.address, mac);
        return Ok(current.address);
    }

    for candidate in network.addresses() {
        if lease::find_by_address(&table, candidate).is_some() {
            continue;
        }
        backend.insert(candidate, mac, comment)?;
        return Ok(candidate);
    }

    Err(Error::AddressPoolExhausted {
        start: network.range_start,
        end: network.range_end,
    })
}

/// Release the lease held by `mac`, if one exists.
///
/// Releasing an address twice must be safe: a missing lease is success.
pub fn release_ip<B: LeaseBackend>(backend: &mut B, mac: &str) -> Result<()> {
    let table = backend.fetch_all()?;

    match lease::find_by_mac(&table, mac) {
        Some(current) => {
            info!("Releasing lease {} held by {}", current.address, mac);
            backend.remove(current)
        }
        None => {
            info!("No lease found for {}, nothing to release", mac);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::testing::MemoryBackend;

    const MAC: &str = "AA:BB:CC:DD:EE:FF";
    const OTHER_MAC: &str = "11:22:33:44:55:66";

    fn network(start: [u8; 4], end: [u8; 4]) -> NetworkConfig {
        NetworkConfig {
            subnet: "192.168.84.0/24".parse().unwrap(),
            range_start: Ipv4Addr::from(start),
            range_end: Ipv4Addr::from(end),
            server: "default".to_string(),
        }
    }

    #[test]
    fn test_assign_is_idempotent() {
        let network = network([192, 168, 84, 200], [192, 168, 84, 250]);
        let mut backend = MemoryBackend::new();

        let first = assign_ip(&mut backend, &network, MAC, "").unwrap();
        let second = assign_ip(&mut backend, &network, MAC, "").unwrap();

        assert_eq!(first, Ipv4Addr::new(192, 168, 84, 200));
        assert_eq!(first, second);
        assert_eq!(backend.inserts, 1);
    }

    #[test]
    fn test_assign_reuses_lease_case_insensitively() {
        let network = network([192, 168, 84, 200], [192, 168, 84, 250]);
        let mut backend =
            MemoryBackend::new().with_lease(Ipv4Addr::new(192, 168, 84, 230), "aa:bb:cc:dd:ee:ff");

        let address = assign_ip(&mut backend, &network, MAC, "").unwrap();
        assert_eq!(address, Ipv4Addr::new(192, 168, 84, 230));
        assert_eq!(backend.inserts, 0);
    }

    #[test]
    fn test_assign_skips_occupied_addresses() {
        let network = network([192, 168, 84, 200], [192, 168, 84, 250]);
        let mut backend =
            MemoryBackend::new().with_lease(Ipv4Addr::new(192, 168, 84, 200), OTHER_MAC);

        let address = assign_ip(&mut backend, &network, MAC, "").unwrap();
        assert_eq!(address, Ipv4Addr::new(192, 168, 84, 201));
    }

    #[test]
    fn test_assign_exhausted_pool() {
        // A one-address range already held by someone else.
        let network = network([192, 168, 84, 200], [192, 168, 84, 200]);
        let mut backend =
            MemoryBackend::new().with_lease(Ipv4Addr::new(192, 168, 84, 200), OTHER_MAC);

        let result = assign_ip(&mut backend, &network, MAC, "");
        assert!(matches!(result, Err(Error::AddressPoolExhausted { .. })));
        assert_eq!(backend.inserts, 0);
    }

    #[test]
    fn test_assign_records_comment() {
        let network = network([192, 168, 84, 200], [192, 168, 84, 250]);
        let mut backend = MemoryBackend::new();

        assign_ip(&mut backend, &network, MAC, "web01").unwrap();
        assert_eq!(backend.leases[0].comment.as_deref(), Some("web01"));
    }

    #[test]
    fn test_lookup_found_and_unknown() {
        let mut backend =
            MemoryBackend::new().with_lease(Ipv4Addr::new(192, 168, 84, 210), MAC);

        let found = lookup_ip(&mut backend, "aa:bb:cc:dd:ee:ff").unwrap();
        assert_eq!(found, Some(Ipv4Addr::new(192, 168, 84, 210)));

        let unknown = lookup_ip(&mut backend, OTHER_MAC).unwrap();
        assert_eq!(unknown, None);
    }

    #[test]
    fn test_release_is_idempotent() {
        let mut backend = MemoryBackend::new().with_lease(Ipv4Addr::new(192, 168, 84, 210), MAC);

        release_ip(&mut backend, MAC).unwrap();
        assert_eq!(backend.removes, 1);
        assert!(backend.leases.is_empty());

        // Second release finds nothing and issues no remove.
        release_ip(&mut backend, MAC).unwrap();
        assert_eq!(backend.removes, 1);
    }

    #[test]
    fn test_release_unknown_mac_is_noop() {
        let mut backend = MemoryBackend::new();
        release_ip(&mut backend, MAC).unwrap();
        assert_eq!(backend.removes, 0);
    }
}
