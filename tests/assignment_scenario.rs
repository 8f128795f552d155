//! End-to-end assignment scenario driven through the public API with an
//! in-memory lease table standing in for the router.

use std::net::Ipv4Addr;

use mikrolease::backend::LeaseBackend;
use mikrolease::config::NetworkConfig;
use mikrolease::dispatch::{run, Action};
use mikrolease::error::Result;
use mikrolease::lease::{self, Lease};
use mikrolease::machine::MachineContext;

/// Stub backend over a plain lease table.
struct TableBackend {
    leases: Vec<Lease>,
    next_id: u32,
}

impl TableBackend {
    fn new() -> Self {
        TableBackend {
            leases: Vec::new(),
            next_id: 1,
        }
    }
}

impl LeaseBackend for TableBackend {
    fn fetch_all(&mut self) -> Result<Vec<Lease>> {
        let mut table = self.leases.clone();
        lease::sort_by_address(&mut table);
        Ok(table)
    }

    fn insert(&mut self, address: Ipv4Addr, mac: &str, comment: &str) -> Result<()> {
        let id = format!("*{:X}", self.next_id);
        self.next_id += 1;
        self.leases.push(Lease {
            id: Some(id),
            address,
            mac: mac.to_string(),
            comment: Some(comment.to_string()).filter(|c| !c.is_empty()),
        });
        Ok(())
    }

    fn remove(&mut self, target: &Lease) -> Result<()> {
        self.leases.retain(|entry| entry.id != target.id);
        Ok(())
    }
}

fn network() -> NetworkConfig {
    NetworkConfig {
        subnet: "192.168.84.0/24".parse().unwrap(),
        range_start: Ipv4Addr::new(192, 168, 84, 200),
        range_end: Ipv4Addr::new(192, 168, 84, 250),
        server: "default".to_string(),
    }
}

fn machine(hwaddr: &str) -> MachineContext {
    MachineContext {
        hwaddr: hwaddr.to_string(),
        name: None,
        plan: None,
        id: None,
        network: None,
    }
}

#[test]
fn test_assign_lookup_release_cycle() {
    let network = network();
    let mut backend = TableBackend::new();
    let guest = machine("AA:BB:CC:DD:EE:FF");

    // First assignment takes the start of the range.
    let line = run(Action::AssignIp, &mut backend, &network, &guest).unwrap();
    assert_eq!(line.as_deref(), Some("192.168.84.200"));
    assert_eq!(backend.leases.len(), 1);
    assert_eq!(backend.leases[0].mac, "AA:BB:CC:DD:EE:FF");
    assert_eq!(backend.leases[0].address, Ipv4Addr::new(192, 168, 84, 200));

    // Lookup for the same machine sees the assignment.
    let line = run(Action::LookupIp, &mut backend, &network, &guest).unwrap();
    assert_eq!(line.as_deref(), Some("192.168.84.200"));

    // A machine the router has never seen maps to the sentinel.
    let stranger = machine("00:11:22:33:44:55");
    let line = run(Action::LookupIp, &mut backend, &network, &stranger).unwrap();
    assert_eq!(line.as_deref(), Some("_unknown_"));

    // Release drops the lease; a second release is a quiet success.
    let line = run(Action::ReleaseIp, &mut backend, &network, &guest).unwrap();
    assert!(line.is_none());
    assert!(backend.leases.is_empty());
    run(Action::ReleaseIp, &mut backend, &network, &guest).unwrap();

    // After release the address is available again.
    let line = run(Action::AssignIp, &mut backend, &network, &stranger).unwrap();
    assert_eq!(line.as_deref(), Some("192.168.84.200"));
}

#[test]
fn test_two_guests_get_distinct_addresses() {
    let network = network();
    let mut backend = TableBackend::new();

    let first = run(
        Action::AssignIp,
        &mut backend,
        &network,
        &machine("AA:BB:CC:DD:EE:01"),
    )
    .unwrap();
    let second = run(
        Action::AssignIp,
        &mut backend,
        &network,
        &machine("AA:BB:CC:DD:EE:02"),
    )
    .unwrap();

    assert_eq!(first.as_deref(), Some("192.168.84.200"));
    assert_eq!(second.as_deref(), Some("192.168.84.201"));
}
