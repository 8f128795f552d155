//! Lease-table backends.
//!
//! The policy layer only needs three operations on a lease table; the
//! [`LeaseBackend`] trait captures them so the allocator can be exercised
//! against an in-memory table in tests while production traffic goes to a
//! router over the binary API.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{Ipv4Addr, TcpStream};

use log::{debug, info};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::lease::{self, Lease};
use crate::proto::ApiClient;

/// The lease-table operations the assignment policy is built on.
pub trait LeaseBackend {
    /// Fetch the full lease table, sorted ascending by numeric address.
    fn fetch_all(&mut self) -> Result<Vec<Lease>>;

    /// Insert a new lease binding `address` to `mac`.
    fn insert(&mut self, address: Ipv4Addr, mac: &str, comment: &str) -> Result<()>;

    /// Remove an existing lease. The lease must carry the router-assigned
    /// id, i.e. it must have come from [`fetch_all`](Self::fetch_all).
    fn remove(&mut self, lease: &Lease) -> Result<()>;
}

/// Lease backend speaking to a Mikrotik router over the RouterOS API.
pub struct MikrotikBackend<S> {
    client: ApiClient<S>,
    server: String,
}

impl MikrotikBackend<TcpStream> {
    /// Connect to the configured router and log in.
    pub fn connect(config: &Config) -> Result<Self> {
        let client = ApiClient::connect(&config.router)?;
        Ok(MikrotikBackend {
            client,
            server: config.network.server.clone(),
        })
    }
}

impl<S> MikrotikBackend<S> {
    /// Wrap an already logged-in client; used with scripted streams.
    pub fn with_client(client: ApiClient<S>, server: String) -> Self {
        MikrotikBackend { client, server }
    }
}

impl<S: Read + Write> LeaseBackend for MikrotikBackend<S> {
    fn fetch_all(&mut self) -> Result<Vec<Lease>> {
        let replies = self.client.talk(["/ip/dhcp-server/lease/print"])?;

        let mut table = Vec::new();
        for reply in &replies {
            if reply.tag == "!trap" {
                return Err(Error::Trap {
                    message: reply.message().unwrap_or("unspecified").to_string(),
                });
            }
            if reply.tag != "!re" {
                continue;
            }
            // Rows without address or mac-address are not modelled here.
            if let Some(entry) = Lease::from_attributes(&reply.attributes) {
                table.push(entry);
            }
        }

        lease::sort_by_address(&mut table);
        Ok(table)
    }

    fn insert(&mut self, address: Ipv4Addr, mac: &str, comment: &str) -> Result<()> {
        let replies = self.client.talk([
            "/ip/dhcp-server/lease/add".to_string(),
            format!("=server={}", self.server),
            format!("=mac-address={}", mac),
            format!("=address={}", address),
            format!("=comment={}", comment),
        ])?;

        if let Some(failure) = replies.iter().find(|reply| reply.tag != "!done") {
            return Err(Error::LeaseInsertFailed {
                reply: failure.attributes.clone(),
            });
        }

        info!("Inserted lease {} for {}", address, mac);
        Ok(())
    }

    fn remove(&mut self, lease: &Lease) -> Result<()> {
        let id = lease.id.as_deref().ok_or_else(|| Error::LeaseRemoveFailed {
            reply: HashMap::from([(
                "message".to_string(),
                "lease carries no router id".to_string(),
            )]),
        })?;

        let replies = self.client.talk([
            "/ip/dhcp-server/lease/remove".to_string(),
            format!("=numbers={}", id),
        ])?;

        if let Some(failure) = replies.iter().find(|reply| reply.tag != "!done") {
            return Err(Error::LeaseRemoveFailed {
                reply: failure.attributes.clone(),
            });
        }

        debug!("Removed lease {} ({})", lease.address, id);
        Ok(())
    }
}
