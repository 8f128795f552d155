//! Requesting-machine context passed in by the orchestrator.
//!
//! The virtual machine manager invokes this hook with the guest described
//! through environment variables rather than arguments, so the action verb
//! stays the only positional input. Only the hardware address is required;
//! the remaining fields are carried for logging and for backends that make
//! use of them.

use std::env;

use crate::error::{Error, Result};

/// Required: hardware address of the guest interface.
pub const ENV_HWADDR: &str = "MIKROLEASE_MACHINE_HWADDR";
/// Optional: guest name, used as the lease comment when present.
pub const ENV_NAME: &str = "MIKROLEASE_MACHINE_NAME";
/// Optional: guest plan identifier.
pub const ENV_PLAN: &str = "MIKROLEASE_MACHINE_PLAN";
/// Optional: opaque guest id.
pub const ENV_ID: &str = "MIKROLEASE_MACHINE_ID";
/// Optional: name of the network the guest is attached to.
pub const ENV_NETWORK: &str = "MIKROLEASE_NETWORK_NAME";

/// Description of the machine a hook invocation is about.
#[derive(Debug, Clone)]
pub struct MachineContext {
    /// Hardware address, kept verbatim; comparisons are case-insensitive.
    pub hwaddr: String,
    pub name: Option<String>,
    pub plan: Option<String>,
    pub id: Option<String>,
    pub network: Option<String>,
}

impl MachineContext {
    /// Read the machine context from the process environment.
    pub fn from_env() -> Result<Self> {
        let hwaddr = env::var(ENV_HWADDR).map_err(|_| Error::MissingEnv(ENV_HWADDR.to_string()))?;
        if hwaddr.is_empty() {
            return Err(Error::MissingEnv(ENV_HWADDR.to_string()));
        }

        Ok(MachineContext {
            hwaddr,
            name: env::var(ENV_NAME).ok().filter(|v| !v.is_empty()),
            plan: env::var(ENV_PLAN).ok().filter(|v| !v.is_empty()),
            id: env::var(ENV_ID).ok().filter(|v| !v.is_empty()),
            network: env::var(ENV_NETWORK).ok().filter(|v| !v.is_empty()),
        })
    }

    /// Lease comment recorded on insertion: the guest name when the
    /// orchestrator provided one, empty otherwise.
    pub fn comment(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }
}
