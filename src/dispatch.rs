//! Action dispatch: maps the orchestrator's action verb to a policy
//! operation and adapts the result to the process boundary.

use std::fmt;
use std::str::FromStr;

use log::info;

use crate::backend::LeaseBackend;
use crate::config::NetworkConfig;
use crate::error::{Error, Result};
use crate::machine::MachineContext;
use crate::policy::{self, UNKNOWN_SENTINEL};

/// The three lifecycle actions an orchestrator may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    LookupIp,
    AssignIp,
    ReleaseIp,
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "lookup-ip" => Ok(Action::LookupIp),
            "assign-ip" => Ok(Action::AssignIp),
            "release-ip" => Ok(Action::ReleaseIp),
            other => Err(Error::UnknownAction(other.to_string())),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::LookupIp => "lookup-ip",
            Action::AssignIp => "assign-ip",
            Action::ReleaseIp => "release-ip",
        };
        write!(f, "{}", name)
    }
}

/// Run one action against a backend.
///
/// Returns the single line to print on stdout, or `None` for actions with
/// no required output (release).
pub fn run<B: LeaseBackend>(
    action: Action,
    backend: &mut B,
    network: &NetworkConfig,
    machine: &MachineContext,
) -> Result<Option<String>> {
    info!("Handling {} for {}", action, machine.hwaddr);

    match action {
        Action::LookupIp => {
            let found = policy::lookup_ip(backend, &machine.hwaddr)?;
            Ok(Some(match found {
                Some(address) => address.to_string(),
                None => UNKNOWN_SENTINEL.to_string(),
            }))
        }
        Action::AssignIp => {
            let address =
                policy::assign_ip(backend, network, &machine.hwaddr, machine.comment())?;
            Ok(Some(address.to_string()))
        }
        Action::ReleaseIp => {
            policy::release_ip(backend, &machine.hwaddr)?;
            Ok(None)
        }
    }
}
