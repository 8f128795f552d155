//! Configuration structures and YAML parsing.
//!
//! The hook reads a single YAML file describing the router it manages and
//! the address range it may allocate from. Everything is fixed for the
//! lifetime of one invocation; there is no runtime reconfiguration.

use std::fs::File;
use std::net::Ipv4Addr;
use std::path::Path;

use ipnet::Ipv4Net;
use log::info;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default location of the configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/mikrolease.yaml";

fn default_port() -> u16 {
    8728
}

fn default_server() -> String {
    "default".to_string()
}

/// Connection and credential settings for the managed router.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Router management address (the RouterOS API service).
    pub host: String,

    /// API port, 8728 unless the router was reconfigured.
    #[serde(default = "default_port")]
    pub port: u16,

    pub username: String,

    #[serde(default)]
    pub password: String,

    /// Connect/read/write timeout in seconds. When absent, socket
    /// operations block indefinitely, matching routers on a local segment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

/// The subnet this hook serves and the sub-range it may allocate from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub subnet: Ipv4Net,

    /// First address the allocator may hand out (inclusive).
    pub range_start: Ipv4Addr,

    /// Last address the allocator may hand out (inclusive).
    pub range_end: Ipv4Addr,

    /// DHCP server name passed on lease insertion.
    #[serde(default = "default_server")]
    pub server: String,
}

impl NetworkConfig {
    /// Iterate the allocatable range in ascending numeric order.
    pub fn addresses(&self) -> impl Iterator<Item = Ipv4Addr> {
        (u32::from(self.range_start)..=u32::from(self.range_end)).map(Ipv4Addr::from)
    }
}

/// Top-level configuration for one hook invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub router: RouterConfig,
    pub network: NetworkConfig,
}

impl Config {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.router.host.is_empty() {
            return Err(Error::InvalidConfig("router host cannot be empty".to_string()));
        }

        if self.router.username.is_empty() {
            return Err(Error::InvalidConfig(
                "router username cannot be empty".to_string(),
            ));
        }

        let network = &self.network;
        if u32::from(network.range_start) > u32::from(network.range_end) {
            return Err(Error::InvalidConfig(format!(
                "range_start {} is above range_end {}",
                network.range_start, network.range_end
            )));
        }

        for bound in [network.range_start, network.range_end] {
            if !network.subnet.contains(&bound) {
                return Err(Error::InvalidConfig(format!(
                    "address {} is outside subnet {}",
                    bound, network.subnet
                )));
            }
        }

        Ok(())
    }
}

/// Load and parse configuration from a YAML file
pub fn load_config(config_path: &Path) -> Result<Config> {
    info!("Loading configuration from: {:?}", config_path);

    let file = File::open(config_path)?;
    let config: Config = serde_yaml::from_reader(file)?;

    config.validate()?;

    Ok(config)
}
