//! # Mikrolease - Mikrotik RouterOS DHCP lease hook for virtual machine managers
//!
//! This library implements the network hook a virtual machine manager
//! invokes when a guest's network lifecycle changes: looking up the
//! address leased to a hardware address, assigning a free address, or
//! releasing a lease. The lease table lives on a Mikrotik router and is
//! read and mutated over the RouterOS binary API.
//!
//! ## Overview
//!
//! One process invocation performs exactly one action over one TCP
//! connection. The router's table is fetched fresh every time; nothing is
//! cached or persisted locally. Assignment is first-fit over a configured
//! address range and idempotent per hardware address.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - `proto`: RouterOS binary API (word framing, sentences, login, talk)
//! - `lease`: lease records and pure table helpers
//! - `backend`: the lease-table operations behind the [`backend::LeaseBackend`] trait
//! - `policy`: lookup / assign / release built on a backend
//! - `dispatch`: action-verb mapping and process-boundary adaptation
//! - `config`: YAML configuration and validation
//! - `machine`: the orchestrator-provided machine context
//! - `error`: the crate-wide error type
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use mikrolease::{backend::MikrotikBackend, config, dispatch, machine::MachineContext};
//!
//! let config = config::load_config(Path::new("/etc/mikrolease.yaml"))?;
//! let machine = MachineContext::from_env()?;
//! let mut backend = MikrotikBackend::connect(&config)?;
//!
//! let action = "assign-ip".parse::<dispatch::Action>()?;
//! if let Some(line) = dispatch::run(action, &mut backend, &config.network, &machine)? {
//!     println!("{line}");
//! }
//! # Ok::<(), mikrolease::error::Error>(())
//! ```
//!
//! ## Known limits
//!
//! Two concurrent invocations for different hardware addresses can both
//! observe the same free address between fetch and insert. The router
//! serializing its API clients is the only guard; see `policy`.

pub mod backend;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod lease;
pub mod machine;
pub mod policy;
pub mod proto;
