//! Error types for the lease hook.
//!
//! All fallible operations in this crate return [`Result<T>`], built on the
//! [`Error`] enum below. `main` maps the variants to the process exit codes
//! the invoking orchestrator distinguishes.

use std::collections::HashMap;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while handling a hook invocation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Network or stream I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Configuration parsed but contains invalid values
    /// (e.g. range_start > range_end, range outside the subnet).
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A required environment variable was not provided by the orchestrator.
    #[error("Missing environment variable: {0}")]
    MissingEnv(String),

    /// The remote end closed the connection in the middle of a framed word.
    ///
    /// Distinct from ordinary I/O errors: a short read mid-message means the
    /// router went away and the whole operation must be abandoned.
    #[error("Connection closed by remote end")]
    ConnectionClosed,

    /// The login handshake did not terminate with `!done`.
    #[error("Authentication failed: {reason}")]
    AuthenticationFailed { reason: String },

    /// The router answered with a `!trap` error sentence.
    #[error("Router trap: {message}")]
    Trap { message: String },

    /// The router rejected a lease insertion.
    #[error("Lease insert failed: {reply:?}")]
    LeaseInsertFailed { reply: HashMap<String, String> },

    /// The router rejected a lease removal.
    #[error("Lease removal failed: {reply:?}")]
    LeaseRemoveFailed { reply: HashMap<String, String> },

    /// Every address in the configured range is already leased.
    ///
    /// An operational outcome rather than a protocol failure; reported with
    /// its own exit code so the orchestrator can tell the two apart.
    #[error("No free address in range {start}-{end}")]
    AddressPoolExhausted {
        start: std::net::Ipv4Addr,
        end: std::net::Ipv4Addr,
    },

    /// The action argument is not one of lookup-ip / assign-ip / release-ip.
    #[error("Unknown action requested: {0}")]
    UnknownAction(String),
}
