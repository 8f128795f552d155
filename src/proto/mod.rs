//! Mikrotik RouterOS binary API protocol.
//!
//! The API speaks length-prefixed byte strings ("words") grouped into
//! "sentences" terminated by an empty word. Layering here mirrors the wire
//! format:
//!
//! - `codec`: word framing, the only place with bit-level knowledge
//! - `sentence`: sentence framing and reply parsing
//! - `client`: connection, login handshake, and the `talk` request cycle

pub mod client;
pub mod codec;
pub mod sentence;

pub use client::ApiClient;
pub use sentence::Reply;
