//! # syncwatch-client
//!
//! The session client consumed by watch-party front ends: one WebSocket
//! transport per logical client, with bounded automatic reconnection and a
//! ping/pong liveness exchange, plus the pre-join directory lookup and the
//! pre-send form validation the coordinator deliberately does not perform.
//!
//! Reconnection is an explicit state machine ([`reconnect::ClientState`])
//! with a bounded counter — five attempts, three seconds apart, then a
//! terminal disconnected state. A reconnect produces a brand-new connection
//! identity server-side, so callers re-issue create/join afterwards; no
//! session affinity survives a drop.

#![deny(unsafe_code)]

pub mod errors;
pub mod lookup;
pub mod reconnect;
pub mod session;
pub mod validate;

pub use errors::ClientError;
pub use lookup::DirectoryClient;
pub use reconnect::{ClientState, ReconnectPolicy, Reconnector};
pub use session::{SessionClient, SessionConnection};
