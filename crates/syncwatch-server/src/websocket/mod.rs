//! WebSocket connection management, intent dispatch, and roster broadcasting.
//!
//! ## Submodules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | `connection` | WebSocket upgrade, per-connection read/write loops |
//! | `handler` | Intent parsing, dispatch, reply framing |
//! | `broadcast` | Room fan-out: serialize once, non-blocking delivery |
//!
//! ## Data Flow
//!
//! `connection` reads frames → `handler` dispatches to the registry →
//! replies go back through the sender's queue, roster updates through
//! `broadcast` to every room member. When the read loop ends, `connection`
//! runs the one disconnect cleanup for that socket.

pub mod broadcast;
pub mod connection;
pub mod handler;
