//! # syncwatch-core
//!
//! Foundation types, errors, branded IDs, and the wire protocol for the
//! syncwatch coordination service.
//!
//! This crate provides the shared vocabulary the other syncwatch crates
//! depend on:
//!
//! - **Branded IDs**: [`ids::ConnectionId`], [`ids::RoomId`] as newtypes
//! - **Wire protocol**: [`protocol::ClientIntent`], [`protocol::ServerReply`],
//!   and the directory lookup envelope
//! - **Errors**: [`errors::CoordinatorError`] taxonomy via `thiserror`
//! - **Logging**: [`logging::init`] tracing bootstrap
//!
//! ## Crate Position
//!
//! Foundation crate. Depended on by all other syncwatch crates.

#![deny(unsafe_code)]

pub mod errors;
pub mod ids;
pub mod logging;
pub mod protocol;
