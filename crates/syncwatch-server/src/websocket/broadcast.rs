//! Roster fan-out to the connected members of one room.
//!
//! The payload is serialized once and the same allocation is shared across
//! every delivery leg. Each leg is a non-blocking enqueue into that member's
//! outbound queue: a full or closed queue means the leg is skipped — logged
//! and counted, never an error to the caller and never fatal to the room.
//! Skips self-correct when the dead connection's disconnect cleanup runs.
//!
//! Ordering: one queue per connection, drained by one writer task, so
//! messages to a single participant arrive in the order fan-out was called
//! for that room. No ordering is guaranteed across participants.

use std::sync::Arc;

use metrics::counter;
use tracing::warn;

use syncwatch_core::protocol::ServerReply;

use crate::metrics::{WS_BROADCAST_DELIVERIES_TOTAL, WS_BROADCAST_DROPS_TOTAL};
use crate::registry::Participant;
use crate::websocket::connection::ClientConnection;

/// Deliver `reply` to every participant, skipping unwritable transports.
pub fn fan_out(participants: &[Participant], reply: &ServerReply) {
    let frame = match serde_json::to_string(reply) {
        Ok(json) => Arc::new(json),
        Err(error) => {
            warn!(error = %error, "failed to serialize broadcast payload");
            return;
        }
    };
    for participant in participants {
        if participant.conn.send(Arc::clone(&frame)) {
            counter!(WS_BROADCAST_DELIVERIES_TOTAL).increment(1);
        } else {
            counter!(WS_BROADCAST_DROPS_TOTAL).increment(1);
            warn!(
                conn_id = %participant.conn.id,
                name = %participant.name,
                total_drops = participant.conn.drop_count(),
                "skipped broadcast leg, outbound queue full or closed"
            );
        }
    }
}

/// Deliver `reply` to a single connection (request replies, control frames).
///
/// Same skip discipline as [`fan_out`]: an unwritable transport is logged,
/// not an error.
pub fn send_to(conn: &ClientConnection, reply: &ServerReply) {
    let frame = match serde_json::to_string(reply) {
        Ok(json) => Arc::new(json),
        Err(error) => {
            warn!(error = %error, "failed to serialize reply");
            return;
        }
    };
    if !conn.send(frame) {
        counter!(WS_BROADCAST_DROPS_TOTAL).increment(1);
        warn!(conn_id = %conn.id, "skipped reply, outbound queue full or closed");
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
