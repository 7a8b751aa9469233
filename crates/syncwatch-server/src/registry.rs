//! The session coordinator: the authoritative room store.
//!
//! One `RwLock`-guarded map is the single serialization boundary for every
//! structural and roster mutation, so a join racing a disconnect on the same
//! room resolves to exactly one ordering, and the roster each member
//! receives always reflects that ordering. The directory (`room code →
//! link`) is a read view over the same map: a room and its directory entry
//! appear and disappear in the same map operation, which is what makes the
//! existence check atomic with joinability.
//!
//! Rooms are keyed by opaque non-empty strings. Code-shape validation is a
//! client-side gate; the coordinator accepts whatever code the creating
//! client chose.

use std::collections::HashMap;
use std::sync::Arc;

use metrics::{counter, gauge};
use tokio::sync::RwLock;
use tracing::{debug, info};

use syncwatch_core::errors::CoordinatorError;
use syncwatch_core::ids::ConnectionId;
use syncwatch_core::protocol::ServerReply;

use crate::metrics::{ROOM_JOINS_TOTAL, ROOMS_ACTIVE, ROOMS_CLOSED_TOTAL, ROOMS_CREATED_TOTAL};
use crate::websocket::broadcast;
use crate::websocket::connection::ClientConnection;

/// One member of a room.
pub struct Participant {
    /// The member's transport handle.
    pub conn: Arc<ClientConnection>,
    /// Client-supplied display name. Duplicates are permitted.
    pub name: String,
}

/// A live room: the link it was created around and its join-ordered roster.
struct Room {
    link: String,
    participants: Vec<Participant>,
}

impl Room {
    fn roster(&self) -> Vec<String> {
        self.participants.iter().map(|p| p.name.clone()).collect()
    }
}

/// What a disconnect cleanup found.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DisconnectOutcome {
    /// The connection was a member of no room; nothing changed.
    NotAMember,
    /// Removed; the room lives on and the remaining members were notified.
    Departed {
        /// Room the connection left.
        room_id: String,
        /// Roster after removal, in join order.
        remaining: Vec<String>,
    },
    /// Removed and the roster emptied; the room and its directory entry are
    /// gone.
    RoomClosed {
        /// The reclaimed room id, now free for reuse.
        room_id: String,
    },
}

/// The authoritative set of live rooms.
pub struct RoomRegistry {
    rooms: RwLock<HashMap<String, Room>>,
}

impl RoomRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
        }
    }

    /// Create a room with the sender as its sole participant.
    ///
    /// The room and its directory entry become visible in the same map
    /// insert. No broadcast: the creator is alone and gets the success
    /// acknowledgment from the dispatch layer.
    pub async fn create_room(
        &self,
        conn: Arc<ClientConnection>,
        room_id: &str,
        link: &str,
        name: &str,
    ) -> Result<(), CoordinatorError> {
        if room_id.is_empty() || link.is_empty() || name.is_empty() {
            return Err(CoordinatorError::Validation);
        }

        let mut rooms = self.rooms.write().await;
        if rooms.contains_key(room_id) {
            debug!(room_id, "create rejected, room already exists");
            return Err(CoordinatorError::AlreadyExists);
        }
        let _ = rooms.insert(
            room_id.to_owned(),
            Room {
                link: link.to_owned(),
                participants: vec![Participant { conn, name: name.to_owned() }],
            },
        );

        counter!(ROOMS_CREATED_TOTAL).increment(1);
        gauge!(ROOMS_ACTIVE).increment(1.0);
        info!(room_id, link, "room created");
        Ok(())
    }

    /// Append a participant to a live room and notify every member.
    ///
    /// The broadcast runs under the same write lock as the roster append, so
    /// all members observe membership changes in one serialized order.
    /// Returns the post-join roster.
    pub async fn join_room(
        &self,
        conn: Arc<ClientConnection>,
        room_id: &str,
        name: &str,
    ) -> Result<Vec<String>, CoordinatorError> {
        if room_id.is_empty() || name.is_empty() {
            return Err(CoordinatorError::Validation);
        }

        let mut rooms = self.rooms.write().await;
        let room = rooms.get_mut(room_id).ok_or(CoordinatorError::NotFound)?;
        room.participants.push(Participant { conn, name: name.to_owned() });

        let roster = room.roster();
        broadcast::fan_out(&room.participants, &ServerReply::roster(roster.clone()));

        counter!(ROOM_JOINS_TOTAL).increment(1);
        info!(room_id, name, members = roster.len(), "participant joined");
        Ok(roster)
    }

    /// Remove a closed connection from whichever room holds it.
    ///
    /// At most one membership exists per connection. Emptying a room deletes
    /// it (and with it the directory entry) in the same map operation;
    /// otherwise the remaining members receive the updated roster. Unknown
    /// connections are a strict no-op.
    pub async fn handle_disconnect(&self, id: &ConnectionId) -> DisconnectOutcome {
        let mut rooms = self.rooms.write().await;

        let mut affected: Option<(String, Option<Vec<String>>)> = None;
        for (room_id, room) in rooms.iter_mut() {
            let Some(pos) = room.participants.iter().position(|p| p.conn.id == *id) else {
                continue;
            };
            let _ = room.participants.remove(pos);
            if room.participants.is_empty() {
                affected = Some((room_id.clone(), None));
            } else {
                let remaining = room.roster();
                broadcast::fan_out(&room.participants, &ServerReply::roster(remaining.clone()));
                affected = Some((room_id.clone(), Some(remaining)));
            }
            break;
        }

        match affected {
            None => DisconnectOutcome::NotAMember,
            Some((room_id, None)) => {
                let _ = rooms.remove(&room_id);
                counter!(ROOMS_CLOSED_TOTAL).increment(1);
                gauge!(ROOMS_ACTIVE).decrement(1.0);
                info!(room_id, "room closed, last participant left");
                DisconnectOutcome::RoomClosed { room_id }
            }
            Some((room_id, Some(remaining))) => {
                info!(room_id, members = remaining.len(), "participant left");
                DisconnectOutcome::Departed { room_id, remaining }
            }
        }
    }

    /// Directory read: the link a live room was created around.
    pub async fn lookup(&self, room_id: &str) -> Option<String> {
        let rooms = self.rooms.read().await;
        rooms.get(room_id).map(|room| room.link.clone())
    }

    /// Ids of every live room.
    pub async fn room_ids(&self) -> Vec<String> {
        let rooms = self.rooms.read().await;
        rooms.keys().cloned().collect()
    }

    /// Number of live rooms.
    pub async fn room_count(&self) -> usize {
        let rooms = self.rooms.read().await;
        rooms.len()
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
