//! Wire protocol for the coordination transport and the lookup API.
//!
//! One JSON object per text frame. Field names follow the wire contract
//! exactly (`room-id`, `statusCode`), with serde renames keeping the Rust
//! side idiomatic. The lookup envelope carries its payload as a
//! JSON-*string* `body` — the consuming UI decodes it with a nested parse,
//! so the envelope is preserved verbatim.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::CoordinatorError;
use crate::ids::RoomId;

/// A client-submitted request over the persistent connection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "action")]
pub enum ClientIntent {
    /// Create a room anchored to `link`, with the sender as sole participant.
    #[serde(rename = "create-group")]
    CreateGroup {
        /// Room code chosen by the creating client.
        #[serde(rename = "room-id")]
        room_id: String,
        /// The shared resource the room is anchored to.
        link: String,
        /// Display name of the creator.
        name: String,
    },
    /// Join an existing room.
    #[serde(rename = "join")]
    Join {
        /// Room code to join.
        #[serde(rename = "room-id")]
        room_id: String,
        /// Display name of the joiner.
        name: String,
    },
    /// Liveness probe; answered with a pong control frame.
    #[serde(rename = "ping")]
    Ping,
}

impl ClientIntent {
    /// Parse one inbound text frame.
    ///
    /// Fields that are absent coalesce to the empty string — the coordinator
    /// rejects empties as a validation failure, so "missing" and "empty"
    /// produce the same reply. A frame that is not a JSON object with a
    /// string `action` is malformed; a recognized-shape frame with an
    /// unrecognized action tag is reported as such, tag included.
    pub fn parse(text: &str) -> Result<Self, CoordinatorError> {
        let frame: Value =
            serde_json::from_str(text).map_err(|_| CoordinatorError::Malformed)?;
        let Some(action) = frame.get("action").and_then(Value::as_str) else {
            return Err(CoordinatorError::Malformed);
        };
        match action {
            "create-group" => Ok(Self::CreateGroup {
                room_id: string_field(&frame, "room-id"),
                link: string_field(&frame, "link"),
                name: string_field(&frame, "name"),
            }),
            "join" => Ok(Self::Join {
                room_id: string_field(&frame, "room-id"),
                name: string_field(&frame, "name"),
            }),
            "ping" => Ok(Self::Ping),
            other => Err(CoordinatorError::UnknownAction(other.to_owned())),
        }
    }
}

fn string_field(frame: &Value, key: &str) -> String {
    frame
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned()
}

/// A coordinator-to-client frame.
///
/// Untagged on the wire: replies are distinguished by shape, exactly as the
/// consuming UI expects (`status` + `message`, `status` + `names`, or an
/// `action` control frame).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ServerReply {
    /// Out-of-band control frame (greeting ping, pong).
    Control {
        /// Control action tag (`ping` or `pong`).
        action: String,
        /// Human-readable note.
        message: String,
    },
    /// The full join-ordered roster of a room, broadcast after membership
    /// changes.
    Roster {
        /// Always 200.
        status: u16,
        /// Display names in join order.
        names: Vec<String>,
    },
    /// A terminal status reply to a single request.
    Status {
        /// Wire status code (200, 400, 404, 500).
        status: u16,
        /// Reply text.
        message: String,
    },
}

impl ServerReply {
    /// Greeting sent to every connection on accept.
    pub fn connected() -> Self {
        Self::Control {
            action: "ping".to_owned(),
            message: "Connected to server".to_owned(),
        }
    }

    /// Reply to a client liveness probe.
    pub fn pong() -> Self {
        Self::Control {
            action: "pong".to_owned(),
            message: "Server received ping".to_owned(),
        }
    }

    /// Acknowledgment to the creator of a fresh room.
    pub fn room_created() -> Self {
        Self::Status {
            status: 200,
            message: "Room created successfully".to_owned(),
        }
    }

    /// Roster broadcast payload.
    pub fn roster(names: Vec<String>) -> Self {
        Self::Roster { status: 200, names }
    }

    /// The status-bearing rejection for a failed intent.
    pub fn rejection(error: &CoordinatorError) -> Self {
        Self::Status {
            status: error.status(),
            message: error.to_string(),
        }
    }
}

/// Action tag of the directory existence check.
pub const LOOKUP_ACTION: &str = "groups_exists";

/// Request body of the lookup API.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupRequest {
    /// Must be [`LOOKUP_ACTION`] to be honored.
    pub action: String,
    /// The room code being checked.
    pub uuid: String,
}

impl LookupRequest {
    /// An existence check for `room_id`.
    pub fn exists(room_id: &RoomId) -> Self {
        Self {
            action: LOOKUP_ACTION.to_owned(),
            uuid: room_id.as_str().to_owned(),
        }
    }
}

/// A directory hit: the stored link and the code it was stored under.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    /// The link the room was created around.
    pub link: String,
    /// The room code.
    pub uuid: String,
}

/// Response envelope of the lookup API.
///
/// The payload rides in `body` as a JSON string; the outer `statusCode` is
/// 200 (found), 404 (not found), or 400 (unrecognized action).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupEnvelope {
    /// Outer status of the lookup.
    pub status_code: u16,
    /// JSON-encoded payload string.
    pub body: String,
}

impl LookupEnvelope {
    /// Envelope for a directory hit.
    pub fn found(entry: &DirectoryEntry) -> Self {
        Self {
            status_code: 200,
            body: serde_json::json!({ "data": { "Item": entry } }).to_string(),
        }
    }

    /// Envelope for a miss.
    pub fn not_found() -> Self {
        Self {
            status_code: 404,
            body: serde_json::json!({ "data": null }).to_string(),
        }
    }

    /// Envelope for a request whose action tag is not the existence check.
    pub fn invalid_action() -> Self {
        Self {
            status_code: 400,
            body: serde_json::json!({ "error": "Invalid action" }).to_string(),
        }
    }

    /// Decode the nested body into the entry it carries, if any.
    pub fn decode(&self) -> Result<Option<DirectoryEntry>, serde_json::Error> {
        let body: Value = serde_json::from_str(&self.body)?;
        match body.get("data").and_then(|data| data.get("Item")) {
            Some(item) => Ok(Some(serde_json::from_value(item.clone())?)),
            None => Ok(None),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn create_intent_serializes_with_wire_names() {
        let intent = ClientIntent::CreateGroup {
            room_id: "1234-5678".into(),
            link: "http://example.com/a".into(),
            name: "Alice".into(),
        };
        let frame: Value = serde_json::to_value(&intent).unwrap();
        assert_eq!(frame["action"], "create-group");
        assert_eq!(frame["room-id"], "1234-5678");
        assert_eq!(frame["link"], "http://example.com/a");
        assert_eq!(frame["name"], "Alice");
    }

    #[test]
    fn ping_serializes_as_bare_action() {
        let frame = serde_json::to_string(&ClientIntent::Ping).unwrap();
        assert_eq!(frame, r#"{"action":"ping"}"#);
    }

    #[test]
    fn parse_round_trips_join() {
        let text = r#"{"action":"join","room-id":"1234-5678","name":"Bob"}"#;
        let intent = ClientIntent::parse(text).unwrap();
        assert_eq!(
            intent,
            ClientIntent::Join {
                room_id: "1234-5678".into(),
                name: "Bob".into(),
            }
        );
    }

    #[test]
    fn parse_coalesces_missing_fields_to_empty() {
        let intent = ClientIntent::parse(r#"{"action":"create-group"}"#).unwrap();
        assert_eq!(
            intent,
            ClientIntent::CreateGroup {
                room_id: String::new(),
                link: String::new(),
                name: String::new(),
            }
        );
    }

    #[test]
    fn parse_rejects_unknown_action_with_tag() {
        assert_matches!(
            ClientIntent::parse(r#"{"action":"dance"}"#),
            Err(CoordinatorError::UnknownAction(tag)) if tag == "dance"
        );
    }

    #[test]
    fn parse_rejects_garbage_as_malformed() {
        assert_matches!(
            ClientIntent::parse("not json"),
            Err(CoordinatorError::Malformed)
        );
        assert_matches!(
            ClientIntent::parse(r#"{"no":"action"}"#),
            Err(CoordinatorError::Malformed)
        );
        assert_matches!(
            ClientIntent::parse(r#"{"action":42}"#),
            Err(CoordinatorError::Malformed)
        );
    }

    #[test]
    fn replies_serialize_to_expected_shapes() {
        let created: Value = serde_json::to_value(ServerReply::room_created()).unwrap();
        assert_eq!(created["status"], 200);
        assert_eq!(created["message"], "Room created successfully");

        let roster: Value =
            serde_json::to_value(ServerReply::roster(vec!["Alice".into(), "Bob".into()]))
                .unwrap();
        assert_eq!(roster["status"], 200);
        assert_eq!(roster["names"][1], "Bob");

        let pong: Value = serde_json::to_value(ServerReply::pong()).unwrap();
        assert_eq!(pong["action"], "pong");
    }

    #[test]
    fn rejection_carries_status_and_message() {
        let reply = ServerReply::rejection(&CoordinatorError::NotFound);
        assert_eq!(
            reply,
            ServerReply::Status {
                status: 404,
                message: "Room not found".into(),
            }
        );
    }

    #[test]
    fn untagged_reply_deserializes_by_shape() {
        let roster: ServerReply =
            serde_json::from_str(r#"{"status":200,"names":["Alice"]}"#).unwrap();
        assert_matches!(roster, ServerReply::Roster { names, .. } if names == vec!["Alice"]);

        let status: ServerReply =
            serde_json::from_str(r#"{"status":404,"message":"Room not found"}"#).unwrap();
        assert_matches!(status, ServerReply::Status { status: 404, .. });

        let control: ServerReply =
            serde_json::from_str(r#"{"action":"ping","message":"Connected to server"}"#)
                .unwrap();
        assert_matches!(control, ServerReply::Control { action, .. } if action == "ping");
    }

    #[test]
    fn lookup_envelope_round_trips_found() {
        let entry = DirectoryEntry {
            link: "http://example.com/a".into(),
            uuid: "1234-5678".into(),
        };
        let envelope = LookupEnvelope::found(&entry);
        assert_eq!(envelope.status_code, 200);
        assert_eq!(envelope.decode().unwrap(), Some(entry));
    }

    #[test]
    fn lookup_envelope_not_found_decodes_to_none() {
        let envelope = LookupEnvelope::not_found();
        assert_eq!(envelope.status_code, 404);
        assert_eq!(envelope.decode().unwrap(), None);
    }

    #[test]
    fn lookup_envelope_uses_camel_case_status() {
        let json = serde_json::to_string(&LookupEnvelope::not_found()).unwrap();
        assert!(json.contains("statusCode"), "envelope was {json}");
    }

    #[test]
    fn lookup_request_shape() {
        let req = LookupRequest::exists(&RoomId::parse("1234-5678").unwrap());
        let value: Value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["action"], "groups_exists");
        assert_eq!(value["uuid"], "1234-5678");
    }
}
