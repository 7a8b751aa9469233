//! Branded identifier types.
//!
//! [`ConnectionId`] is the opaque handle assigned to a transport connection
//! at accept time. All roster membership comparisons and removals go through
//! it, never through the transport object itself.
//!
//! [`RoomId`] is the validated room-code newtype: two groups of four decimal
//! digits separated by `-` (nine characters, separator at index 4). Shape
//! validation is a client-side gate — the coordinator keys rooms by opaque
//! non-empty strings and accepts whatever code the creating client chose.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identity of one transport connection.
///
/// Assigned once when the connection is accepted (UUID v7, so ids also sort
/// by accept time in logs). Two connections never share an id, which is what
/// makes roster removal on disconnect unambiguous.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// Mint a fresh connection id.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Total length of a room code, separator included.
pub const ROOM_CODE_LEN: usize = 9;

/// Byte index of the single `-` separator.
pub const ROOM_CODE_SEPARATOR_INDEX: usize = 4;

/// A validated room code: `dddd-dddd`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoomId(String);

impl RoomId {
    /// Parse and validate a room code.
    pub fn parse(code: &str) -> Result<Self, RoomIdError> {
        if code.len() != ROOM_CODE_LEN {
            return Err(RoomIdError::Length(code.len()));
        }
        for (i, c) in code.char_indices() {
            if i == ROOM_CODE_SEPARATOR_INDEX {
                if c != '-' {
                    return Err(RoomIdError::Separator);
                }
            } else if !c.is_ascii_digit() {
                return Err(RoomIdError::Digit(i));
            }
        }
        Ok(Self(code.to_owned()))
    }

    /// Generate a fresh random room code (`dddd-dddd`).
    ///
    /// Uniqueness is not guaranteed here; a collision with a live room is
    /// surfaced by the coordinator as an already-exists rejection.
    pub fn generate() -> Self {
        let mut rng = rand::rng();
        let mut code = String::with_capacity(ROOM_CODE_LEN);
        for i in 0..ROOM_CODE_LEN {
            if i == ROOM_CODE_SEPARATOR_INDEX {
                code.push('-');
            } else {
                code.push(char::from(b'0' + rng.random_range(0..10u8)));
            }
        }
        Self(code)
    }

    /// The code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RoomId {
    type Err = RoomIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for RoomId {
    type Error = RoomIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RoomId> for String {
    fn from(id: RoomId) -> Self {
        id.0
    }
}

/// Why a candidate room code failed validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RoomIdError {
    /// Wrong total length (expected nine characters).
    #[error("room code must be {ROOM_CODE_LEN} characters, got {0}")]
    Length(usize),
    /// The separator is missing or misplaced.
    #[error("room code must have '-' at index {ROOM_CODE_SEPARATOR_INDEX}")]
    Separator,
    /// A non-digit character outside the separator position.
    #[error("room code has a non-digit character at index {0}")]
    Digit(usize),
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
