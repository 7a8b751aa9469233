//! The coordinator's failure taxonomy.
//!
//! Every intent-level failure is terminal for that single request, surfaced
//! synchronously to the originating connection as a status-bearing reply,
//! and never fatal to the process or to other sessions. The display string
//! of each variant is exactly the `message` field the wire reply carries.

use thiserror::Error;

/// What went wrong with one client intent.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CoordinatorError {
    /// A required intent field is missing or empty.
    #[error("Missing required fields")]
    Validation,

    /// A create intent named a room id that is already live.
    #[error("Room already exists")]
    AlreadyExists,

    /// A join intent or lookup named a room id with no live room.
    #[error("Room not found")]
    NotFound,

    /// The frame is not parseable as an intent.
    #[error("Error processing message")]
    Malformed,

    /// The frame parsed, but its action tag matches no operation.
    #[error("Unknown action: {0}")]
    UnknownAction(String),
}

impl CoordinatorError {
    /// The wire status code this failure is reported with.
    ///
    /// Malformed frames get a status distinct from the request-level 400/404
    /// rejections so callers can tell the failure kinds apart.
    pub fn status(&self) -> u16 {
        match self {
            Self::Validation | Self::AlreadyExists | Self::UnknownAction(_) => 400,
            Self::NotFound => 404,
            Self::Malformed => 500,
        }
    }
}
