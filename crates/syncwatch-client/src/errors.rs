//! Client-side failures.

use thiserror::Error;

use syncwatch_core::ids::RoomIdError;

use crate::validate::MIN_NAME_LEN;

/// Why a client operation failed.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The WebSocket transport failed.
    #[error("transport error: {0}")]
    Transport(#[from] tokio_tungstenite::tungstenite::Error),

    /// The lookup API request failed.
    #[error("lookup request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A frame could not be encoded or decoded.
    #[error("frame codec error: {0}")]
    Codec(#[from] serde_json::Error),

    /// The server closed the connection.
    #[error("connection closed by server")]
    Closed,

    /// Every allowed connection attempt failed; the client is terminal and
    /// will not retry on its own.
    #[error("disconnected after {attempts} failed connection attempts")]
    Terminal {
        /// Attempts made, initial connect included.
        attempts: u32,
    },

    /// The room code does not match the `dddd-dddd` shape.
    #[error("invalid room code: {0}")]
    Code(#[from] RoomIdError),

    /// The display name is too short.
    #[error("name must be at least {MIN_NAME_LEN} characters long")]
    InvalidName,

    /// The link is not a fetchable URL.
    #[error("link is not a valid http(s) url")]
    InvalidLink,
}
