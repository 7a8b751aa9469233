//! Pre-join directory lookup over the HTTP API.

use tracing::debug;

use syncwatch_core::ids::RoomId;
use syncwatch_core::protocol::{DirectoryEntry, LookupEnvelope, LookupRequest};

use crate::errors::ClientError;

/// Client for the room existence check a UI performs before sending a join
/// intent.
#[derive(Clone, Debug)]
pub struct DirectoryClient {
    http: reqwest::Client,
    endpoint: String,
}

impl DirectoryClient {
    /// A client posting to `api_endpoint`.
    pub fn new(api_endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: api_endpoint.into(),
        }
    }

    /// Does `code` name a live room?
    ///
    /// `Some(entry)` carries the stored link; `None` means no live room, in
    /// which case a join intent would be answered with not-found anyway.
    pub async fn exists(&self, code: &RoomId) -> Result<Option<DirectoryEntry>, ClientError> {
        let envelope: LookupEnvelope = self
            .http
            .post(&self.endpoint)
            .json(&LookupRequest::exists(code))
            .send()
            .await?
            .json()
            .await?;
        debug!(code = %code, status = envelope.status_code, "directory lookup");
        Ok(envelope.decode()?)
    }
}
