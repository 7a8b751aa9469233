//! Pre-send form validation.
//!
//! These gates run client-side before an intent ever reaches the transport.
//! The coordinator only requires non-empty fields, so nothing here is
//! load-bearing for the server — it is the contract the UI promises its
//! users.

use reqwest::Url;

use crate::errors::ClientError;

/// Minimum display-name length.
pub const MIN_NAME_LEN: usize = 4;

/// A display name must be at least [`MIN_NAME_LEN`] characters.
pub fn name(name: &str) -> Result<(), ClientError> {
    if name.chars().count() < MIN_NAME_LEN {
        return Err(ClientError::InvalidName);
    }
    Ok(())
}

/// A link must parse as an absolute http(s) URL with a host.
pub fn link(link: &str) -> Result<(), ClientError> {
    let url = Url::parse(link).map_err(|_| ClientError::InvalidLink)?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(ClientError::InvalidLink);
    }
    Ok(())
}
