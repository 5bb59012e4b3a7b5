//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// Successful avatar upload response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadAvatarResponse {
    /// Public URL where the stored avatar is served
    pub url: String,
}

/// Error payload returned by the avatar endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub detail: String,
}

impl ErrorDetail {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}
