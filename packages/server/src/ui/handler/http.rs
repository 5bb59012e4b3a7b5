//! HTTP API endpoint handlers.
//!
//! The avatar endpoints are keyed by the caller's source address; a caller
//! whose address never opened a WebSocket has no identity and is rejected
//! before any file is written.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use axum::{
    Json,
    extract::{ConnectInfo, Multipart, State},
    http::StatusCode,
};

use crate::{
    infrastructure::dto::http::{ErrorDetail, UploadAvatarResponse},
    infrastructure::dto::websocket::UserEntry,
    ui::state::AppState,
};

/// Whitelisted avatar content types and their stored extensions
const ALLOWED_AVATAR_TYPES: &[(&str, &str)] = &[
    ("image/png", "png"),
    ("image/jpeg", "jpg"),
    ("image/webp", "webp"),
    ("image/gif", "gif"),
];

/// Avatar payload cap (2 MiB)
pub const MAX_AVATAR_BYTES: usize = 2 * 1024 * 1024;

type ApiError = (StatusCode, Json<ErrorDetail>);

fn api_error(status: StatusCode, detail: &str) -> ApiError {
    (status, Json(ErrorDetail::new(detail)))
}

/// Stored file extension for a whitelisted content type
fn extension_for(content_type: &str) -> Option<&'static str> {
    ALLOWED_AVATAR_TYPES
        .iter()
        .find(|(mime, _)| *mime == content_type)
        .map(|(_, ext)| *ext)
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get the currently active users
pub async fn get_active_users(State(state): State<Arc<AppState>>) -> Json<Vec<UserEntry>> {
    let users = state.list_active_users_usecase.execute().await;
    Json(users.into_iter().map(UserEntry::from).collect())
}

/// POST /upload-avatar - attach an avatar to the caller's identity
pub async fn upload_avatar(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    mut multipart: Multipart,
) -> Result<Json<UploadAvatarResponse>, ApiError> {
    // 1. The caller must already have an identity binding
    let identity = state
        .update_avatar_usecase
        .identity_for_address(addr.ip())
        .await
        .map_err(|e| api_error(StatusCode::NOT_FOUND, &e.to_string()))?;

    // 2. Locate the file field
    let mut file_field = None;
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::warn!("Malformed multipart request from {}: {}", addr, e);
        api_error(StatusCode::BAD_REQUEST, "malformed multipart request")
    })? {
        if field.name() == Some("file") {
            file_field = Some(field);
            break;
        }
    }
    let field =
        file_field.ok_or_else(|| api_error(StatusCode::BAD_REQUEST, "missing 'file' field"))?;

    // 3. Content type whitelist
    let content_type = field.content_type().unwrap_or_default().to_string();
    let ext = extension_for(&content_type).ok_or_else(|| {
        tracing::warn!("Rejected avatar with content type '{}'", content_type);
        api_error(StatusCode::UNSUPPORTED_MEDIA_TYPE, "unsupported image type")
    })?;

    // 4. Size cap
    let data = field.bytes().await.map_err(|e| {
        tracing::warn!("Failed to read avatar payload from {}: {}", addr, e);
        api_error(StatusCode::BAD_REQUEST, "failed to read upload")
    })?;
    if data.len() > MAX_AVATAR_BYTES {
        return Err(api_error(
            StatusCode::PAYLOAD_TOO_LARGE,
            "avatar exceeds 2 MiB",
        ));
    }

    // 5. Store the file first; the registry only mutates on success
    let file_name = format!("{}.{}", identity, ext);
    if let Err(e) = store_avatar_file(&state.avatar_dir, &file_name, &data).await {
        tracing::error!("Failed to store avatar '{}': {}", file_name, e);
        return Err(api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "failed to store avatar",
        ));
    }
    // a re-upload with a different image type leaves no stale file behind
    remove_stored_avatars(&state.avatar_dir, identity.as_str(), Some(ext)).await;

    // 6. Update the registry and notify everyone
    let url = format!("/avatars/{}", file_name);
    state
        .update_avatar_usecase
        .execute(&identity, Some(url.clone()))
        .await;
    tracing::info!("Avatar for identity '{}' stored at {}", identity, url);

    Ok(Json(UploadAvatarResponse { url }))
}

/// POST /remove-avatar - clear the caller's avatar
pub async fn remove_avatar(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let identity = state
        .update_avatar_usecase
        .identity_for_address(addr.ip())
        .await
        .map_err(|e| api_error(StatusCode::NOT_FOUND, &e.to_string()))?;

    state.update_avatar_usecase.execute(&identity, None).await;
    remove_stored_avatars(&state.avatar_dir, identity.as_str(), None).await;
    tracing::info!("Avatar for identity '{}' removed", identity);

    Ok(Json(serde_json::json!({"status": "ok"})))
}

async fn store_avatar_file(dir: &Path, file_name: &str, data: &[u8]) -> std::io::Result<()> {
    tokio::fs::create_dir_all(dir).await?;
    tokio::fs::write(dir.join(file_name), data).await
}

/// Best-effort removal of an identity's stored avatar files, optionally
/// keeping the one with `keep_ext`
async fn remove_stored_avatars(dir: &Path, identity_id: &str, keep_ext: Option<&str>) {
    for (_, ext) in ALLOWED_AVATAR_TYPES {
        if keep_ext == Some(*ext) {
            continue;
        }
        let path = dir.join(format!("{}.{}", identity_id, ext));
        if tokio::fs::remove_file(&path).await.is_ok() {
            tracing::debug!("Removed stored avatar {:?}", path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_for_whitelisted_types() {
        // given / when / then:
        assert_eq!(extension_for("image/png"), Some("png"));
        assert_eq!(extension_for("image/jpeg"), Some("jpg"));
        assert_eq!(extension_for("image/webp"), Some("webp"));
        assert_eq!(extension_for("image/gif"), Some("gif"));
    }

    #[test]
    fn test_extension_for_rejects_everything_else() {
        // given / when / then:
        assert_eq!(extension_for("image/svg+xml"), None);
        assert_eq!(extension_for("text/html"), None);
        assert_eq!(extension_for(""), None);
    }

    #[tokio::test]
    async fn test_store_and_remove_avatar_files() {
        // given:
        let dir = tempfile::tempdir().unwrap();
        let avatar_dir = dir.path().join("avatars");

        // when: store a png, then re-upload as jpg
        store_avatar_file(&avatar_dir, "abcd1234.png", b"png bytes")
            .await
            .unwrap();
        store_avatar_file(&avatar_dir, "abcd1234.jpg", b"jpg bytes")
            .await
            .unwrap();
        remove_stored_avatars(&avatar_dir, "abcd1234", Some("jpg")).await;

        // then: only the jpg remains
        assert!(!avatar_dir.join("abcd1234.png").exists());
        assert!(avatar_dir.join("abcd1234.jpg").exists());

        // when: full removal
        remove_stored_avatars(&avatar_dir, "abcd1234", None).await;

        // then:
        assert!(!avatar_dir.join("abcd1234.jpg").exists());
    }
}
