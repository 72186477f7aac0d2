use crate::db::gate;
use crate::error::{ChatError, Result};
use crate::routes::AppState;
use crate::services::chat::{self, OutgoingMessage};
use actix_multipart::Multipart;
use actix_web::{post, web, HttpResponse};
use auth_core::AuthUser;
use futures_util::StreamExt;
use serde_json::json;
use std::path::Path;
use uuid::Uuid;

const MAX_FILE_SIZE: usize = 50 * 1024 * 1024; // 50MB

#[derive(Default)]
struct UploadForm {
    file_name: Option<String>,
    file_mime: Option<String>,
    file_bytes: Vec<u8>,
    recipient_id: Option<Uuid>,
    message_type: Option<String>,
    media_type: Option<String>,
    content: Option<String>,
}

async fn read_form(mut payload: Multipart) -> Result<UploadForm> {
    let mut form = UploadForm::default();

    while let Some(item) = payload.next().await {
        let mut field =
            item.map_err(|e| ChatError::Validation(format!("Invalid multipart payload: {e}")))?;
        let name = field.name().to_string();

        let mut data = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk
                .map_err(|e| ChatError::Validation(format!("Invalid multipart payload: {e}")))?;
            data.extend_from_slice(&chunk);
            if name == "media_file" && data.len() > MAX_FILE_SIZE {
                return Err(ChatError::Validation("File too large".to_string()));
            }
        }

        match name.as_str() {
            "media_file" => {
                form.file_name = field
                    .content_disposition()
                    .get_filename()
                    .map(|s| s.to_string());
                form.file_mime = field.content_type().map(|m| m.to_string());
                form.file_bytes = data;
            }
            "recipient_id" => {
                let text = String::from_utf8(data)
                    .map_err(|_| ChatError::Validation("Invalid recipient_id".to_string()))?;
                form.recipient_id = Some(
                    text.trim()
                        .parse()
                        .map_err(|_| ChatError::Validation("Invalid recipient_id".to_string()))?,
                );
            }
            "message_type" => {
                form.message_type = String::from_utf8(data).ok().map(|s| s.trim().to_string());
            }
            "media_type" => {
                form.media_type = String::from_utf8(data).ok().map(|s| s.trim().to_string());
            }
            "content" => {
                form.content = String::from_utf8(data).ok();
            }
            _ => {}
        }
    }

    Ok(form)
}

/// A message carrying only an attachment still needs body text.
fn default_content(content: Option<String>, message_type: &str) -> String {
    content.unwrap_or_else(|| format!("Sent a {message_type}"))
}

/// Keeps the original extension but never the original name.
fn stored_file_name(original: Option<&str>) -> String {
    let extension = original
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .filter(|ext| ext.len() <= 10 && ext.chars().all(|c| c.is_ascii_alphanumeric()));

    match extension {
        Some(ext) => format!("{}.{}", Uuid::new_v4(), ext.to_ascii_lowercase()),
        None => Uuid::new_v4().to_string(),
    }
}

/// POST /upload-media
///
/// Multipart form: `media_file`, `recipient_id`, `message_type`, optional
/// `media_type` and `content`. Gate-checked through the shared send path,
/// which also relays the persisted message to the recipient.
#[post("/upload-media")]
pub async fn upload_media(
    state: web::Data<AppState>,
    auth: AuthUser,
    payload: Multipart,
) -> Result<HttpResponse> {
    let form = read_form(payload).await?;

    if form.file_bytes.is_empty() {
        return Err(ChatError::Validation("media_file is required".to_string()));
    }
    let recipient_id = form
        .recipient_id
        .ok_or_else(|| ChatError::Validation("recipient_id is required".to_string()))?;
    let message_type = form
        .message_type
        .ok_or_else(|| ChatError::Validation("message_type is required".to_string()))?;

    let media_type = form.media_type.or(form.file_mime);
    let content = default_content(form.content, &message_type);

    // An unconnected sender must not reach the disk at all; the shared send
    // path checks again when the message is stored.
    if !gate::is_connected(&state.db, auth.id, recipient_id).await? {
        return Err(ChatError::Forbidden(
            "You can only message your connections".to_string(),
        ));
    }

    let file_name = stored_file_name(form.file_name.as_deref());
    let media_root = Path::new(&state.media.root);
    tokio::fs::create_dir_all(media_root).await?;
    let stored_path = media_root.join(&file_name);
    tokio::fs::write(&stored_path, &form.file_bytes).await?;

    let media_url = format!(
        "{}/{}",
        state.media.public_base.trim_end_matches('/'),
        file_name
    );

    let message = match chat::send_message(
        &state.db,
        &state.registry,
        &OutgoingMessage {
            sender_id: auth.id,
            recipient_id,
            content: &content,
            message_type: &message_type,
            media_url: Some(&media_url),
            media_type: media_type.as_deref(),
        },
    )
    .await
    {
        Ok(message) => message,
        Err(e) => {
            // The file is unreachable without a message row pointing at it
            if let Err(io_err) = tokio::fs::remove_file(&stored_path).await {
                tracing::warn!(path = %stored_path.display(), error = %io_err, "Failed to remove orphaned upload");
            }
            return Err(e);
        }
    };

    Ok(HttpResponse::Created().json(json!({
        "content": message.content,
        "media_url": message.media_url,
        "message_type": message.message_type,
        "media_type": message.media_type,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_file_name_keeps_extension_only() {
        let name = stored_file_name(Some("holiday photo.JPG"));
        assert!(name.ends_with(".jpg"));
        assert!(!name.contains("holiday"));
    }

    #[test]
    fn test_stored_file_name_drops_suspicious_extension() {
        let name = stored_file_name(Some("evil.sh;rm -rf"));
        assert!(!name.contains(';'));
        assert_eq!(name.matches('.').count(), 0);
    }

    #[test]
    fn test_stored_file_name_without_original() {
        let name = stored_file_name(None);
        assert_eq!(name.len(), 36);
    }

    #[test]
    fn test_default_content_describes_attachment() {
        assert_eq!(default_content(None, "image"), "Sent a image");
        assert_eq!(default_content(None, "video"), "Sent a video");
    }

    #[test]
    fn test_default_content_keeps_caption() {
        assert_eq!(
            default_content(Some("look at this".to_string()), "image"),
            "look at this"
        );
    }
}
