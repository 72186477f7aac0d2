//! The single send path shared by the relay and the media upload route.

use crate::db::{conversations, gate, messages};
use crate::error::{ChatError, Result};
use crate::models::{self, Message};
use crate::registry::SessionRegistry;
use crate::websocket::frames::OutboundFrame;
use sqlx::PgPool;
use uuid::Uuid;

pub struct OutgoingMessage<'a> {
    pub sender_id: Uuid,
    pub recipient_id: Uuid,
    pub content: &'a str,
    pub message_type: &'a str,
    pub media_url: Option<&'a str>,
    pub media_type: Option<&'a str>,
}

/// Gate check, conversation resolution, persistence, then a single publish
/// to the recipient's topic. The returned message is what the caller acks
/// with; delivery to the recipient is best-effort and online-only.
pub async fn send_message(
    pool: &PgPool,
    registry: &SessionRegistry,
    outgoing: &OutgoingMessage<'_>,
) -> Result<Message> {
    if outgoing.sender_id == outgoing.recipient_id {
        return Err(ChatError::Validation(
            "Cannot send a message to yourself".to_string(),
        ));
    }
    models::validate_message_type(outgoing.message_type)?;

    if !gate::is_connected(pool, outgoing.sender_id, outgoing.recipient_id).await? {
        return Err(ChatError::Forbidden(
            "You can only message your connections".to_string(),
        ));
    }

    let conversation =
        conversations::get_or_create(pool, outgoing.sender_id, outgoing.recipient_id).await?;

    let message = messages::insert(
        pool,
        &messages::NewMessage {
            conversation_id: conversation.id,
            sender_id: outgoing.sender_id,
            receiver_id: outgoing.recipient_id,
            content: outgoing.content,
            message_type: outgoing.message_type,
            media_url: outgoing.media_url,
            media_type: outgoing.media_type,
        },
    )
    .await?;

    registry
        .publish(
            outgoing.recipient_id,
            &OutboundFrame::chat_message(&message).to_json(),
        )
        .await;

    Ok(message)
}
