//! Relay wire format.
//!
//! Inbound frames are either a control frame carrying a `type` tag
//! (currently only `authenticate`) or a chat frame identified by its
//! payload fields. Outbound frames all carry a `type` tag except the bare
//! `{"error": ...}` frame.

use crate::models::Message;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControlFrame {
    Authenticate { token: String },
}

/// Chat payload; `message` and `recipient_id` are validated by the session
/// so a missing field is a validation error rather than a parse error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatFrame {
    pub message: Option<String>,
    pub recipient_id: Option<Uuid>,
    pub message_type: Option<String>,
    pub media_url: Option<String>,
    pub media_type: Option<String>,
}

#[derive(Debug)]
pub enum InboundFrame {
    Control(ControlFrame),
    Chat(ChatFrame),
}

impl InboundFrame {
    /// `None` means the text was not a JSON object at all.
    pub fn parse(text: &str) -> Option<InboundFrame> {
        let value: serde_json::Value = serde_json::from_str(text).ok()?;
        if !value.is_object() {
            return None;
        }

        if value.get("type").is_some() {
            let control = serde_json::from_value::<ControlFrame>(value).ok()?;
            return Some(InboundFrame::Control(control));
        }

        let chat = serde_json::from_value::<ChatFrame>(value).ok()?;
        Some(InboundFrame::Chat(chat))
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundFrame {
    AuthenticationSuccessful,
    MessageSent {
        message: String,
        message_type: String,
        media_url: Option<String>,
        media_type: Option<String>,
        timestamp: DateTime<Utc>,
    },
    ChatMessage {
        message: String,
        sender_id: Uuid,
        message_type: String,
        media_url: Option<String>,
        media_type: Option<String>,
        timestamp: DateTime<Utc>,
    },
}

impl OutboundFrame {
    pub fn message_sent(message: &Message) -> Self {
        OutboundFrame::MessageSent {
            message: message.content.clone(),
            message_type: message.message_type.clone(),
            media_url: message.media_url.clone(),
            media_type: message.media_type.clone(),
            timestamp: message.created_at,
        }
    }

    pub fn chat_message(message: &Message) -> Self {
        OutboundFrame::ChatMessage {
            message: message.content.clone(),
            sender_id: message.sender_id,
            message_type: message.message_type.clone(),
            media_url: message.media_url.clone(),
            media_type: message.media_type.clone(),
            timestamp: message.created_at,
        }
    }

    pub fn to_json(&self) -> String {
        // Serialization of a tagged enum of plain fields cannot fail
        serde_json::to_string(self).unwrap_or_else(|_| error_frame("Internal error"))
    }
}

pub fn error_frame(message: &str) -> String {
    json!({ "error": message }).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_authenticate() {
        let frame = InboundFrame::parse(r#"{"type":"authenticate","token":"abc"}"#).unwrap();
        match frame {
            InboundFrame::Control(ControlFrame::Authenticate { token }) => {
                assert_eq!(token, "abc");
            }
            other => panic!("unexpected frame: {other:?}"),
        }
    }

    #[test]
    fn test_parse_chat_frame() {
        let recipient = Uuid::new_v4();
        let text = format!(r#"{{"message":"hi","recipient_id":"{recipient}"}}"#);

        let frame = InboundFrame::parse(&text).unwrap();
        match frame {
            InboundFrame::Chat(chat) => {
                assert_eq!(chat.message.as_deref(), Some("hi"));
                assert_eq!(chat.recipient_id, Some(recipient));
                assert!(chat.message_type.is_none());
            }
            other => panic!("unexpected frame: {other:?}"),
        }
    }

    #[test]
    fn test_parse_chat_frame_with_missing_fields_still_parses() {
        // Field presence is the session's validation concern, not parsing's
        let frame = InboundFrame::parse(r#"{"message":"hi"}"#).unwrap();
        match frame {
            InboundFrame::Chat(chat) => assert!(chat.recipient_id.is_none()),
            other => panic!("unexpected frame: {other:?}"),
        }
    }

    #[test]
    fn test_parse_rejects_non_json() {
        assert!(InboundFrame::parse("not json").is_none());
        assert!(InboundFrame::parse("[1,2,3]").is_none());
    }

    #[test]
    fn test_parse_rejects_unknown_control_type() {
        assert!(InboundFrame::parse(r#"{"type":"subscribe"}"#).is_none());
    }

    #[test]
    fn test_authentication_successful_tag() {
        let json = OutboundFrame::AuthenticationSuccessful.to_json();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["type"], "authentication_successful");
    }

    #[test]
    fn test_chat_message_frame_shape() {
        let message = Message {
            id: Uuid::new_v4(),
            conversation_id: Uuid::new_v4(),
            sender_id: Uuid::new_v4(),
            receiver_id: Uuid::new_v4(),
            content: "hello".to_string(),
            message_type: "text".to_string(),
            media_url: None,
            media_type: None,
            is_read: false,
            created_at: Utc::now(),
        };

        let json = OutboundFrame::chat_message(&message).to_json();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["type"], "chat_message");
        assert_eq!(value["message"], "hello");
        assert_eq!(value["sender_id"], message.sender_id.to_string());

        let json = OutboundFrame::message_sent(&message).to_json();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["type"], "message_sent");
        assert!(value.get("sender_id").is_none());
    }

    #[test]
    fn test_error_frame_shape() {
        let value: serde_json::Value =
            serde_json::from_str(&error_frame("Not authenticated")).unwrap();
        assert_eq!(value["error"], "Not authenticated");
        assert!(value.get("type").is_none());
    }
}
