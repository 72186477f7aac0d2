use crate::error::{ChatError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const MESSAGE_TYPES: [&str; 5] = ["text", "image", "video", "gif", "file"];

pub fn validate_message_type(message_type: &str) -> Result<()> {
    if MESSAGE_TYPES.contains(&message_type) {
        Ok(())
    } else {
        Err(ChatError::Validation(format!(
            "Unknown message type '{message_type}', expected one of {}",
            MESSAGE_TYPES.join(", ")
        )))
    }
}

/// Normalized unordered pair, matching the `(user_low, user_high)` columns.
pub fn pair_key(a: Uuid, b: Uuid) -> (Uuid, Uuid) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Conversation {
    pub id: Uuid,
    pub user_low: Uuid,
    pub user_high: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    pub fn other_participant(&self, user_id: Uuid) -> Uuid {
        if self.user_low == user_id {
            self.user_high
        } else {
            self.user_low
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Message {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub content: String,
    pub message_type: String,
    pub media_url: Option<String>,
    pub media_type: Option<String>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// One row of `GET /conversations`: the conversation, the other participant
/// and a last-message summary.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ConversationSummary {
    pub id: Uuid,
    pub other_user_id: Uuid,
    pub other_username: Option<String>,
    pub last_message: Option<String>,
    pub last_message_type: Option<String>,
    pub last_message_at: Option<DateTime<Utc>>,
    pub unread_count: i64,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_key_is_order_independent() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert_eq!(pair_key(a, b), pair_key(b, a));

        let (low, high) = pair_key(a, b);
        assert!(low < high);
    }

    #[test]
    fn test_other_participant() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let (low, high) = pair_key(a, b);
        let conversation = Conversation {
            id: Uuid::new_v4(),
            user_low: low,
            user_high: high,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert_eq!(conversation.other_participant(low), high);
        assert_eq!(conversation.other_participant(high), low);
    }

    #[test]
    fn test_validate_message_type() {
        for t in MESSAGE_TYPES {
            assert!(validate_message_type(t).is_ok());
        }
        assert!(validate_message_type("audio").is_err());
    }
}
