use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Pending,
    Accepted,
    Rejected,
}

impl ConnectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionStatus::Pending => "pending",
            ConnectionStatus::Accepted => "accepted",
            ConnectionStatus::Rejected => "rejected",
        }
    }

    pub fn from_db(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(ConnectionStatus::Pending),
            "accepted" => Some(ConnectionStatus::Accepted),
            "rejected" => Some(ConnectionStatus::Rejected),
            _ => None,
        }
    }
}

/// One row per unordered user pair; `user_low < user_high` by construction,
/// `requester_id`/`addressee_id` preserve who asked whom.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Connection {
    pub id: Uuid,
    pub requester_id: Uuid,
    pub addressee_id: Uuid,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Normalize a pair to its (low, high) key
pub fn pair_key(a: Uuid, b: Uuid) -> (Uuid, Uuid) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_key_is_order_insensitive() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert_eq!(pair_key(a, b), pair_key(b, a));
        let (low, high) = pair_key(a, b);
        assert!(low < high);
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            ConnectionStatus::Pending,
            ConnectionStatus::Accepted,
            ConnectionStatus::Rejected,
        ] {
            assert_eq!(ConnectionStatus::from_db(status.as_str()), Some(status));
        }
        assert_eq!(ConnectionStatus::from_db("blocked"), None);
    }
}
