//! Protocol-level tests for the relay wire format and the session registry.

use chat_service::models::pair_key;
use chat_service::registry::SessionRegistry;
use chat_service::websocket::frames::{error_frame, ChatFrame, ControlFrame, InboundFrame};
use uuid::Uuid;

#[test]
fn authenticate_frame_tolerates_extra_fields() {
    let frame =
        InboundFrame::parse(r#"{"type":"authenticate","token":"abc","device":"phone"}"#).unwrap();
    assert!(matches!(
        frame,
        InboundFrame::Control(ControlFrame::Authenticate { .. })
    ));
}

#[test]
fn chat_frame_with_media_fields() {
    let recipient = Uuid::new_v4();
    let text = format!(
        r#"{{"message":"look","recipient_id":"{recipient}","message_type":"image",
            "media_url":"/media/a.png","media_type":"image/png"}}"#
    );

    match InboundFrame::parse(&text).unwrap() {
        InboundFrame::Chat(ChatFrame {
            message,
            recipient_id,
            message_type,
            media_url,
            media_type,
        }) => {
            assert_eq!(message.as_deref(), Some("look"));
            assert_eq!(recipient_id, Some(recipient));
            assert_eq!(message_type.as_deref(), Some("image"));
            assert_eq!(media_url.as_deref(), Some("/media/a.png"));
            assert_eq!(media_type.as_deref(), Some("image/png"));
        }
        other => panic!("unexpected frame: {other:?}"),
    }
}

#[test]
fn malformed_recipient_id_is_a_parse_failure() {
    assert!(InboundFrame::parse(r#"{"message":"hi","recipient_id":"not-a-uuid"}"#).is_none());
}

#[test]
fn error_frames_are_bare_objects() {
    let value: serde_json::Value =
        serde_json::from_str(&error_frame("Invalid message format")).unwrap();
    assert_eq!(
        value,
        serde_json::json!({ "error": "Invalid message format" })
    );
}

#[tokio::test]
async fn frames_are_delivered_in_publish_order() {
    let registry = SessionRegistry::new();
    let user = Uuid::new_v4();
    let (_id, mut rx) = registry.subscribe(user).await;

    for i in 0..3 {
        registry.publish(user, &format!("frame-{i}")).await;
    }

    for i in 0..3 {
        assert_eq!(rx.recv().await.unwrap(), format!("frame-{i}"));
    }
}

#[tokio::test]
async fn two_devices_both_receive_and_close_independently() {
    let registry = SessionRegistry::new();
    let user = Uuid::new_v4();

    let (phone_id, mut phone_rx) = registry.subscribe(user).await;
    let (_laptop_id, mut laptop_rx) = registry.subscribe(user).await;

    registry.publish(user, "hello").await;
    assert_eq!(phone_rx.recv().await.unwrap(), "hello");
    assert_eq!(laptop_rx.recv().await.unwrap(), "hello");

    registry.unsubscribe(user, phone_id).await;
    registry.publish(user, "again").await;
    assert_eq!(laptop_rx.recv().await.unwrap(), "again");
    assert!(phone_rx.recv().await.is_none());
}

#[test]
fn pair_key_matches_conversation_columns() {
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();

    let (low, high) = pair_key(a, b);
    assert!(low < high);
    assert_eq!((low, high), pair_key(b, a));
}
