//! One actor per WebSocket session.
//!
//! A session starts anonymous. The first `authenticate` frame binds it to
//! the path user; until then chat frames are refused and relayed traffic is
//! not delivered. Registry cleanup happens in `stopped`, whatever the close
//! reason.

use crate::registry::{SessionRegistry, SubscriberId};
use crate::services::chat::{self, OutgoingMessage};
use crate::websocket::frames::{error_frame, ChatFrame, ControlFrame, InboundFrame, OutboundFrame};
use actix::{
    fut, Actor, ActorContext, ActorFutureExt, AsyncContext, Handler, Message as ActixMessage,
    StreamHandler,
};
use actix_web_actors::ws;
use sqlx::PgPool;
use std::time::{Duration, Instant};
use uuid::Uuid;

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);
const CLIENT_TIMEOUT: Duration = Duration::from_secs(30);

/// A frame relayed from the registry; dropped while the session is
/// anonymous.
#[derive(ActixMessage)]
#[rtype(result = "()")]
pub struct RelayFrame(pub String);

pub struct WsSession {
    /// The user whose topic this session is subscribed to.
    topic_user_id: Uuid,
    /// Set once an `authenticate` frame passes.
    user: Option<Uuid>,
    subscriber_id: SubscriberId,
    registry: SessionRegistry,
    db: PgPool,
    hb: Instant,
}

impl WsSession {
    pub fn new(
        topic_user_id: Uuid,
        subscriber_id: SubscriberId,
        registry: SessionRegistry,
        db: PgPool,
    ) -> Self {
        Self {
            topic_user_id,
            user: None,
            subscriber_id,
            registry,
            db,
            hb: Instant::now(),
        }
    }

    fn heartbeat(&self, ctx: &mut ws::WebsocketContext<Self>) {
        ctx.run_interval(HEARTBEAT_INTERVAL, |act, ctx| {
            if Instant::now().duration_since(act.hb) > CLIENT_TIMEOUT {
                tracing::warn!(user_id = %act.topic_user_id, "WebSocket heartbeat timed out");
                ctx.stop();
                return;
            }
            ctx.ping(b"");
        });
    }

    fn handle_text(&mut self, text: &str, ctx: &mut ws::WebsocketContext<Self>) {
        let Some(frame) = InboundFrame::parse(text) else {
            ctx.text(error_frame("Invalid message format"));
            return;
        };

        match frame {
            InboundFrame::Control(ControlFrame::Authenticate { token }) => {
                self.authenticate(&token, ctx)
            }
            InboundFrame::Chat(chat) => self.relay_chat(chat, ctx),
        }
    }

    /// Token must be valid and belong to the path user; failure closes the
    /// session.
    fn authenticate(&mut self, token: &str, ctx: &mut ws::WebsocketContext<Self>) {
        match auth_core::jwt::user_id_from_token(token) {
            Ok(user_id) if user_id == self.topic_user_id => {
                self.user = Some(user_id);
                ctx.text(OutboundFrame::AuthenticationSuccessful.to_json());
            }
            Ok(other) => {
                tracing::warn!(
                    expected = %self.topic_user_id,
                    got = %other,
                    "WebSocket token for a different user"
                );
                ctx.text(error_frame("Token does not match this session"));
                ctx.close(None);
                ctx.stop();
            }
            Err(_) => {
                ctx.text(error_frame("Invalid authentication token"));
                ctx.close(None);
                ctx.stop();
            }
        }
    }

    fn relay_chat(&mut self, chat: ChatFrame, ctx: &mut ws::WebsocketContext<Self>) {
        let Some(sender_id) = self.user else {
            ctx.text(error_frame("Not authenticated"));
            return;
        };

        let (Some(content), Some(recipient_id)) = (chat.message.clone(), chat.recipient_id) else {
            ctx.text(error_frame("Both message and recipient_id are required"));
            return;
        };

        let message_type = chat
            .message_type
            .clone()
            .unwrap_or_else(|| "text".to_string());
        let db = self.db.clone();
        let registry = self.registry.clone();

        // Sends from one session must land in arrival order. `wait` parks
        // the mailbox until this send is stored and published, so a later
        // frame cannot overtake it.
        let send = fut::wrap_future::<_, Self>(async move {
            let outgoing = OutgoingMessage {
                sender_id,
                recipient_id,
                content: &content,
                message_type: &message_type,
                media_url: chat.media_url.as_deref(),
                media_type: chat.media_type.as_deref(),
            };

            chat::send_message(&db, &registry, &outgoing).await
        })
        .map(|result, _act, ctx| match result {
            Ok(saved) => ctx.text(OutboundFrame::message_sent(&saved).to_json()),
            Err(e) => ctx.text(error_frame(&e.relay_text())),
        });
        ctx.wait(send);
    }
}

impl Actor for WsSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        tracing::info!(user_id = %self.topic_user_id, "WebSocket session opened");
        self.heartbeat(ctx);
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        tracing::info!(user_id = %self.topic_user_id, "WebSocket session closed");

        let registry = self.registry.clone();
        let topic_user_id = self.topic_user_id;
        let subscriber_id = self.subscriber_id;
        actix::spawn(async move {
            registry.unsubscribe(topic_user_id, subscriber_id).await;
        });
    }
}

impl Handler<RelayFrame> for WsSession {
    type Result = ();

    fn handle(&mut self, msg: RelayFrame, ctx: &mut Self::Context) {
        // Anonymous sessions get nothing relayed to them
        if self.user.is_some() {
            ctx.text(msg.0);
        }
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for WsSession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(msg)) => {
                self.hb = Instant::now();
                ctx.pong(&msg);
            }
            Ok(ws::Message::Pong(_)) => {
                self.hb = Instant::now();
            }
            Ok(ws::Message::Text(text)) => self.handle_text(&text, ctx),
            Ok(ws::Message::Binary(_)) => {
                ctx.text(error_frame("Invalid message format"));
            }
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            Err(_) => ctx.stop(),
            _ => {}
        }
    }
}
