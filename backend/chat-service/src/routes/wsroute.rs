use crate::routes::AppState;
use crate::websocket::session::{RelayFrame, WsSession};
use actix_web::{get, web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use uuid::Uuid;

/// GET /ws/{user_id}
///
/// Opens an anonymous session subscribed to the user's topic; the client
/// must send an `authenticate` frame before anything else works.
#[get("/ws/{user_id}")]
pub async fn ws_route(
    req: HttpRequest,
    stream: web::Payload,
    path: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let topic_user_id = path.into_inner();

    let (subscriber_id, mut rx) = state.registry.subscribe(topic_user_id).await;
    let session = WsSession::new(
        topic_user_id,
        subscriber_id,
        state.registry.clone(),
        state.db.clone(),
    );

    let (addr, resp) = ws::WsResponseBuilder::new(session, &req, stream).start_with_addr()?;

    // Bridge the registry receiver to the actor. The task ends when the
    // session unsubscribes in `stopped` and the sender side is dropped.
    tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            addr.do_send(RelayFrame(frame));
        }
    });

    Ok(resp)
}
