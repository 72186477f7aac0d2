use crate::db::{conversations, gate, messages};
use crate::error::{ChatError, Result};
use crate::routes::AppState;
use actix_web::{get, web, HttpResponse};
use auth_core::AuthUser;
use serde_json::json;
use uuid::Uuid;

/// GET /conversations — most recently active first
#[get("/conversations")]
pub async fn list_conversations(
    state: web::Data<AppState>,
    auth: AuthUser,
) -> Result<HttpResponse> {
    let rows = conversations::list_for_user(&state.db, auth.id).await?;
    Ok(HttpResponse::Ok().json(rows))
}

/// GET /messages/{user_id}
///
/// Gate-checked; resolves the conversation with the other user, returns its
/// messages in creation order and marks the other party's messages read.
#[get("/messages/{user_id}")]
pub async fn conversation_messages(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    auth: AuthUser,
) -> Result<HttpResponse> {
    let other_id = path.into_inner();
    if other_id == auth.id {
        return Err(ChatError::Validation(
            "Cannot open a conversation with yourself".to_string(),
        ));
    }

    if !gate::is_connected(&state.db, auth.id, other_id).await? {
        return Err(ChatError::Forbidden(
            "You can only message your connections".to_string(),
        ));
    }

    let conversation = conversations::get_or_create(&state.db, auth.id, other_id).await?;
    let rows = messages::list_for_conversation(&state.db, conversation.id).await?;
    messages::mark_read(&state.db, conversation.id, auth.id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "conversation_id": conversation.id,
        "messages": rows,
    })))
}
