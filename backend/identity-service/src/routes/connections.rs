use crate::db::connections;
use crate::error::{IdentityError, Result};
use crate::models::ConnectionStatus;
use crate::routes::AppState;
use actix_web::{get, post, web, HttpResponse};
use auth_core::AuthUser;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct ConnectionRequestBody {
    pub user_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct ConnectionResponse {
    pub id: Uuid,
    pub requester_id: Uuid,
    pub addressee_id: Uuid,
    pub status: String,
}

impl From<crate::models::Connection> for ConnectionResponse {
    fn from(c: crate::models::Connection) -> Self {
        Self {
            id: c.id,
            requester_id: c.requester_id,
            addressee_id: c.addressee_id,
            status: c.status,
        }
    }
}

/// POST /connections/request
#[post("/connections/request")]
pub async fn request_connection(
    state: web::Data<AppState>,
    auth: AuthUser,
    body: web::Json<ConnectionRequestBody>,
) -> Result<HttpResponse> {
    let connection = connections::request(&state.db, auth.id, body.user_id).await?;
    Ok(HttpResponse::Created().json(ConnectionResponse::from(connection)))
}

#[derive(Debug, Deserialize)]
pub struct RespondBody {
    pub action: String, // "accept" | "reject"
}

/// POST /connections/{id}/respond — addressee only
#[post("/connections/{id}/respond")]
pub async fn respond_connection(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    auth: AuthUser,
    body: web::Json<RespondBody>,
) -> Result<HttpResponse> {
    let status = match body.action.as_str() {
        "accept" => ConnectionStatus::Accepted,
        "reject" => ConnectionStatus::Rejected,
        other => {
            return Err(IdentityError::Validation(format!(
                "Unknown action '{other}', expected accept or reject"
            )))
        }
    };

    let connection = connections::respond(&state.db, path.into_inner(), auth.id, status).await?;
    Ok(HttpResponse::Ok().json(ConnectionResponse::from(connection)))
}

/// GET /connections — accepted connections for the caller
#[get("/connections")]
pub async fn list_accepted(state: web::Data<AppState>, auth: AuthUser) -> Result<HttpResponse> {
    let rows = connections::accepted_for(&state.db, auth.id).await?;
    let out: Vec<ConnectionResponse> = rows.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(out))
}

/// GET /connections/pending — incoming requests awaiting the caller
#[get("/connections/pending")]
pub async fn list_pending(state: web::Data<AppState>, auth: AuthUser) -> Result<HttpResponse> {
    let rows = connections::pending_for(&state.db, auth.id).await?;
    let out: Vec<ConnectionResponse> = rows.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(out))
}

/// GET /connections/status/{user_id} — the Connection Gate as a read endpoint
#[get("/connections/status/{user_id}")]
pub async fn connection_status(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    auth: AuthUser,
) -> Result<HttpResponse> {
    let connected = connections::is_connected(&state.db, auth.id, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "connected": connected })))
}
