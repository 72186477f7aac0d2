use crate::db::{likes, posts};
use crate::error::{FeedError, Result};
use crate::routes::AppState;
use actix_web::{delete, post, web, HttpResponse};
use auth_core::AuthUser;
use serde_json::json;
use uuid::Uuid;

/// POST /posts/{id}/like — idempotent
#[post("/posts/{id}/like")]
pub async fn like_post(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    auth: AuthUser,
) -> Result<HttpResponse> {
    let post_id = path.into_inner();
    if posts::find_by_id(&state.db, post_id).await?.is_none() {
        return Err(FeedError::PostNotFound);
    }

    likes::like(&state.db, post_id, auth.id).await?;
    let like_count = likes::count_for_post(&state.db, post_id).await?;

    Ok(HttpResponse::Ok().json(json!({ "liked": true, "like_count": like_count })))
}

/// DELETE /posts/{id}/like — idempotent
#[delete("/posts/{id}/like")]
pub async fn unlike_post(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    auth: AuthUser,
) -> Result<HttpResponse> {
    let post_id = path.into_inner();
    if posts::find_by_id(&state.db, post_id).await?.is_none() {
        return Err(FeedError::PostNotFound);
    }

    likes::unlike(&state.db, post_id, auth.id).await?;
    let like_count = likes::count_for_post(&state.db, post_id).await?;

    Ok(HttpResponse::Ok().json(json!({ "liked": false, "like_count": like_count })))
}
