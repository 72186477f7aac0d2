use crate::db::{comments, posts};
use crate::error::{FeedError, Result};
use crate::routes::AppState;
use actix_web::{delete, get, post, web, HttpResponse};
use auth_core::AuthUser;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// GET /posts/{id}/comments
#[get("/posts/{id}/comments")]
pub async fn list_comments(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    _auth: AuthUser,
) -> Result<HttpResponse> {
    let post_id = path.into_inner();
    if posts::find_by_id(&state.db, post_id).await?.is_none() {
        return Err(FeedError::PostNotFound);
    }

    let rows = comments::list_for_post(&state.db, post_id).await?;
    Ok(HttpResponse::Ok().json(rows))
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(length(min = 1))]
    pub content: String,
    pub parent_id: Option<Uuid>,
}

/// POST /posts/{id}/comments
#[post("/posts/{id}/comments")]
pub async fn create_comment(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    auth: AuthUser,
    body: web::Json<CreateCommentRequest>,
) -> Result<HttpResponse> {
    body.validate()?;

    let post_id = path.into_inner();
    if posts::find_by_id(&state.db, post_id).await?.is_none() {
        return Err(FeedError::PostNotFound);
    }

    let comment =
        comments::insert(&state.db, post_id, auth.id, &body.content, body.parent_id).await?;
    Ok(HttpResponse::Created().json(comment))
}

/// DELETE /comments/{id} — author only
#[delete("/comments/{id}")]
pub async fn delete_comment(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    auth: AuthUser,
) -> Result<HttpResponse> {
    comments::delete(&state.db, path.into_inner(), auth.id).await?;
    Ok(HttpResponse::NoContent().finish())
}
