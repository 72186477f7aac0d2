use crate::db::posts::{self, NewPost, UpdatePostFields};
use crate::error::{FeedError, Result};
use crate::models;
use crate::routes::AppState;
use actix_web::{delete, get, patch, post, web, HttpResponse};
use auth_core::AuthUser;
use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(length(min = 1))]
    pub content: String,
    #[serde(default = "default_post_type")]
    pub post_type: String,
    pub image_url: Option<String>,
    pub external_link: Option<String>,
    #[serde(default = "default_is_public")]
    pub is_public: bool,
}

fn default_post_type() -> String {
    "text".to_string()
}

fn default_is_public() -> bool {
    true
}

/// POST /posts
#[post("/posts")]
pub async fn create_post(
    state: web::Data<AppState>,
    auth: AuthUser,
    body: web::Json<CreatePostRequest>,
) -> Result<HttpResponse> {
    body.validate()?;
    models::validate_post_type(&body.post_type)?;

    let post = posts::insert(
        &state.db,
        &NewPost {
            author_id: auth.id,
            title: &body.title,
            content: &body.content,
            post_type: &body.post_type,
            image_url: body.image_url.as_deref(),
            external_link: body.external_link.as_deref(),
            is_public: body.is_public,
        },
    )
    .await?;

    Ok(HttpResponse::Created().json(post))
}

/// GET /posts — everything the caller may see, newest first
#[get("/posts")]
pub async fn list_posts(state: web::Data<AppState>, auth: AuthUser) -> Result<HttpResponse> {
    let rows = posts::list_visible(&state.db, auth.id).await?;
    Ok(HttpResponse::Ok().json(rows))
}

/// GET /posts/{id} — counts as a view
#[get("/posts/{id}")]
pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<uuid::Uuid>,
    auth: AuthUser,
) -> Result<HttpResponse> {
    let post = posts::retrieve(&state.db, path.into_inner(), auth.id)
        .await?
        .ok_or(FeedError::PostNotFound)?;

    Ok(HttpResponse::Ok().json(post))
}

#[derive(Debug, Deserialize)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub image_url: Option<String>,
    pub external_link: Option<String>,
    pub is_public: Option<bool>,
}

/// PATCH /posts/{id} — author only
#[patch("/posts/{id}")]
pub async fn update_post(
    state: web::Data<AppState>,
    path: web::Path<uuid::Uuid>,
    auth: AuthUser,
    body: web::Json<UpdatePostRequest>,
) -> Result<HttpResponse> {
    let fields = UpdatePostFields {
        title: body.title.clone(),
        content: body.content.clone(),
        image_url: body.image_url.clone(),
        external_link: body.external_link.clone(),
        is_public: body.is_public,
    };

    let post = posts::update(&state.db, path.into_inner(), auth.id, &fields).await?;
    Ok(HttpResponse::Ok().json(post))
}

/// DELETE /posts/{id} — author only
#[delete("/posts/{id}")]
pub async fn delete_post(
    state: web::Data<AppState>,
    path: web::Path<uuid::Uuid>,
    auth: AuthUser,
) -> Result<HttpResponse> {
    posts::delete(&state.db, path.into_inner(), auth.id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// GET /posts/mine
#[get("/posts/mine")]
pub async fn my_posts(state: web::Data<AppState>, auth: AuthUser) -> Result<HttpResponse> {
    let rows = posts::by_author(&state.db, auth.id).await?;
    Ok(HttpResponse::Ok().json(rows))
}

/// GET /feed — followed users plus self, newest first
#[get("/feed")]
pub async fn user_feed(state: web::Data<AppState>, auth: AuthUser) -> Result<HttpResponse> {
    let rows = posts::feed_for(&state.db, auth.id).await?;
    Ok(HttpResponse::Ok().json(rows))
}

/// GET /posts/trending — last week's public posts ranked by engagement
#[get("/posts/trending")]
pub async fn trending_posts(state: web::Data<AppState>, _auth: AuthUser) -> Result<HttpResponse> {
    let rows = posts::trending(&state.db).await?;
    Ok(HttpResponse::Ok().json(rows))
}
