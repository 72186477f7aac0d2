use crate::db::{follows, users};
use crate::error::{IdentityError, Result};
use crate::models::PublicUser;
use crate::routes::AppState;
use crate::validators;
use actix_web::{get, patch, post, web, HttpResponse};
use auth_core::AuthUser;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

/// GET /users/{id}/profile
#[get("/users/{id}/profile")]
pub async fn get_profile(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    _auth: AuthUser,
) -> Result<HttpResponse> {
    let user = users::find_by_id(&state.db, path.into_inner())
        .await?
        .ok_or(IdentityError::UserNotFound)?;

    Ok(HttpResponse::Ok().json(PublicUser::from(user)))
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub department: Option<String>,
    pub graduation_year: Option<i32>,
    pub profile_picture_url: Option<String>,
}

/// PATCH /users/{id}/profile — owner only
#[patch("/users/{id}/profile")]
pub async fn update_profile(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    auth: AuthUser,
    body: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse> {
    let user_id = path.into_inner();
    if user_id != auth.id {
        return Err(IdentityError::Forbidden(
            "Cannot edit another user's profile".to_string(),
        ));
    }

    if let Some(dept) = &body.department {
        validators::validate_department(dept)?;
    }
    if let Some(year) = body.graduation_year {
        validators::validate_graduation_year(year)?;
    }

    let fields = users::UpdateProfileFields {
        first_name: body.first_name.clone(),
        last_name: body.last_name.clone(),
        department: body.department.clone(),
        graduation_year: body.graduation_year,
        profile_picture_url: body.profile_picture_url.clone(),
    };

    let user = users::update_profile(&state.db, user_id, &fields).await?;
    Ok(HttpResponse::Ok().json(PublicUser::from(user)))
}

/// POST /users/{id}/follow — toggles the follow edge
#[post("/users/{id}/follow")]
pub async fn toggle_follow(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    auth: AuthUser,
) -> Result<HttpResponse> {
    let followee_id = path.into_inner();

    if users::find_by_id(&state.db, followee_id).await?.is_none() {
        return Err(IdentityError::UserNotFound);
    }

    let following = if follows::is_following(&state.db, auth.id, followee_id).await? {
        follows::delete(&state.db, auth.id, followee_id).await?;
        false
    } else {
        follows::create(&state.db, auth.id, followee_id).await?;
        true
    };

    Ok(HttpResponse::Ok().json(json!({ "following": following })))
}
