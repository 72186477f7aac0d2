//! Request extractor for the authenticated caller
//!
//! Handlers take `AuthUser` as a parameter; extraction reads the
//! `Authorization: Bearer` header and validates the token, so a route cannot
//! accidentally skip authentication.

use actix_web::{dev::Payload, error::ErrorUnauthorized, FromRequest, HttpRequest};
use futures::future::{ready, Ready};
use uuid::Uuid;

use crate::jwt;

/// Authenticated user resolved from a validated access token
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub id: Uuid,
}

impl FromRequest for AuthUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = req
            .headers()
            .get(actix_web::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "));

        let result = match token {
            None => Err(ErrorUnauthorized("Missing bearer token")),
            Some(token) => jwt::user_id_from_token(token)
                .map(|id| AuthUser { id })
                .map_err(|e| {
                    tracing::warn!("JWT validation failed: {e}");
                    ErrorUnauthorized("Invalid token")
                }),
        };

        ready(result)
    }
}
