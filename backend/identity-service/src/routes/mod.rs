pub mod auth;
pub mod connections;
pub mod users;

use crate::services::{email::EmailService, oauth::GoogleOAuthClient};
use sqlx::PgPool;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub email: EmailService,
    pub oauth: GoogleOAuthClient,
}

pub fn configure(cfg: &mut actix_web::web::ServiceConfig) {
    cfg.service(auth::register)
        .service(auth::login)
        .service(auth::me)
        .service(auth::google_auth)
        .service(auth::verify_email)
        .service(auth::forgot_password)
        .service(auth::reset_password)
        .service(users::get_profile)
        .service(users::update_profile)
        .service(users::toggle_follow)
        .service(connections::request_connection)
        .service(connections::respond_connection)
        .service(connections::list_accepted)
        .service(connections::list_pending)
        .service(connections::connection_status);
}
