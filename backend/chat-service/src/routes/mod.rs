pub mod conversations;
pub mod media;
pub mod wsroute;

use crate::config::MediaSettings;
use crate::registry::SessionRegistry;
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub registry: SessionRegistry,
    pub media: MediaSettings,
}

pub fn configure(cfg: &mut actix_web::web::ServiceConfig) {
    cfg.service(wsroute::ws_route)
        .service(conversations::list_conversations)
        .service(conversations::conversation_messages)
        .service(media::upload_media);
}
