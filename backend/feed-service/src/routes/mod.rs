pub mod comments;
pub mod likes;
pub mod posts;

use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
}

pub fn configure(cfg: &mut actix_web::web::ServiceConfig) {
    // Literal paths before `/posts/{id}` so they are not captured as ids
    cfg.service(posts::trending_posts)
        .service(posts::my_posts)
        .service(posts::user_feed)
        .service(posts::create_post)
        .service(posts::list_posts)
        .service(posts::get_post)
        .service(posts::update_post)
        .service(posts::delete_post)
        .service(comments::list_comments)
        .service(comments::create_comment)
        .service(comments::delete_comment)
        .service(likes::like_post)
        .service(likes::unlike_post);
}
