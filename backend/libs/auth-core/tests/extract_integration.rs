use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::test::TestRequest;
use actix_web::FromRequest;
use auth_core::{jwt, AuthUser};
use std::sync::Once;
use uuid::Uuid;

static INIT: Once = Once::new();

fn init_keys() {
    INIT.call_once(|| {
        jwt::initialize("an-integration-test-secret-of-enough-length").unwrap();
    });
}

#[actix_web::test]
async fn bearer_token_resolves_to_the_token_user() {
    init_keys();

    let user_id = Uuid::new_v4();
    let token = jwt::generate_access_token(user_id, "user@linkup.dev").unwrap();

    let req = TestRequest::default()
        .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
        .to_http_request();

    let user = AuthUser::from_request(&req, &mut Payload::None)
        .await
        .unwrap();
    assert_eq!(user.id, user_id);
}

#[actix_web::test]
async fn missing_header_is_rejected() {
    init_keys();

    let req = TestRequest::default().to_http_request();
    assert!(AuthUser::from_request(&req, &mut Payload::None)
        .await
        .is_err());
}

#[actix_web::test]
async fn refresh_token_is_rejected() {
    init_keys();

    let token = jwt::generate_refresh_token(Uuid::new_v4(), "user@linkup.dev").unwrap();

    let req = TestRequest::default()
        .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
        .to_http_request();
    assert!(AuthUser::from_request(&req, &mut Payload::None)
        .await
        .is_err());
}

#[actix_web::test]
async fn garbage_token_is_rejected() {
    init_keys();

    let req = TestRequest::default()
        .insert_header((header::AUTHORIZATION, "Bearer not-a-jwt"))
        .to_http_request();
    assert!(AuthUser::from_request(&req, &mut Payload::None)
        .await
        .is_err());
}
