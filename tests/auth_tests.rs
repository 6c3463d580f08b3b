use actix_web::{http::StatusCode, test};
use chrono::Duration;
use serde_json::json;

use totem_kiosk::auth::{
    extract_token_from_header, AdminTokens, Argon2Passcode, JwtManager, PasscodeVerifier,
    ADMIN_SUBJECT,
};
use totem_kiosk::models::ServiceError;

mod common;
use common::TestApp;

#[::core::prelude::v1::test]
fn test_passcode_must_be_six_digits() {
    for bad in ["12345", "1234567", "12a456", ""] {
        assert!(matches!(
            Argon2Passcode::new(bad),
            Err(ServiceError::ValidationError(_))
        ));
    }
}

#[::core::prelude::v1::test]
fn test_passcode_verification() {
    let passcode = Argon2Passcode::new("246810").unwrap();
    assert!(passcode.verify("246810"));
    assert!(!passcode.verify("246811"));
    assert!(!passcode.verify(""));
}

#[::core::prelude::v1::test]
fn test_issued_token_verifies() {
    let tokens = AdminTokens::new(JwtManager::new("secret"), Duration::minutes(5));
    let issued = tokens.issue().unwrap();

    assert_eq!(issued.expires_in, 300);
    let claims = tokens.verify(&issued.token).unwrap();
    assert_eq!(claims.sub, ADMIN_SUBJECT);
}

#[::core::prelude::v1::test]
fn test_revoked_token_is_rejected() {
    let tokens = AdminTokens::new(JwtManager::new("secret"), Duration::minutes(5));
    let issued = tokens.issue().unwrap();

    tokens.revoke();
    assert!(matches!(
        tokens.verify(&issued.token),
        Err(ServiceError::AuthenticationError(_))
    ));
}

#[::core::prelude::v1::test]
fn test_new_login_replaces_previous_session() {
    let tokens = AdminTokens::new(JwtManager::new("secret"), Duration::minutes(5));
    let first = tokens.issue().unwrap();
    let second = tokens.issue().unwrap();

    assert!(tokens.verify(&first.token).is_err());
    assert!(tokens.verify(&second.token).is_ok());
}

#[::core::prelude::v1::test]
fn test_token_signed_with_other_secret_is_rejected() {
    let tokens = AdminTokens::new(JwtManager::new("secret"), Duration::minutes(5));
    tokens.issue().unwrap();

    let forged = JwtManager::new("other")
        .generate_token(ADMIN_SUBJECT, "session", Duration::minutes(5))
        .unwrap();
    assert!(tokens.verify(&forged).is_err());
}

#[::core::prelude::v1::test]
fn test_expired_token_is_rejected() {
    let tokens = AdminTokens::new(JwtManager::new("secret"), Duration::minutes(-10));
    let issued = tokens.issue().unwrap();
    assert!(tokens.verify(&issued.token).is_err());
}

#[actix_web::test]
async fn test_extract_bearer_token() {
    let req = test::TestRequest::default()
        .insert_header(("Authorization", "Bearer abc.def"))
        .to_http_request();
    assert_eq!(extract_token_from_header(&req).as_deref(), Some("abc.def"));

    let req = test::TestRequest::default()
        .insert_header(("Authorization", "Basic abc"))
        .to_http_request();
    assert_eq!(extract_token_from_header(&req), None);
}

#[actix_web::test]
async fn test_protected_endpoint_without_token() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/admin/schedules/save")
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_protected_endpoint_with_invalid_token() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::put()
        .uri("/api/admin/config/draft")
        .insert_header(("Authorization", "Bearer invalid_token"))
        .set_json(json!({ "pixKey": "x" }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(test_app.store().payment_config().pix_key, "12.345.678/0001-90");
}
