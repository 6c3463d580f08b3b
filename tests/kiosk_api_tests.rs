use std::time::Duration;

use actix_web::{http::StatusCode, test};
use serde_json::json;

mod common;
use common::{TestApp, TEST_PAYMENT_DELAY};

#[actix_web::test]
async fn test_kiosk_starts_on_home() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get().uri("/api/kiosk").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["screen"], "HOME");
    assert_eq!(body["amountDisplay"], "R$ 0,00");
    assert_eq!(body["canGoBack"], false);
}

#[actix_web::test]
async fn test_health_and_content() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "ok");

    let req = test::TestRequest::get().uri("/api/content").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["schedules"].as_array().unwrap().len(), 4);
    assert_eq!(body["products"][0]["price"], 500);
    assert_eq!(body["paymentConfig"]["cardMachineEnabled"], true);
}

#[actix_web::test]
async fn test_tithe_flow_over_http() {
    let test_app = TestApp::new();

    let body = test_app.send_event(json!({ "event": "select_tithe" })).await;
    assert_eq!(body["view"]["screen"], "VALUE_INPUT");
    assert_eq!(body["view"]["offerType"], "Dízimo");
    assert!(body.get("adminToken").is_none());

    for digit in [5, 0, 0] {
        test_app
            .send_event(json!({ "event": "amount_digit", "digit": digit }))
            .await;
    }
    let body = test_app.send_event(json!({ "event": "toggle_cpf" })).await;
    assert_eq!(body["view"]["amountDisplay"], "R$ 5,00");
    assert_eq!(body["view"]["cpfEnabled"], true);
    assert_eq!(body["view"]["canConfirmAmount"], true);

    test_app.send_event(json!({ "event": "confirm_amount" })).await;
    let body = test_app
        .send_event(json!({ "event": "select_payment_method", "method": "PIX" }))
        .await;
    assert_eq!(body["view"]["screen"], "PROCESSING");
    assert_eq!(
        body["view"]["processingStatus"],
        "Conectando à máquina (192.168.1.100)..."
    );

    actix_web::rt::time::sleep(TEST_PAYMENT_DELAY + Duration::from_millis(200)).await;

    let app = test::init_service(test_app.create_app()).await;
    let req = test::TestRequest::get().uri("/api/kiosk").to_request();
    let view: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(view["screen"], "SUCCESS");

    let body = test_app.send_event(json!({ "event": "back_to_start" })).await;
    assert_eq!(body["view"]["screen"], "HOME");
    assert_eq!(body["view"]["cpfEnabled"], false);
}

#[actix_web::test]
async fn test_pos_cart_over_http() {
    let test_app = TestApp::new();
    test_app.send_event(json!({ "event": "open_pos" })).await;

    test_app
        .send_event(json!({ "event": "add_to_cart", "product_id": "1" }))
        .await;
    test_app
        .send_event(json!({ "event": "add_to_cart", "product_id": "2" }))
        .await;
    let body = test_app
        .send_event(json!({ "event": "add_to_cart", "product_id": "2" }))
        .await;

    assert_eq!(body["view"]["cartTotalDisplay"], "R$ 19,00");
    assert_eq!(body["view"]["cart"][1]["quantity"], 2);
    assert_eq!(body["view"]["content"]["products"]["items"].as_array().unwrap().len(), 6);

    let body = test_app.send_event(json!({ "event": "checkout" })).await;
    assert_eq!(body["view"]["screen"], "PAYMENT_METHOD");
    assert_eq!(body["view"]["amountCents"], 1900);
}

#[actix_web::test]
async fn test_invalid_transition_is_conflict() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/kiosk/events")
        .set_json(json!({ "event": "confirm_amount" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert!(body["message"].is_string());
}

#[actix_web::test]
async fn test_unknown_product_is_not_found() {
    let test_app = TestApp::new();
    test_app.send_event(json!({ "event": "open_pos" })).await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/kiosk/events")
        .set_json(json!({ "event": "add_to_cart", "product_id": "999" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_malformed_event_is_bad_request() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/kiosk/events")
        .set_json(json!({ "event": "dance" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_wrong_passcode_stays_on_login() {
    let test_app = TestApp::new();
    test_app.send_event(json!({ "event": "open_admin_login" })).await;
    for digit in [9, 9, 9, 9, 9, 9] {
        test_app
            .send_event(json!({ "event": "passcode_digit", "digit": digit }))
            .await;
    }

    let body = test_app.send_event(json!({ "event": "submit_passcode" })).await;
    assert_eq!(body["view"]["screen"], "ADMIN_LOGIN");
    assert_eq!(body["view"]["adminError"], "Senha incorreta");
    assert_eq!(body["view"]["passcodeLength"], 0);
    assert!(body.get("adminToken").is_none());
}

#[actix_web::test]
async fn test_reset_returns_home() {
    let test_app = TestApp::new();
    test_app.send_event(json!({ "event": "select_offering" })).await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post().uri("/api/kiosk/reset").to_request();
    let view: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(view["screen"], "HOME");
}
