#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use actix_web::{test, App};
use serde_json::{json, Value};
use totem_kiosk::{
    auth::{AdminTokens, Argon2Passcode, JwtManager},
    handlers,
    repositories::ContentStore,
    services::SimulatedGateway,
    AppState,
};

pub const TEST_PASSCODE: &str = "123456";
pub const TEST_PAYMENT_DELAY: Duration = Duration::from_millis(50);

pub struct TestApp {
    pub state: AppState,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_store(ContentStore::with_builtin_content())
    }

    pub fn with_store(store: ContentStore) -> Self {
        let passcode = Argon2Passcode::new(TEST_PASSCODE).expect("test passcode is valid");
        let tokens = AdminTokens::new(
            JwtManager::new("test_secret_key"),
            chrono::Duration::minutes(30),
        );

        let state = AppState::new(
            Arc::new(store),
            Arc::new(SimulatedGateway::new(TEST_PAYMENT_DELAY)),
            Arc::new(passcode),
            tokens,
        );

        Self { state }
    }

    pub fn store(&self) -> &ContentStore {
        &self.state.store
    }

    pub fn create_app(&self) -> actix_web::App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let state = self.state.clone();
        App::new()
            .configure(move |cfg| state.register(cfg))
            .configure(handlers::configure)
    }

    /// Sends one kiosk event and returns the response body.
    pub async fn send_event(&self, event: Value) -> Value {
        let app = test::init_service(self.create_app()).await;
        let req = test::TestRequest::post()
            .uri("/api/kiosk/events")
            .set_json(event)
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success(), "event rejected: {}", resp.status());
        test::read_body_json(resp).await
    }

    /// Walks the kiosk from HOME through the passcode screen and returns
    /// the admin token.
    pub async fn login_and_get_token(&self) -> String {
        self.send_event(json!({ "event": "open_admin_login" })).await;
        for digit in TEST_PASSCODE.bytes().map(|b| b - b'0') {
            self.send_event(json!({ "event": "passcode_digit", "digit": digit }))
                .await;
        }
        let body = self.send_event(json!({ "event": "submit_passcode" })).await;

        assert_eq!(body["view"]["screen"], "ADMIN_DASHBOARD");
        body["adminToken"].as_str().unwrap().to_string()
    }

    /// Calls an admin route with the token and returns status and body.
    pub async fn admin_call(
        &self,
        method: &str,
        uri: &str,
        token: &str,
        body: Option<Value>,
    ) -> (actix_web::http::StatusCode, Value) {
        let app = test::init_service(self.create_app()).await;

        let req = match method {
            "GET" => test::TestRequest::get(),
            "PUT" => test::TestRequest::put(),
            _ => test::TestRequest::post(),
        }
        .uri(uri)
        .insert_header(("Authorization", format!("Bearer {}", token)));

        let req = match body {
            Some(body) => req.set_json(body),
            None => req,
        }
        .to_request();

        let resp = test::call_service(&app, req).await;
        let status = resp.status();
        let body: Value = test::read_body_json(resp).await;
        (status, body)
    }
}
