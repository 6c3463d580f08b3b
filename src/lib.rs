pub mod auth;
pub mod config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod openapi_config;
pub mod repositories;
pub mod services;

use std::sync::{Arc, Mutex};

use actix_web::web;

use crate::auth::{AdminTokens, Argon2Passcode, JwtManager, PasscodeVerifier};
use crate::config::AppConfig;
use crate::models::ServiceError;
use crate::repositories::ContentStore;
use crate::services::{AdminPanel, KioskSession, PaymentGateway, SimulatedGateway};

/// Shared application state handed to every actix worker.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ContentStore>,
    pub session: web::Data<KioskSession>,
    pub panel: web::Data<Mutex<AdminPanel>>,
    pub tokens: web::Data<AdminTokens>,
}

impl AppState {
    pub fn from_config(config: &AppConfig) -> Result<Self, ServiceError> {
        let passcode: Arc<dyn PasscodeVerifier> =
            Arc::new(Argon2Passcode::new(&config.admin_passcode)?);
        let gateway: Arc<dyn PaymentGateway> = Arc::new(SimulatedGateway::new(config.payment_delay));
        let tokens = AdminTokens::new(JwtManager::new(&config.jwt_secret), config.admin_token_ttl);

        Ok(Self::new(
            Arc::new(ContentStore::with_builtin_content()),
            gateway,
            passcode,
            tokens,
        ))
    }

    pub fn new(
        store: Arc<ContentStore>,
        gateway: Arc<dyn PaymentGateway>,
        passcode: Arc<dyn PasscodeVerifier>,
        tokens: AdminTokens,
    ) -> Self {
        let session = KioskSession::new(Arc::clone(&store), gateway, passcode);
        let panel = AdminPanel::new(Arc::clone(&store));

        Self {
            store,
            session: web::Data::new(session),
            panel: web::Data::new(Mutex::new(panel)),
            tokens: web::Data::new(tokens),
        }
    }

    /// Registers the shared state as app data.
    pub fn register(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.session.clone())
            .app_data(self.panel.clone())
            .app_data(self.tokens.clone());
    }
}
