pub mod admin;
pub mod kiosk;

use std::sync::{Mutex, MutexGuard, PoisonError};

use actix_web::web;

use crate::services::AdminPanel;

// Re-export all handler functions for easy importing
pub use admin::*;
pub use kiosk::*;

pub(crate) fn lock_panel(panel: &Mutex<AdminPanel>) -> MutexGuard<'_, AdminPanel> {
    panel.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Registers every API route. Shared by the server and the test harness.
///
/// Config routes are registered before the `{collection}` routes so
/// `/api/admin/config/...` never reaches the collection handlers.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/health", web::get().to(kiosk::health))
        .route("/api/content", web::get().to(kiosk::content_snapshot))
        .route("/api/kiosk", web::get().to(kiosk::kiosk_view))
        .route("/api/kiosk/events", web::post().to(kiosk::kiosk_event))
        .route("/api/kiosk/reset", web::post().to(kiosk::kiosk_reset))
        .route("/api/admin/panel", web::get().to(admin::panel_view))
        .route("/api/admin/tab", web::post().to(admin::switch_tab))
        .route("/api/admin/confirm", web::post().to(admin::resolve_confirmation))
        .route("/api/admin/logout", web::post().to(admin::logout))
        .route("/api/admin/config/draft", web::put().to(admin::set_config_draft))
        .route("/api/admin/config/save", web::post().to(admin::save_config))
        .route("/api/admin/{collection}/draft", web::put().to(admin::set_draft))
        .route("/api/admin/{collection}/save", web::post().to(admin::save))
        .route("/api/admin/{collection}/cancel", web::post().to(admin::cancel_edit))
        .route("/api/admin/{collection}/{id}/edit", web::post().to(admin::edit))
        .route(
            "/api/admin/{collection}/{id}/delete",
            web::post().to(admin::request_delete),
        );
}
