use std::sync::Mutex;

use actix_web::{web, HttpResponse, Result};
use utoipa;

use crate::auth::AdminTokens;
use crate::handlers::lock_panel;
use crate::models::{ApiResponse, ErrorResponse, HealthResponse, KioskEventResponse, ServiceError};
use crate::repositories::ContentSnapshot;
use crate::services::{AdminPanel, FlowEffect, KioskEvent, KioskSession, KioskView};

#[utoipa::path(
    get,
    path = "/api/kiosk",
    responses(
        (status = 200, description = "Current kiosk screen", body = KioskView)
    ),
    security()
)]
pub async fn kiosk_view(session: web::Data<KioskSession>) -> Result<HttpResponse, ServiceError> {
    Ok(HttpResponse::Ok().json(session.view()))
}

#[utoipa::path(
    post,
    path = "/api/kiosk/events",
    request_body = KioskEvent,
    responses(
        (status = 200, description = "Event applied; carries an admin token when the passcode was accepted", body = KioskEventResponse),
        (status = 400, description = "Malformed event", body = ErrorResponse),
        (status = 404, description = "Referenced record not found", body = ErrorResponse),
        (status = 409, description = "Event not available on the current screen", body = ErrorResponse)
    ),
    security()
)]
pub async fn kiosk_event(
    session: web::Data<KioskSession>,
    panel: web::Data<Mutex<AdminPanel>>,
    tokens: web::Data<AdminTokens>,
    event: web::Json<KioskEvent>,
) -> Result<HttpResponse, ServiceError> {
    let result = session.dispatch(event.into_inner())?;

    let mut response = KioskEventResponse {
        success: true,
        view: result.view,
        admin_token: None,
        expires_in: None,
    };

    match result.effect {
        FlowEffect::AdminAuthenticated => {
            lock_panel(&panel).reset();
            let issued = tokens.issue()?;
            response.admin_token = Some(issued.token);
            response.expires_in = Some(issued.expires_in);
        }
        FlowEffect::AdminLoggedOut => tokens.revoke(),
        FlowEffect::None | FlowEffect::StartCharge(_) | FlowEffect::CancelCharge => {}
    }

    Ok(HttpResponse::Ok().json(response))
}

#[utoipa::path(
    post,
    path = "/api/kiosk/reset",
    responses(
        (status = 200, description = "Flow returned to HOME; any pending charge abandoned", body = KioskView)
    ),
    security()
)]
pub async fn kiosk_reset(
    session: web::Data<KioskSession>,
    tokens: web::Data<AdminTokens>,
) -> Result<HttpResponse, ServiceError> {
    // Leaving the dashboard this way closes the admin session as well.
    tokens.revoke();
    Ok(HttpResponse::Ok().json(session.reset()))
}

#[utoipa::path(
    get,
    path = "/api/content",
    responses(
        (status = 200, description = "Everything the kiosk displays", body = ContentSnapshot)
    ),
    security()
)]
pub async fn content_snapshot(
    session: web::Data<KioskSession>,
) -> Result<HttpResponse, ServiceError> {
    Ok(HttpResponse::Ok().json(session.store().snapshot()))
}

#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    ),
    security()
)]
pub async fn health(session: web::Data<KioskSession>) -> Result<HttpResponse, ServiceError> {
    Ok(HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        revision: session.store().revision(),
    }))
}

pub async fn not_found() -> Result<HttpResponse, ServiceError> {
    Ok(HttpResponse::NotFound().json(ApiResponse {
        success: false,
        message: "Route not found".to_string(),
    }))
}
