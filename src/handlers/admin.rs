//! Admin panel endpoints. Every route requires the bearer token issued when
//! the kiosk accepted the admin passcode.
//!
//! Content routes take the collection as a path segment (`schedules`,
//! `announcements`, `products`, `offers`) and dispatch to the matching
//! record type.

use std::sync::Mutex;

use actix_web::{web, HttpRequest, HttpResponse, Result};
use utoipa;

use crate::auth::AdminTokens;
use crate::handlers::lock_panel;
use crate::middleware::auth::authenticate_request;
use crate::models::{
    Announcement, ApiResponse, ConfigSavedResponse, ConfirmForm, ConfirmResultResponse,
    ConfirmationResponse, ErrorResponse, OfferCategory, PanelResponse, PaymentConfigUpdate,
    Product, SaveResponse, Schedule, ServiceError, SwitchTabForm,
};
use crate::services::{
    AdminPanel, AdminTab, ConfirmationOutcome, Editable, KioskEvent, KioskSession, SaveOutcome,
};

fn unknown_collection(tab: AdminTab) -> ServiceError {
    ServiceError::NotFound(format!("{:?} is not a content collection", tab))
}

fn parse_draft<T: Editable>(body: serde_json::Value) -> Result<T::Draft, ServiceError> {
    serde_json::from_value(body)
        .map_err(|e| ServiceError::ValidationError(format!("Invalid draft: {}", e)))
}

fn panel_ok(panel: &mut AdminPanel) -> HttpResponse {
    HttpResponse::Ok().json(PanelResponse {
        success: true,
        panel: panel.view(),
    })
}

#[utoipa::path(
    get,
    path = "/api/admin/panel",
    responses(
        (status = 200, description = "Admin panel state", body = PanelResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    )
)]
pub async fn panel_view(
    req: HttpRequest,
    tokens: web::Data<AdminTokens>,
    panel: web::Data<Mutex<AdminPanel>>,
) -> Result<HttpResponse, ServiceError> {
    authenticate_request(&req, &tokens)?;
    Ok(panel_ok(&mut lock_panel(&panel)))
}

#[utoipa::path(
    post,
    path = "/api/admin/tab",
    request_body = SwitchTabForm,
    responses(
        (status = 200, description = "Tab switched; the previous tab's form was reset", body = PanelResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 409, description = "A delete confirmation is pending", body = ErrorResponse)
    )
)]
pub async fn switch_tab(
    req: HttpRequest,
    tokens: web::Data<AdminTokens>,
    panel: web::Data<Mutex<AdminPanel>>,
    form: web::Json<SwitchTabForm>,
) -> Result<HttpResponse, ServiceError> {
    authenticate_request(&req, &tokens)?;
    let mut panel = lock_panel(&panel);
    panel.switch_tab(form.tab)?;
    Ok(panel_ok(&mut panel))
}

#[utoipa::path(
    put,
    path = "/api/admin/{collection}/draft",
    params(
        ("collection" = AdminTab, Path, description = "schedules, announcements, products or offers")
    ),
    responses(
        (status = 200, description = "Draft replaced by the JSON body, shaped like the collection's form", body = PanelResponse),
        (status = 400, description = "Draft does not match the form", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 409, description = "Tab not active or confirmation pending", body = ErrorResponse)
    )
)]
pub async fn set_draft(
    req: HttpRequest,
    tokens: web::Data<AdminTokens>,
    panel: web::Data<Mutex<AdminPanel>>,
    path: web::Path<AdminTab>,
    body: web::Json<serde_json::Value>,
) -> Result<HttpResponse, ServiceError> {
    authenticate_request(&req, &tokens)?;
    let body = body.into_inner();
    let mut panel = lock_panel(&panel);

    match path.into_inner() {
        AdminTab::Schedules => panel.set_draft::<Schedule>(parse_draft::<Schedule>(body)?),
        AdminTab::Announcements => {
            panel.set_draft::<Announcement>(parse_draft::<Announcement>(body)?)
        }
        AdminTab::Products => panel.set_draft::<Product>(parse_draft::<Product>(body)?),
        AdminTab::Offers => {
            panel.set_draft::<OfferCategory>(parse_draft::<OfferCategory>(body)?)
        }
        tab => Err(unknown_collection(tab)),
    }?;

    Ok(panel_ok(&mut panel))
}

#[utoipa::path(
    post,
    path = "/api/admin/{collection}/save",
    params(
        ("collection" = AdminTab, Path, description = "schedules, announcements, products or offers")
    ),
    responses(
        (status = 200, description = "Record added or updated", body = SaveResponse),
        (status = 400, description = "Required fields missing; draft kept", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 409, description = "Tab not active or confirmation pending", body = ErrorResponse)
    )
)]
pub async fn save(
    req: HttpRequest,
    tokens: web::Data<AdminTokens>,
    panel: web::Data<Mutex<AdminPanel>>,
    path: web::Path<AdminTab>,
) -> Result<HttpResponse, ServiceError> {
    authenticate_request(&req, &tokens)?;
    let mut panel = lock_panel(&panel);

    let outcome = match path.into_inner() {
        AdminTab::Schedules => panel.save::<Schedule>(),
        AdminTab::Announcements => panel.save::<Announcement>(),
        AdminTab::Products => panel.save::<Product>(),
        AdminTab::Offers => panel.save::<OfferCategory>(),
        tab => Err(unknown_collection(tab)),
    }?;

    let message = match &outcome {
        SaveOutcome::Added { .. } => "Adicionado com sucesso.",
        SaveOutcome::Updated { .. } => "Atualizado com sucesso.",
    };

    Ok(HttpResponse::Ok().json(SaveResponse {
        success: true,
        message: message.to_string(),
        result: outcome,
        panel: panel.view(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/admin/{collection}/{id}/edit",
    params(
        ("collection" = AdminTab, Path, description = "schedules, announcements, products or offers"),
        ("id" = String, Path, description = "Record id")
    ),
    responses(
        (status = 200, description = "Record loaded into the form", body = PanelResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "Record not found", body = ErrorResponse),
        (status = 409, description = "Tab not active or confirmation pending", body = ErrorResponse)
    )
)]
pub async fn edit(
    req: HttpRequest,
    tokens: web::Data<AdminTokens>,
    panel: web::Data<Mutex<AdminPanel>>,
    path: web::Path<(AdminTab, String)>,
) -> Result<HttpResponse, ServiceError> {
    authenticate_request(&req, &tokens)?;
    let (collection, id) = path.into_inner();
    let mut panel = lock_panel(&panel);

    match collection {
        AdminTab::Schedules => panel.edit::<Schedule>(&id).map(|_| ()),
        AdminTab::Announcements => panel.edit::<Announcement>(&id).map(|_| ()),
        AdminTab::Products => panel.edit::<Product>(&id).map(|_| ()),
        AdminTab::Offers => panel.edit::<OfferCategory>(&id).map(|_| ()),
        tab => Err(unknown_collection(tab)),
    }?;

    Ok(panel_ok(&mut panel))
}

#[utoipa::path(
    post,
    path = "/api/admin/{collection}/cancel",
    params(
        ("collection" = AdminTab, Path, description = "schedules, announcements, products or offers")
    ),
    responses(
        (status = 200, description = "Edit cancelled and form reset", body = PanelResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 409, description = "Tab not active or confirmation pending", body = ErrorResponse)
    )
)]
pub async fn cancel_edit(
    req: HttpRequest,
    tokens: web::Data<AdminTokens>,
    panel: web::Data<Mutex<AdminPanel>>,
    path: web::Path<AdminTab>,
) -> Result<HttpResponse, ServiceError> {
    authenticate_request(&req, &tokens)?;
    let mut panel = lock_panel(&panel);

    match path.into_inner() {
        AdminTab::Schedules => panel.cancel_edit::<Schedule>(),
        AdminTab::Announcements => panel.cancel_edit::<Announcement>(),
        AdminTab::Products => panel.cancel_edit::<Product>(),
        AdminTab::Offers => panel.cancel_edit::<OfferCategory>(),
        tab => Err(unknown_collection(tab)),
    }?;

    Ok(panel_ok(&mut panel))
}

#[utoipa::path(
    post,
    path = "/api/admin/{collection}/{id}/delete",
    params(
        ("collection" = AdminTab, Path, description = "schedules, announcements, products or offers"),
        ("id" = String, Path, description = "Record id")
    ),
    responses(
        (status = 200, description = "Confirmation opened; answer it with /api/admin/confirm", body = ConfirmationResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "Record not found", body = ErrorResponse),
        (status = 409, description = "Tab not active or confirmation pending", body = ErrorResponse)
    )
)]
pub async fn request_delete(
    req: HttpRequest,
    tokens: web::Data<AdminTokens>,
    panel: web::Data<Mutex<AdminPanel>>,
    path: web::Path<(AdminTab, String)>,
) -> Result<HttpResponse, ServiceError> {
    authenticate_request(&req, &tokens)?;
    let (collection, id) = path.into_inner();
    let mut panel = lock_panel(&panel);

    let confirmation = match collection {
        AdminTab::Schedules => panel.request_delete::<Schedule>(&id),
        AdminTab::Announcements => panel.request_delete::<Announcement>(&id),
        AdminTab::Products => panel.request_delete::<Product>(&id),
        AdminTab::Offers => panel.request_delete::<OfferCategory>(&id),
        tab => Err(unknown_collection(tab)),
    }?
    .clone();

    Ok(HttpResponse::Ok().json(ConfirmationResponse {
        success: true,
        message: confirmation.message.clone(),
        confirmation,
    }))
}

#[utoipa::path(
    post,
    path = "/api/admin/confirm",
    request_body = ConfirmForm,
    responses(
        (status = 200, description = "Pending delete performed or dismissed", body = ConfirmResultResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 409, description = "No confirmation is pending", body = ErrorResponse)
    )
)]
pub async fn resolve_confirmation(
    req: HttpRequest,
    tokens: web::Data<AdminTokens>,
    panel: web::Data<Mutex<AdminPanel>>,
    form: web::Json<ConfirmForm>,
) -> Result<HttpResponse, ServiceError> {
    authenticate_request(&req, &tokens)?;
    let mut panel = lock_panel(&panel);
    let outcome = panel.resolve_confirmation(form.accept)?;

    let message = match &outcome {
        ConfirmationOutcome::Deleted { .. } => "O item foi removido.",
        ConfirmationOutcome::Dismissed => "Exclusão cancelada.",
    };

    Ok(HttpResponse::Ok().json(ConfirmResultResponse {
        success: true,
        message: message.to_string(),
        result: outcome,
        panel: panel.view(),
    }))
}

#[utoipa::path(
    put,
    path = "/api/admin/config/draft",
    request_body = PaymentConfigUpdate,
    responses(
        (status = 200, description = "Config form updated", body = PanelResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 409, description = "Config tab not active or confirmation pending", body = ErrorResponse)
    )
)]
pub async fn set_config_draft(
    req: HttpRequest,
    tokens: web::Data<AdminTokens>,
    panel: web::Data<Mutex<AdminPanel>>,
    form: web::Json<PaymentConfigUpdate>,
) -> Result<HttpResponse, ServiceError> {
    authenticate_request(&req, &tokens)?;
    let mut panel = lock_panel(&panel);
    panel.set_config_draft(form.into_inner())?;
    Ok(panel_ok(&mut panel))
}

#[utoipa::path(
    post,
    path = "/api/admin/config/save",
    responses(
        (status = 200, description = "Payment configuration saved", body = ConfigSavedResponse),
        (status = 400, description = "Config form is incomplete", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 409, description = "Config tab not active or confirmation pending", body = ErrorResponse)
    )
)]
pub async fn save_config(
    req: HttpRequest,
    tokens: web::Data<AdminTokens>,
    panel: web::Data<Mutex<AdminPanel>>,
) -> Result<HttpResponse, ServiceError> {
    authenticate_request(&req, &tokens)?;
    let config = lock_panel(&panel).save_config()?;

    Ok(HttpResponse::Ok().json(ConfigSavedResponse {
        success: true,
        message: "Configurações de pagamento atualizadas.".to_string(),
        config,
    }))
}

#[utoipa::path(
    post,
    path = "/api/admin/logout",
    responses(
        (status = 200, description = "Admin session closed; kiosk back on HOME", body = ApiResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    )
)]
pub async fn logout(
    req: HttpRequest,
    tokens: web::Data<AdminTokens>,
    session: web::Data<KioskSession>,
) -> Result<HttpResponse, ServiceError> {
    authenticate_request(&req, &tokens)?;
    tokens.revoke();

    match session.dispatch(KioskEvent::Logout) {
        Ok(_) | Err(ServiceError::InvalidTransition(_)) => {}
        Err(e) => return Err(e),
    }

    Ok(HttpResponse::Ok().json(ApiResponse {
        success: true,
        message: "Logout successful".to_string(),
    }))
}
