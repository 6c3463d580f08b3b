use std::collections::BTreeMap;

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityRequirement, SecurityScheme};
use utoipa::openapi::OpenApi;

use crate::handlers;
use crate::models::{
    Announcement, AnnouncementDraft, AnnouncementKind, ApiResponse, ConfigSavedResponse,
    ConfirmForm, ConfirmResultResponse, ConfirmationResponse, ContentKind, ErrorResponse,
    HealthResponse, KioskEventResponse, OfferCategory, OfferCategoryDraft, PanelResponse,
    PaymentConfig, PaymentConfigUpdate, PixKeyType, Product, ProductCategory, ProductDraft,
    SaveResponse, Schedule, ScheduleDraft, SwitchTabForm,
};
use crate::repositories::ContentSnapshot;
use crate::services::{
    AdminPanelView, AdminTab, CartLine, ConfirmationOutcome, ContributionCategory, KioskEvent,
    KioskView, PaymentMethod, PendingDelete, SaveOutcome, Screen, ScreenContent,
};

#[derive(utoipa::OpenApi)]
#[openapi(
    info(
        title = "Totem Kiosk API",
        description = "Church self-service kiosk: contributions, merchandise and the admin panel"
    ),
    paths(
        handlers::kiosk::kiosk_view,
        handlers::kiosk::kiosk_event,
        handlers::kiosk::kiosk_reset,
        handlers::kiosk::content_snapshot,
        handlers::kiosk::health,
        handlers::admin::panel_view,
        handlers::admin::switch_tab,
        handlers::admin::set_draft,
        handlers::admin::save,
        handlers::admin::edit,
        handlers::admin::cancel_edit,
        handlers::admin::request_delete,
        handlers::admin::resolve_confirmation,
        handlers::admin::set_config_draft,
        handlers::admin::save_config,
        handlers::admin::logout,
    ),
    components(schemas(
        ApiResponse,
        ErrorResponse,
        HealthResponse,
        KioskEventResponse,
        PanelResponse,
        SaveResponse,
        ConfirmationResponse,
        ConfirmResultResponse,
        ConfigSavedResponse,
        SwitchTabForm,
        ConfirmForm,
        KioskEvent,
        KioskView,
        Screen,
        ScreenContent,
        ContributionCategory,
        PaymentMethod,
        CartLine,
        AdminPanelView,
        AdminTab,
        SaveOutcome,
        PendingDelete,
        ConfirmationOutcome,
        ContentKind,
        ContentSnapshot,
        Schedule,
        ScheduleDraft,
        Announcement,
        AnnouncementDraft,
        AnnouncementKind,
        Product,
        ProductDraft,
        ProductCategory,
        OfferCategory,
        OfferCategoryDraft,
        PaymentConfig,
        PaymentConfigUpdate,
        PixKeyType,
    )),
    tags(
        (name = "kiosk", description = "Customer-facing kiosk flow"),
        (name = "admin", description = "Content and payment administration")
    )
)]
pub struct ApiDoc;

pub fn configure_openapi(mut openapi: OpenApi) -> OpenApi {
    // Add Bearer token security scheme (HTTP Bearer type, not ApiKey)
    let mut security_schemes = BTreeMap::new();
    security_schemes.insert(
        "bearer_auth".to_string(),
        SecurityScheme::Http(
            HttpBuilder::new()
                .scheme(HttpAuthScheme::Bearer)
                .bearer_format("JWT")
                .description(Some("Admin token returned when the kiosk accepts the passcode"))
                .build(),
        ),
    );

    if let Some(components) = openapi.components.as_mut() {
        components.security_schemes = security_schemes;
    }

    // Kiosk routes opt out with security(); admin routes inherit this.
    openapi.security = Some(vec![SecurityRequirement::new(
        "bearer_auth",
        Vec::<String>::new(),
    )]);

    openapi
}
