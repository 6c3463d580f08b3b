use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::services::{
    AdminPanelView, AdminTab, ConfirmationOutcome, KioskView, PendingDelete, SaveOutcome,
};
use crate::models::PaymentConfig;

// =============================================================================
// REQUEST TYPES
// =============================================================================

#[derive(Deserialize, ToSchema)]
pub struct SwitchTabForm {
    pub tab: AdminTab,
}

#[derive(Deserialize, ToSchema)]
pub struct ConfirmForm {
    pub accept: bool,
}

// =============================================================================
// RESPONSE TYPES
// =============================================================================

// Common response types
#[derive(Serialize, ToSchema)]
pub struct ApiResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub revision: u64,
}

// Kiosk responses
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct KioskEventResponse {
    pub success: bool,
    pub view: KioskView,
    /// Present only when the event opened the admin session.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<i64>, // seconds
}

// Admin panel responses
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PanelResponse {
    pub success: bool,
    pub panel: AdminPanelView,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveResponse {
    pub success: bool,
    pub message: String,
    pub result: SaveOutcome,
    pub panel: AdminPanelView,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmationResponse {
    pub success: bool,
    pub message: String,
    pub confirmation: PendingDelete,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmResultResponse {
    pub success: bool,
    pub message: String,
    pub result: ConfirmationOutcome,
    pub panel: AdminPanelView,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfigSavedResponse {
    pub success: bool,
    pub message: String,
    pub config: PaymentConfig,
}
