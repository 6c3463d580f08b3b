//! Admin panel drafts: the partially filled forms an operator edits before
//! saving, and their validation into store records.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{
    format_brl, AnnouncementKind, NewAnnouncement, NewOfferCategory, NewProduct, NewSchedule, PaymentConfig,
    ProductCategory, ServiceError,
};

const MISSING_FIELDS: &str = "Preencha todos os campos.";

/// Largest price the kiosk amount keypad can hold: eight digits of cents.
pub const MAX_PRICE_CENTS: i64 = 99_999_999;

fn required(value: &str) -> Result<String, ServiceError> {
    if value.trim().is_empty() {
        Err(ServiceError::ValidationError(MISSING_FIELDS.to_string()))
    } else {
        Ok(value.to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct ScheduleDraft {
    pub day: String,
    pub time: String,
    pub title: String,
}

impl ScheduleDraft {
    pub fn validate(&self) -> Result<NewSchedule, ServiceError> {
        Ok(NewSchedule {
            day: required(&self.day)?,
            time: required(&self.time)?,
            title: required(&self.title)?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct AnnouncementDraft {
    pub title: String,
    pub date: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: AnnouncementKind,
}

impl AnnouncementDraft {
    pub fn validate(&self) -> Result<NewAnnouncement, ServiceError> {
        Ok(NewAnnouncement {
            title: required(&self.title)?,
            date: required(&self.date)?,
            description: required(&self.description)?,
            kind: self.kind,
        })
    }
}

/// Product form. `price` is in cents and stays `None` until the operator
/// types one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct ProductDraft {
    pub name: String,
    pub price: Option<i64>,
    pub category: ProductCategory,
}

impl ProductDraft {
    pub fn validate(&self) -> Result<NewProduct, ServiceError> {
        let name = required(&self.name)?;
        let price = match self.price {
            Some(price) if price > MAX_PRICE_CENTS => {
                return Err(ServiceError::ValidationError(format!(
                    "O preço máximo é {}.",
                    format_brl(MAX_PRICE_CENTS)
                )))
            }
            Some(price) if price > 0 => price,
            _ => return Err(ServiceError::ValidationError(MISSING_FIELDS.to_string())),
        };

        Ok(NewProduct {
            name,
            price,
            category: self.category,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct OfferCategoryDraft {
    pub title: String,
}

impl OfferCategoryDraft {
    pub fn validate(&self) -> Result<NewOfferCategory, ServiceError> {
        if self.title.trim().is_empty() {
            return Err(ServiceError::ValidationError("Preencha o título.".to_string()));
        }
        Ok(NewOfferCategory {
            title: self.title.clone(),
        })
    }
}

/// Checks the payment configuration form before it replaces the stored one.
pub fn validate_payment_config(config: &PaymentConfig) -> Result<(), ServiceError> {
    if config.pix_key.trim().is_empty() {
        return Err(ServiceError::ValidationError(
            "Informe a chave PIX.".to_string(),
        ));
    }
    if config.card_machine_enabled && config.card_machine_ip.trim().is_empty() {
        return Err(ServiceError::ValidationError(
            "Informe o endereço da máquina de cartão.".to_string(),
        ));
    }
    Ok(())
}
