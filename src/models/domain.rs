use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Collections held by the content store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Schedule,
    Announcement,
    Product,
    OfferCategory,
}

impl ContentKind {
    pub fn label(&self) -> &'static str {
        match self {
            ContentKind::Schedule => "schedule",
            ContentKind::Announcement => "announcement",
            ContentKind::Product => "product",
            ContentKind::OfferCategory => "offer category",
        }
    }
}

/// A record kept in one of the content collections.
///
/// `New` is the record without its id (what `add` takes) and `Update` is the
/// partial-field patch merged by `update`, where every `None` field is left
/// untouched.
pub trait ContentRecord: Clone + Send + Sync + 'static {
    type New: Clone + Send;
    type Update: Default + Send;

    const KIND: ContentKind;

    fn id(&self) -> &str;
    fn from_new(id: String, new: Self::New) -> Self;
    fn apply(&mut self, update: Self::Update);
}

// =============================================================================
// SCHEDULES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Schedule {
    pub id: String,
    pub day: String,
    pub time: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NewSchedule {
    pub day: String,
    pub time: String,
    pub title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, ToSchema)]
pub struct ScheduleUpdate {
    pub day: Option<String>,
    pub time: Option<String>,
    pub title: Option<String>,
}

impl ContentRecord for Schedule {
    type New = NewSchedule;
    type Update = ScheduleUpdate;

    const KIND: ContentKind = ContentKind::Schedule;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_new(id: String, new: NewSchedule) -> Self {
        Self {
            id,
            day: new.day,
            time: new.time,
            title: new.title,
        }
    }

    fn apply(&mut self, update: ScheduleUpdate) {
        if let Some(day) = update.day {
            self.day = day;
        }
        if let Some(time) = update.time {
            self.time = time;
        }
        if let Some(title) = update.title {
            self.title = title;
        }
    }
}

// =============================================================================
// ANNOUNCEMENTS
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AnnouncementKind {
    #[default]
    Info,
    Event,
    Alert,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Announcement {
    pub id: String,
    pub title: String,
    pub date: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: AnnouncementKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NewAnnouncement {
    pub title: String,
    pub date: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: AnnouncementKind,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, ToSchema)]
pub struct AnnouncementUpdate {
    pub title: Option<String>,
    pub date: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<AnnouncementKind>,
}

impl ContentRecord for Announcement {
    type New = NewAnnouncement;
    type Update = AnnouncementUpdate;

    const KIND: ContentKind = ContentKind::Announcement;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_new(id: String, new: NewAnnouncement) -> Self {
        Self {
            id,
            title: new.title,
            date: new.date,
            description: new.description,
            kind: new.kind,
        }
    }

    fn apply(&mut self, update: AnnouncementUpdate) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(date) = update.date {
            self.date = date;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(kind) = update.kind {
            self.kind = kind;
        }
    }
}

// =============================================================================
// PRODUCTS
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ProductCategory {
    Food,
    Drink,
    Clothing,
    Book,
    #[default]
    Other,
}

/// A merchandise item. `price` is in cents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: i64,
    pub category: ProductCategory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NewProduct {
    pub name: String,
    pub price: i64,
    pub category: ProductCategory,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, ToSchema)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub price: Option<i64>,
    pub category: Option<ProductCategory>,
}

impl ContentRecord for Product {
    type New = NewProduct;
    type Update = ProductUpdate;

    const KIND: ContentKind = ContentKind::Product;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_new(id: String, new: NewProduct) -> Self {
        Self {
            id,
            name: new.name,
            price: new.price,
            category: new.category,
        }
    }

    fn apply(&mut self, update: ProductUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(price) = update.price {
            self.price = price;
        }
        if let Some(category) = update.category {
            self.category = category;
        }
    }
}

// =============================================================================
// OFFER CATEGORIES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct OfferCategory {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NewOfferCategory {
    pub title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, ToSchema)]
pub struct OfferCategoryUpdate {
    pub title: Option<String>,
}

impl ContentRecord for OfferCategory {
    type New = NewOfferCategory;
    type Update = OfferCategoryUpdate;

    const KIND: ContentKind = ContentKind::OfferCategory;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_new(id: String, new: NewOfferCategory) -> Self {
        Self { id, title: new.title }
    }

    fn apply(&mut self, update: OfferCategoryUpdate) {
        if let Some(title) = update.title {
            self.title = title;
        }
    }
}

// =============================================================================
// PAYMENT CONFIGURATION
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PixKeyType {
    Cpf,
    Cnpj,
    Email,
    Phone,
    Random,
}

/// Kiosk-wide payment settings. Exactly one instance exists per store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentConfig {
    pub pix_key: String,
    pub pix_key_type: PixKeyType,
    pub card_machine_enabled: bool,
    pub card_machine_ip: String,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            pix_key: "12.345.678/0001-90".to_string(),
            pix_key_type: PixKeyType::Cnpj,
            card_machine_enabled: true,
            card_machine_ip: "192.168.1.100".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentConfigUpdate {
    pub pix_key: Option<String>,
    pub pix_key_type: Option<PixKeyType>,
    pub card_machine_enabled: Option<bool>,
    pub card_machine_ip: Option<String>,
}

impl PaymentConfig {
    pub fn apply(&mut self, update: PaymentConfigUpdate) {
        if let Some(pix_key) = update.pix_key {
            self.pix_key = pix_key;
        }
        if let Some(pix_key_type) = update.pix_key_type {
            self.pix_key_type = pix_key_type;
        }
        if let Some(enabled) = update.card_machine_enabled {
            self.card_machine_enabled = enabled;
        }
        if let Some(ip) = update.card_machine_ip {
            self.card_machine_ip = ip;
        }
    }
}

impl From<PaymentConfig> for PaymentConfigUpdate {
    fn from(config: PaymentConfig) -> Self {
        Self {
            pix_key: Some(config.pix_key),
            pix_key_type: Some(config.pix_key_type),
            card_machine_enabled: Some(config.card_machine_enabled),
            card_machine_ip: Some(config.card_machine_ip),
        }
    }
}
