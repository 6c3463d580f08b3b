//! # Admin Panel
//!
//! Operator-side controller: per-tab forms over the content store, the
//! two-step delete confirmation and the payment configuration form.
//!
//! All methods are synchronous. The panel observes the store through its
//! event channel and re-seeds the configuration form whenever the stored
//! configuration changes.

use std::fmt::Debug;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::{self, error::TryRecvError};
use utoipa::ToSchema;

use crate::models::{
    validate_payment_config, Announcement, AnnouncementDraft, AnnouncementUpdate, ContentKind,
    OfferCategory, OfferCategoryDraft, OfferCategoryUpdate, PaymentConfig, PaymentConfigUpdate,
    Product, ProductDraft, ProductUpdate, Schedule, ScheduleDraft, ScheduleUpdate, ServiceError,
};
use crate::repositories::{ContentStore, StoreEvent, Stored};

pub const DELETE_CONFIRMATION: &str = "Tem certeza? Você não poderá reverter isso!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AdminTab {
    Schedules,
    Announcements,
    Products,
    Offers,
    Config,
}

/// Draft plus the id of the record being edited, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormState<D> {
    pub draft: D,
    pub editing_id: Option<String>,
}

impl<D: Default> FormState<D> {
    fn clear(&mut self) {
        self.draft = D::default();
        self.editing_id = None;
    }
}

#[derive(Debug, Clone, Default)]
pub struct PanelForms {
    pub schedules: FormState<ScheduleDraft>,
    pub announcements: FormState<AnnouncementDraft>,
    pub products: FormState<ProductDraft>,
    pub offers: FormState<OfferCategoryDraft>,
}

/// A store record the panel can edit through a draft form.
pub trait Editable: Stored {
    type Draft: Default + Clone + Debug + Serialize + DeserializeOwned + Send;

    const TAB: AdminTab;

    fn to_draft(&self) -> Self::Draft;
    fn validate(draft: &Self::Draft) -> Result<Self::New, ServiceError>;
    /// Full-field patch used when saving over an existing record.
    fn into_update(new: Self::New) -> Self::Update;
    fn form(forms: &mut PanelForms) -> &mut FormState<Self::Draft>;
    fn form_ref(forms: &PanelForms) -> &FormState<Self::Draft>;
}

impl Editable for Schedule {
    type Draft = ScheduleDraft;

    const TAB: AdminTab = AdminTab::Schedules;

    fn to_draft(&self) -> ScheduleDraft {
        ScheduleDraft {
            day: self.day.clone(),
            time: self.time.clone(),
            title: self.title.clone(),
        }
    }

    fn validate(draft: &ScheduleDraft) -> Result<Self::New, ServiceError> {
        draft.validate()
    }

    fn into_update(new: Self::New) -> ScheduleUpdate {
        ScheduleUpdate {
            day: Some(new.day),
            time: Some(new.time),
            title: Some(new.title),
        }
    }

    fn form(forms: &mut PanelForms) -> &mut FormState<ScheduleDraft> {
        &mut forms.schedules
    }

    fn form_ref(forms: &PanelForms) -> &FormState<ScheduleDraft> {
        &forms.schedules
    }
}

impl Editable for Announcement {
    type Draft = AnnouncementDraft;

    const TAB: AdminTab = AdminTab::Announcements;

    fn to_draft(&self) -> AnnouncementDraft {
        AnnouncementDraft {
            title: self.title.clone(),
            date: self.date.clone(),
            description: self.description.clone(),
            kind: self.kind,
        }
    }

    fn validate(draft: &AnnouncementDraft) -> Result<Self::New, ServiceError> {
        draft.validate()
    }

    fn into_update(new: Self::New) -> AnnouncementUpdate {
        AnnouncementUpdate {
            title: Some(new.title),
            date: Some(new.date),
            description: Some(new.description),
            kind: Some(new.kind),
        }
    }

    fn form(forms: &mut PanelForms) -> &mut FormState<AnnouncementDraft> {
        &mut forms.announcements
    }

    fn form_ref(forms: &PanelForms) -> &FormState<AnnouncementDraft> {
        &forms.announcements
    }
}

impl Editable for Product {
    type Draft = ProductDraft;

    const TAB: AdminTab = AdminTab::Products;

    fn to_draft(&self) -> ProductDraft {
        ProductDraft {
            name: self.name.clone(),
            price: Some(self.price),
            category: self.category,
        }
    }

    fn validate(draft: &ProductDraft) -> Result<Self::New, ServiceError> {
        draft.validate()
    }

    fn into_update(new: Self::New) -> ProductUpdate {
        ProductUpdate {
            name: Some(new.name),
            price: Some(new.price),
            category: Some(new.category),
        }
    }

    fn form(forms: &mut PanelForms) -> &mut FormState<ProductDraft> {
        &mut forms.products
    }

    fn form_ref(forms: &PanelForms) -> &FormState<ProductDraft> {
        &forms.products
    }
}

impl Editable for OfferCategory {
    type Draft = OfferCategoryDraft;

    const TAB: AdminTab = AdminTab::Offers;

    fn to_draft(&self) -> OfferCategoryDraft {
        OfferCategoryDraft {
            title: self.title.clone(),
        }
    }

    fn validate(draft: &OfferCategoryDraft) -> Result<Self::New, ServiceError> {
        draft.validate()
    }

    fn into_update(new: Self::New) -> OfferCategoryUpdate {
        OfferCategoryUpdate {
            title: Some(new.title),
        }
    }

    fn form(forms: &mut PanelForms) -> &mut FormState<OfferCategoryDraft> {
        &mut forms.offers
    }

    fn form_ref(forms: &PanelForms) -> &FormState<OfferCategoryDraft> {
        &forms.offers
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum SaveOutcome {
    Added { id: String },
    Updated { id: String },
}

/// Delete awaiting the operator's answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PendingDelete {
    pub kind: ContentKind,
    pub id: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum ConfirmationOutcome {
    Deleted { kind: ContentKind, id: String },
    Dismissed,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TabView<T, D> {
    pub items: Vec<T>,
    pub draft: D,
    pub editing_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminPanelView {
    pub active_tab: AdminTab,
    #[schema(value_type = Object)]
    pub schedules: TabView<Schedule, ScheduleDraft>,
    #[schema(value_type = Object)]
    pub announcements: TabView<Announcement, AnnouncementDraft>,
    #[schema(value_type = Object)]
    pub products: TabView<Product, ProductDraft>,
    #[schema(value_type = Object)]
    pub offers: TabView<OfferCategory, OfferCategoryDraft>,
    pub config: PaymentConfig,
    pub confirmation: Option<PendingDelete>,
}

pub struct AdminPanel {
    store: Arc<ContentStore>,
    events: broadcast::Receiver<StoreEvent>,
    active_tab: AdminTab,
    forms: PanelForms,
    config_form: PaymentConfig,
    pending_delete: Option<PendingDelete>,
}

impl AdminPanel {
    pub fn new(store: Arc<ContentStore>) -> Self {
        let events = store.subscribe();
        let config_form = store.payment_config();
        Self {
            store,
            events,
            active_tab: AdminTab::Schedules,
            forms: PanelForms::default(),
            config_form,
            pending_delete: None,
        }
    }

    /// Back to a fresh panel on the first tab, as at every admin login.
    pub fn reset(&mut self) {
        self.sync();
        self.active_tab = AdminTab::Schedules;
        self.forms = PanelForms::default();
        self.config_form = self.store.payment_config();
        self.pending_delete = None;
    }

    pub fn active_tab(&self) -> AdminTab {
        self.active_tab
    }

    pub fn forms(&self) -> &PanelForms {
        &self.forms
    }

    pub fn config_form(&self) -> &PaymentConfig {
        &self.config_form
    }

    pub fn pending_delete(&self) -> Option<&PendingDelete> {
        self.pending_delete.as_ref()
    }

    /// Drains store notifications, re-seeding the configuration form when
    /// the stored configuration changed.
    pub fn sync(&mut self) {
        let mut reseed = false;
        loop {
            match self.events.try_recv() {
                Ok(StoreEvent::PaymentConfigUpdated { .. }) => reseed = true,
                Ok(StoreEvent::Record { .. }) => {}
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Admin panel lagged behind store events");
                    reseed = true;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        if reseed {
            self.config_form = self.store.payment_config();
            tracing::debug!("Config form re-seeded from store");
        }
    }

    /// Switches tabs. The tab being left loses its draft and edit marker.
    pub fn switch_tab(&mut self, tab: AdminTab) -> Result<(), ServiceError> {
        self.ensure_idle()?;
        self.sync();
        match self.active_tab {
            AdminTab::Schedules => self.forms.schedules.clear(),
            AdminTab::Announcements => self.forms.announcements.clear(),
            AdminTab::Products => self.forms.products.clear(),
            AdminTab::Offers => self.forms.offers.clear(),
            AdminTab::Config => self.config_form = self.store.payment_config(),
        }
        tracing::debug!(from = ?self.active_tab, to = ?tab, "Admin tab switched");
        self.active_tab = tab;
        Ok(())
    }

    pub fn set_draft<T: Editable>(&mut self, draft: T::Draft) -> Result<(), ServiceError> {
        self.ensure_tab(T::TAB)?;
        T::form(&mut self.forms).draft = draft;
        Ok(())
    }

    /// Loads a stored record into the tab's form for editing.
    pub fn edit<T: Editable>(&mut self, id: &str) -> Result<T::Draft, ServiceError> {
        self.ensure_tab(T::TAB)?;
        let record = self.store.get::<T>(id).ok_or_else(|| {
            ServiceError::NotFound(format!("{} {} not found", T::KIND.label(), id))
        })?;

        let form = T::form(&mut self.forms);
        form.draft = record.to_draft();
        form.editing_id = Some(id.to_string());
        tracing::debug!(kind = T::KIND.label(), id, "Editing record");
        Ok(form.draft.clone())
    }

    pub fn cancel_edit<T: Editable>(&mut self) -> Result<(), ServiceError> {
        self.ensure_tab(T::TAB)?;
        T::form(&mut self.forms).clear();
        Ok(())
    }

    /// Validates the draft and adds it, or updates the record under edit.
    /// A rejected draft is kept as typed.
    pub fn save<T: Editable>(&mut self) -> Result<SaveOutcome, ServiceError> {
        self.ensure_tab(T::TAB)?;
        let form = T::form(&mut self.forms);
        let new = T::validate(&form.draft)?;

        let outcome = match form.editing_id.take() {
            Some(id) => {
                if !self.store.update::<T>(&id, T::into_update(new)) {
                    tracing::warn!(kind = T::KIND.label(), id = %id, "Edited record vanished before save");
                }
                SaveOutcome::Updated { id }
            }
            None => SaveOutcome::Added {
                id: self.store.add::<T>(new),
            },
        };
        form.draft = T::Draft::default();
        Ok(outcome)
    }

    /// Opens the delete confirmation for a record.
    pub fn request_delete<T: Editable>(&mut self, id: &str) -> Result<&PendingDelete, ServiceError> {
        self.ensure_tab(T::TAB)?;
        if self.store.get::<T>(id).is_none() {
            return Err(ServiceError::NotFound(format!(
                "{} {} not found",
                T::KIND.label(),
                id
            )));
        }

        let pending = self.pending_delete.insert(PendingDelete {
            kind: T::KIND,
            id: id.to_string(),
            message: DELETE_CONFIRMATION.to_string(),
        });
        Ok(pending)
    }

    /// Answers the open confirmation: deletes on accept, dismisses otherwise.
    pub fn resolve_confirmation(&mut self, accept: bool) -> Result<ConfirmationOutcome, ServiceError> {
        let pending = self.pending_delete.take().ok_or_else(|| {
            ServiceError::InvalidTransition("No confirmation is pending".to_string())
        })?;

        if !accept {
            tracing::debug!(kind = pending.kind.label(), id = %pending.id, "Delete dismissed");
            return Ok(ConfirmationOutcome::Dismissed);
        }

        match pending.kind {
            ContentKind::Schedule => self.confirm_delete::<Schedule>(&pending.id),
            ContentKind::Announcement => self.confirm_delete::<Announcement>(&pending.id),
            ContentKind::Product => self.confirm_delete::<Product>(&pending.id),
            ContentKind::OfferCategory => self.confirm_delete::<OfferCategory>(&pending.id),
        }
        Ok(ConfirmationOutcome::Deleted {
            kind: pending.kind,
            id: pending.id,
        })
    }

    pub fn set_config_draft(&mut self, update: PaymentConfigUpdate) -> Result<(), ServiceError> {
        self.ensure_tab(AdminTab::Config)?;
        self.sync();
        self.config_form.apply(update);
        Ok(())
    }

    pub fn save_config(&mut self) -> Result<PaymentConfig, ServiceError> {
        self.ensure_tab(AdminTab::Config)?;
        validate_payment_config(&self.config_form)?;
        let saved = self
            .store
            .update_payment_config(PaymentConfigUpdate::from(self.config_form.clone()));
        self.sync();
        Ok(saved)
    }

    pub fn view(&mut self) -> AdminPanelView {
        self.sync();
        AdminPanelView {
            active_tab: self.active_tab,
            schedules: self.tab_view::<Schedule>(),
            announcements: self.tab_view::<Announcement>(),
            products: self.tab_view::<Product>(),
            offers: self.tab_view::<OfferCategory>(),
            config: self.config_form.clone(),
            confirmation: self.pending_delete.clone(),
        }
    }

    fn confirm_delete<T: Editable>(&mut self, id: &str) {
        self.store.remove::<T>(id);
        let form = T::form(&mut self.forms);
        if form.editing_id.as_deref() == Some(id) {
            form.clear();
        }
    }

    fn tab_view<T: Editable>(&self) -> TabView<T, T::Draft> {
        let form = T::form_ref(&self.forms);
        TabView {
            items: self.store.list::<T>(),
            draft: form.draft.clone(),
            editing_id: form.editing_id.clone(),
        }
    }

    fn ensure_idle(&self) -> Result<(), ServiceError> {
        match &self.pending_delete {
            Some(pending) => Err(ServiceError::InvalidTransition(format!(
                "Confirm or dismiss deleting {} {} first",
                pending.kind.label(),
                pending.id
            ))),
            None => Ok(()),
        }
    }

    fn ensure_tab(&self, tab: AdminTab) -> Result<(), ServiceError> {
        self.ensure_idle()?;
        if self.active_tab != tab {
            return Err(ServiceError::InvalidTransition(format!(
                "{:?} tab is not active",
                tab
            )));
        }
        Ok(())
    }
}
