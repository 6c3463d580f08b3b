use std::fmt;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::Serialize;
use tokio::sync::broadcast;
use utoipa::ToSchema;

use crate::models::{
    Announcement, ContentKind, ContentRecord, OfferCategory, PaymentConfig, PaymentConfigUpdate,
    Product, Schedule,
};
use crate::repositories::{builtin_content, IdGenerator, RandomIdGenerator};

/// Event channel capacity. Observers that fall further behind than this see
/// `Lagged` and should re-read the store.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Random candidates tried before falling back to suffixed ids.
const MAX_ID_ATTEMPTS: usize = 16;

/// Every collection plus the payment configuration singleton.
#[derive(Debug, Clone, Default)]
pub struct ContentState {
    pub schedules: Vec<Schedule>,
    pub announcements: Vec<Announcement>,
    pub products: Vec<Product>,
    pub offer_categories: Vec<OfferCategory>,
    pub payment_config: PaymentConfig,
}

/// Binds a record type to its collection inside [`ContentState`].
pub trait Stored: ContentRecord {
    fn records(state: &ContentState) -> &Vec<Self>;
    fn records_mut(state: &mut ContentState) -> &mut Vec<Self>;
}

impl Stored for Schedule {
    fn records(state: &ContentState) -> &Vec<Self> {
        &state.schedules
    }
    fn records_mut(state: &mut ContentState) -> &mut Vec<Self> {
        &mut state.schedules
    }
}

impl Stored for Announcement {
    fn records(state: &ContentState) -> &Vec<Self> {
        &state.announcements
    }
    fn records_mut(state: &mut ContentState) -> &mut Vec<Self> {
        &mut state.announcements
    }
}

impl Stored for Product {
    fn records(state: &ContentState) -> &Vec<Self> {
        &state.products
    }
    fn records_mut(state: &mut ContentState) -> &mut Vec<Self> {
        &mut state.products
    }
}

impl Stored for OfferCategory {
    fn records(state: &ContentState) -> &Vec<Self> {
        &state.offer_categories
    }
    fn records_mut(state: &mut ContentState) -> &mut Vec<Self> {
        &mut state.offer_categories
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Added,
    Updated,
    Removed,
}

/// Published after every mutation that changed the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    Record {
        kind: ContentKind,
        change: ChangeKind,
        id: String,
        revision: u64,
    },
    PaymentConfigUpdated {
        revision: u64,
    },
}

impl StoreEvent {
    pub fn revision(&self) -> u64 {
        match self {
            StoreEvent::Record { revision, .. } | StoreEvent::PaymentConfigUpdated { revision } => {
                *revision
            }
        }
    }
}

/// Point-in-time copy of everything the kiosk displays.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContentSnapshot {
    pub revision: u64,
    pub schedules: Vec<Schedule>,
    pub announcements: Vec<Announcement>,
    pub products: Vec<Product>,
    pub offer_categories: Vec<OfferCategory>,
    pub payment_config: PaymentConfig,
}

struct Inner {
    state: ContentState,
    revision: u64,
}

/// In-memory source of truth shared by the kiosk flow (reader) and the
/// admin panel (writer).
///
/// Mutations complete synchronously and publish a [`StoreEvent`] on the
/// subscription channel before returning, so any observer that re-reads the
/// store after an event sees the new state. Unknown ids on `update` and
/// `remove` are a silent no-op.
pub struct ContentStore {
    inner: RwLock<Inner>,
    ids: Box<dyn IdGenerator>,
    events: broadcast::Sender<StoreEvent>,
}

impl fmt::Debug for ContentStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentStore")
            .field("revision", &self.revision())
            .field("subscribers", &self.events.receiver_count())
            .finish()
    }
}

impl ContentStore {
    pub fn new(state: ContentState) -> Self {
        Self::with_id_generator(state, Box::new(RandomIdGenerator))
    }

    pub fn with_builtin_content() -> Self {
        Self::new(builtin_content())
    }

    pub fn with_id_generator(state: ContentState, ids: Box<dyn IdGenerator>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            inner: RwLock::new(Inner { state, revision: 0 }),
            ids,
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    pub fn revision(&self) -> u64 {
        self.read().revision
    }

    pub fn list<T: Stored>(&self) -> Vec<T> {
        T::records(&self.read().state).clone()
    }

    pub fn get<T: Stored>(&self, id: &str) -> Option<T> {
        T::records(&self.read().state)
            .iter()
            .find(|record| record.id() == id)
            .cloned()
    }

    pub fn payment_config(&self) -> PaymentConfig {
        self.read().state.payment_config.clone()
    }

    pub fn snapshot(&self) -> ContentSnapshot {
        let inner = self.read();
        ContentSnapshot {
            revision: inner.revision,
            schedules: inner.state.schedules.clone(),
            announcements: inner.state.announcements.clone(),
            products: inner.state.products.clone(),
            offer_categories: inner.state.offer_categories.clone(),
            payment_config: inner.state.payment_config.clone(),
        }
    }

    /// Appends a record under a fresh id and returns that id. Callers
    /// validate beforehand.
    pub fn add<T: Stored>(&self, new: T::New) -> String {
        let mut inner = self.write();
        let records = T::records_mut(&mut inner.state);
        let id = self.fresh_id(records);
        records.push(T::from_new(id.clone(), new));

        let revision = inner.bump();
        tracing::info!(kind = T::KIND.label(), id = %id, revision, "Content added");
        self.publish(StoreEvent::Record {
            kind: T::KIND,
            change: ChangeKind::Added,
            id: id.clone(),
            revision,
        });
        id
    }

    /// Merges `update` into the record with `id`. Returns whether a record
    /// was found.
    pub fn update<T: Stored>(&self, id: &str, update: T::Update) -> bool {
        let mut inner = self.write();
        let Some(record) = T::records_mut(&mut inner.state)
            .iter_mut()
            .find(|record| record.id() == id)
        else {
            tracing::debug!(kind = T::KIND.label(), id, "Update ignored, no such record");
            return false;
        };
        record.apply(update);

        let revision = inner.bump();
        tracing::info!(kind = T::KIND.label(), id, revision, "Content updated");
        self.publish(StoreEvent::Record {
            kind: T::KIND,
            change: ChangeKind::Updated,
            id: id.to_string(),
            revision,
        });
        true
    }

    /// Deletes the record with `id`. Returns whether a record was found.
    pub fn remove<T: Stored>(&self, id: &str) -> bool {
        let mut inner = self.write();
        let records = T::records_mut(&mut inner.state);
        let before = records.len();
        records.retain(|record| record.id() != id);
        if records.len() == before {
            tracing::debug!(kind = T::KIND.label(), id, "Remove ignored, no such record");
            return false;
        }

        let revision = inner.bump();
        tracing::info!(kind = T::KIND.label(), id, revision, "Content removed");
        self.publish(StoreEvent::Record {
            kind: T::KIND,
            change: ChangeKind::Removed,
            id: id.to_string(),
            revision,
        });
        true
    }

    pub fn update_payment_config(&self, update: PaymentConfigUpdate) -> PaymentConfig {
        let mut inner = self.write();
        inner.state.payment_config.apply(update);
        let config = inner.state.payment_config.clone();

        let revision = inner.bump();
        tracing::info!(
            revision,
            card_machine_enabled = config.card_machine_enabled,
            "Payment configuration updated"
        );
        self.publish(StoreEvent::PaymentConfigUpdated { revision });
        config
    }

    fn fresh_id<T: Stored>(&self, records: &[T]) -> String {
        let taken = |candidate: &str| records.iter().any(|record| record.id() == candidate);

        let mut candidate = self.ids.next_id();
        for _ in 1..MAX_ID_ATTEMPTS {
            if !taken(candidate.as_str()) {
                return candidate;
            }
            tracing::warn!(kind = T::KIND.label(), id = %candidate, "Generated id collided, retrying");
            candidate = self.ids.next_id();
        }

        let mut suffix = 1u64;
        let mut fallback = candidate.clone();
        while taken(fallback.as_str()) {
            fallback = format!("{}-{}", candidate, suffix);
            suffix += 1;
        }
        fallback
    }

    fn publish(&self, event: StoreEvent) {
        // Having no subscribers is fine; nobody is rendering right now.
        let _ = self.events.send(event);
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Inner {
    fn bump(&mut self) -> u64 {
        self.revision += 1;
        self.revision
    }
}
