use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::auth::PasscodeVerifier;
use crate::models::ServiceError;
use crate::repositories::ContentStore;
use crate::services::{ChargeRequest, FlowEffect, KioskEvent, KioskFlow, KioskView, PaymentGateway};

/// Outcome of dispatching one event: the new view plus the side effect the
/// caller still has to honour (opening or closing the admin session).
#[derive(Debug, Clone)]
pub struct DispatchResult {
    pub view: KioskView,
    pub effect: FlowEffect,
}

/// Owns the kiosk flow and runs its payment charges.
///
/// Charges run as tokio tasks that settle the flow when the gateway answers.
/// Lock order is `pending_charge` then `flow`; neither is held across an
/// await.
pub struct KioskSession {
    flow: Arc<Mutex<KioskFlow>>,
    store: Arc<ContentStore>,
    gateway: Arc<dyn PaymentGateway>,
    passcode: Arc<dyn PasscodeVerifier>,
    pending_charge: Mutex<Option<JoinHandle<()>>>,
}

impl KioskSession {
    pub fn new(
        store: Arc<ContentStore>,
        gateway: Arc<dyn PaymentGateway>,
        passcode: Arc<dyn PasscodeVerifier>,
    ) -> Self {
        Self {
            flow: Arc::new(Mutex::new(KioskFlow::new())),
            store,
            gateway,
            passcode,
            pending_charge: Mutex::new(None),
        }
    }

    pub fn store(&self) -> &Arc<ContentStore> {
        &self.store
    }

    pub fn view(&self) -> KioskView {
        lock(&self.flow).view(&self.store)
    }

    pub fn dispatch(&self, event: KioskEvent) -> Result<DispatchResult, ServiceError> {
        let mut pending = lock(&self.pending_charge);
        let mut flow = lock(&self.flow);

        let effect = flow.apply(event, &self.store, self.passcode.as_ref())?;
        match &effect {
            FlowEffect::StartCharge(request) => {
                if let Some(previous) = pending.take() {
                    previous.abort();
                }
                match self.spawn_charge(request.clone()) {
                    Ok(handle) => *pending = Some(handle),
                    Err(e) => {
                        // Without a runtime the flow would sit in PROCESSING forever.
                        flow.reset();
                        return Err(e);
                    }
                }
            }
            FlowEffect::CancelCharge => {
                if let Some(handle) = pending.take() {
                    handle.abort();
                    tracing::info!(attempt = flow.attempt(), "Pending charge cancelled");
                }
            }
            FlowEffect::None | FlowEffect::AdminAuthenticated | FlowEffect::AdminLoggedOut => {}
        }

        Ok(DispatchResult {
            view: flow.view(&self.store),
            effect,
        })
    }

    /// Drops every transient selection and returns to HOME, abandoning any
    /// charge still in flight.
    pub fn reset(&self) -> KioskView {
        let mut pending = lock(&self.pending_charge);
        let mut flow = lock(&self.flow);

        if let Some(handle) = pending.take() {
            handle.abort();
        }
        flow.reset();
        tracing::info!("Kiosk flow reset");
        flow.view(&self.store)
    }

    fn spawn_charge(&self, request: ChargeRequest) -> Result<JoinHandle<()>, ServiceError> {
        let runtime = Handle::try_current().map_err(|e| {
            ServiceError::InternalError(format!("No async runtime to run the charge: {}", e))
        })?;

        let flow = Arc::clone(&self.flow);
        let gateway = Arc::clone(&self.gateway);

        tracing::info!(
            attempt = request.attempt,
            amount_cents = request.amount_cents,
            method = request.method.label(),
            "Charge started"
        );

        Ok(runtime.spawn(async move {
            let outcome = gateway.charge(request.amount_cents, request.method).await;
            lock(&flow).settle(request.attempt, outcome);
        }))
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
