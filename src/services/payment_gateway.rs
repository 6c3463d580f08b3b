use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Pix,
    Debit,
    Credit,
}

impl PaymentMethod {
    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Pix => "PIX",
            PaymentMethod::Debit => "DÉBITO",
            PaymentMethod::Credit => "CRÉDITO",
        }
    }
}

/// Result of a single charge attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentOutcome {
    Approved,
    Declined { reason: String },
    TimedOut,
}

/// External payment collaborator awaited while the kiosk shows PROCESSING.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn charge(&self, amount_cents: i64, method: PaymentMethod) -> PaymentOutcome;
}

/// Stand-in gateway: waits a fixed delay, then approves every charge.
#[derive(Debug, Clone)]
pub struct SimulatedGateway {
    delay: Duration,
}

impl SimulatedGateway {
    pub const DEFAULT_DELAY: Duration = Duration::from_secs(4);

    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for SimulatedGateway {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DELAY)
    }
}

#[async_trait]
impl PaymentGateway for SimulatedGateway {
    async fn charge(&self, amount_cents: i64, method: PaymentMethod) -> PaymentOutcome {
        tracing::debug!(amount_cents, method = method.label(), "Simulating charge");
        tokio::time::sleep(self.delay).await;
        PaymentOutcome::Approved
    }
}
