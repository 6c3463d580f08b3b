//! # Kiosk Flow
//!
//! The customer-facing screen state machine: contribution flows (tithe and
//! offerings), the merchandise point of sale, informational screens and the
//! admin passcode gate.
//!
//! `KioskFlow` is synchronous and free of I/O. It reads the content store but
//! never writes to it. Transitions that need the outside world (starting or
//! cancelling a charge, opening or closing the admin session) are returned as
//! a [`FlowEffect`] for the owning session to carry out.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::{PasscodeVerifier, PASSCODE_LENGTH};
use crate::models::{
    format_brl, Announcement, OfferCategory, Product, Schedule, ServiceError,
};
use crate::repositories::ContentStore;
use crate::services::{PaymentMethod, PaymentOutcome};

pub const MAX_AMOUNT_DIGITS: usize = 8;
pub const TITHE_LABEL: &str = "Dízimo";
pub const WRONG_PASSCODE: &str = "Senha incorreta";
pub const PROCESSING_STATUS: &str = "Processando pagamento...";
pub const TIMED_OUT_REASON: &str = "Tempo esgotado ao aguardar a confirmação do pagamento.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Screen {
    Home,
    OfferType,
    ValueInput,
    PaymentMethod,
    Processing,
    Success,
    Failure,
    Schedules,
    Announcements,
    Pos,
    AdminLogin,
    AdminDashboard,
}

/// Which donation path the visitor took from HOME.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ContributionCategory {
    Tithe,
    Offering,
}

// =============================================================================
// DIGIT BUFFERS
// =============================================================================

/// Keypad input kept as a digit string.
///
/// The amount buffer starts at `"0"`, which the first digit replaces, and
/// collapses back to `"0"` when emptied. The passcode buffer starts empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigitBuffer {
    digits: String,
    max_len: usize,
    zero_placeholder: bool,
}

impl DigitBuffer {
    pub fn amount() -> Self {
        Self {
            digits: "0".to_string(),
            max_len: MAX_AMOUNT_DIGITS,
            zero_placeholder: true,
        }
    }

    pub fn passcode() -> Self {
        Self {
            digits: String::new(),
            max_len: PASSCODE_LENGTH,
            zero_placeholder: false,
        }
    }

    /// Appends a digit. Returns false when the buffer is already full.
    pub fn push(&mut self, digit: u8) -> Result<bool, ServiceError> {
        if digit > 9 {
            return Err(ServiceError::ValidationError(format!(
                "{} is not a keypad digit",
                digit
            )));
        }
        if self.digits.len() >= self.max_len {
            return Ok(false);
        }

        let ch = char::from(b'0' + digit);
        if self.zero_placeholder && self.digits == "0" {
            self.digits = ch.to_string();
        } else {
            self.digits.push(ch);
        }
        Ok(true)
    }

    pub fn backspace(&mut self) {
        self.digits.pop();
        if self.zero_placeholder && self.digits.is_empty() {
            self.digits.push('0');
        }
    }

    pub fn clear(&mut self) {
        self.digits.clear();
        if self.zero_placeholder {
            self.digits.push('0');
        }
    }

    /// Replaces the buffer with the decimal digits of `value`.
    pub fn set_value(&mut self, value: i64) -> Result<(), ServiceError> {
        let digits = value.max(0).to_string();
        if digits.len() > self.max_len {
            return Err(ServiceError::ValidationError(format!(
                "{} exceeds the maximum amount",
                format_brl(value)
            )));
        }
        self.digits = digits;
        Ok(())
    }

    pub fn as_str(&self) -> &str {
        &self.digits
    }

    pub fn len(&self) -> usize {
        self.digits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.digits.len() == self.max_len
    }

    /// Numeric value of the buffer, in cents for the amount buffer.
    pub fn value(&self) -> i64 {
        self.digits.parse().unwrap_or(0)
    }
}

// =============================================================================
// POS CART
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: String,
    pub name: String,
    pub price: i64,
    pub quantity: u32,
}

impl CartLine {
    pub fn subtotal(&self) -> i64 {
        self.price.saturating_mul(i64::from(self.quantity))
    }
}

/// Lines snapshot the product's name and price when first added, so later
/// edits or removal of the product do not touch an active cart. Totals
/// saturate instead of overflowing; checkout rejects any total the amount
/// buffer cannot hold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn add(&mut self, product: &Product) {
        match self.lines.iter_mut().find(|line| line.product_id == product.id) {
            Some(line) => line.quantity = line.quantity.saturating_add(1),
            None => self.lines.push(CartLine {
                product_id: product.id.clone(),
                name: product.name.clone(),
                price: product.price,
                quantity: 1,
            }),
        }
    }

    /// Takes one unit off the line, dropping it at zero. Returns false when
    /// the product is not in the cart.
    pub fn decrement(&mut self, product_id: &str) -> bool {
        let Some(index) = self.lines.iter().position(|line| line.product_id == product_id) else {
            return false;
        };
        if self.lines[index].quantity > 1 {
            self.lines[index].quantity -= 1;
        } else {
            self.lines.remove(index);
        }
        true
    }

    pub fn quantity_of(&self, product_id: &str) -> u32 {
        self.lines
            .iter()
            .find(|line| line.product_id == product_id)
            .map_or(0, |line| line.quantity)
    }

    pub fn total(&self) -> i64 {
        self.lines
            .iter()
            .map(CartLine::subtotal)
            .fold(0, i64::saturating_add)
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

// =============================================================================
// EVENTS AND EFFECTS
// =============================================================================

/// User input delivered by the rendering layer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum KioskEvent {
    SelectTithe,
    SelectOffering,
    SelectOfferCategory { id: String },
    OpenSchedules,
    OpenAnnouncements,
    OpenPos,
    OpenAdminLogin,
    AmountDigit { digit: u8 },
    AmountBackspace,
    ToggleCpf,
    ConfirmAmount,
    SelectPaymentMethod { method: PaymentMethod },
    RetryPayment,
    AddToCart { product_id: String },
    RemoveFromCart { product_id: String },
    Checkout,
    PasscodeDigit { digit: u8 },
    PasscodeBackspace,
    SubmitPasscode,
    BackToStart,
    Logout,
    Back,
}

impl KioskEvent {
    pub fn name(&self) -> &'static str {
        match self {
            KioskEvent::SelectTithe => "select_tithe",
            KioskEvent::SelectOffering => "select_offering",
            KioskEvent::SelectOfferCategory { .. } => "select_offer_category",
            KioskEvent::OpenSchedules => "open_schedules",
            KioskEvent::OpenAnnouncements => "open_announcements",
            KioskEvent::OpenPos => "open_pos",
            KioskEvent::OpenAdminLogin => "open_admin_login",
            KioskEvent::AmountDigit { .. } => "amount_digit",
            KioskEvent::AmountBackspace => "amount_backspace",
            KioskEvent::ToggleCpf => "toggle_cpf",
            KioskEvent::ConfirmAmount => "confirm_amount",
            KioskEvent::SelectPaymentMethod { .. } => "select_payment_method",
            KioskEvent::RetryPayment => "retry_payment",
            KioskEvent::AddToCart { .. } => "add_to_cart",
            KioskEvent::RemoveFromCart { .. } => "remove_from_cart",
            KioskEvent::Checkout => "checkout",
            KioskEvent::PasscodeDigit { .. } => "passcode_digit",
            KioskEvent::PasscodeBackspace => "passcode_backspace",
            KioskEvent::SubmitPasscode => "submit_passcode",
            KioskEvent::BackToStart => "back_to_start",
            KioskEvent::Logout => "logout",
            KioskEvent::Back => "back",
        }
    }
}

/// A charge the session must start on the payment gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChargeRequest {
    pub attempt: u64,
    pub amount_cents: i64,
    pub method: PaymentMethod,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowEffect {
    None,
    StartCharge(ChargeRequest),
    CancelCharge,
    AdminAuthenticated,
    AdminLoggedOut,
}

// =============================================================================
// VIEW
// =============================================================================

/// Store content shown by the current screen, read at view time.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ScreenContent {
    OfferCategories { items: Vec<OfferCategory> },
    Schedules { items: Vec<Schedule> },
    Announcements { items: Vec<Announcement> },
    Products { items: Vec<Product> },
}

/// Everything the rendering layer needs to draw the current screen.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct KioskView {
    pub screen: Screen,
    pub category: Option<ContributionCategory>,
    pub offer_type: Option<String>,
    pub amount_cents: i64,
    pub amount_display: String,
    pub cpf_enabled: bool,
    pub payment_method: Option<PaymentMethod>,
    pub can_go_back: bool,
    pub can_confirm_amount: bool,
    pub can_submit_passcode: bool,
    pub can_checkout: bool,
    pub passcode_length: usize,
    pub admin_error: Option<String>,
    pub cart: Vec<CartLine>,
    pub cart_total: i64,
    pub cart_total_display: String,
    pub processing_status: Option<String>,
    pub pix_key: Option<String>,
    pub failure_reason: Option<String>,
    pub content: Option<ScreenContent>,
}

// =============================================================================
// STATE MACHINE
// =============================================================================

#[derive(Debug, Clone)]
pub struct KioskFlow {
    screen: Screen,
    category: Option<ContributionCategory>,
    offer_type: Option<String>,
    amount: DigitBuffer,
    cpf_enabled: bool,
    payment_method: Option<PaymentMethod>,
    passcode: DigitBuffer,
    admin_error: Option<String>,
    cart: Cart,
    processing_status: Option<String>,
    failure_reason: Option<String>,
    attempt: u64,
}

impl Default for KioskFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl KioskFlow {
    pub fn new() -> Self {
        Self {
            screen: Screen::Home,
            category: None,
            offer_type: None,
            amount: DigitBuffer::amount(),
            cpf_enabled: false,
            payment_method: None,
            passcode: DigitBuffer::passcode(),
            admin_error: None,
            cart: Cart::default(),
            processing_status: None,
            failure_reason: None,
            attempt: 0,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn category(&self) -> Option<ContributionCategory> {
        self.category
    }

    pub fn offer_type(&self) -> Option<&str> {
        self.offer_type.as_deref()
    }

    pub fn amount(&self) -> &DigitBuffer {
        &self.amount
    }

    pub fn amount_cents(&self) -> i64 {
        self.amount.value()
    }

    pub fn cpf_enabled(&self) -> bool {
        self.cpf_enabled
    }

    pub fn payment_method(&self) -> Option<PaymentMethod> {
        self.payment_method
    }

    pub fn passcode(&self) -> &DigitBuffer {
        &self.passcode
    }

    pub fn admin_error(&self) -> Option<&str> {
        self.admin_error.as_deref()
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn processing_status(&self) -> Option<&str> {
        self.processing_status.as_deref()
    }

    pub fn failure_reason(&self) -> Option<&str> {
        self.failure_reason.as_deref()
    }

    /// Number of the most recent charge attempt.
    pub fn attempt(&self) -> u64 {
        self.attempt
    }

    /// Where "back" leads from the current screen, if anywhere.
    pub fn back_target(&self) -> Option<Screen> {
        match self.screen {
            Screen::OfferType
            | Screen::Schedules
            | Screen::Announcements
            | Screen::Pos
            | Screen::AdminLogin => Some(Screen::Home),
            Screen::ValueInput => match self.category {
                Some(ContributionCategory::Tithe) => Some(Screen::Home),
                _ => Some(Screen::OfferType),
            },
            Screen::PaymentMethod => Some(Screen::ValueInput),
            Screen::Processing | Screen::Failure => Some(Screen::PaymentMethod),
            Screen::Home | Screen::Success | Screen::AdminDashboard => None,
        }
    }

    /// Whether the back control is shown. PROCESSING has a back transition
    /// but advances on its own, so the control stays hidden there.
    pub fn can_go_back(&self) -> bool {
        self.screen != Screen::Processing && self.back_target().is_some()
    }

    pub fn can_confirm_amount(&self) -> bool {
        self.screen == Screen::ValueInput && self.amount.value() > 0
    }

    pub fn can_submit_passcode(&self) -> bool {
        self.screen == Screen::AdminLogin && self.passcode.is_full()
    }

    pub fn can_checkout(&self) -> bool {
        self.screen == Screen::Pos && !self.cart.is_empty()
    }

    /// Applies one user event. Rejected events leave the flow untouched.
    pub fn apply(
        &mut self,
        event: KioskEvent,
        store: &ContentStore,
        passcode: &dyn PasscodeVerifier,
    ) -> Result<FlowEffect, ServiceError> {
        let from = self.screen;
        let name = event.name();

        let effect = match event {
            KioskEvent::SelectTithe => {
                self.require(Screen::Home, name)?;
                self.category = Some(ContributionCategory::Tithe);
                self.offer_type = Some(TITHE_LABEL.to_string());
                self.screen = Screen::ValueInput;
                FlowEffect::None
            }
            KioskEvent::SelectOffering => {
                self.require(Screen::Home, name)?;
                self.category = Some(ContributionCategory::Offering);
                self.offer_type = None;
                self.screen = Screen::OfferType;
                FlowEffect::None
            }
            KioskEvent::SelectOfferCategory { id } => {
                self.require(Screen::OfferType, name)?;
                let category = store.get::<OfferCategory>(&id).ok_or_else(|| {
                    ServiceError::NotFound(format!("Offer category {} not found", id))
                })?;
                self.offer_type = Some(category.title);
                self.screen = Screen::ValueInput;
                FlowEffect::None
            }
            KioskEvent::OpenSchedules => self.open_from_home(Screen::Schedules, name)?,
            KioskEvent::OpenAnnouncements => self.open_from_home(Screen::Announcements, name)?,
            KioskEvent::OpenPos => self.open_from_home(Screen::Pos, name)?,
            KioskEvent::OpenAdminLogin => {
                self.open_from_home(Screen::AdminLogin, name)?;
                self.passcode.clear();
                self.admin_error = None;
                FlowEffect::None
            }
            KioskEvent::AmountDigit { digit } => {
                self.require(Screen::ValueInput, name)?;
                self.amount.push(digit)?;
                FlowEffect::None
            }
            KioskEvent::AmountBackspace => {
                self.require(Screen::ValueInput, name)?;
                self.amount.backspace();
                FlowEffect::None
            }
            KioskEvent::ToggleCpf => {
                self.require(Screen::ValueInput, name)?;
                self.cpf_enabled = !self.cpf_enabled;
                FlowEffect::None
            }
            KioskEvent::ConfirmAmount => {
                self.require(Screen::ValueInput, name)?;
                if !self.can_confirm_amount() {
                    return Err(ServiceError::InvalidTransition(
                        "Amount must be greater than zero".to_string(),
                    ));
                }
                self.screen = Screen::PaymentMethod;
                FlowEffect::None
            }
            KioskEvent::SelectPaymentMethod { method } => {
                self.require(Screen::PaymentMethod, name)?;
                if self.amount.value() <= 0 {
                    return Err(ServiceError::InvalidTransition(
                        "Amount must be greater than zero".to_string(),
                    ));
                }
                self.payment_method = Some(method);
                self.begin_processing(store, method)
            }
            KioskEvent::RetryPayment => {
                self.require(Screen::Failure, name)?;
                let method = self.payment_method.ok_or_else(|| {
                    ServiceError::InvalidTransition("No payment method to retry".to_string())
                })?;
                self.begin_processing(store, method)
            }
            KioskEvent::AddToCart { product_id } => {
                self.require(Screen::Pos, name)?;
                let product = store.get::<Product>(&product_id).ok_or_else(|| {
                    ServiceError::NotFound(format!("Product {} not found", product_id))
                })?;
                self.cart.add(&product);
                FlowEffect::None
            }
            KioskEvent::RemoveFromCart { product_id } => {
                self.require(Screen::Pos, name)?;
                if !self.cart.decrement(&product_id) {
                    return Err(ServiceError::NotFound(format!(
                        "Product {} is not in the cart",
                        product_id
                    )));
                }
                FlowEffect::None
            }
            KioskEvent::Checkout => {
                self.require(Screen::Pos, name)?;
                if self.cart.is_empty() {
                    return Err(ServiceError::InvalidTransition("Cart is empty".to_string()));
                }
                self.amount.set_value(self.cart.total())?;
                self.screen = Screen::PaymentMethod;
                FlowEffect::None
            }
            KioskEvent::PasscodeDigit { digit } => {
                self.require(Screen::AdminLogin, name)?;
                self.passcode.push(digit)?;
                FlowEffect::None
            }
            KioskEvent::PasscodeBackspace => {
                self.require(Screen::AdminLogin, name)?;
                self.passcode.backspace();
                FlowEffect::None
            }
            KioskEvent::SubmitPasscode => {
                self.require(Screen::AdminLogin, name)?;
                if !self.passcode.is_full() {
                    return Err(ServiceError::InvalidTransition(format!(
                        "Passcode must have {} digits",
                        PASSCODE_LENGTH
                    )));
                }
                let accepted = passcode.verify(self.passcode.as_str());
                self.passcode.clear();
                if accepted {
                    self.admin_error = None;
                    self.screen = Screen::AdminDashboard;
                    FlowEffect::AdminAuthenticated
                } else {
                    tracing::warn!("Rejected admin passcode");
                    self.admin_error = Some(WRONG_PASSCODE.to_string());
                    FlowEffect::None
                }
            }
            KioskEvent::BackToStart => {
                self.require(Screen::Success, name)?;
                self.reset();
                FlowEffect::None
            }
            KioskEvent::Logout => {
                self.require(Screen::AdminDashboard, name)?;
                self.screen = Screen::Home;
                FlowEffect::AdminLoggedOut
            }
            KioskEvent::Back => self.go_back()?,
        };

        if from != self.screen {
            tracing::info!(event = name, from = ?from, to = ?self.screen, "Kiosk transition");
        }
        Ok(effect)
    }

    /// Applies the gateway's answer to charge attempt `attempt`. Answers for
    /// an attempt the flow has moved past are ignored; returns whether the
    /// outcome was applied.
    pub fn settle(&mut self, attempt: u64, outcome: PaymentOutcome) -> bool {
        if self.screen != Screen::Processing || attempt != self.attempt {
            tracing::debug!(attempt, current = self.attempt, "Ignoring stale payment outcome");
            return false;
        }

        self.processing_status = None;
        match outcome {
            PaymentOutcome::Approved => {
                self.failure_reason = None;
                self.screen = Screen::Success;
                tracing::info!(attempt, amount_cents = self.amount.value(), "Payment approved");
            }
            PaymentOutcome::Declined { reason } => {
                tracing::warn!(attempt, reason = %reason, "Payment declined");
                self.failure_reason = Some(reason);
                self.screen = Screen::Failure;
            }
            PaymentOutcome::TimedOut => {
                tracing::warn!(attempt, "Payment timed out");
                self.failure_reason = Some(TIMED_OUT_REASON.to_string());
                self.screen = Screen::Failure;
            }
        }
        true
    }

    /// Returns to HOME with every transient selection cleared. Bumps the
    /// attempt counter so an in-flight charge can no longer land.
    pub fn reset(&mut self) {
        let attempt = self.attempt + 1;
        *self = Self {
            attempt,
            ..Self::new()
        };
    }

    pub fn view(&self, store: &ContentStore) -> KioskView {
        let content = match self.screen {
            Screen::OfferType => Some(ScreenContent::OfferCategories {
                items: store.list::<OfferCategory>(),
            }),
            Screen::Schedules => Some(ScreenContent::Schedules {
                items: store.list::<Schedule>(),
            }),
            Screen::Announcements => Some(ScreenContent::Announcements {
                items: store.list::<Announcement>(),
            }),
            Screen::Pos => Some(ScreenContent::Products {
                items: store.list::<Product>(),
            }),
            _ => None,
        };
        let pix_key = match self.screen {
            Screen::Processing => Some(store.payment_config().pix_key),
            _ => None,
        };

        KioskView {
            screen: self.screen,
            category: self.category,
            offer_type: self.offer_type.clone(),
            amount_cents: self.amount.value(),
            amount_display: format_brl(self.amount.value()),
            cpf_enabled: self.cpf_enabled,
            payment_method: self.payment_method,
            can_go_back: self.can_go_back(),
            can_confirm_amount: self.can_confirm_amount(),
            can_submit_passcode: self.can_submit_passcode(),
            can_checkout: self.can_checkout(),
            passcode_length: self.passcode.len(),
            admin_error: self.admin_error.clone(),
            cart: self.cart.lines().to_vec(),
            cart_total: self.cart.total(),
            cart_total_display: format_brl(self.cart.total()),
            processing_status: self.processing_status.clone(),
            pix_key,
            failure_reason: self.failure_reason.clone(),
            content,
        }
    }

    fn require(&self, expected: Screen, event: &str) -> Result<(), ServiceError> {
        if self.screen == expected {
            Ok(())
        } else {
            Err(ServiceError::InvalidTransition(format!(
                "{} is not available on {:?}",
                event, self.screen
            )))
        }
    }

    fn open_from_home(&mut self, target: Screen, event: &str) -> Result<FlowEffect, ServiceError> {
        self.require(Screen::Home, event)?;
        self.screen = target;
        Ok(FlowEffect::None)
    }

    fn begin_processing(&mut self, store: &ContentStore, method: PaymentMethod) -> FlowEffect {
        let config = store.payment_config();
        self.processing_status = Some(if config.card_machine_enabled {
            format!("Conectando à máquina ({})...", config.card_machine_ip)
        } else {
            PROCESSING_STATUS.to_string()
        });
        self.failure_reason = None;
        self.attempt += 1;
        self.screen = Screen::Processing;

        FlowEffect::StartCharge(ChargeRequest {
            attempt: self.attempt,
            amount_cents: self.amount.value(),
            method,
        })
    }

    fn go_back(&mut self) -> Result<FlowEffect, ServiceError> {
        let target = self.back_target().ok_or_else(|| {
            ServiceError::InvalidTransition(format!("back is not available on {:?}", self.screen))
        })?;

        let effect = match self.screen {
            Screen::Processing => {
                self.processing_status = None;
                FlowEffect::CancelCharge
            }
            Screen::Failure => {
                self.failure_reason = None;
                FlowEffect::None
            }
            Screen::Pos => {
                self.cart.clear();
                FlowEffect::None
            }
            Screen::AdminLogin => {
                self.passcode.clear();
                self.admin_error = None;
                FlowEffect::None
            }
            _ => FlowEffect::None,
        };

        self.screen = target;
        Ok(effect)
    }
}
