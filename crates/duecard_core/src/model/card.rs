//! Credit-card account domain model.
//!
//! # Responsibility
//! - Define the per-card record carrying due date, cadence and reminder
//!   settings.
//! - Validate user-entered card fields before persistence.
//! - Derive a stable display color when the user does not pick one.
//!
//! # Invariants
//! - `id` is stable and never reused for another card.
//! - `remind_days_before` is a positive number of days.
//! - `amount_due` is finite and non-negative.
//! - `color` is a `#rrggbb` hex string.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a credit-card account.
pub type CardId = Uuid;

/// Default reminder lead time applied to newly added cards.
pub const DEFAULT_REMINDER_LEAD_DAYS: u32 = 5;

static HEX_COLOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#[0-9a-fA-F]{6}$").expect("valid hex color regex"));

// Small fixed palette; nicknames hash onto it so the same card keeps the
// same color across devices and resets.
const CARD_PALETTE: [&str; 8] = [
    "#0ea5e9", "#8b5cf6", "#f59e0b", "#10b981", "#ef4444", "#ec4899", "#14b8a6", "#6366f1",
];

/// How frequently a card's bill recurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cadence {
    /// Bill recurs every 7 days.
    Weekly,
    /// Bill recurs every 14 days.
    Biweekly,
    /// Bill recurs once per calendar month.
    Monthly,
}

impl Cadence {
    /// Stable lowercase name, shared by storage and display layers.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Biweekly => "biweekly",
            Self::Monthly => "monthly",
        }
    }
}

/// Validation failure for card fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardValidationError {
    /// The nil UUID is reserved and never a valid identity.
    NilUuid,
    /// Nickname is empty after trimming.
    EmptyNickname,
    /// Issuer name is empty after trimming.
    EmptyIssuer,
    /// Reminder lead time must be at least one day.
    ZeroReminderLead,
    /// Amount due is negative, NaN or infinite.
    InvalidAmount,
    /// Display color is not a `#rrggbb` hex string.
    InvalidColor(String),
}

impl Display for CardValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilUuid => write!(f, "card id must not be the nil uuid"),
            Self::EmptyNickname => write!(f, "card nickname must not be empty"),
            Self::EmptyIssuer => write!(f, "card issuer must not be empty"),
            Self::ZeroReminderLead => {
                write!(f, "reminder lead time must be at least one day")
            }
            Self::InvalidAmount => write!(f, "amount due must be a finite, non-negative number"),
            Self::InvalidColor(value) => write!(f, "invalid display color: `{value}`"),
        }
    }
}

impl Error for CardValidationError {}

/// One credit-card account owned by a person.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditCardAccount {
    /// Stable global ID used for targeted actions and payment history.
    pub id: CardId,
    /// Short label chosen by the user, e.g. "Sapphire".
    pub nickname: String,
    /// Issuing bank or network name, e.g. "Chase".
    pub issuer: String,
    /// `#rrggbb` display color; derived from the nickname when not set.
    pub color: String,
    /// Next statement due date.
    pub due_date: NaiveDate,
    /// Amount owed on the next statement.
    pub amount_due: f64,
    /// Whether the issuer pulls the payment automatically.
    pub autopay: bool,
    /// Days before `due_date` that a reminder should first surface.
    pub remind_days_before: u32,
    /// How frequently the bill recurs.
    pub cadence: Cadence,
    /// Date the card was last marked paid, if ever.
    pub last_paid_on: Option<NaiveDate>,
}

impl CreditCardAccount {
    /// Creates a new card with a generated stable ID and defaults for the
    /// optional form fields.
    ///
    /// # Invariants
    /// - `amount_due` starts at zero, `autopay` off.
    /// - `remind_days_before` starts at [`DEFAULT_REMINDER_LEAD_DAYS`].
    /// - `color` is derived from the nickname.
    pub fn new(
        nickname: impl Into<String>,
        issuer: impl Into<String>,
        due_date: NaiveDate,
        cadence: Cadence,
    ) -> Self {
        let nickname = nickname.into();
        let color = derive_color_from_nickname(&nickname);
        Self {
            id: Uuid::new_v4(),
            nickname,
            issuer: issuer.into(),
            color,
            due_date,
            amount_due: 0.0,
            autopay: false,
            remind_days_before: DEFAULT_REMINDER_LEAD_DAYS,
            cadence,
            last_paid_on: None,
        }
    }

    /// Creates a card with a caller-provided stable ID.
    ///
    /// Used by import paths where identity already exists externally.
    pub fn with_id(
        id: CardId,
        nickname: impl Into<String>,
        issuer: impl Into<String>,
        due_date: NaiveDate,
        cadence: Cadence,
    ) -> Result<Self, CardValidationError> {
        if id.is_nil() {
            return Err(CardValidationError::NilUuid);
        }
        let mut card = Self::new(nickname, issuer, due_date, cadence);
        card.id = id;
        Ok(card)
    }

    /// Checks card-level invariants.
    pub fn validate(&self) -> Result<(), CardValidationError> {
        if self.id.is_nil() {
            return Err(CardValidationError::NilUuid);
        }
        if self.nickname.trim().is_empty() {
            return Err(CardValidationError::EmptyNickname);
        }
        if self.issuer.trim().is_empty() {
            return Err(CardValidationError::EmptyIssuer);
        }
        if self.remind_days_before == 0 {
            return Err(CardValidationError::ZeroReminderLead);
        }
        if !self.amount_due.is_finite() || self.amount_due < 0.0 {
            return Err(CardValidationError::InvalidAmount);
        }
        if !HEX_COLOR_RE.is_match(&self.color) {
            return Err(CardValidationError::InvalidColor(self.color.clone()));
        }
        Ok(())
    }
}

/// One append-only record of a card being marked paid.
///
/// History is never rewritten: marking a card paid appends exactly one
/// entry and leaves prior entries untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentLogEntry {
    /// Stable entry ID.
    pub id: Uuid,
    /// Card this payment belongs to.
    pub card_id: CardId,
    /// Date the user marked the bill paid.
    pub paid_on: NaiveDate,
    /// Amount due at the moment of payment.
    pub amount: f64,
    /// Due date before the cadence roll.
    pub due_before: NaiveDate,
    /// Due date after the cadence roll.
    pub due_after: NaiveDate,
}

impl PaymentLogEntry {
    /// Creates a new log entry with a generated stable ID.
    pub fn new(
        card_id: CardId,
        paid_on: NaiveDate,
        amount: f64,
        due_before: NaiveDate,
        due_after: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            card_id,
            paid_on,
            amount,
            due_before,
            due_after,
        }
    }
}

/// Derives a stable display color from a card nickname.
///
/// Rules:
/// - Hash is case- and surrounding-whitespace-insensitive.
/// - The same nickname always maps to the same palette entry.
pub fn derive_color_from_nickname(nickname: &str) -> String {
    let mut hash: u32 = 5381;
    for byte in nickname.trim().to_lowercase().bytes() {
        hash = hash.wrapping_mul(33) ^ u32::from(byte);
    }
    CARD_PALETTE[hash as usize % CARD_PALETTE.len()].to_string()
}
