//! Household use-case service.
//!
//! # Responsibility
//! - Provide one stable entry point per dashboard action.
//! - Delegate persistence to repository implementations.
//! - Rebuild derived views (reminders, statistics) from stored state.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence
//!   contracts.
//! - Mutations are persisted before the call returns; derived views are
//!   recomputed, never cached.
//! - Mark-paid rolls the due date exactly one cadence interval forward
//!   and appends exactly one payment-log entry.

use crate::model::card::{
    Cadence, CardId, CreditCardAccount, PaymentLogEntry, DEFAULT_REMINDER_LEAD_DAYS,
};
use crate::model::person::{Person, PersonId};
use crate::reminder::upcoming::{
    build_upcoming_reminders, dashboard_stats, roll_due_date_forward, DashboardStats,
    ReminderQuery, UpcomingReminder,
};
use crate::repo::household_repo::{HouseholdRepository, RepoError};
use crate::sample::sample_people;
use chrono::NaiveDate;
use log::info;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for household use-cases.
#[derive(Debug)]
pub enum HouseholdServiceError {
    /// Target person does not exist.
    PersonNotFound(PersonId),
    /// Target card does not exist.
    CardNotFound(CardId),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for HouseholdServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PersonNotFound(id) => write!(f, "person not found: {id}"),
            Self::CardNotFound(id) => write!(f, "card not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => {
                write!(f, "inconsistent household state: {details}")
            }
        }
    }
}

impl Error for HouseholdServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for HouseholdServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::PersonNotFound(id) => Self::PersonNotFound(id),
            RepoError::CardNotFound(id) => Self::CardNotFound(id),
            other => Self::Repo(other),
        }
    }
}

type ServiceResult<T> = Result<T, HouseholdServiceError>;

/// Request model for adding a card to a person.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCardRequest {
    pub nickname: String,
    pub issuer: String,
    pub due_date: NaiveDate,
    pub amount_due: f64,
    pub autopay: bool,
    pub remind_days_before: u32,
    pub cadence: Cadence,
    /// Explicit `#rrggbb` color; derived from the nickname when `None`.
    pub color: Option<String>,
}

impl NewCardRequest {
    /// Creates a request with form defaults for the optional fields.
    pub fn new(
        nickname: impl Into<String>,
        issuer: impl Into<String>,
        due_date: NaiveDate,
        cadence: Cadence,
    ) -> Self {
        Self {
            nickname: nickname.into(),
            issuer: issuer.into(),
            due_date,
            amount_due: 0.0,
            autopay: false,
            remind_days_before: DEFAULT_REMINDER_LEAD_DAYS,
            cadence,
            color: None,
        }
    }
}

/// Targeted field patch for editing a card in place.
///
/// `None` fields are left unchanged, mirroring the dashboard's
/// edit-single-field controls.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardPatch {
    pub nickname: Option<String>,
    pub issuer: Option<String>,
    pub color: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub amount_due: Option<f64>,
    pub autopay: Option<bool>,
    pub remind_days_before: Option<u32>,
    pub cadence: Option<Cadence>,
}

/// Derived dashboard view: aggregate totals plus the reminder list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub stats: DashboardStats,
    pub reminders: Vec<UpcomingReminder>,
}

/// Serializable image of the full stored collection, used for local
/// JSON backup and restore.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseholdSnapshot {
    pub people: Vec<Person>,
}

/// Use-case facade over repository implementations.
pub struct HouseholdService<R: HouseholdRepository> {
    repo: R,
}

impl<R: HouseholdRepository> HouseholdService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Registers a person from form input.
    ///
    /// # Contract
    /// - Name is trimmed; a blank name is rejected by validation.
    /// - A blank email is treated as absent.
    pub fn register_person(
        &self,
        name: impl Into<String>,
        email: Option<String>,
    ) -> ServiceResult<Person> {
        let name = name.into().trim().to_string();
        let email = email
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());

        let person = Person::new(name, email);
        let id = self.repo.create_person(&person)?;
        info!("event=person_registered module=service status=ok person_id={id}");

        self.repo
            .get_person(id)?
            .ok_or(HouseholdServiceError::InconsistentState(
                "registered person not found in read-back",
            ))
    }

    /// Removes a person; their cards and payment history go with them.
    pub fn remove_person(&self, id: PersonId) -> ServiceResult<()> {
        self.repo.delete_person(id)?;
        info!("event=person_removed module=service status=ok person_id={id}");
        Ok(())
    }

    /// Adds a card to a person from form input.
    pub fn add_card(
        &self,
        person_id: PersonId,
        request: &NewCardRequest,
    ) -> ServiceResult<CreditCardAccount> {
        let mut card = CreditCardAccount::new(
            request.nickname.trim(),
            request.issuer.trim(),
            request.due_date,
            request.cadence,
        );
        card.amount_due = request.amount_due;
        card.autopay = request.autopay;
        card.remind_days_before = request.remind_days_before;
        if let Some(color) = &request.color {
            card.color = color.trim().to_string();
        }

        let id = self.repo.create_card(person_id, &card)?;
        info!(
            "event=card_added module=service status=ok person_id={person_id} card_id={id}"
        );
        self.read_back_card(id)
    }

    /// Removes one card.
    pub fn remove_card(&self, id: CardId) -> ServiceResult<()> {
        self.repo.delete_card(id)?;
        info!("event=card_removed module=service status=ok card_id={id}");
        Ok(())
    }

    /// Applies a field patch to one card.
    pub fn update_card(&self, id: CardId, patch: &CardPatch) -> ServiceResult<CreditCardAccount> {
        let (_, mut card) = self
            .repo
            .find_card(id)?
            .ok_or(HouseholdServiceError::CardNotFound(id))?;

        if let Some(nickname) = &patch.nickname {
            card.nickname = nickname.trim().to_string();
        }
        if let Some(issuer) = &patch.issuer {
            card.issuer = issuer.trim().to_string();
        }
        if let Some(color) = &patch.color {
            card.color = color.trim().to_string();
        }
        if let Some(due_date) = patch.due_date {
            card.due_date = due_date;
        }
        if let Some(amount_due) = patch.amount_due {
            card.amount_due = amount_due;
        }
        if let Some(autopay) = patch.autopay {
            card.autopay = autopay;
        }
        if let Some(lead) = patch.remind_days_before {
            card.remind_days_before = lead;
        }
        if let Some(cadence) = patch.cadence {
            card.cadence = cadence;
        }

        self.repo.update_card(&card)?;
        info!("event=card_updated module=service status=ok card_id={id}");
        self.read_back_card(id)
    }

    /// Marks a card paid as of `today`.
    ///
    /// # Contract
    /// - `last_paid_on` becomes `today`.
    /// - The due date advances exactly one cadence interval, always
    ///   strictly forward.
    /// - Exactly one payment-log entry is appended; history is never
    ///   rewritten.
    pub fn mark_paid(&self, id: CardId, today: NaiveDate) -> ServiceResult<CreditCardAccount> {
        let (_, mut card) = self
            .repo
            .find_card(id)?
            .ok_or(HouseholdServiceError::CardNotFound(id))?;

        let due_before = card.due_date;
        let due_after = roll_due_date_forward(due_before, card.cadence);
        let entry = PaymentLogEntry::new(id, today, card.amount_due, due_before, due_after);

        card.last_paid_on = Some(today);
        card.due_date = due_after;
        self.repo.update_card(&card)?;
        self.repo.append_payment(&entry)?;
        info!(
            "event=card_marked_paid module=service status=ok card_id={id} due_before={due_before} due_after={due_after}"
        );

        self.read_back_card(id)
    }

    /// Payment history for one card, most recent first.
    pub fn payment_history(&self, id: CardId) -> ServiceResult<Vec<PaymentLogEntry>> {
        if self.repo.find_card(id)?.is_none() {
            return Err(HouseholdServiceError::CardNotFound(id));
        }
        Ok(self.repo.list_payments(id)?)
    }

    /// The full stored collection, people in creation order.
    pub fn people(&self) -> ServiceResult<Vec<Person>> {
        Ok(self.repo.list_people()?)
    }

    /// Rebuilds the derived dashboard view as of `today`.
    pub fn dashboard(
        &self,
        today: NaiveDate,
        query: &ReminderQuery,
    ) -> ServiceResult<DashboardSnapshot> {
        let people = self.repo.list_people()?;
        Ok(DashboardSnapshot {
            stats: dashboard_stats(&people, today),
            reminders: build_upcoming_reminders(&people, today, query),
        })
    }

    /// Seeds the bundled sample household when the store is empty.
    ///
    /// Returns whether seeding happened. A non-empty store is left
    /// untouched.
    pub fn ensure_seed_data(&self, today: NaiveDate) -> ServiceResult<bool> {
        if self.repo.count_people()? > 0 {
            return Ok(false);
        }
        for person in sample_people(today) {
            self.repo.create_person(&person)?;
        }
        info!("event=sample_seeded module=service status=ok");
        Ok(true)
    }

    /// Clears the store and reseeds the bundled sample household.
    pub fn reset_to_sample(&self, today: NaiveDate) -> ServiceResult<Vec<Person>> {
        self.repo.clear_all()?;
        for person in sample_people(today) {
            self.repo.create_person(&person)?;
        }
        info!("event=store_reset module=service status=ok");
        self.people()
    }

    /// Snapshot of the full collection for local backup.
    pub fn snapshot(&self) -> ServiceResult<HouseholdSnapshot> {
        Ok(HouseholdSnapshot {
            people: self.repo.list_people()?,
        })
    }

    /// Replaces the full collection with a snapshot's contents.
    ///
    /// Returns the number of people restored. A snapshot that fails
    /// validation mid-import leaves only the records imported so far;
    /// callers should treat that as a failed restore and reset or retry.
    pub fn replace_with_snapshot(&self, snapshot: &HouseholdSnapshot) -> ServiceResult<usize> {
        self.repo.clear_all()?;
        for person in &snapshot.people {
            self.repo.create_person(person)?;
        }
        info!(
            "event=snapshot_restored module=service status=ok people={}",
            snapshot.people.len()
        );
        Ok(snapshot.people.len())
    }

    fn read_back_card(&self, id: CardId) -> ServiceResult<CreditCardAccount> {
        self.repo
            .find_card(id)?
            .map(|(_, card)| card)
            .ok_or(HouseholdServiceError::InconsistentState(
                "written card not found in read-back",
            ))
    }
}
