//! Core domain logic for duecard, a household credit-card bill reminder.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod reminder;
pub mod repo;
pub mod sample;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::card::{
    derive_color_from_nickname, Cadence, CardId, CardValidationError, CreditCardAccount,
    PaymentLogEntry, DEFAULT_REMINDER_LEAD_DAYS,
};
pub use model::person::{Person, PersonId, PersonValidationError};
pub use reminder::upcoming::{
    build_upcoming_reminders, classify_due_date, dashboard_stats, days_until_due, reminder_status,
    roll_due_date_forward, DashboardStats, ReminderQuery, ReminderStatus, UpcomingReminder,
    DEFAULT_LOOKAHEAD_DAYS,
};
pub use repo::household_repo::{
    HouseholdRepository, RepoError, RepoResult, SqliteHouseholdRepository,
};
pub use sample::sample_people;
pub use service::household_service::{
    CardPatch, DashboardSnapshot, HouseholdService, HouseholdServiceError, HouseholdSnapshot,
    NewCardRequest,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
