//! Due-date classification, cadence rolling and dashboard aggregation.
//!
//! # Responsibility
//! - Classify a due date against today into a reminder status.
//! - Compute the next due date after a payment, per cadence.
//! - Build the upcoming-reminder list and aggregate statistics.
//!
//! # Invariants
//! - Rolling a due date forward always yields a strictly later date.
//! - The reminder list ordering is deterministic: ascending days until
//!   due, then card id.

use crate::model::card::{Cadence, CardId};
use crate::model::person::Person;
use chrono::{Days, Months, NaiveDate};
use serde::Serialize;

/// Default horizon, in days, for the upcoming-reminders view.
pub const DEFAULT_LOOKAHEAD_DAYS: i64 = 14;

/// Where a due date sits relative to today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderStatus {
    /// Due date is strictly in the past.
    Overdue,
    /// Due date is exactly today.
    DueToday,
    /// Due date is within the lookahead window.
    DueSoon,
    /// Due date is beyond the lookahead window.
    Scheduled,
}

/// Options for the upcoming-reminders view.
#[derive(Debug, Clone)]
pub struct ReminderQuery {
    /// Horizon in days; cards due later than this never appear.
    pub lookahead_days: i64,
}

impl Default for ReminderQuery {
    fn default() -> Self {
        Self {
            lookahead_days: DEFAULT_LOOKAHEAD_DAYS,
        }
    }
}

/// One entry of the upcoming-reminders view.
///
/// A transient projection combining card and owner fields; never
/// persisted, rebuilt from the stored collection on every state change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpcomingReminder {
    pub card_id: CardId,
    pub card_nickname: String,
    pub person_name: String,
    pub due_date: NaiveDate,
    pub autopay: bool,
    /// Negative when the bill is overdue.
    pub days_until_due: i64,
    pub status: ReminderStatus,
}

/// Aggregate dashboard totals over the full collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub people: usize,
    pub cards: usize,
    pub autopay_cards: usize,
    pub overdue_cards: usize,
    pub total_amount_due: f64,
}

impl DashboardStats {
    /// Share of cards on autopay, `0.0` when there are no cards.
    pub fn autopay_ratio(&self) -> f64 {
        if self.cards == 0 {
            0.0
        } else {
            self.autopay_cards as f64 / self.cards as f64
        }
    }
}

/// Signed number of days from `today` to `due`; negative once overdue.
pub fn days_until_due(due: NaiveDate, today: NaiveDate) -> i64 {
    due.signed_duration_since(today).num_days()
}

/// Classifies a due date against today using an explicit lookahead window.
pub fn classify_due_date(due: NaiveDate, today: NaiveDate, lookahead_days: i64) -> ReminderStatus {
    let days = days_until_due(due, today);
    if days < 0 {
        ReminderStatus::Overdue
    } else if days == 0 {
        ReminderStatus::DueToday
    } else if days <= lookahead_days {
        ReminderStatus::DueSoon
    } else {
        ReminderStatus::Scheduled
    }
}

/// Classifies a due date using the default lookahead window.
pub fn reminder_status(due: NaiveDate, today: NaiveDate) -> ReminderStatus {
    classify_due_date(due, today, DEFAULT_LOOKAHEAD_DAYS)
}

/// Computes the next due date after a payment.
///
/// Weekly and biweekly cadences add a fixed 7/14 days; monthly adds one
/// calendar month with the day-of-month clamped at month end (Jan 31
/// rolls to the last day of February). The result is always strictly
/// after `due`.
pub fn roll_due_date_forward(due: NaiveDate, cadence: Cadence) -> NaiveDate {
    match cadence {
        Cadence::Weekly => due.checked_add_days(Days::new(7)),
        Cadence::Biweekly => due.checked_add_days(Days::new(14)),
        Cadence::Monthly => due.checked_add_months(Months::new(1)),
    }
    .unwrap_or(NaiveDate::MAX)
}

/// Builds the upcoming-reminders view over the full collection.
///
/// A card qualifies when its days-until-due is within both the lookahead
/// window and the card's own reminder lead time; overdue cards always
/// qualify. Entries are sorted by ascending days until due, card id as
/// tiebreak.
pub fn build_upcoming_reminders(
    people: &[Person],
    today: NaiveDate,
    query: &ReminderQuery,
) -> Vec<UpcomingReminder> {
    let mut reminders = Vec::new();

    for person in people {
        for card in &person.cards {
            let days = days_until_due(card.due_date, today);
            if days > query.lookahead_days || days > i64::from(card.remind_days_before) {
                continue;
            }
            reminders.push(UpcomingReminder {
                card_id: card.id,
                card_nickname: card.nickname.clone(),
                person_name: person.name.clone(),
                due_date: card.due_date,
                autopay: card.autopay,
                days_until_due: days,
                status: classify_due_date(card.due_date, today, query.lookahead_days),
            });
        }
    }

    reminders.sort_by(|a, b| {
        a.days_until_due
            .cmp(&b.days_until_due)
            .then_with(|| a.card_id.cmp(&b.card_id))
    });
    reminders
}

/// Computes aggregate dashboard totals over the full collection.
pub fn dashboard_stats(people: &[Person], today: NaiveDate) -> DashboardStats {
    let mut stats = DashboardStats {
        people: people.len(),
        cards: 0,
        autopay_cards: 0,
        overdue_cards: 0,
        total_amount_due: 0.0,
    };

    for person in people {
        for card in &person.cards {
            stats.cards += 1;
            if card.autopay {
                stats.autopay_cards += 1;
            }
            if days_until_due(card.due_date, today) < 0 {
                stats.overdue_cards += 1;
            }
            stats.total_amount_due += card.amount_due;
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::{classify_due_date, roll_due_date_forward, ReminderStatus};
    use crate::model::card::Cadence;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn classification_covers_all_bands() {
        let today = date(2026, 8, 7);
        assert_eq!(
            classify_due_date(date(2026, 8, 6), today, 14),
            ReminderStatus::Overdue
        );
        assert_eq!(
            classify_due_date(today, today, 14),
            ReminderStatus::DueToday
        );
        assert_eq!(
            classify_due_date(date(2026, 8, 21), today, 14),
            ReminderStatus::DueSoon
        );
        assert_eq!(
            classify_due_date(date(2026, 8, 22), today, 14),
            ReminderStatus::Scheduled
        );
    }

    #[test]
    fn monthly_roll_clamps_at_month_end() {
        assert_eq!(
            roll_due_date_forward(date(2026, 1, 31), Cadence::Monthly),
            date(2026, 2, 28)
        );
        assert_eq!(
            roll_due_date_forward(date(2024, 1, 31), Cadence::Monthly),
            date(2024, 2, 29)
        );
    }
}
