//! Bundled sample dataset.
//!
//! # Responsibility
//! - Provide the starter household shown when no stored data exists.
//!
//! # Invariants
//! - Due dates are positioned relative to `today` so the dashboard always
//!   has something to show: one overdue bill, one inside the reminder
//!   window, and cards whose lead time keeps them out of the list.

use crate::model::card::{Cadence, CreditCardAccount};
use crate::model::person::Person;
use chrono::{Days, NaiveDate};

/// Builds the sample household used to seed an empty store.
pub fn sample_people(today: NaiveDate) -> Vec<Person> {
    let mut avery = Person::new("Avery Chen", Some("avery@example.com".to_string()));

    let mut sapphire = CreditCardAccount::new(
        "Sapphire",
        "Chase",
        add_days(today, 3),
        Cadence::Monthly,
    );
    sapphire.amount_due = 482.19;
    avery.cards.push(sapphire);

    let mut flex = CreditCardAccount::new(
        "Freedom Flex",
        "Chase",
        add_days(today, 12),
        Cadence::Monthly,
    );
    flex.amount_due = 96.40;
    flex.autopay = true;
    flex.remind_days_before = 14;
    avery.cards.push(flex);

    let mut jordan = Person::new("Jordan Alvarez", None);

    let mut platinum = CreditCardAccount::new(
        "Platinum",
        "American Express",
        today.checked_sub_days(Days::new(2)).unwrap_or(today),
        Cadence::Monthly,
    );
    platinum.amount_due = 1240.00;
    platinum.remind_days_before = 7;
    jordan.cards.push(platinum);

    // Lead time of 3 keeps this one out of the reminder list until the
    // due date gets close, even though it sits inside the lookahead.
    let mut everyday = CreditCardAccount::new(
        "Everyday",
        "Capital One",
        add_days(today, 9),
        Cadence::Biweekly,
    );
    everyday.amount_due = 58.75;
    everyday.autopay = true;
    everyday.remind_days_before = 3;
    jordan.cards.push(everyday);

    vec![avery, jordan]
}

fn add_days(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_add_days(Days::new(days)).unwrap_or(date)
}
