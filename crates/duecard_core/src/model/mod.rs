//! Domain model for household bill tracking.
//!
//! # Responsibility
//! - Define the canonical records for people and their credit-card accounts.
//! - Keep validation rules for user-entered fields next to the data shapes.
//!
//! # Invariants
//! - Every record is identified by a stable `Uuid`.
//! - A card is owned by exactly one person; deleting the person removes the
//!   card everywhere.

pub mod card;
pub mod person;
