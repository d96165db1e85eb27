//! Derived reminder views over the stored household collection.
//!
//! # Responsibility
//! - Classify due dates, roll them forward by cadence, and project the
//!   upcoming-reminder and dashboard-statistics views.
//!
//! # Invariants
//! - Everything here is pure: no I/O, no clock access; `today` is always
//!   an explicit argument.
//! - Views are recomputed from the full collection on every call, never
//!   cached.

pub mod upcoming;
