//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the data access contract for the household collection.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Repository writes validate models before persistence.
//! - Repository APIs return semantic errors (`PersonNotFound`,
//!   `CardNotFound`) in addition to DB transport errors.

pub mod household_repo;
