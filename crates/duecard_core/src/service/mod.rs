//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into one API per user action.
//! - Keep the UI layer decoupled from storage details.

pub mod household_service;
