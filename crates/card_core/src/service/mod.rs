//! Card use-case services.
//!
//! # Responsibility
//! - Turn raw caller input into validated card records.
//! - Keep callers decoupled from storage details and storage errors.

pub mod card_fields;
pub mod card_service;
