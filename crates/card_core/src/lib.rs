//! Core domain logic for the payment card store.
//! This crate is the single source of truth for card validation rules.

pub mod clock;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use clock::{Clock, FixedClock, SystemClock};
pub use logging::{default_log_level, init_logging, logging_status, LogSettings};
pub use model::card::{Card, CardId, CardValidationError};
pub use repo::card_repo::{CardRepository, RepoError, RepoResult, SqliteCardRepository};
pub use service::card_fields::FieldInput;
pub use service::card_service::{
    CardField, CardRejection, CardService, CardServiceError, CardServiceResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
