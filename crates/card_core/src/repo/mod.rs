//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the storage contract the card service is written against.
//! - Isolate SQLite query details from validation/orchestration.
//!
//! # Invariants
//! - Repository writes enforce `Card::validate()` before persistence.
//! - Storage constraint failures are reported as semantic errors
//!   (`DuplicateNumber`, `NotFound`) alongside DB transport errors.

pub mod card_repo;
