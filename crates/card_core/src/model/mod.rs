//! Domain model for stored payment cards.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//!
//! # Invariants
//! - Every card row is identified by a stable `CardId`.
//! - Card numbers are unique across all rows.
//! - Deletion is a hard delete; there is no tombstone state.

pub mod card;
