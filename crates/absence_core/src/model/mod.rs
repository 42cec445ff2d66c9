//! Domain model for absence tracking.
//!
//! # Responsibility
//! - Define the canonical record shape shared by store, statistics and
//!   persistence.
//! - Own the built-in category vocabulary.
//!
//! # Invariants
//! - A record is identified by its calendar day, never by a generated ID.
//! - Reason labels are plain text and are not re-validated after creation.

pub mod category;
pub mod record;
