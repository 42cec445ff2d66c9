//! Mutable tracker state: absence records and the category vocabulary.
//!
//! # Responsibility
//! - Own each collection behind an explicitly constructed type.
//! - Write every mutation through a `PersistencePort` before returning.
//!
//! # Invariants
//! - The store and the registry never share data by reference; they meet
//!   only through label text and calendar days.

pub mod absence_store;
pub mod category_registry;
