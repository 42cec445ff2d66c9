//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store and registry calls into day-level actions.
//! - Keep CLI/UI layers decoupled from persistence details.

pub mod tracker_service;
