//! Core data models for the collection details service.
//!
//! `Collection` is the platform entity; `details` holds the typed view over
//! the marketing keys of its metadata mapping together with validation and
//! merge rules.

pub mod collection;
pub mod details;
