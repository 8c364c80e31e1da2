//! Typed marketing details over a product collection's metadata mapping.
//!
//! The server side validates and merge-writes the details through
//! `services::details_service`, exposed by the axum router in `routes`. The
//! `widget` module is the admin-side client: an explicit state machine over
//! the two endpoints.

pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod widget;
