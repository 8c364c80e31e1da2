//! Admin-side edit widget for collection details.
//!
//! `state::DetailsWidget` holds the last known details and an optional open
//! editor, and talks to the server through a `client::DetailsClient`.
//! `view` turns the current state into displayable text.

pub mod client;
pub mod state;
pub mod view;

pub use client::{ClientError, DetailsClient, HttpDetailsClient};
pub use state::{DetailsWidget, WidgetError, WidgetState};
pub use view::{DetailsView, WidgetView};
