pub mod details_handlers;
pub mod health_handlers;
