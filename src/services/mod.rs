pub mod collection_store;
pub mod details_service;
pub mod memory_store;
pub mod sqlite_store;
