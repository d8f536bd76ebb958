pub mod models;
pub mod repository;
pub mod service;
pub mod store;

pub use models::{EntityId, Identifiable, Versioned};
pub use store::MemoryStore;
