// Infrastructure layer module
// Contains the store connection lifecycle and repository adapters
// Follows Hexagonal Architecture

pub mod repositories;
pub mod store;

pub use store::PgStore;
