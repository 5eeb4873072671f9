// Repository interfaces (ports)
// Implemented by adapters in the infrastructure layer

pub mod stats_repository;

pub use stats_repository::{ConnectionState, StatsPage, StatsRepository};
