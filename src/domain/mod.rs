// Domain layer module exports
// Following Hexagonal Architecture and DDD principles
// Domain is independent of infrastructure concerns

pub mod errors;
pub mod repositories;
pub mod stats;

pub use errors::{StatsError, StatsResult};
