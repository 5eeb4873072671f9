// Repository implementations (data access layer)
// Adapters that implement domain repository interfaces

pub mod in_memory_stats_repository;
pub mod postgres_stats_repository;

pub use in_memory_stats_repository::InMemoryStatsRepository;
pub use postgres_stats_repository::PostgresStatsRepository;
