// Team stats domain module
// Contains the team-season record, its value objects, and aggregations

pub mod averages;
pub mod team_stats;
pub mod value_objects;

pub use averages::{rank_average_goals, TeamAverage};
pub use team_stats::{StatLine, TeamStats};
pub use value_objects::{FieldValue, Pagination, StatField, TopTeamsQuery};
