use async_trait::async_trait;

use crate::domain::errors::StatsResult;
use crate::domain::stats::{FieldValue, Pagination, StatField, TeamAverage, TeamStats, TopTeamsQuery};

/// Readiness of the backing store
///
/// Codes follow the usual driver convention: 0 disconnected, 1 connected,
/// 2 connecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ConnectionState {
    Disconnected = 0,
    Connected = 1,
    Connecting = 2,
}

impl ConnectionState {
    pub fn code(&self) -> u8 {
        *self as u8
    }

    pub fn is_healthy(&self) -> bool {
        *self == ConnectionState::Connected
    }
}

/// One page of the team listing
#[derive(Debug, Clone, PartialEq)]
pub struct StatsPage {
    pub teams: Vec<TeamStats>,
    pub total: u64,
}

/// Repository trait for team-season records
///
/// Every method is a single read or write against the store. Uniqueness of
/// (team, year) must be enforced by the store itself; the existence check in
/// `create` is advisory only.
#[async_trait]
pub trait StatsRepository: Send + Sync {
    /// Inserts a new record
    ///
    /// Fails with `Conflict` when (team, year) already exists.
    async fn create(&self, stats: TeamStats) -> StatsResult<TeamStats>;

    /// Exact lookup on (team, year); `NotFound` when absent
    async fn find_by_team_year(&self, team: &str, year: i32) -> StatsResult<TeamStats>;

    /// Replaces one field of an existing record and returns the new record
    async fn update_field(
        &self,
        team: &str,
        year: i32,
        field: StatField,
        value: FieldValue,
    ) -> StatsResult<TeamStats>;

    /// Deletes one record of `team` and returns it
    ///
    /// With a year the exact key is removed; without one the first record in
    /// insertion order is.
    async fn delete_by_team(&self, team: &str, year: Option<i32>) -> StatsResult<TeamStats>;

    /// Records ordered by team (then year) ascending, sliced to one page
    async fn list_paged(&self, pagination: Pagination) -> StatsResult<StatsPage>;

    /// The first `limit` records, highest `sort` value first
    async fn top_teams(&self, query: TopTeamsQuery) -> StatsResult<Vec<TeamStats>>;

    /// Average goals per game of every team in `year`, highest first
    async fn average_goals(&self, year: i32) -> StatsResult<Vec<TeamAverage>>;

    /// Distinct years, ascending; `NotFound` when the store is empty
    async fn available_years(&self) -> StatsResult<Vec<i32>>;

    /// Current readiness of the store
    async fn connection_state(&self) -> ConnectionState;
}
