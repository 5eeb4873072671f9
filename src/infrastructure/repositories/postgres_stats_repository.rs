use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::errors::{StatsError, StatsResult};
use crate::domain::repositories::{ConnectionState, StatsPage, StatsRepository};
use crate::domain::stats::{
    rank_average_goals, FieldValue, Pagination, StatField, TeamAverage, TeamStats, TopTeamsQuery,
};
use crate::infrastructure::store::PgStore;

const COLUMNS: &str =
    "team, year, games_played, win, draw, loss, goals_for, goals_against, points";

/// PostgreSQL implementation of StatsRepository
///
/// Queries are checked at runtime, so the crate builds without a live
/// database. The `team_stats_team_year_key` unique constraint is what
/// actually guarantees one record per (team, year).
pub struct PostgresStatsRepository {
    store: Arc<PgStore>,
}

impl PostgresStatsRepository {
    /// Creates a new PostgresStatsRepository
    ///
    /// # Arguments
    /// * `store` - Shared handle to the (possibly not yet connected) pool
    pub fn new(store: Arc<PgStore>) -> Self {
        Self { store }
    }
}

/// Maps a sqlx error onto the stats error taxonomy
fn map_db_error(context: &str, e: sqlx::Error) -> StatsError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            return StatsError::duplicate_team_year();
        }
        if db.is_check_violation() {
            return StatsError::validation(db.message().to_string());
        }
    }

    // Driver detail stays in the log; clients only see the context
    tracing::error!(error = %e, "{}", context);
    StatsError::store(context)
}

#[async_trait]
impl StatsRepository for PostgresStatsRepository {
    async fn create(&self, stats: TeamStats) -> StatsResult<TeamStats> {
        let pool = self.store.pool()?;

        let existing = sqlx::query("SELECT 1 FROM team_stats WHERE team = $1 AND year = $2")
            .bind(stats.team())
            .bind(stats.year())
            .fetch_optional(pool)
            .await
            .map_err(|e| map_db_error("Failed to check for existing team", e))?;

        if existing.is_some() {
            return Err(StatsError::duplicate_team_year());
        }

        let sql = format!(
            r#"
            INSERT INTO team_stats ({COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {COLUMNS}
            "#
        );
        let line = stats.line();
        sqlx::query_as::<_, TeamStats>(&sql)
            .bind(stats.team())
            .bind(stats.year())
            .bind(line.games_played)
            .bind(line.win)
            .bind(line.draw)
            .bind(line.loss)
            .bind(line.goals_for)
            .bind(line.goals_against)
            .bind(line.points)
            .fetch_one(pool)
            .await
            .map_err(|e| map_db_error("Failed to add team", e))
    }

    async fn find_by_team_year(&self, team: &str, year: i32) -> StatsResult<TeamStats> {
        let pool = self.store.pool()?;

        let sql = format!("SELECT {COLUMNS} FROM team_stats WHERE team = $1 AND year = $2");
        sqlx::query_as::<_, TeamStats>(&sql)
            .bind(team)
            .bind(year)
            .fetch_optional(pool)
            .await
            .map_err(|e| map_db_error("Failed to find team", e))?
            .ok_or_else(|| StatsError::not_found("Team not found"))
    }

    async fn update_field(
        &self,
        team: &str,
        year: i32,
        field: StatField,
        value: FieldValue,
    ) -> StatsResult<TeamStats> {
        field.check(&value)?;
        let pool = self.store.pool()?;

        // The column name comes from the closed StatField set, never from input
        let sql = format!(
            "UPDATE team_stats SET {} = $1 WHERE team = $2 AND year = $3 RETURNING {COLUMNS}",
            field.column()
        );
        let query = sqlx::query_as::<_, TeamStats>(&sql);
        let query = match value {
            FieldValue::Text(text) => query.bind(text),
            FieldValue::Int(v) => query.bind(v),
        };

        query
            .bind(team)
            .bind(year)
            .fetch_optional(pool)
            .await
            .map_err(|e| map_db_error("Failed to update team", e))?
            .ok_or_else(|| StatsError::not_found("Team not found for this year. Update failed."))
    }

    async fn delete_by_team(&self, team: &str, year: Option<i32>) -> StatsResult<TeamStats> {
        let pool = self.store.pool()?;

        let deleted = match year {
            Some(year) => {
                sqlx::query_as::<_, TeamStats>(&format!(
                    "DELETE FROM team_stats WHERE team = $1 AND year = $2 RETURNING {COLUMNS}"
                ))
                .bind(team)
                .bind(year)
                .fetch_optional(pool)
                .await
            }
            None => {
                sqlx::query_as::<_, TeamStats>(&format!(
                    r#"
                    DELETE FROM team_stats
                    WHERE id = (SELECT id FROM team_stats WHERE team = $1 ORDER BY id LIMIT 1)
                    RETURNING {COLUMNS}
                    "#
                ))
                .bind(team)
                .fetch_optional(pool)
                .await
            }
        };

        deleted
            .map_err(|e| map_db_error("Failed to delete team", e))?
            .ok_or_else(|| StatsError::not_found("Team not found"))
    }

    async fn list_paged(&self, pagination: Pagination) -> StatsResult<StatsPage> {
        let pool = self.store.pool()?;

        let teams = sqlx::query_as::<_, TeamStats>(&format!(
            "SELECT {COLUMNS} FROM team_stats ORDER BY team ASC, year ASC LIMIT $1 OFFSET $2"
        ))
        .bind(i64::from(pagination.limit()))
        .bind(pagination.offset() as i64)
        .fetch_all(pool)
        .await
        .map_err(|e| map_db_error("Failed to fetch teams", e))?;

        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM team_stats")
            .fetch_one(pool)
            .await
            .map_err(|e| map_db_error("Failed to count teams", e))?;

        Ok(StatsPage {
            teams,
            total: total.max(0) as u64,
        })
    }

    async fn top_teams(&self, query: TopTeamsQuery) -> StatsResult<Vec<TeamStats>> {
        let pool = self.store.pool()?;

        let sql = format!(
            "SELECT {COLUMNS} FROM team_stats ORDER BY {} DESC, team ASC, year ASC LIMIT $1",
            query.sort().column()
        );

        sqlx::query_as::<_, TeamStats>(&sql)
            .bind(i64::from(query.limit()))
            .fetch_all(pool)
            .await
            .map_err(|e| map_db_error("Failed to fetch top teams", e))
    }

    async fn average_goals(&self, year: i32) -> StatsResult<Vec<TeamAverage>> {
        let pool = self.store.pool()?;

        let records = sqlx::query_as::<_, TeamStats>(&format!(
            "SELECT {COLUMNS} FROM team_stats WHERE year = $1"
        ))
        .bind(year)
        .fetch_all(pool)
        .await
        .map_err(|e| map_db_error("Failed to fetch average goals", e))?;

        Ok(rank_average_goals(&records))
    }

    async fn available_years(&self) -> StatsResult<Vec<i32>> {
        let pool = self.store.pool()?;

        let years = sqlx::query_scalar::<_, i32>("SELECT DISTINCT year FROM team_stats ORDER BY year ASC")
            .fetch_all(pool)
            .await
            .map_err(|e| map_db_error("Failed to fetch available years", e))?;

        if years.is_empty() {
            return Err(StatsError::not_found("No years found in the database."));
        }

        tracing::debug!(?years, "Available years");
        Ok(years)
    }

    async fn connection_state(&self) -> ConnectionState {
        self.store.state().await
    }
}
