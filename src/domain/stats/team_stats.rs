use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};

use super::value_objects::{FieldValue, StatField};
use crate::domain::errors::{StatsError, StatsResult};

/// The seven standings counters of a team-season record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatLine {
    pub games_played: i32,
    pub win: i32,
    pub draw: i32,
    pub loss: i32,
    pub goals_for: i32,
    pub goals_against: i32,
    pub points: i32,
}

impl StatLine {
    fn counter(&self, field: StatField) -> Option<i32> {
        self.counters()
            .into_iter()
            .find(|(f, _)| *f == field)
            .map(|(_, v)| v)
    }

    fn counter_mut(&mut self, field: StatField) -> Option<&mut i32> {
        match field {
            StatField::GamesPlayed => Some(&mut self.games_played),
            StatField::Win => Some(&mut self.win),
            StatField::Draw => Some(&mut self.draw),
            StatField::Loss => Some(&mut self.loss),
            StatField::GoalsFor => Some(&mut self.goals_for),
            StatField::GoalsAgainst => Some(&mut self.goals_against),
            StatField::Points => Some(&mut self.points),
            StatField::Team | StatField::Year => None,
        }
    }

    fn counters(&self) -> [(StatField, i32); 7] {
        [
            (StatField::GamesPlayed, self.games_played),
            (StatField::Win, self.win),
            (StatField::Draw, self.draw),
            (StatField::Loss, self.loss),
            (StatField::GoalsFor, self.goals_for),
            (StatField::GoalsAgainst, self.goals_against),
            (StatField::Points, self.points),
        ]
    }
}

/// One row of the league table: a team's standings for one year
///
/// # Invariants
/// - Team name is not blank
/// - Every counter is non-negative
/// - (team, year) identifies the record; uniqueness is enforced by the store
///
/// # Example
/// ```
/// use football_stats_api::domain::stats::{StatLine, TeamStats};
///
/// let line = StatLine { games_played: 38, win: 26, draw: 6, loss: 6, goals_for: 88,
///     goals_against: 43, points: 84 };
/// let stats = TeamStats::new("Arsenal".to_string(), 2024, line).expect("valid stats");
///
/// assert_eq!(stats.team(), "Arsenal");
/// assert_eq!(stats.line().points, 84);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamStats {
    team: String,
    year: i32,
    #[serde(flatten)]
    line: StatLine,
}

impl TeamStats {
    /// Creates a validated record
    ///
    /// # Returns
    /// * `Err(StatsError::Validation)` - blank team or negative counter
    pub fn new(team: String, year: i32, line: StatLine) -> StatsResult<Self> {
        if team.trim().is_empty() {
            return Err(StatsError::validation("Team name cannot be empty"));
        }

        if let Some((field, _)) = line.counters().into_iter().find(|(_, v)| *v < 0) {
            return Err(StatsError::validation(format!(
                "{} cannot be negative",
                field
            )));
        }

        Ok(Self { team, year, line })
    }

    pub fn team(&self) -> &str {
        &self.team
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn line(&self) -> &StatLine {
        &self.line
    }

    /// Returns the value of a single field
    pub fn get(&self, field: StatField) -> FieldValue {
        match field {
            StatField::Team => FieldValue::Text(self.team.clone()),
            StatField::Year => FieldValue::Int(self.year),
            _ => FieldValue::Int(self.line.counter(field).unwrap_or_default()),
        }
    }

    /// Replaces exactly one field, leaving every other field untouched
    ///
    /// The value is expected to come from [`StatField::coerce`]; a value of
    /// the wrong kind for the field is rejected.
    pub fn set(&mut self, field: StatField, value: FieldValue) -> StatsResult<()> {
        field.check(&value)?;

        match (field, value) {
            (StatField::Team, FieldValue::Text(team)) => self.team = team,
            (StatField::Year, FieldValue::Int(year)) => self.year = year,
            (field, FieldValue::Int(v)) => {
                if let Some(slot) = self.line.counter_mut(field) {
                    *slot = v;
                }
            }
            (field, FieldValue::Text(_)) => {
                return Err(StatsError::validation(format!(
                    "Invalid value for {}",
                    field
                )))
            }
        }
        Ok(())
    }

    /// Whether this record is keyed by (team, year)
    pub fn has_key(&self, team: &str, year: i32) -> bool {
        self.team == team && self.year == year
    }

    /// Goals scored per game, rounded half-up
    ///
    /// Zero games played is treated as one game.
    pub fn average_goals(&self) -> i64 {
        let games = self.line.games_played.max(1);
        (f64::from(self.line.goals_for) / f64::from(games)).round() as i64
    }
}

impl<'r> FromRow<'r, PgRow> for TeamStats {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            team: row.try_get("team")?,
            year: row.try_get("year")?,
            line: StatLine {
                games_played: row.try_get("games_played")?,
                win: row.try_get("win")?,
                draw: row.try_get("draw")?,
                loss: row.try_get("loss")?,
                goals_for: row.try_get("goals_for")?,
                goals_against: row.try_get("goals_against")?,
                points: row.try_get("points")?,
            },
        })
    }
}
