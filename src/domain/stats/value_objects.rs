use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::domain::errors::{StatsError, StatsResult};

/// A named field of a team-season record
///
/// The API addresses fields by their camelCase name, the store by its
/// snake_case column. Only these fields may be updated or sorted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatField {
    Team,
    Year,
    GamesPlayed,
    Win,
    Draw,
    Loss,
    GoalsFor,
    GoalsAgainst,
    Points,
}

impl StatField {
    pub const ALL: [StatField; 9] = [
        StatField::Team,
        StatField::Year,
        StatField::GamesPlayed,
        StatField::Win,
        StatField::Draw,
        StatField::Loss,
        StatField::GoalsFor,
        StatField::GoalsAgainst,
        StatField::Points,
    ];

    /// Name used in JSON bodies and query strings
    pub fn as_str(&self) -> &'static str {
        match self {
            StatField::Team => "team",
            StatField::Year => "year",
            StatField::GamesPlayed => "gamesPlayed",
            StatField::Win => "win",
            StatField::Draw => "draw",
            StatField::Loss => "loss",
            StatField::GoalsFor => "goalsFor",
            StatField::GoalsAgainst => "goalsAgainst",
            StatField::Points => "points",
        }
    }

    /// Column name in the `team_stats` table
    pub fn column(&self) -> &'static str {
        match self {
            StatField::Team => "team",
            StatField::Year => "year",
            StatField::GamesPlayed => "games_played",
            StatField::Win => "win",
            StatField::Draw => "draw",
            StatField::Loss => "loss",
            StatField::GoalsFor => "goals_for",
            StatField::GoalsAgainst => "goals_against",
            StatField::Points => "points",
        }
    }

    /// Whether the field can be used as a top-teams ranking key
    pub fn is_sortable(&self) -> bool {
        !matches!(self, StatField::Team)
    }

    /// Counters must never go below zero; `year` is unconstrained
    pub fn is_counter(&self) -> bool {
        !matches!(self, StatField::Team | StatField::Year)
    }

    /// Converts a raw JSON value into a typed value for this field
    ///
    /// `team` accepts a non-blank string. Every other field accepts an
    /// integer, given either as a JSON number or a numeric string (HTML
    /// forms submit strings). Counters reject negative values.
    pub fn coerce(&self, raw: &Value) -> StatsResult<FieldValue> {
        if *self == StatField::Team {
            return match raw {
                Value::String(s) if !s.trim().is_empty() => Ok(FieldValue::Text(s.clone())),
                _ => Err(StatsError::validation("team must be a non-empty string")),
            };
        }

        let parsed = match raw {
            Value::Number(n) => n.as_i64().and_then(|v| i32::try_from(v).ok()),
            Value::String(s) => s.trim().parse::<i32>().ok(),
            _ => None,
        };
        let value = parsed
            .ok_or_else(|| StatsError::validation(format!("{} must be an integer", self)))?;

        let value = FieldValue::Int(value);
        self.check(&value)?;
        Ok(value)
    }

    /// Checks that a typed value is of the right kind and range for this field
    pub fn check(&self, value: &FieldValue) -> StatsResult<()> {
        match (self, value) {
            (StatField::Team, FieldValue::Text(team)) if team.trim().is_empty() => {
                Err(StatsError::validation("Team name cannot be empty"))
            }
            (StatField::Team, FieldValue::Text(_)) | (StatField::Year, FieldValue::Int(_)) => Ok(()),
            (field, FieldValue::Int(v)) if field.is_counter() => {
                if *v < 0 {
                    Err(StatsError::validation(format!("{} cannot be negative", field)))
                } else {
                    Ok(())
                }
            }
            (field, _) => Err(StatsError::validation(format!("Invalid value for {}", field))),
        }
    }
}

impl FromStr for StatField {
    type Err = StatsError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        StatField::ALL
            .into_iter()
            .find(|field| field.as_str() == name)
            .ok_or_else(|| StatsError::validation(format!("Unknown field: {}", name)))
    }
}

impl fmt::Display for StatField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed value for a single [`StatField`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Int(i32),
}

/// Page/limit pair for the paged listing
///
/// Absent, non-numeric or non-positive inputs fall back to the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: u32,
    limit: u32,
}

impl Pagination {
    pub const DEFAULT_PAGE: u32 = 1;
    pub const DEFAULT_LIMIT: u32 = 10;
    pub const MAX_LIMIT: u32 = 100;

    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.clamp(1, Self::MAX_LIMIT),
        }
    }

    /// Builds a pagination from raw query-string values
    ///
    /// # Example
    /// ```
    /// use football_stats_api::domain::stats::value_objects::Pagination;
    ///
    /// let p = Pagination::from_raw(Some("3"), Some("abc"));
    /// assert_eq!(p.page(), 3);
    /// assert_eq!(p.limit(), 10);
    /// ```
    pub fn from_raw(page: Option<&str>, limit: Option<&str>) -> Self {
        let page = parse_positive(page).unwrap_or(Self::DEFAULT_PAGE);
        let limit = parse_positive(limit)
            .unwrap_or(Self::DEFAULT_LIMIT)
            .min(Self::MAX_LIMIT);
        Self { page, limit }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of records to skip
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }

    /// ceil(total / limit)
    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(u64::from(self.limit))
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: Self::DEFAULT_PAGE,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}

/// Parameters for the top-N ranking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopTeamsQuery {
    limit: u32,
    sort: StatField,
}

impl TopTeamsQuery {
    pub const DEFAULT_LIMIT: u32 = 5;
    pub const DEFAULT_SORT: StatField = StatField::Points;

    /// Builds the query from raw query-string values
    ///
    /// A bad `limit` falls back to the default; an unknown or non-numeric
    /// `sort` field is rejected.
    pub fn from_raw(limit: Option<&str>, sort: Option<&str>) -> StatsResult<Self> {
        let limit = parse_positive(limit)
            .unwrap_or(Self::DEFAULT_LIMIT)
            .min(Pagination::MAX_LIMIT);

        let sort = match sort.map(str::trim).filter(|s| !s.is_empty()) {
            None => Self::DEFAULT_SORT,
            Some(name) => {
                let field: StatField = name.parse()?;
                if !field.is_sortable() {
                    return Err(StatsError::validation(format!(
                        "Cannot sort by {}",
                        field
                    )));
                }
                field
            }
        };

        Ok(Self { limit, sort })
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn sort(&self) -> StatField {
        self.sort
    }
}

fn parse_positive(raw: Option<&str>) -> Option<u32> {
    raw.and_then(|s| s.trim().parse::<u32>().ok())
        .filter(|v| *v >= 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn field_names_round_trip() {
        for field in StatField::ALL {
            assert_eq!(field.as_str().parse::<StatField>().unwrap(), field);
        }
    }

    #[test]
    fn unknown_field_is_rejected() {
        let err = "$where".parse::<StatField>().unwrap_err();
        assert!(matches!(err, StatsError::Validation(_)));
    }

    #[test]
    fn field_name_is_case_sensitive() {
        assert!("GoalsFor".parse::<StatField>().is_err());
    }

    #[test]
    fn columns_are_snake_case() {
        assert_eq!(StatField::GamesPlayed.column(), "games_played");
        assert_eq!(StatField::GoalsAgainst.column(), "goals_against");
    }

    #[test]
    fn team_is_not_sortable() {
        assert!(!StatField::Team.is_sortable());
        assert!(StatField::Year.is_sortable());
        assert!(StatField::Points.is_sortable());
    }

    #[test]
    fn coerce_team_requires_text() {
        assert_eq!(
            StatField::Team.coerce(&json!("Arsenal")).unwrap(),
            FieldValue::Text("Arsenal".to_string())
        );
        assert!(StatField::Team.coerce(&json!("   ")).is_err());
        assert!(StatField::Team.coerce(&json!(12)).is_err());
    }

    #[test]
    fn coerce_counter_accepts_zero() {
        assert_eq!(StatField::Draw.coerce(&json!(0)).unwrap(), FieldValue::Int(0));
    }

    #[test]
    fn coerce_counter_accepts_numeric_string() {
        assert_eq!(
            StatField::Points.coerce(&json!(" 42 ")).unwrap(),
            FieldValue::Int(42)
        );
    }

    #[test]
    fn coerce_counter_rejects_negative() {
        assert!(StatField::Win.coerce(&json!(-1)).is_err());
    }

    #[test]
    fn coerce_counter_rejects_fractions_and_junk() {
        assert!(StatField::Win.coerce(&json!(1.5)).is_err());
        assert!(StatField::Win.coerce(&json!("three")).is_err());
        assert!(StatField::Win.coerce(&json!(null)).is_err());
        assert!(StatField::Win.coerce(&json!(true)).is_err());
    }

    #[test]
    fn check_rejects_wrong_kind() {
        assert!(StatField::Team.check(&FieldValue::Int(1)).is_err());
        assert!(StatField::Year.check(&FieldValue::Text("2024".into())).is_err());
        assert!(StatField::Loss.check(&FieldValue::Int(-2)).is_err());
        assert!(StatField::Loss.check(&FieldValue::Int(2)).is_ok());
    }

    #[test]
    fn coerce_year_allows_any_integer() {
        assert_eq!(StatField::Year.coerce(&json!(2024)).unwrap(), FieldValue::Int(2024));
    }

    #[test]
    fn pagination_defaults() {
        let p = Pagination::from_raw(None, None);
        assert_eq!(p, Pagination::default());
        assert_eq!(p.page(), 1);
        assert_eq!(p.limit(), 10);
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn pagination_rejects_zero_and_negative() {
        let p = Pagination::from_raw(Some("0"), Some("-5"));
        assert_eq!(p.page(), 1);
        assert_eq!(p.limit(), 10);
    }

    #[test]
    fn pagination_caps_limit() {
        assert_eq!(Pagination::from_raw(None, Some("5000")).limit(), 100);
    }

    #[test]
    fn pagination_offset_and_pages() {
        let p = Pagination::new(3, 10);
        assert_eq!(p.offset(), 20);
        assert_eq!(p.total_pages(25), 3);
        assert_eq!(p.total_pages(30), 3);
        assert_eq!(p.total_pages(0), 0);
    }

    #[test]
    fn top_teams_defaults() {
        let q = TopTeamsQuery::from_raw(None, None).unwrap();
        assert_eq!(q.limit(), 5);
        assert_eq!(q.sort(), StatField::Points);
    }

    #[test]
    fn top_teams_bad_limit_falls_back() {
        let q = TopTeamsQuery::from_raw(Some("x"), Some("goalsFor")).unwrap();
        assert_eq!(q.limit(), 5);
        assert_eq!(q.sort(), StatField::GoalsFor);
    }

    #[test]
    fn top_teams_rejects_unknown_or_text_sort() {
        assert!(TopTeamsQuery::from_raw(None, Some("name")).is_err());
        assert!(TopTeamsQuery::from_raw(None, Some("team")).is_err());
    }
}
