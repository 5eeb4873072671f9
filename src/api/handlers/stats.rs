use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::errors::ApiError;
use crate::api::state::AppState;
use crate::domain::errors::{StatsError, StatsResult};
use crate::domain::stats::{
    FieldValue, Pagination, StatField, StatLine, TeamAverage, TeamStats, TopTeamsQuery,
};

/// Request body for adding a team-season record
///
/// Every field is required. Zero is a valid value; numbers may also be sent
/// as numeric strings.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddStatsRequest {
    pub team: Option<Value>,
    pub year: Option<Value>,
    pub games_played: Option<Value>,
    pub win: Option<Value>,
    pub draw: Option<Value>,
    pub loss: Option<Value>,
    pub goals_for: Option<Value>,
    pub goals_against: Option<Value>,
    pub points: Option<Value>,
}

impl AddStatsRequest {
    /// Validates the request into a record
    pub fn into_stats(self) -> StatsResult<TeamStats> {
        let team = match required(self.team, StatField::Team)? {
            FieldValue::Text(team) => team,
            FieldValue::Int(_) => return Err(StatsError::validation("Invalid value for team")),
        };

        let line = StatLine {
            games_played: required_int(self.games_played, StatField::GamesPlayed)?,
            win: required_int(self.win, StatField::Win)?,
            draw: required_int(self.draw, StatField::Draw)?,
            loss: required_int(self.loss, StatField::Loss)?,
            goals_for: required_int(self.goals_for, StatField::GoalsFor)?,
            goals_against: required_int(self.goals_against, StatField::GoalsAgainst)?,
            points: required_int(self.points, StatField::Points)?,
        };

        let year = required_int(self.year, StatField::Year)?;
        TeamStats::new(team, year, line)
    }
}

fn required(value: Option<Value>, field: StatField) -> StatsResult<FieldValue> {
    let value = value.ok_or_else(|| {
        StatsError::validation(format!(
            "Missing required fields. Please provide all the fields. ({} is missing)",
            field
        ))
    })?;
    field.coerce(&value)
}

fn required_int(value: Option<Value>, field: StatField) -> StatsResult<i32> {
    match required(value, field)? {
        FieldValue::Int(v) => Ok(v),
        FieldValue::Text(_) => Err(StatsError::validation(format!(
            "{} must be an integer",
            field
        ))),
    }
}

/// Request body for a single-field update
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatsRequest {
    pub team: Option<String>,
    pub year: Option<Value>,
    pub data_to_update: Option<String>,
    pub new_value: Option<Value>,
}

/// Request body for deleting a record
///
/// Without `year` the team's first stored record is removed.
#[derive(Debug, Deserialize)]
pub struct DeleteStatsRequest {
    pub team: Option<String>,
    pub year: Option<Value>,
}

/// Query string of the paged listing
#[derive(Debug, Default, Deserialize)]
pub struct ViewQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// Query string of the top-teams ranking
#[derive(Debug, Default, Deserialize)]
pub struct TopTeamsParams {
    pub limit: Option<String>,
    pub sort: Option<String>,
}

/// Query string of the average-goals aggregation
#[derive(Debug, Default, Deserialize)]
pub struct AverageGoalsQuery {
    pub year: Option<String>,
}

/// Response for writes: a message plus the affected record
#[derive(Debug, Serialize)]
pub struct StatsMessageResponse {
    pub message: String,
    pub team: TeamStats,
}

impl StatsMessageResponse {
    fn new(message: &str, team: TeamStats) -> Self {
        Self {
            message: message.to_string(),
            team,
        }
    }
}

/// One page of the listing
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewResponse {
    pub teams: Vec<TeamStats>,
    pub total_teams: u64,
    pub current_page: u32,
    pub total_pages: u64,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Add a team-season record
///
/// POST /add
pub async fn add_stats(
    State(state): State<AppState>,
    payload: Result<Json<AddStatsRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<StatsMessageResponse>), ApiError> {
    let Json(req) = payload?;
    let stats = req.into_stats()?;

    let created = state.stats.create(stats).await?;
    tracing::info!(team = created.team(), year = created.year(), "Team added");

    Ok((
        StatusCode::CREATED,
        Json(StatsMessageResponse::new("Team added successfully", created)),
    ))
}

/// Get the record for a team in a year
///
/// GET /view-team/:team/:year
pub async fn view_team(
    State(state): State<AppState>,
    Path((team, year)): Path<(String, String)>,
) -> Result<Json<TeamStats>, ApiError> {
    // A year that is not an integer cannot match any record
    let year: i32 = year
        .trim()
        .parse()
        .map_err(|_| ApiError::not_found("Team not found"))?;

    let stats = state.stats.find_by_team_year(&team, year).await?;
    Ok(Json(stats))
}

/// Replace a single field of an existing record
///
/// PUT /update
pub async fn update_stats(
    State(state): State<AppState>,
    payload: Result<Json<UpdateStatsRequest>, JsonRejection>,
) -> Result<Json<StatsMessageResponse>, ApiError> {
    let Json(req) = payload?;

    let (Some(team), Some(year), Some(field), Some(new_value)) = (
        non_blank(req.team),
        req.year,
        non_blank(req.data_to_update),
        req.new_value,
    ) else {
        return Err(ApiError::bad_request(
            "Ensure team, year, dataToUpdate, and newValue are provided.",
        ));
    };

    let year = match StatField::Year.coerce(&year)? {
        FieldValue::Int(year) => year,
        FieldValue::Text(_) => return Err(ApiError::bad_request("year must be an integer")),
    };
    let field: StatField = field.trim().parse()?;
    let value = field.coerce(&new_value)?;

    let updated = state.stats.update_field(&team, year, field, value).await?;
    tracing::info!(team = %team, year, field = %field, "Team updated");

    Ok(Json(StatsMessageResponse::new(
        "Team updated successfully",
        updated,
    )))
}

/// Delete a team's record
///
/// DELETE /delete
pub async fn delete_stats(
    State(state): State<AppState>,
    payload: Result<Json<DeleteStatsRequest>, JsonRejection>,
) -> Result<Json<StatsMessageResponse>, ApiError> {
    let Json(req) = payload?;

    let team = non_blank(req.team).ok_or_else(|| ApiError::bad_request("Team name is required"))?;

    let year = match req.year {
        None => None,
        Some(raw) => match StatField::Year.coerce(&raw)? {
            FieldValue::Int(year) => Some(year),
            FieldValue::Text(_) => return Err(ApiError::bad_request("year must be an integer")),
        },
    };

    let deleted = state.stats.delete_by_team(&team, year).await?;
    tracing::info!(team = deleted.team(), year = deleted.year(), "Team deleted");

    Ok(Json(StatsMessageResponse::new(
        "Team deleted successfully",
        deleted,
    )))
}

/// List records, sorted by team, one page at a time
///
/// GET /view?page=&limit=
pub async fn view_stats(
    State(state): State<AppState>,
    query: Result<Query<ViewQuery>, QueryRejection>,
) -> Result<Json<ViewResponse>, ApiError> {
    let Query(query) = query?;
    let pagination = Pagination::from_raw(query.page.as_deref(), query.limit.as_deref());

    let page = state.stats.list_paged(pagination).await?;

    Ok(Json(ViewResponse {
        total_pages: pagination.total_pages(page.total),
        total_teams: page.total,
        current_page: pagination.page(),
        teams: page.teams,
    }))
}

/// Highest-ranked records by a numeric field
///
/// GET /top-teams?limit=&sort=
pub async fn top_teams(
    State(state): State<AppState>,
    query: Result<Query<TopTeamsParams>, QueryRejection>,
) -> Result<Json<Vec<TeamStats>>, ApiError> {
    let Query(params) = query?;
    let query = TopTeamsQuery::from_raw(params.limit.as_deref(), params.sort.as_deref())?;

    let teams = state.stats.top_teams(query).await?;
    Ok(Json(teams))
}

/// Average goals per game for every team in a year
///
/// GET /average-goals?year=
pub async fn average_goals(
    State(state): State<AppState>,
    query: Result<Query<AverageGoalsQuery>, QueryRejection>,
) -> Result<Json<Vec<TeamAverage>>, ApiError> {
    let Query(query) = query?;

    let year = non_blank(query.year).ok_or_else(|| ApiError::bad_request("Year is required"))?;
    let year: i32 = year
        .trim()
        .parse()
        .map_err(|_| ApiError::bad_request("Year must be an integer"))?;

    let averages = state.stats.average_goals(year).await?;
    Ok(Json(averages))
}

/// Distinct years present in the store, ascending
///
/// GET /available-years
pub async fn available_years(State(state): State<AppState>) -> Result<Json<Vec<i32>>, ApiError> {
    let years = state.stats.available_years().await?;
    Ok(Json(years))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full_request() -> Value {
        json!({
            "team": "Brighton",
            "year": 2024,
            "gamesPlayed": 38,
            "win": 12,
            "draw": 0,
            "loss": 26,
            "goalsFor": 55,
            "goalsAgainst": 62,
            "points": 36
        })
    }

    fn parse(value: Value) -> AddStatsRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn add_request_accepts_zero_draws() {
        let stats = parse(full_request()).into_stats().unwrap();

        assert_eq!(stats.team(), "Brighton");
        assert_eq!(stats.line().draw, 0);
    }

    #[test]
    fn add_request_reports_missing_field() {
        let mut body = full_request();
        body.as_object_mut().unwrap().remove("goalsFor");

        let err = parse(body).into_stats().unwrap_err();
        assert_eq!(
            err,
            StatsError::validation(
                "Missing required fields. Please provide all the fields. (goalsFor is missing)"
            )
        );
    }

    #[test]
    fn add_request_treats_null_as_missing() {
        let mut body = full_request();
        body["points"] = Value::Null;

        assert!(parse(body).into_stats().is_err());
    }

    #[test]
    fn add_request_accepts_numeric_strings() {
        let mut body = full_request();
        body["year"] = json!("2024");
        body["points"] = json!("36");

        let stats = parse(body).into_stats().unwrap();
        assert_eq!(stats.year(), 2024);
        assert_eq!(stats.line().points, 36);
    }

    #[test]
    fn add_request_rejects_negative_counter() {
        let mut body = full_request();
        body["loss"] = json!(-1);

        assert!(matches!(
            parse(body).into_stats(),
            Err(StatsError::Validation(_))
        ));
    }

    #[test]
    fn view_response_uses_camel_case() {
        let value = serde_json::to_value(ViewResponse {
            teams: vec![],
            total_teams: 0,
            current_page: 1,
            total_pages: 0,
        })
        .unwrap();

        assert_eq!(
            value,
            json!({"teams": [], "totalTeams": 0, "currentPage": 1, "totalPages": 0})
        );
    }
}
