use serde::Serialize;

use super::team_stats::TeamStats;

/// Average goals scored per game by one team in one season
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamAverage {
    pub team: String,
    pub average_goals: i64,
}

/// Ranks records by average goals per game, highest first
///
/// Teams with the same average are listed alphabetically.
///
/// # Example
/// ```
/// use football_stats_api::domain::stats::{rank_average_goals, StatLine, TeamStats};
///
/// let a = TeamStats::new("A".into(), 2024, StatLine { goals_for: 10, games_played: 5, ..Default::default() }).unwrap();
/// let b = TeamStats::new("B".into(), 2024, StatLine { goals_for: 9, games_played: 3, ..Default::default() }).unwrap();
///
/// let ranked = rank_average_goals([&a, &b]);
/// assert_eq!(ranked[0].team, "B");
/// assert_eq!(ranked[0].average_goals, 3);
/// assert_eq!(ranked[1].average_goals, 2);
/// ```
pub fn rank_average_goals<'a>(records: impl IntoIterator<Item = &'a TeamStats>) -> Vec<TeamAverage> {
    let mut averages: Vec<TeamAverage> = records
        .into_iter()
        .map(|stats| TeamAverage {
            team: stats.team().to_string(),
            average_goals: stats.average_goals(),
        })
        .collect();

    averages.sort_by(|a, b| {
        b.average_goals
            .cmp(&a.average_goals)
            .then_with(|| a.team.cmp(&b.team))
    });

    averages
}
