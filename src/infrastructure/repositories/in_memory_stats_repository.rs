use std::collections::BTreeSet;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::errors::{StatsError, StatsResult};
use crate::domain::repositories::{ConnectionState, StatsPage, StatsRepository};
use crate::domain::stats::{
    rank_average_goals, FieldValue, Pagination, StatField, TeamAverage, TeamStats, TopTeamsQuery,
};

/// In-process implementation of StatsRepository
///
/// Records are kept in insertion order, which plays the role of the store's
/// natural order. The (team, year) uniqueness check runs under the write
/// lock, so it is atomic here.
#[derive(Debug, Default)]
pub struct InMemoryStatsRepository {
    records: RwLock<Vec<TeamStats>>,
}

impl InMemoryStatsRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository pre-filled with records
    ///
    /// Later duplicates of an already seen (team, year) are dropped.
    pub fn with_records(records: impl IntoIterator<Item = TeamStats>) -> Self {
        let mut unique: Vec<TeamStats> = Vec::new();
        for record in records {
            if !unique.iter().any(|r| r.has_key(record.team(), record.year())) {
                unique.push(record);
            }
        }
        Self {
            records: RwLock::new(unique),
        }
    }

    /// Number of stored records
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl StatsRepository for InMemoryStatsRepository {
    async fn create(&self, stats: TeamStats) -> StatsResult<TeamStats> {
        let mut records = self.records.write().await;

        if records.iter().any(|r| r.has_key(stats.team(), stats.year())) {
            return Err(StatsError::duplicate_team_year());
        }

        records.push(stats.clone());
        Ok(stats)
    }

    async fn find_by_team_year(&self, team: &str, year: i32) -> StatsResult<TeamStats> {
        self.records
            .read()
            .await
            .iter()
            .find(|r| r.has_key(team, year))
            .cloned()
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
        let mut records = self.records.write().await;

        let index = records
            .iter()
            .position(|r| r.has_key(team, year))
            .ok_or_else(|| StatsError::not_found("Team not found for this year. Update failed."))?;

        let mut updated = records[index].clone();
        updated.set(field, value)?;

        // Moving a record onto another record's key must fail like a unique index would
        let collides = records
            .iter()
            .enumerate()
            .any(|(i, r)| i != index && r.has_key(updated.team(), updated.year()));
        if collides {
            return Err(StatsError::duplicate_team_year());
        }

        records[index] = updated.clone();
        Ok(updated)
    }

    async fn delete_by_team(&self, team: &str, year: Option<i32>) -> StatsResult<TeamStats> {
        let mut records = self.records.write().await;

        let index = records
            .iter()
            .position(|r| r.team() == team && year.map_or(true, |y| r.year() == y))
            .ok_or_else(|| StatsError::not_found("Team not found"))?;

        Ok(records.remove(index))
    }

    async fn list_paged(&self, pagination: Pagination) -> StatsResult<StatsPage> {
        let records = self.records.read().await;

        let mut sorted: Vec<&TeamStats> = records.iter().collect();
        sorted.sort_by(|a, b| a.team().cmp(b.team()).then(a.year().cmp(&b.year())));

        let offset = usize::try_from(pagination.offset()).unwrap_or(usize::MAX);
        let teams = sorted
            .into_iter()
            .skip(offset)
            .take(pagination.limit() as usize)
            .cloned()
            .collect();

        Ok(StatsPage {
            teams,
            total: records.len() as u64,
        })
    }

    async fn top_teams(&self, query: TopTeamsQuery) -> StatsResult<Vec<TeamStats>> {
        let records = self.records.read().await;
        let sort = query.sort();

        let key = |stats: &TeamStats| match stats.get(sort) {
            FieldValue::Int(v) => v,
            FieldValue::Text(_) => 0,
        };

        let mut sorted: Vec<&TeamStats> = records.iter().collect();
        sorted.sort_by(|a, b| {
            key(b)
                .cmp(&key(a))
                .then_with(|| a.team().cmp(b.team()))
                .then_with(|| a.year().cmp(&b.year()))
        });

        Ok(sorted
            .into_iter()
            .take(query.limit() as usize)
            .cloned()
            .collect())
    }

    async fn average_goals(&self, year: i32) -> StatsResult<Vec<TeamAverage>> {
        let records = self.records.read().await;
        Ok(rank_average_goals(records.iter().filter(|r| r.year() == year)))
    }

    async fn available_years(&self) -> StatsResult<Vec<i32>> {
        let years: BTreeSet<i32> = self.records.read().await.iter().map(TeamStats::year).collect();

        if years.is_empty() {
            return Err(StatsError::not_found("No years found in the database."));
        }

        Ok(years.into_iter().collect())
    }

    async fn connection_state(&self) -> ConnectionState {
        ConnectionState::Connected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::stats::StatLine;

    fn stats(team: &str, year: i32, points: i32) -> TeamStats {
        let line = StatLine {
            games_played: 10,
            points,
            ..Default::default()
        };
        TeamStats::new(team.to_string(), year, line).unwrap()
    }

    #[tokio::test]
    async fn create_then_find_returns_identical_record() {
        let repo = InMemoryStatsRepository::new();
        let record = stats("Everton", 2022, 40);

        repo.create(record.clone()).await.unwrap();

        assert_eq!(repo.find_by_team_year("Everton", 2022).await.unwrap(), record);
    }

    #[tokio::test]
    async fn duplicate_create_keeps_one_record() {
        let repo = InMemoryStatsRepository::new();
        repo.create(stats("Everton", 2022, 40)).await.unwrap();

        let err = repo.create(stats("Everton", 2022, 99)).await.unwrap_err();

        assert!(matches!(err, StatsError::Conflict(_)));
        assert_eq!(repo.len().await, 1);
        assert_eq!(
            repo.find_by_team_year("Everton", 2022).await.unwrap().line().points,
            40
        );
    }

    #[tokio::test]
    async fn update_missing_record_leaves_store_unchanged() {
        let repo = InMemoryStatsRepository::with_records([stats("Everton", 2022, 40)]);

        let err = repo
            .update_field("Everton", 2023, StatField::Points, FieldValue::Int(1))
            .await
            .unwrap_err();

        assert!(matches!(err, StatsError::NotFound(_)));
        assert_eq!(
            repo.find_by_team_year("Everton", 2022).await.unwrap(),
            stats("Everton", 2022, 40)
        );
    }

    #[tokio::test]
    async fn update_onto_existing_key_conflicts() {
        let repo = InMemoryStatsRepository::with_records([
            stats("Everton", 2022, 40),
            stats("Everton", 2023, 50),
        ]);

        let err = repo
            .update_field("Everton", 2023, StatField::Year, FieldValue::Int(2022))
            .await
            .unwrap_err();

        assert!(matches!(err, StatsError::Conflict(_)));
        assert!(repo.find_by_team_year("Everton", 2023).await.is_ok());
    }

    #[tokio::test]
    async fn delete_without_year_removes_first_inserted() {
        let repo = InMemoryStatsRepository::with_records([
            stats("Everton", 2023, 50),
            stats("Everton", 2022, 40),
        ]);

        let deleted = repo.delete_by_team("Everton", None).await.unwrap();

        assert_eq!(deleted.year(), 2023);
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn delete_with_year_removes_exact_key() {
        let repo = InMemoryStatsRepository::with_records([
            stats("Everton", 2023, 50),
            stats("Everton", 2022, 40),
        ]);

        let deleted = repo.delete_by_team("Everton", Some(2022)).await.unwrap();

        assert_eq!(deleted.year(), 2022);
        assert!(repo.find_by_team_year("Everton", 2023).await.is_ok());
        assert!(repo.delete_by_team("Everton", Some(2022)).await.is_err());
    }

    #[tokio::test]
    async fn top_teams_breaks_ties_by_team() {
        let repo = InMemoryStatsRepository::with_records([
            stats("Chelsea", 2022, 60),
            stats("Arsenal", 2022, 60),
            stats("Burnley", 2022, 70),
        ]);

        let top = repo
            .top_teams(TopTeamsQuery::from_raw(Some("2"), None).unwrap())
            .await
            .unwrap();

        let teams: Vec<_> = top.iter().map(TeamStats::team).collect();
        assert_eq!(teams, ["Burnley", "Arsenal"]);
    }

    #[tokio::test]
    async fn available_years_are_distinct_and_sorted() {
        let repo = InMemoryStatsRepository::with_records([
            stats("A", 2024, 1),
            stats("B", 2021, 1),
            stats("C", 2024, 1),
        ]);

        assert_eq!(repo.available_years().await.unwrap(), vec![2021, 2024]);
    }

    #[tokio::test]
    async fn available_years_on_empty_store_is_not_found() {
        let repo = InMemoryStatsRepository::new();

        let err = repo.available_years().await.unwrap_err();
        assert_eq!(err, StatsError::not_found("No years found in the database."));
    }

    #[test]
    fn with_records_drops_duplicate_keys() {
        let repo = InMemoryStatsRepository::with_records([
            stats("A", 2024, 1),
            stats("A", 2024, 2),
        ]);
        assert_eq!(repo.records.try_read().unwrap().len(), 1);
    }
}
