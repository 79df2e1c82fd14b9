//! Fixture import pipeline.
//!
//! Pulls the day's fixtures for each configured league from a
//! [`FixtureSource`] and merges them into the store. One league failing does
//! not stop the others.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{error, info};

use crate::fetch::FixtureSource;
use crate::models::League;
use crate::storage::{StorageError, Store};

/// Result of an import run.
#[derive(Debug, Default, Serialize)]
pub struct ImportSummary {
    pub leagues: usize,
    pub fetched: usize,
    pub inserted: usize,
    pub updated: usize,
    pub errors: Vec<String>,
}

impl ImportSummary {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Import fixtures for `leagues` on `date`.
///
/// The league list itself is saved first; failing to write it is the only
/// error returned. Fetch and per-league store failures are collected in
/// [`ImportSummary::errors`].
pub async fn import_fixtures(
    source: &dyn FixtureSource,
    store: &Store,
    leagues: &[League],
    season: i32,
    date: NaiveDate,
) -> Result<ImportSummary, StorageError> {
    store.save_leagues(leagues)?;

    let mut summary = ImportSummary {
        leagues: leagues.len(),
        ..ImportSummary::default()
    };

    for league in leagues {
        info!(
            source = source.name(),
            league = %league.code,
            %date,
            "Importing fixtures"
        );

        let matches = match source.fixtures(league.id, season, date).await {
            Ok(matches) => matches,
            Err(e) => {
                error!("Failed to fetch fixtures for {}: {}", league.name, e);
                summary.errors.push(format!("{}: {}", league.name, e));
                continue;
            }
        };

        summary.fetched += matches.len();
        if matches.is_empty() {
            continue;
        }

        match store.upsert_matches(&matches) {
            Ok(counts) => {
                summary.inserted += counts.inserted;
                summary.updated += counts.updated;
            }
            Err(e) => {
                error!("Failed to store fixtures for {}: {}", league.name, e);
                summary.errors.push(format!("{}: {}", league.name, e));
            }
        }
    }

    info!(
        fetched = summary.fetched,
        inserted = summary.inserted,
        updated = summary.updated,
        errors = summary.errors.len(),
        "Import finished"
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::FetchError;
    use crate::models::{LeagueId, Match, Team};
    use crate::storage::StorageConfig;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use tempfile::TempDir;

    /// Source serving canned fixtures; leagues without an entry fail.
    struct MockSource {
        fixtures: HashMap<LeagueId, Vec<Match>>,
    }

    #[async_trait]
    impl FixtureSource for MockSource {
        fn name(&self) -> &'static str {
            "mock"
        }

        async fn fixtures(
            &self,
            league_id: LeagueId,
            _season: i32,
            _date: NaiveDate,
        ) -> Result<Vec<Match>, FetchError> {
            self.fixtures
                .get(&league_id)
                .cloned()
                .ok_or_else(|| FetchError::Api("plan: league not covered".to_string()))
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 14).unwrap()
    }

    fn mls_fixtures() -> Vec<Match> {
        let miami = Team::new(9568, "Inter Miami");
        let orlando = Team::new(1598, "Orlando City");
        let austin = Team::new(16489, "Austin");
        vec![
            Match::scheduled(1, date(), 253, &miami, &orlando),
            Match::scheduled(2, date(), 253, &austin, &miami).with_final_score(1, 1),
        ]
    }

    fn leagues() -> Vec<League> {
        vec![
            League::new(253, "Major League Soccer", "MLS"),
            League::new(15, "FIFA Club World Cup", "CWC"),
        ]
    }

    #[tokio::test]
    async fn test_import_collects_per_league_errors() {
        let temp_dir = TempDir::new().unwrap();
        let store = Store::new(StorageConfig::new(temp_dir.path().to_path_buf()));
        let source = MockSource {
            fixtures: HashMap::from([(253, mls_fixtures())]),
        };

        let summary = import_fixtures(&source, &store, &leagues(), 2025, date())
            .await
            .unwrap();

        assert_eq!(summary.leagues, 2);
        assert_eq!(summary.fetched, 2);
        assert_eq!(summary.inserted, 2);
        assert_eq!(summary.updated, 0);
        assert!(!summary.is_clean());
        assert_eq!(summary.errors.len(), 1);
        assert!(summary.errors[0].starts_with("FIFA Club World Cup"));

        assert_eq!(store.leagues().unwrap(), leagues());
        assert_eq!(store.matches_for_league(253, None).unwrap().len(), 2);
    }

    #[test]
    fn test_reimport_updates_existing() {
        let temp_dir = TempDir::new().unwrap();
        let store = Store::new(StorageConfig::new(temp_dir.path().to_path_buf()));
        let mut fixtures = HashMap::from([(253, mls_fixtures()), (15, Vec::new())]);
        let source = MockSource {
            fixtures: fixtures.clone(),
        };

        tokio_test::block_on(import_fixtures(&source, &store, &leagues(), 2025, date())).unwrap();

        // First fixture has now been played
        let played = fixtures.get(&253).unwrap()[0].clone().with_final_score(3, 0);
        fixtures.insert(253, vec![played]);
        let source = MockSource { fixtures };

        let summary =
            tokio_test::block_on(import_fixtures(&source, &store, &leagues(), 2025, date()))
                .unwrap();

        assert!(summary.is_clean());
        assert_eq!(summary.inserted, 0);
        assert_eq!(summary.updated, 1);
        assert!(store.get_match(1).unwrap().is_finished());
        assert_eq!(store.finished_matches_for_team(9568).unwrap().len(), 2);
    }
}
