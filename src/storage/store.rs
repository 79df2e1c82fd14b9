//! The data store handle.
//!
//! `Store` is created once from a [`StorageConfig`] and passed explicitly to
//! whatever needs it (API state, importer, CLI commands).

use std::sync::Mutex;

use serde::{de::DeserializeOwned, Serialize};
use tracing::info;

use super::{EntityType, JsonlReader, JsonlWriter, StorageConfig, StorageError};
use crate::models::{
    next_id, Bet, BetId, BetOutcome, League, LeagueId, Match, MatchId, NewBet, TeamId,
};

/// Counts from merging incoming records into a file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpsertSummary {
    pub inserted: usize,
    pub updated: usize,
}

/// JSONL-backed store for leagues, matches and bets.
#[derive(Debug)]
pub struct Store {
    config: StorageConfig,
    /// Held across every read-modify-write cycle
    write_lock: Mutex<()>,
}

impl Store {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            write_lock: Mutex::new(()),
        }
    }

    fn read<T: DeserializeOwned>(&self, entity: EntityType) -> Result<Vec<T>, StorageError> {
        JsonlReader::for_entity(&self.config, entity).read_all()
    }

    fn write<T: Serialize>(&self, entity: EntityType, items: &[T]) -> Result<usize, StorageError> {
        JsonlWriter::for_entity(&self.config, entity).write_all(items)
    }

    /// Replace records sharing an id with `incoming`, append the rest.
    fn upsert<T, K>(
        &self,
        entity: EntityType,
        incoming: &[T],
        key: K,
    ) -> Result<UpsertSummary, StorageError>
    where
        T: Serialize + DeserializeOwned + Clone,
        K: Fn(&T) -> i64,
    {
        let _guard = self.write_lock.lock().map_err(|_| StorageError::Poisoned)?;
        let mut items: Vec<T> = self.read(entity)?;
        let mut summary = UpsertSummary::default();

        for record in incoming {
            match items.iter_mut().find(|existing| key(existing) == key(record)) {
                Some(existing) => {
                    *existing = record.clone();
                    summary.updated += 1;
                }
                None => {
                    items.push(record.clone());
                    summary.inserted += 1;
                }
            }
        }

        self.write(entity, &items)?;
        Ok(summary)
    }

    // ── Leagues ─────────────────────────────────────────────────────

    pub fn leagues(&self) -> Result<Vec<League>, StorageError> {
        self.read(EntityType::League)
    }

    pub fn save_leagues(&self, leagues: &[League]) -> Result<UpsertSummary, StorageError> {
        self.upsert(EntityType::League, leagues, |l| l.id)
    }

    // ── Matches ─────────────────────────────────────────────────────

    pub fn matches(&self) -> Result<Vec<Match>, StorageError> {
        self.read(EntityType::Match)
    }

    /// Matches of one league by date. `played` keeps only finished
    /// (`Some(true)`) or unfinished (`Some(false)`) fixtures.
    pub fn matches_for_league(
        &self,
        league_id: LeagueId,
        played: Option<bool>,
    ) -> Result<Vec<Match>, StorageError> {
        let mut matches: Vec<Match> = JsonlReader::for_entity(&self.config, EntityType::Match)
            .read_where(|m: &Match| {
                m.league_id == league_id && played.map_or(true, |p| m.is_finished() == p)
            })?;
        matches.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));
        Ok(matches)
    }

    pub fn get_match(&self, id: MatchId) -> Result<Match, StorageError> {
        self.matches()?
            .into_iter()
            .find(|m| m.id == id)
            .ok_or(StorageError::MatchNotFound(id))
    }

    pub fn upsert_matches(&self, matches: &[Match]) -> Result<UpsertSummary, StorageError> {
        let summary = self.upsert(EntityType::Match, matches, |m| m.id)?;
        info!(
            inserted = summary.inserted,
            updated = summary.updated,
            "Stored matches"
        );
        Ok(summary)
    }

    /// Every finished match `team_id` played, home or away.
    pub fn finished_matches_for_team(&self, team_id: TeamId) -> Result<Vec<Match>, StorageError> {
        JsonlReader::for_entity(&self.config, EntityType::Match)
            .read_where(|m: &Match| m.is_finished() && m.involves(team_id))
    }

    /// Finished matches of either side of `fixture`, each listed once.
    pub fn form_history(&self, fixture: &Match) -> Result<Vec<Match>, StorageError> {
        let mut history = self.finished_matches_for_team(fixture.home_team_id)?;
        for m in self.finished_matches_for_team(fixture.away_team_id)? {
            if !history.iter().any(|seen| seen.id == m.id) {
                history.push(m);
            }
        }
        Ok(history)
    }

    // ── Bets ────────────────────────────────────────────────────────

    pub fn bets(&self) -> Result<Vec<Bet>, StorageError> {
        self.read(EntityType::Bet)
    }

    pub fn bets_for_match(&self, match_id: MatchId) -> Result<Vec<Bet>, StorageError> {
        JsonlReader::for_entity(&self.config, EntityType::Bet)
            .read_where(|b: &Bet| b.match_id == match_id)
    }

    /// Store a validated slip as a new pending bet on an existing match.
    pub fn record_bet(&self, new_bet: NewBet) -> Result<Bet, StorageError> {
        self.get_match(new_bet.match_id)?;

        let _guard = self.write_lock.lock().map_err(|_| StorageError::Poisoned)?;
        let mut bets = self.bets()?;
        let bet = Bet::from_new(next_id(bets.iter().map(|b| b.id)), new_bet);
        bets.push(bet.clone());
        self.write(EntityType::Bet, &bets)?;

        info!(bet_id = bet.id, match_id = bet.match_id, amount = bet.amount, "Recorded bet");
        Ok(bet)
    }

    /// Set the result of a bet. Fails for unknown ids and for `pending`.
    pub fn settle_bet(&self, id: BetId, outcome: BetOutcome) -> Result<Bet, StorageError> {
        let _guard = self.write_lock.lock().map_err(|_| StorageError::Poisoned)?;
        let mut bets = self.bets()?;
        let bet = bets
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or(StorageError::BetNotFound(id))?;
        bet.settle(outcome)?;
        let settled = bet.clone();
        self.write(EntityType::Bet, &bets)?;

        info!(bet_id = id, result = %outcome, "Settled bet");
        Ok(settled)
    }

    /// Remove a bet permanently, returning it.
    pub fn delete_bet(&self, id: BetId) -> Result<Bet, StorageError> {
        let _guard = self.write_lock.lock().map_err(|_| StorageError::Poisoned)?;
        let mut bets = self.bets()?;
        let idx = bets
            .iter()
            .position(|b| b.id == id)
            .ok_or(StorageError::BetNotFound(id))?;
        let removed = bets.remove(idx);
        self.write(EntityType::Bet, &bets)?;

        info!(bet_id = id, "Deleted bet");
        Ok(removed)
    }
}
