//! Match (fixture) model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{LeagueId, MatchId, Team, TeamId};

/// Short status code reported by the fixture provider.
///
/// Only `NS` and `FT` carry meaning here; every other code (live, postponed,
/// after extra time...) is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MatchStatus {
    NotStarted,
    FullTime,
    Other(String),
}

impl MatchStatus {
    pub fn as_str(&self) -> &str {
        match self {
            MatchStatus::NotStarted => "NS",
            MatchStatus::FullTime => "FT",
            MatchStatus::Other(code) => code,
        }
    }
}

impl From<String> for MatchStatus {
    fn from(code: String) -> Self {
        match code.as_str() {
            "NS" => MatchStatus::NotStarted,
            "FT" => MatchStatus::FullTime,
            _ => MatchStatus::Other(code),
        }
    }
}

impl From<&str> for MatchStatus {
    fn from(code: &str) -> Self {
        MatchStatus::from(code.to_string())
    }
}

impl From<MatchStatus> for String {
    fn from(status: MatchStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a finished match seen from one team's side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Draw,
    Loss,
}

/// One team's view of a single fixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeamPerspective {
    pub at_home: bool,
    pub goals_for: u32,
    pub goals_against: u32,
    pub outcome: Outcome,
}

/// A scheduled or completed fixture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub date: NaiveDate,
    pub league_id: LeagueId,
    pub status: MatchStatus,
    pub home_team_id: TeamId,
    pub away_team_id: TeamId,
    pub home_team_name: String,
    pub away_team_name: String,
    pub home_goals: u32,
    pub away_goals: u32,
    /// Absent on draws and on matches not yet played
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner_id: Option<TeamId>,
}

impl Match {
    /// Create a not-started fixture between two teams.
    pub fn scheduled(
        id: MatchId,
        date: NaiveDate,
        league_id: LeagueId,
        home: &Team,
        away: &Team,
    ) -> Self {
        Self {
            id,
            date,
            league_id,
            status: MatchStatus::NotStarted,
            home_team_id: home.id,
            away_team_id: away.id,
            home_team_name: home.name.clone(),
            away_team_name: away.name.clone(),
            home_goals: 0,
            away_goals: 0,
            winner_id: None,
        }
    }

    /// Builder method recording a full-time score. The winner is derived
    /// from the goals.
    pub fn with_final_score(mut self, home_goals: u32, away_goals: u32) -> Self {
        self.status = MatchStatus::FullTime;
        self.home_goals = home_goals;
        self.away_goals = away_goals;
        self.winner_id = match home_goals.cmp(&away_goals) {
            std::cmp::Ordering::Greater => Some(self.home_team_id),
            std::cmp::Ordering::Less => Some(self.away_team_id),
            std::cmp::Ordering::Equal => None,
        };
        self
    }

    pub fn home_team(&self) -> Team {
        Team::new(self.home_team_id, self.home_team_name.clone())
    }

    pub fn away_team(&self) -> Team {
        Team::new(self.away_team_id, self.away_team_name.clone())
    }

    pub fn is_finished(&self) -> bool {
        self.status == MatchStatus::FullTime
    }

    pub fn involves(&self, team_id: TeamId) -> bool {
        self.home_team_id == team_id || self.away_team_id == team_id
    }

    /// "Home vs Away"
    pub fn title(&self) -> String {
        format!("{} vs {}", self.home_team_name, self.away_team_name)
    }

    /// Score line, or "TBD" before kick-off.
    pub fn score(&self) -> String {
        if self.status == MatchStatus::NotStarted {
            return "TBD".to_string();
        }
        format!("{} - {} ({})", self.home_goals, self.away_goals, self.status)
    }

    /// How this fixture looks for `team_id`, which may have played at home
    /// or away. `None` if the team did not take part.
    ///
    /// A winner id that is not `team_id` counts as a loss; no winner id is a
    /// draw.
    pub fn perspective(&self, team_id: TeamId) -> Option<TeamPerspective> {
        let (at_home, goals_for, goals_against) = if self.home_team_id == team_id {
            (true, self.home_goals, self.away_goals)
        } else if self.away_team_id == team_id {
            (false, self.away_goals, self.home_goals)
        } else {
            return None;
        };

        let outcome = match self.winner_id {
            Some(winner) if winner == team_id => Outcome::Win,
            Some(_) => Outcome::Loss,
            None => Outcome::Draw,
        };

        Some(TeamPerspective {
            at_home,
            goals_for,
            goals_against,
            outcome,
        })
    }
}
