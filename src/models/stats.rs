//! Derived statistics models.
//!
//! Snapshots are recomputed on demand from stored matches and bets and never
//! persisted.

use serde::{Deserialize, Serialize};

use super::{Outcome, Team, TeamId};
use crate::calculate::ratio;

/// Win/draw/loss split for one goals-conceded bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketRecord {
    pub total: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
}

impl BucketRecord {
    pub fn record(&mut self, outcome: Outcome) {
        self.total += 1;
        match outcome {
            Outcome::Win => self.wins += 1,
            Outcome::Draw => self.draws += 1,
            Outcome::Loss => self.losses += 1,
        }
    }
}

/// Results broken down by how many goals the team conceded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConcededForm {
    pub clean_sheets: BucketRecord,
    pub one_conceded: BucketRecord,
    pub two_plus_conceded: BucketRecord,
}

impl ConcededForm {
    fn games(&self) -> u32 {
        self.clean_sheets.total + self.one_conceded.total + self.two_plus_conceded.total
    }

    /// Share of games without conceding.
    pub fn clean_sheet_ratio(&self) -> f64 {
        ratio(self.clean_sheets.total, self.games())
    }

    /// Share of games conceding at least once.
    pub fn dirty_sheet_ratio(&self) -> f64 {
        if self.games() == 0 {
            0.0
        } else {
            1.0 - self.clean_sheet_ratio()
        }
    }

    /// Share of games conceding two or more.
    pub fn two_plus_ratio(&self) -> f64 {
        ratio(self.two_plus_conceded.total, self.games())
    }

    /// Share of games expected to go over 1.5 goals against:
    /// the dirty-sheet ratio scaled by how often a conceded goal became two.
    pub fn over_one_and_half_against(&self) -> f64 {
        let conceded = self.one_conceded.total + self.two_plus_conceded.total;
        self.dirty_sheet_ratio() * ratio(self.two_plus_conceded.total, conceded)
    }
}

/// One team's form over its finished matches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamSnapshot {
    pub team_id: TeamId,
    pub name: String,
    pub games_played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub avg_goals_for: f64,
    pub avg_goals_against: f64,
    pub clean_sheets: u32,
    pub one_conceded: u32,
    pub two_plus_conceded: u32,
    pub conceded_form: ConcededForm,
}

impl TeamSnapshot {
    /// Empty snapshot for a team with no finished matches.
    pub fn empty(team: &Team) -> Self {
        Self {
            team_id: team.id,
            name: team.name.clone(),
            ..Default::default()
        }
    }

    pub fn goal_diff(&self) -> i64 {
        i64::from(self.goals_for) - i64::from(self.goals_against)
    }

    /// "W-D-L"
    pub fn fmt_record(&self) -> String {
        format!("{}-{}-{}", self.wins, self.draws, self.losses)
    }

    /// "for:against"
    pub fn fmt_goals(&self) -> String {
        format!("{}:{}", self.goals_for, self.goals_against)
    }
}

/// Side-by-side form of the two teams in a fixture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadToHeadStats {
    pub home: TeamSnapshot,
    pub away: TeamSnapshot,
}

impl HeadToHeadStats {
    pub fn home_team_name(&self) -> &str {
        &self.home.name
    }

    pub fn away_team_name(&self) -> &str {
        &self.away.name
    }
}

/// Portfolio summary over a set of bets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BettingPerformance {
    pub total_bets: u32,
    /// Sum of every stake, settled or not
    pub total_wagered: f64,
    /// Profit from winning bets, excluding returned stakes
    pub total_winnings: f64,
    /// Stakes of losing bets
    pub total_losses: f64,
    pub net_profit: f64,
    /// Net profit as a percentage of total wagered
    pub roi: f64,
    /// Wins as a percentage of settled bets (pushes included)
    pub win_rate: f64,
    pub pending_bets: u32,
}

impl BettingPerformance {
    pub fn settled_bets(&self) -> u32 {
        self.total_bets - self.pending_bets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_record() {
        let mut bucket = BucketRecord::default();
        bucket.record(Outcome::Win);
        bucket.record(Outcome::Loss);
        bucket.record(Outcome::Win);
        assert_eq!(
            bucket,
            BucketRecord {
                total: 3,
                wins: 2,
                draws: 0,
                losses: 1
            }
        );
    }

    #[test]
    fn test_conceded_form_ratios() {
        let form = ConcededForm {
            clean_sheets: BucketRecord {
                total: 2,
                wins: 2,
                draws: 0,
                losses: 0,
            },
            one_conceded: BucketRecord {
                total: 1,
                wins: 0,
                draws: 1,
                losses: 0,
            },
            two_plus_conceded: BucketRecord {
                total: 1,
                wins: 0,
                draws: 0,
                losses: 1,
            },
        };

        assert_eq!(form.clean_sheet_ratio(), 0.5);
        assert_eq!(form.dirty_sheet_ratio(), 0.5);
        assert_eq!(form.two_plus_ratio(), 0.25);
        assert_eq!(form.over_one_and_half_against(), 0.25);
    }

    #[test]
    fn test_conceded_form_empty_is_zero() {
        let form = ConcededForm::default();
        assert_eq!(form.clean_sheet_ratio(), 0.0);
        assert_eq!(form.dirty_sheet_ratio(), 0.0);
        assert_eq!(form.two_plus_ratio(), 0.0);
        assert_eq!(form.over_one_and_half_against(), 0.0);
    }

    #[test]
    fn test_only_clean_sheets_has_no_over_ratio() {
        let form = ConcededForm {
            clean_sheets: BucketRecord {
                total: 3,
                wins: 3,
                draws: 0,
                losses: 0,
            },
            ..Default::default()
        };
        assert_eq!(form.dirty_sheet_ratio(), 0.0);
        assert_eq!(form.over_one_and_half_against(), 0.0);
    }

    #[test]
    fn test_snapshot_formatting() {
        let snapshot = TeamSnapshot {
            wins: 5,
            draws: 2,
            losses: 3,
            goals_for: 12,
            goals_against: 15,
            ..TeamSnapshot::empty(&Team::new(1, "Orlando City"))
        };
        assert_eq!(snapshot.fmt_record(), "5-2-3");
        assert_eq!(snapshot.fmt_goals(), "12:15");
        assert_eq!(snapshot.goal_diff(), -3);
        assert_eq!(snapshot.name, "Orlando City");
    }

    #[test]
    fn test_performance_settled_bets() {
        let perf = BettingPerformance {
            total_bets: 10,
            pending_bets: 4,
            ..Default::default()
        };
        assert_eq!(perf.settled_bets(), 6);
    }
}
