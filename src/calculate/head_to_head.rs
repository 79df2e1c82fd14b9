//! Head-to-head form aggregation.
//!
//! Each side of a fixture is evaluated independently over that team's own
//! finished matches. Home/away is resolved per fixture, so a team's goals
//! and conceded buckets are correct whichever side it played on.

use tracing::debug;

use super::ratio;
use crate::models::{HeadToHeadStats, Match, Outcome, Team, TeamSnapshot};

/// Compare the form of `home` and `away`.
///
/// `matches` may contain anything: unfinished fixtures and matches involving
/// neither team are ignored. Never fails; a team with no finished matches
/// gets an all-zero snapshot.
pub fn compute_head_to_head(home: &Team, away: &Team, matches: &[Match]) -> HeadToHeadStats {
    let stats = HeadToHeadStats {
        home: team_snapshot(home, matches),
        away: team_snapshot(away, matches),
    };

    debug!(
        home = %home.name,
        away = %away.name,
        home_games = stats.home.games_played,
        away_games = stats.away.games_played,
        "Computed head-to-head"
    );

    stats
}

/// Reduce every finished match involving `team` into a snapshot.
pub fn team_snapshot(team: &Team, matches: &[Match]) -> TeamSnapshot {
    let mut snapshot = TeamSnapshot::empty(team);

    for view in matches
        .iter()
        .filter(|m| m.is_finished())
        .filter_map(|m| m.perspective(team.id))
    {
        snapshot.games_played += 1;
        snapshot.goals_for += view.goals_for;
        snapshot.goals_against += view.goals_against;

        match view.outcome {
            Outcome::Win => snapshot.wins += 1,
            Outcome::Draw => snapshot.draws += 1,
            Outcome::Loss => snapshot.losses += 1,
        }

        let form = &mut snapshot.conceded_form;
        match view.goals_against {
            0 => {
                snapshot.clean_sheets += 1;
                form.clean_sheets.record(view.outcome);
            }
            1 => {
                snapshot.one_conceded += 1;
                form.one_conceded.record(view.outcome);
            }
            _ => {
                snapshot.two_plus_conceded += 1;
                form.two_plus_conceded.record(view.outcome);
            }
        }
    }

    snapshot.avg_goals_for = ratio(snapshot.goals_for, snapshot.games_played);
    snapshot.avg_goals_against = ratio(snapshot.goals_against, snapshot.games_played);

    snapshot
}
