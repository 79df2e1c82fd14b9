//! Statistics calculation engine.
//!
//! Pure reducers over already-loaded data:
//! - Head-to-head form of the two teams in a fixture
//! - Bet payouts, per-bet profit and portfolio performance
//!
//! Nothing here touches the store; callers load matches and bets first and
//! re-invoke these functions whenever the selection changes.

pub mod head_to_head;
pub mod ledger;

pub use head_to_head::{compute_head_to_head, team_snapshot};
pub use ledger::{
    bet_profit, compute_performance, payout, pnl_label, BetLedger, LedgerEntry,
};

/// `numerator / denominator`, 0 when the denominator is 0.
pub fn ratio(numerator: u32, denominator: u32) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// `numerator / denominator * 100`, 0 when the denominator is 0.
pub fn percentage(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator * 100.0
    }
}

/// Calculate win rate from wins/losses/draws as a fraction.
pub fn calculate_win_rate(wins: u32, losses: u32, draws: u32) -> f64 {
    ratio(wins, wins + losses + draws)
}
