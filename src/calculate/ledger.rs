//! Bet ledger: payouts from American odds, per-bet profit and portfolio
//! performance.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use super::percentage;
use crate::models::format::{fmt_money, fmt_odds, fmt_signed_money};
use crate::models::{Bet, BetId, BetOutcome, BettingPerformance, Match, MatchId};

/// Amount returned by a winning bet, stake included.
///
/// Positive odds pay `odds` per 100 staked; negative odds need `|odds|`
/// staked to win 100. Returns `None` for odds of 0 (not recorded).
pub fn payout(stake: f64, odds: i32) -> Option<f64> {
    match odds {
        0 => None,
        o if o > 0 => Some(stake + stake * f64::from(o) / 100.0),
        o => Some(stake + stake * 100.0 / f64::from(o).abs()),
    }
}

/// Profit or loss of a single bet, excluding the returned stake.
///
/// `None` while the bet is pending, and for a win recorded without odds.
pub fn bet_profit(bet: &Bet) -> Option<f64> {
    match bet.result {
        BetOutcome::Win => payout(bet.amount, bet.odds).map(|won| won - bet.amount),
        BetOutcome::Lose => Some(-bet.amount),
        BetOutcome::Push => Some(0.0),
        BetOutcome::Pending => None,
    }
}

/// P&L column text: "+$90.91", "-$50.00", "$0.00", or "-" when undetermined.
pub fn pnl_label(bet: &Bet) -> String {
    match bet_profit(bet) {
        Some(profit) => fmt_signed_money(profit),
        None => "-".to_string(),
    }
}

/// Fold every bet into a portfolio summary.
pub fn compute_performance(bets: &[Bet]) -> BettingPerformance {
    let mut perf = BettingPerformance::default();
    let mut wins = 0u32;

    for bet in bets {
        perf.total_bets += 1;
        perf.total_wagered += bet.amount;

        match bet.result {
            BetOutcome::Pending => perf.pending_bets += 1,
            BetOutcome::Win => {
                wins += 1;
                perf.total_winnings += bet_profit(bet).unwrap_or(0.0);
            }
            BetOutcome::Lose => perf.total_losses += bet.amount,
            BetOutcome::Push => {}
        }
    }

    perf.net_profit = perf.total_winnings - perf.total_losses;
    perf.roi = percentage(perf.net_profit, perf.total_wagered);
    perf.win_rate = percentage(f64::from(wins), f64::from(perf.settled_bets()));
    perf
}

/// A bet-history row joined with its match.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerEntry {
    pub bet_id: BetId,
    pub match_id: MatchId,
    pub date: Option<NaiveDate>,
    pub match_name: String,
    pub name: String,
    pub odds: String,
    pub wager: String,
    pub result: BetOutcome,
    pub profit: Option<f64>,
    pub pnl: String,
}

/// An immutable collection of bets with ledger queries on top.
#[derive(Debug, Clone, Default)]
pub struct BetLedger {
    bets: Vec<Bet>,
}

impl BetLedger {
    pub fn new(bets: Vec<Bet>) -> Self {
        Self { bets }
    }

    pub fn bets(&self) -> &[Bet] {
        &self.bets
    }

    pub fn is_empty(&self) -> bool {
        self.bets.is_empty()
    }

    /// Ledger restricted to the bets on one match.
    pub fn for_match(&self, match_id: MatchId) -> Self {
        Self::new(
            self.bets
                .iter()
                .filter(|b| b.match_id == match_id)
                .cloned()
                .collect(),
        )
    }

    pub fn performance(&self) -> BettingPerformance {
        compute_performance(&self.bets)
    }

    /// Profit of the bet with `id`, `None` if unknown or undetermined.
    pub fn profit(&self, id: BetId) -> Option<f64> {
        self.bets.iter().find(|b| b.id == id).and_then(bet_profit)
    }

    /// History rows, newest match first. Bets on matches missing from
    /// `matches` are kept at the end.
    pub fn entries(&self, matches: &[Match]) -> Vec<LedgerEntry> {
        let by_id: HashMap<MatchId, &Match> = matches.iter().map(|m| (m.id, m)).collect();

        let mut entries: Vec<LedgerEntry> = self
            .bets
            .iter()
            .map(|bet| {
                let fixture = by_id.get(&bet.match_id);
                LedgerEntry {
                    bet_id: bet.id,
                    match_id: bet.match_id,
                    date: fixture.map(|m| m.date),
                    match_name: fixture
                        .map(|m| m.title())
                        .unwrap_or_else(|| "Unknown match".to_string()),
                    name: bet.name.clone(),
                    odds: fmt_odds(bet.odds),
                    wager: fmt_money(bet.amount),
                    result: bet.result,
                    profit: bet_profit(bet),
                    pnl: pnl_label(bet),
                }
            })
            .collect();

        // Option orders None first, so reversing puts dated rows first
        entries.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.bet_id.cmp(&b.bet_id)));
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Team;

    fn bet(id: BetId, match_id: MatchId, amount: f64, odds: i32, result: BetOutcome) -> Bet {
        Bet {
            id,
            match_id,
            name: format!("bet {}", id),
            line: 0.0,
            amount,
            odds,
            result,
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_payout_underdog() {
        assert_eq!(payout(100.0, 150), Some(250.0));
        assert_eq!(payout(10.0, 100), Some(20.0));
    }

    #[test]
    fn test_payout_favorite() {
        let won = payout(100.0, -150).unwrap();
        assert!(approx(won, 100.0 + 100.0 / 1.5));
        assert!((won - 166.666).abs() < 0.001);
    }

    #[test]
    fn test_payout_zero_odds() {
        assert_eq!(payout(100.0, 0), None);
    }

    #[test]
    fn test_payout_increases_with_stake() {
        for odds in [-300, -110, 120, 450] {
            let mut last = 0.0;
            for stake in [1.0, 5.0, 20.0, 100.0, 250.5] {
                let won = payout(stake, odds).unwrap();
                assert!(won > last, "odds {} stake {}", odds, stake);
                last = won;
            }
        }
    }

    #[test]
    fn test_profit_by_result() {
        let won = bet(1, 1, 100.0, -110, BetOutcome::Win);
        assert!((bet_profit(&won).unwrap() - 90.909).abs() < 0.001);

        let lost = bet(2, 1, 50.0, 200, BetOutcome::Lose);
        assert_eq!(bet_profit(&lost), Some(-50.0));

        let pushed = bet(3, 1, 75.0, -400, BetOutcome::Push);
        assert_eq!(bet_profit(&pushed), Some(0.0));

        let pending = bet(4, 1, 75.0, -400, BetOutcome::Pending);
        assert_eq!(bet_profit(&pending), None);

        let won_no_odds = bet(5, 1, 75.0, 0, BetOutcome::Win);
        assert_eq!(bet_profit(&won_no_odds), None);
    }

    #[test]
    fn test_pnl_labels() {
        assert_eq!(pnl_label(&bet(1, 1, 100.0, -110, BetOutcome::Win)), "+$90.91");
        assert_eq!(pnl_label(&bet(2, 1, 50.0, 120, BetOutcome::Lose)), "-$50.00");
        assert_eq!(pnl_label(&bet(3, 1, 50.0, 120, BetOutcome::Push)), "$0.00");
        assert_eq!(pnl_label(&bet(4, 1, 50.0, 120, BetOutcome::Pending)), "-");
    }

    #[test]
    fn test_performance_empty() {
        let perf = compute_performance(&[]);
        assert_eq!(perf, BettingPerformance::default());
        assert_eq!(perf.roi, 0.0);
        assert_eq!(perf.win_rate, 0.0);
    }

    #[test]
    fn test_performance_mixed() {
        let bets = vec![
            bet(1, 1, 100.0, 150, BetOutcome::Win),   // +150
            bet(2, 1, 50.0, -110, BetOutcome::Lose),  // -50
            bet(3, 2, 40.0, -200, BetOutcome::Push),  // 0
            bet(4, 2, 10.0, 300, BetOutcome::Pending), // at risk
        ];

        let perf = compute_performance(&bets);
        assert_eq!(perf.total_bets, 4);
        assert_eq!(perf.pending_bets, 1);
        assert_eq!(perf.settled_bets(), 3);
        assert_eq!(perf.total_wagered, 200.0);
        assert_eq!(perf.total_winnings, 150.0);
        assert_eq!(perf.total_losses, 50.0);
        assert_eq!(perf.net_profit, 100.0);
        assert_eq!(perf.roi, 50.0);
        // 1 win over 3 settled; the push counts as settled
        assert!((perf.win_rate - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_performance_only_pending() {
        let bets = vec![
            bet(1, 1, 25.0, 110, BetOutcome::Pending),
            bet(2, 1, 25.0, -110, BetOutcome::Pending),
        ];
        let perf = compute_performance(&bets);
        assert_eq!(perf.total_wagered, 50.0);
        assert_eq!(perf.win_rate, 0.0);
        assert_eq!(perf.roi, 0.0);
        assert_eq!(perf.net_profit, 0.0);
    }

    #[test]
    fn test_performance_win_without_odds_adds_nothing() {
        let bets = vec![bet(1, 1, 25.0, 0, BetOutcome::Win)];
        let perf = compute_performance(&bets);
        assert_eq!(perf.total_winnings, 0.0);
        assert_eq!(perf.win_rate, 100.0);
    }

    #[test]
    fn test_performance_order_independent() {
        let mut bets = vec![
            bet(1, 1, 100.0, 150, BetOutcome::Win),
            bet(2, 1, 50.0, -110, BetOutcome::Lose),
            bet(3, 2, 40.0, -200, BetOutcome::Push),
        ];
        let forward = compute_performance(&bets);
        bets.reverse();
        let backward = compute_performance(&bets);
        assert_eq!(forward, backward);
        assert_eq!(forward, compute_performance(&bets));
    }

    #[test]
    fn test_ledger_for_match_and_profit() {
        let ledger = BetLedger::new(vec![
            bet(1, 10, 100.0, 150, BetOutcome::Win),
            bet(2, 11, 50.0, -110, BetOutcome::Lose),
            bet(3, 10, 20.0, -110, BetOutcome::Pending),
        ]);

        let match_ledger = ledger.for_match(10);
        assert_eq!(match_ledger.bets().len(), 2);
        assert_eq!(match_ledger.performance().total_wagered, 120.0);
        assert!(ledger.for_match(99).is_empty());

        assert_eq!(ledger.profit(1), Some(150.0));
        assert_eq!(ledger.profit(3), None);
        assert_eq!(ledger.profit(42), None);
    }

    #[test]
    fn test_ledger_entries_join_and_order() {
        let home = Team::new(1, "LA Galaxy");
        let away = Team::new(2, "LAFC");
        let older = Match::scheduled(
            10,
            NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
            253,
            &home,
            &away,
        )
        .with_final_score(1, 0);
        let newer = Match::scheduled(
            11,
            NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
            253,
            &away,
            &home,
        );

        let ledger = BetLedger::new(vec![
            bet(1, 10, 100.0, -110, BetOutcome::Win),
            bet(2, 99, 5.0, 0, BetOutcome::Pending),
            bet(3, 11, 20.0, 250, BetOutcome::Pending),
        ]);

        let entries = ledger.entries(&[older, newer]);
        assert_eq!(entries.len(), 3);

        assert_eq!(entries[0].bet_id, 3);
        assert_eq!(entries[0].match_name, "LAFC vs LA Galaxy");
        assert_eq!(entries[0].odds, "+250");
        assert_eq!(entries[0].pnl, "-");

        assert_eq!(entries[1].bet_id, 1);
        assert_eq!(entries[1].wager, "$100.00");
        assert_eq!(entries[1].pnl, "+$90.91");

        assert_eq!(entries[2].bet_id, 2);
        assert_eq!(entries[2].date, None);
        assert_eq!(entries[2].match_name, "Unknown match");
        assert_eq!(entries[2].odds, "-");
    }
}
