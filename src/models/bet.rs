//! Wager model and bet-slip validation.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::{BetId, MatchId};

/// Errors raised while validating or settling a bet.
#[derive(Debug, Error, PartialEq)]
pub enum BetError {
    #[error("bet name is required")]
    NameRequired,

    #[error("bet amount is required")]
    AmountRequired,

    #[error("invalid amount value: {0}")]
    InvalidAmount(String),

    #[error("bet amount must be greater than 0, got {0}")]
    NonPositiveAmount(f64),

    #[error("invalid line value: {0}")]
    InvalidLine(String),

    #[error("invalid odds value: {0}")]
    InvalidOdds(String),

    #[error("invalid bet result: {0} (expected pending, win, lose or push)")]
    InvalidResult(String),

    #[error("bet {0} cannot be moved back to pending")]
    CannotReopen(BetId),
}

/// Settlement state of a bet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BetOutcome {
    #[default]
    Pending,
    Win,
    Lose,
    Push,
}

impl BetOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            BetOutcome::Pending => "pending",
            BetOutcome::Win => "win",
            BetOutcome::Lose => "lose",
            BetOutcome::Push => "push",
        }
    }

    pub fn is_settled(&self) -> bool {
        *self != BetOutcome::Pending
    }
}

impl fmt::Display for BetOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BetOutcome {
    type Err = BetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(BetOutcome::Pending),
            "win" | "w" => Ok(BetOutcome::Win),
            "lose" | "loss" | "l" => Ok(BetOutcome::Lose),
            "push" | "p" => Ok(BetOutcome::Push),
            _ => Err(BetError::InvalidResult(s.to_string())),
        }
    }
}

/// A recorded wager on a match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bet {
    pub id: BetId,
    pub match_id: MatchId,

    /// Free-text description (e.g. "Over 2.5 goals")
    pub name: String,

    /// Handicap or total line, 0 when not applicable
    #[serde(default)]
    pub line: f64,

    /// Stake, always > 0
    pub amount: f64,

    /// American odds, 0 when not recorded
    #[serde(default)]
    pub odds: i32,

    #[serde(default)]
    pub result: BetOutcome,
}

impl Bet {
    /// Materialize a validated slip as a pending bet.
    pub fn from_new(id: BetId, new_bet: NewBet) -> Self {
        Self {
            id,
            match_id: new_bet.match_id,
            name: new_bet.name,
            line: new_bet.line,
            amount: new_bet.amount,
            odds: new_bet.odds,
            result: BetOutcome::Pending,
        }
    }

    pub fn has_odds(&self) -> bool {
        self.odds != 0
    }

    /// Record the result of a bet. Re-applying a settled value is allowed;
    /// going back to pending is not.
    pub fn settle(&mut self, outcome: BetOutcome) -> Result<(), BetError> {
        if outcome == BetOutcome::Pending {
            return Err(BetError::CannotReopen(self.id));
        }
        self.result = outcome;
        Ok(())
    }

    /// One-line summary: name, line, stake, odds and result.
    pub fn summary(&self) -> String {
        let mut line = self.name.clone();
        if self.line != 0.0 {
            line.push_str(&format!(" (Line: {:.1})", self.line));
        }
        line.push_str(&format!(" (${:.2})", self.amount));
        if self.has_odds() {
            line.push_str(&format!(" (Odds: {:+})", self.odds));
        }
        line.push_str(&format!(" [{}]", self.result));
        line
    }
}

/// Raw bet slip as typed by the user. Every field is text until validated.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BetDraft {
    #[serde(default, deserialize_with = "text_field")]
    pub name: String,
    #[serde(default, deserialize_with = "text_field")]
    pub line: String,
    #[serde(default, deserialize_with = "text_field")]
    pub amount: String,
    #[serde(default, deserialize_with = "text_field")]
    pub odds: String,
}

/// A validated slip, ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBet {
    pub match_id: MatchId,
    pub name: String,
    pub line: f64,
    pub amount: f64,
    pub odds: i32,
}

impl BetDraft {
    pub fn new(
        name: impl Into<String>,
        line: impl Into<String>,
        amount: impl Into<String>,
        odds: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            line: line.into(),
            amount: amount.into(),
            odds: odds.into(),
        }
    }

    /// True once any field has been typed into.
    pub fn is_dirty(&self) -> bool {
        !(self.name.is_empty()
            && self.line.is_empty()
            && self.amount.is_empty()
            && self.odds.is_empty())
    }

    /// Validate the slip for `match_id`. Fails on the first bad field.
    pub fn validate(&self, match_id: MatchId) -> Result<NewBet, BetError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(BetError::NameRequired);
        }

        let amount_str = self.amount.trim();
        if amount_str.is_empty() {
            return Err(BetError::AmountRequired);
        }

        let line = match self.line.trim() {
            "" => 0.0,
            s => s
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| BetError::InvalidLine(s.to_string()))?,
        };

        let amount: f64 = amount_str
            .parse()
            .map_err(|_| BetError::InvalidAmount(amount_str.to_string()))?;
        if !amount.is_finite() {
            return Err(BetError::InvalidAmount(amount_str.to_string()));
        }
        if amount <= 0.0 {
            return Err(BetError::NonPositiveAmount(amount));
        }

        let odds = match self.odds.trim() {
            "" => 0,
            s => s
                .parse::<i32>()
                .map_err(|_| BetError::InvalidOdds(s.to_string()))?,
        };

        Ok(NewBet {
            match_id,
            name: name.to_string(),
            line,
            amount,
            odds,
        })
    }
}

/// Accept either a JSON string or a JSON number for slip fields.
fn text_field<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {}",
            other
        ))),
    }
}
