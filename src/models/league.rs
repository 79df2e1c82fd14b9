//! League and team reference data.

use serde::{Deserialize, Serialize};

use super::{LeagueId, TeamId};

/// A competition fixtures are imported for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct League {
    pub id: LeagueId,
    pub name: String,
    /// Short code shown next to the name (e.g. "MLS")
    pub code: String,
}

impl League {
    pub fn new(id: LeagueId, name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            code: code.into(),
        }
    }
}

/// A club. Immutable reference data carried on every match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
}

impl Team {
    pub fn new(id: TeamId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}
