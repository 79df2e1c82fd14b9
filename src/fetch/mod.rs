//! Fixture fetching from API-Football.
//!
//! Fixtures for a league and day come from the v3 `/fixtures` endpoint and
//! are mapped straight into [`Match`] records for the store.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::FixturesConfig;
use crate::models::{LeagueId, Match, MatchStatus};

/// Errors that can occur during fetching.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("API error: {0}")]
    Api(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("API key env var {0} not set")]
    MissingApiKey(String),
}

/// Anything that can list the fixtures of a league on a given day.
#[async_trait]
pub trait FixtureSource: Send + Sync {
    /// Source name for logging.
    fn name(&self) -> &'static str;

    async fn fixtures(
        &self,
        league_id: LeagueId,
        season: i32,
        date: NaiveDate,
    ) -> Result<Vec<Match>, FetchError>;
}

/// API-Football v3 client.
pub struct ApiFootballClient {
    client: Client,
    base_url: String,
}

impl ApiFootballClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-rapidapi-key",
            HeaderValue::from_str(api_key)
                .map_err(|_| FetchError::Api("API key is not a valid header value".to_string()))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Build a client, reading the key from the env var named in config.
    pub fn from_config(config: &FixturesConfig) -> Result<Self, FetchError> {
        let api_key = std::env::var(&config.api_key_env)
            .map_err(|_| FetchError::MissingApiKey(config.api_key_env.clone()))?;
        Self::new(
            &config.base_url,
            &api_key,
            Duration::from_secs(config.timeout_seconds),
        )
    }

    pub fn fixtures_url(
        &self,
        league_id: LeagueId,
        season: i32,
        date: NaiveDate,
    ) -> Result<Url, FetchError> {
        let raw = format!("{}/fixtures", self.base_url);
        let mut url = Url::parse(&raw).map_err(|e| FetchError::InvalidUrl(format!("{raw}: {e}")))?;
        url.query_pairs_mut()
            .append_pair("season", &season.to_string())
            .append_pair("league", &league_id.to_string())
            .append_pair("date", &date.format("%Y-%m-%d").to_string());
        Ok(url)
    }
}

#[async_trait]
impl FixtureSource for ApiFootballClient {
    fn name(&self) -> &'static str {
        "api-football"
    }

    async fn fixtures(
        &self,
        league_id: LeagueId,
        season: i32,
        date: NaiveDate,
    ) -> Result<Vec<Match>, FetchError> {
        let url = self.fixtures_url(league_id, season, date)?;
        info!("Fetching fixtures for league {} on {}", league_id, date);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let body = response.text().await?;
        let matches = parse_fixtures(&body)?;
        debug!("Parsed {} fixtures for league {}", matches.len(), league_id);
        Ok(matches)
    }
}

// ── Response format ─────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct FixturesResponse {
    #[serde(default)]
    errors: ApiErrors,
    #[serde(default)]
    response: Vec<FixtureEntry>,
}

/// The API reports errors either as a list or as a field → message map.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ApiErrors {
    List(Vec<ApiErrorItem>),
    Map(BTreeMap<String, String>),
}

impl Default for ApiErrors {
    fn default() -> Self {
        ApiErrors::List(Vec::new())
    }
}

impl ApiErrors {
    fn message(&self) -> Option<String> {
        let parts: Vec<String> = match self {
            ApiErrors::List(items) => items
                .iter()
                .map(|e| format!("{}: {}", e.field, e.message))
                .collect(),
            ApiErrors::Map(map) => map.iter().map(|(k, v)| format!("{k}: {v}")).collect(),
        };
        if parts.is_empty() {
            None
        } else {
            Some(parts.join("; "))
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorItem {
    #[serde(default)]
    field: String,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct FixtureEntry {
    fixture: FixtureInfo,
    league: LeagueInfo,
    teams: Teams,
    goals: Goals,
}

#[derive(Debug, Deserialize)]
struct FixtureInfo {
    id: i64,
    date: String,
    status: StatusInfo,
}

#[derive(Debug, Deserialize)]
struct StatusInfo {
    short: String,
}

#[derive(Debug, Deserialize)]
struct LeagueInfo {
    id: LeagueId,
}

#[derive(Debug, Deserialize)]
struct Teams {
    home: TeamInfo,
    away: TeamInfo,
}

#[derive(Debug, Deserialize)]
struct TeamInfo {
    id: i64,
    name: String,
    #[serde(default)]
    winner: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct Goals {
    home: Option<u32>,
    away: Option<u32>,
}

/// Kick-off day from an RFC 3339 timestamp, or a bare `YYYY-MM-DD`.
fn parse_fixture_date(raw: &str) -> Option<NaiveDate> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.date_naive())
        .ok()
        .or_else(|| raw.get(..10).and_then(|d| d.parse().ok()))
}

impl FixtureEntry {
    fn into_match(self) -> Option<Match> {
        let Some(date) = parse_fixture_date(&self.fixture.date) else {
            warn!(
                "Skipping fixture {} with unreadable date {:?}",
                self.fixture.id, self.fixture.date
            );
            return None;
        };

        let winner_id = if self.teams.home.winner == Some(true) {
            Some(self.teams.home.id)
        } else if self.teams.away.winner == Some(true) {
            Some(self.teams.away.id)
        } else {
            None
        };

        Some(Match {
            id: self.fixture.id,
            date,
            league_id: self.league.id,
            status: MatchStatus::from(self.fixture.status.short),
            home_team_id: self.teams.home.id,
            away_team_id: self.teams.away.id,
            home_team_name: self.teams.home.name,
            away_team_name: self.teams.away.name,
            home_goals: self.goals.home.unwrap_or(0),
            away_goals: self.goals.away.unwrap_or(0),
            winner_id,
        })
    }
}

/// Parse a `/fixtures` response body. A non-empty `errors` field fails the
/// whole response.
pub fn parse_fixtures(body: &str) -> Result<Vec<Match>, FetchError> {
    let parsed: FixturesResponse = serde_json::from_str(body)?;

    if let Some(message) = parsed.errors.message() {
        return Err(FetchError::Api(message));
    }

    Ok(parsed
        .response
        .into_iter()
        .filter_map(FixtureEntry::into_match)
        .collect())
}
