//! Live stream event types
//!
//! Every frame on `/matches/events` carries a JSON envelope:
//!
//! ```json
//! { "type": "match_status_update", "data": { ... }, "timestamp": "2024-05-01T19:00:00.000Z" }
//! ```
//!
//! `decode_event` validates the envelope and the per-kind payload and
//! produces a typed [`StreamEvent`]. Kinds this build does not know about
//! come back as `Decoded::Ignored` so the server can add new ones freely.

use chrono::{DateTime, Utc};
use hyperstream::Decoded;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use thiserror::Error;
use tracing::debug;

// =============================================================================
// Identifiers
// =============================================================================

/// Backend identifier; the API sends these either as numbers or strings
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Number(serde_json::Number),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Number(n) => EntityId(n.to_string()),
            RawId::Text(s) => EntityId(s),
        })
    }
}

impl Serialize for EntityId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

/// Which side scored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalSide {
    Home,
    Away,
}

// =============================================================================
// Event kinds
// =============================================================================

/// Discriminator carried in the envelope's `type` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    ScoreUpdate,
    RoundFinished,
    RoundUnfinished,
    RoundStatusUpdate,
    MatchStatusUpdate,
    RoundBetsStatus,
    RankingWinner,
    RankingTopN,
}

impl EventKind {
    pub const ALL: [EventKind; 8] = [
        EventKind::ScoreUpdate,
        EventKind::RoundFinished,
        EventKind::RoundUnfinished,
        EventKind::RoundStatusUpdate,
        EventKind::MatchStatusUpdate,
        EventKind::RoundBetsStatus,
        EventKind::RankingWinner,
        EventKind::RankingTopN,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::ScoreUpdate => "score_update",
            EventKind::RoundFinished => "round_finished",
            EventKind::RoundUnfinished => "round_unfinished",
            EventKind::RoundStatusUpdate => "round_status_update",
            EventKind::MatchStatusUpdate => "match_status_update",
            EventKind::RoundBetsStatus => "round_bets_status",
            EventKind::RankingWinner => "ranking_winner",
            EventKind::RankingTopN => "ranking_top_n",
        }
    }

    /// Parse a wire name; `None` for kinds this build does not know
    pub fn from_wire(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Payloads
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreUpdate {
    pub match_id: EntityId,
    pub home_score: u32,
    pub away_score: u32,
    pub home_team: String,
    pub away_team: String,
    #[serde(default)]
    pub home_team_logo: Option<String>,
    #[serde(default)]
    pub away_team_logo: Option<String>,
    pub round: u32,
    pub status: String,
    pub score_changed: bool,
    #[serde(default)]
    pub goal_scorer: Option<GoalSide>,
    #[serde(default)]
    pub is_goal_cancelled: Option<bool>,
    pub previous_home_score: u32,
    pub previous_away_score: u32,
}

/// Payload of `round_finished` / `round_unfinished`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRef {
    pub round: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundStatusUpdate {
    pub round: u32,
    pub is_finished: bool,
    pub has_live_matches: bool,
    pub has_scheduled_matches: bool,
    pub all_matches_scheduled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchStatusUpdate {
    pub match_id: EntityId,
    pub status: String,
    pub home_team: String,
    pub away_team: String,
    pub round: u32,
    #[serde(default)]
    pub home_score: Option<u32>,
    #[serde(default)]
    pub away_score: Option<u32>,
}

impl MatchStatusUpdate {
    /// Key used to suppress repeated notifications for the same transition
    pub fn dedup_key(&self) -> String {
        format!("{}-{}", self.match_id, self.status)
    }

    pub fn is_live(&self) -> bool {
        self.status == "live"
    }

    pub fn is_finished(&self) -> bool {
        self.status.eq_ignore_ascii_case("finished")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundBetsStatus {
    pub round: u32,
    pub allows_new_bets: bool,
    /// Automatic block (30 minutes before kickoff) as opposed to a manual close
    pub is_blocked: bool,
}

/// Payload of `ranking_winner`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingPlacement {
    pub round: u32,
    pub ticket_id: EntityId,
    pub position: u32,
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingTopN {
    pub round: u32,
    pub ticket_id: EntityId,
    pub position: u32,
    pub points: u32,
    pub top_n: u32,
}

/// Typed payload, one variant per [`EventKind`]
#[derive(Debug, Clone, PartialEq)]
pub enum EventPayload {
    ScoreUpdate(ScoreUpdate),
    RoundFinished(RoundRef),
    RoundUnfinished(RoundRef),
    RoundStatusUpdate(RoundStatusUpdate),
    MatchStatusUpdate(MatchStatusUpdate),
    RoundBetsStatus(RoundBetsStatus),
    RankingWinner(RankingPlacement),
    RankingTopN(RankingTopN),
}

impl EventPayload {
    pub fn kind(&self) -> EventKind {
        match self {
            EventPayload::ScoreUpdate(_) => EventKind::ScoreUpdate,
            EventPayload::RoundFinished(_) => EventKind::RoundFinished,
            EventPayload::RoundUnfinished(_) => EventKind::RoundUnfinished,
            EventPayload::RoundStatusUpdate(_) => EventKind::RoundStatusUpdate,
            EventPayload::MatchStatusUpdate(_) => EventKind::MatchStatusUpdate,
            EventPayload::RoundBetsStatus(_) => EventKind::RoundBetsStatus,
            EventPayload::RankingWinner(_) => EventKind::RankingWinner,
            EventPayload::RankingTopN(_) => EventKind::RankingTopN,
        }
    }
}

/// A decoded server event
#[derive(Debug, Clone, PartialEq)]
pub struct StreamEvent {
    pub timestamp: DateTime<Utc>,
    pub payload: EventPayload,
}

impl StreamEvent {
    pub fn kind(&self) -> EventKind {
        self.payload.kind()
    }
}

// =============================================================================
// Decoding
// =============================================================================

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("invalid JSON: {0}")]
    Json(#[source] serde_json::Error),

    #[error("expected a JSON object envelope")]
    NotAnObject,

    #[error("envelope has no event type")]
    MissingType,

    #[error("'{0}' event has no data")]
    MissingData(EventKind),

    #[error("invalid '{kind}' payload: {source}")]
    Payload {
        kind: EventKind,
        #[source]
        source: serde_json::Error,
    },
}

/// Decode one frame's `data` into a [`StreamEvent`]
///
/// The kind is read from the JSON `type` field. `event_name` (the SSE
/// `event:` line) is only consulted when the JSON has no `type`, so named
/// and default frames decode the same way.
pub fn decode_event(event_name: &str, data: &str) -> Result<Decoded<StreamEvent>, DecodeError> {
    let envelope: Value = serde_json::from_str(data).map_err(DecodeError::Json)?;
    let mut envelope = match envelope {
        Value::Object(map) => map,
        _ => return Err(DecodeError::NotAnObject),
    };

    let wire_kind = match envelope.get("type").and_then(Value::as_str) {
        Some(kind) => kind.to_string(),
        None if !event_name.is_empty() && event_name != "message" => event_name.to_string(),
        None => return Err(DecodeError::MissingType),
    };

    let kind = match EventKind::from_wire(&wire_kind) {
        Some(kind) => kind,
        None => return Ok(Decoded::Ignored(wire_kind)),
    };

    let timestamp = parse_timestamp(envelope.get("timestamp"));

    let data = match envelope.remove("data") {
        Some(Value::Null) | None => return Err(DecodeError::MissingData(kind)),
        Some(data) => data,
    };

    let payload = match kind {
        EventKind::ScoreUpdate => EventPayload::ScoreUpdate(payload(kind, data)?),
        EventKind::RoundFinished => EventPayload::RoundFinished(payload(kind, data)?),
        EventKind::RoundUnfinished => EventPayload::RoundUnfinished(payload(kind, data)?),
        EventKind::RoundStatusUpdate => EventPayload::RoundStatusUpdate(payload(kind, data)?),
        EventKind::MatchStatusUpdate => EventPayload::MatchStatusUpdate(payload(kind, data)?),
        EventKind::RoundBetsStatus => EventPayload::RoundBetsStatus(payload(kind, data)?),
        EventKind::RankingWinner => EventPayload::RankingWinner(payload(kind, data)?),
        EventKind::RankingTopN => EventPayload::RankingTopN(payload(kind, data)?),
    };

    Ok(Decoded::Event(StreamEvent { timestamp, payload }))
}

fn payload<T: DeserializeOwned>(kind: EventKind, data: Value) -> Result<T, DecodeError> {
    serde_json::from_value(data).map_err(|source| DecodeError::Payload { kind, source })
}

/// Envelope timestamp, or the receive time when absent or unparseable
fn parse_timestamp(raw: Option<&Value>) -> DateTime<Utc> {
    match raw.and_then(Value::as_str) {
        Some(text) => match DateTime::parse_from_rfc3339(text) {
            Ok(ts) => ts.with_timezone(&Utc),
            Err(e) => {
                debug!("[Live Events] Unparseable timestamp '{}' ({}), using receive time", text, e);
                Utc::now()
            }
        },
        None => Utc::now(),
    }
}
