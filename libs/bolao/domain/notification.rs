use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Category of a bell notification, serialised as its `type` string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    RoundBetsOpen,
    RoundBetsClosed,
    MatchStarted,
    MatchFinished,
    RankingWinner,
    RankingTopN,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationKind::RoundBetsOpen => "round_bets_open",
            NotificationKind::RoundBetsClosed => "round_bets_closed",
            NotificationKind::MatchStarted => "match_started",
            NotificationKind::MatchFinished => "match_finished",
            NotificationKind::RankingWinner => "ranking_winner",
            NotificationKind::RankingTopN => "ranking_top_n",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user-facing bell notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    /// Event fields the UI needs to link the notification (round, match, ticket)
    pub data: Value,
}
