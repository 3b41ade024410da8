//! Common test utilities for bolao integration tests
//!
//! - `FakeSource`: in-memory `EventSource` that pushes events to the latest handler
//! - event constructors for each routed kind
//! - loaders that fail or resolve late

#![allow(dead_code)]

use async_trait::async_trait;
use bolao::domain::*;
use bolao::PreferencesLoader;
use chrono::Utc;
use hyperstream::{EventHandler, EventSource};
use parking_lot::RwLock;
use std::time::Duration;

/// Macro for verbose test output (controlled by TEST_VERBOSE env var)
#[macro_export]
macro_rules! verbose_println {
    ($($arg:tt)*) => {
        if std::env::var("TEST_VERBOSE").is_ok() {
            println!($($arg)*);
        }
    };
}

#[derive(Default)]
pub struct FakeSource {
    handler: RwLock<Option<EventHandler<StreamEvent>>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver `payload` to the registered handler, if any
    pub fn emit(&self, payload: EventPayload) {
        let handler = self.handler.read().clone();
        if let Some(handler) = handler {
            handler(&StreamEvent {
                timestamp: Utc::now(),
                payload,
            });
        }
    }

    pub fn has_handler(&self) -> bool {
        self.handler.read().is_some()
    }
}

impl EventSource<StreamEvent> for FakeSource {
    fn on_event(&self, handler: EventHandler<StreamEvent>) {
        *self.handler.write() = Some(handler);
    }
}

// =============================================================================
// Events
// =============================================================================

pub fn match_status(match_id: u64, status: &str, home: &str, away: &str) -> EventPayload {
    EventPayload::MatchStatusUpdate(MatchStatusUpdate {
        match_id: EntityId::from(match_id),
        status: status.to_string(),
        home_team: home.to_string(),
        away_team: away.to_string(),
        round: 7,
        home_score: None,
        away_score: None,
    })
}

pub fn round_bets(round: u32, allows_new_bets: bool, is_blocked: bool) -> EventPayload {
    EventPayload::RoundBetsStatus(RoundBetsStatus {
        round,
        allows_new_bets,
        is_blocked,
    })
}

pub fn ranking_winner(round: u32) -> EventPayload {
    EventPayload::RankingWinner(RankingPlacement {
        round,
        ticket_id: EntityId::from(100 + round as u64),
        position: 1,
        points: 48,
    })
}

pub fn ranking_top_n(round: u32, top_n: u32) -> EventPayload {
    EventPayload::RankingTopN(RankingTopN {
        round,
        ticket_id: EntityId::from("t-9"),
        position: 3,
        points: 40,
        top_n,
    })
}

pub fn score_update() -> EventPayload {
    EventPayload::ScoreUpdate(ScoreUpdate {
        match_id: EntityId::from(42),
        home_score: 1,
        away_score: 0,
        home_team: "Flamengo".into(),
        away_team: "Palmeiras".into(),
        home_team_logo: None,
        away_team_logo: None,
        round: 7,
        status: "live".into(),
        score_changed: true,
        goal_scorer: Some(GoalSide::Home),
        is_goal_cancelled: None,
        previous_home_score: 0,
        previous_away_score: 0,
    })
}

// =============================================================================
// Loaders
// =============================================================================

pub struct FailingLoader;

#[async_trait]
impl PreferencesLoader for FailingLoader {
    async fn load(&self) -> anyhow::Result<PreferencesResponse> {
        anyhow::bail!("preferences service unavailable")
    }
}

/// Resolves with `response` after `delay`
pub struct SlowLoader {
    pub delay: Duration,
    pub response: PreferencesResponse,
}

#[async_trait]
impl PreferencesLoader for SlowLoader {
    async fn load(&self) -> anyhow::Result<PreferencesResponse> {
        tokio::time::sleep(self.delay).await;
        Ok(self.response.clone())
    }
}

/// Let the preferences load task run
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}
