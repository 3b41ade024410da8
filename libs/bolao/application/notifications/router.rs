use super::dedup::DedupCache;
use super::messages;
use super::sink::NotificationSink;
use crate::domain::{
    CurrentUserProvider, EventPayload, MatchStatusUpdate, Notification, NotificationPreferences,
    PreferencesResponse, StreamEvent,
};
use async_trait::async_trait;
use hyperstream::{event_handler, EventSource};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, OnceLock, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

/// Loads the user's notification preferences
#[async_trait]
pub trait PreferencesLoader: Send + Sync + 'static {
    async fn load(&self) -> anyhow::Result<PreferencesResponse>;
}

/// Loader returning fixed preferences
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticPreferences(pub NotificationPreferences);

#[async_trait]
impl PreferencesLoader for StaticPreferences {
    async fn load(&self) -> anyhow::Result<PreferencesResponse> {
        Ok(self.0.into())
    }
}

#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// How long a `match_status_update` key suppresses repeats
    pub dedup_window: Duration,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            dedup_window: DedupCache::DEFAULT_WINDOW,
        }
    }
}

/// `PreferencesPending` until the loader resolves, then `PreferencesReady` for good
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouterState {
    PreferencesPending,
    PreferencesReady,
}

/// Router counters snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouterStats {
    pub notifications_emitted: u64,
    /// Dropped because preferences were still loading
    pub dropped_pending: u64,
    pub duplicates_suppressed: u64,
    /// Dropped by a preference gate
    pub suppressed_by_preferences: u64,
}

#[derive(Default)]
struct Counters {
    emitted: AtomicU64,
    dropped_pending: AtomicU64,
    duplicates: AtomicU64,
    gated: AtomicU64,
}

struct Shared {
    preferences: OnceLock<NotificationPreferences>,
    dedup: Mutex<DedupCache>,
    sink: Arc<dyn NotificationSink>,
    user: Arc<dyn CurrentUserProvider>,
    active: AtomicBool,
    counters: Counters,
}

/// Turns live events into bell notifications
///
/// Registers its handler on the event source at construction and routes
/// until dropped. Preferences are loaded once; events arriving before the
/// load resolves are dropped, not queued. A failed load falls back to
/// [`NotificationPreferences::ALL_ENABLED`].
pub struct NotificationRouter {
    shared: Arc<Shared>,
    load_task: Option<JoinHandle<()>>,
}

impl NotificationRouter {
    /// Subscribe to `source` and start loading preferences
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn<S, K, L>(
        source: &S,
        sink: K,
        loader: L,
        user: Arc<dyn CurrentUserProvider>,
        config: RouterConfig,
    ) -> Self
    where
        S: EventSource<StreamEvent> + ?Sized,
        K: NotificationSink + 'static,
        L: PreferencesLoader,
    {
        let shared = Arc::new(Shared {
            preferences: OnceLock::new(),
            dedup: Mutex::new(DedupCache::new(config.dedup_window)),
            sink: Arc::new(sink),
            user,
            active: AtomicBool::new(true),
            counters: Counters::default(),
        });

        // Weak so a dropped router leaves a no-op handler behind
        let weak: Weak<Shared> = Arc::downgrade(&shared);
        source.on_event(event_handler(move |event: &StreamEvent| {
            if let Some(shared) = weak.upgrade() {
                shared.route(event);
            }
        }));

        let loading = Arc::clone(&shared);
        let load_task = tokio::spawn(async move {
            let preferences = match loader.load().await {
                Ok(response) => {
                    let preferences = NotificationPreferences::from(response);
                    info!("[Notifications] Preferences loaded: {:?}", preferences);
                    preferences
                }
                Err(e) => {
                    warn!(
                        "[Notifications] Failed to load preferences ({:#}), enabling all",
                        e
                    );
                    NotificationPreferences::ALL_ENABLED
                }
            };
            let _ = loading.preferences.set(preferences);
        });

        Self {
            shared,
            load_task: Some(load_task),
        }
    }

    pub fn state(&self) -> RouterState {
        if self.shared.preferences.get().is_some() {
            RouterState::PreferencesReady
        } else {
            RouterState::PreferencesPending
        }
    }

    /// Preferences in effect, once loaded
    pub fn preferences(&self) -> Option<NotificationPreferences> {
        self.shared.preferences.get().copied()
    }

    pub fn stats(&self) -> RouterStats {
        let counters = &self.shared.counters;
        RouterStats {
            notifications_emitted: counters.emitted.load(Ordering::Relaxed),
            dropped_pending: counters.dropped_pending.load(Ordering::Relaxed),
            duplicates_suppressed: counters.duplicates.load(Ordering::Relaxed),
            suppressed_by_preferences: counters.gated.load(Ordering::Relaxed),
        }
    }
}

impl Drop for NotificationRouter {
    fn drop(&mut self) {
        self.shared.active.store(false, Ordering::Release);
        if let Some(task) = self.load_task.take() {
            task.abort();
        }
        debug!("[Notifications] Router stopped");
    }
}

impl Shared {
    fn route(&self, event: &StreamEvent) {
        if !self.active.load(Ordering::Acquire) {
            return;
        }

        let Some(prefs) = self.preferences.get() else {
            debug!(
                "[Notifications] Preferences not loaded yet, dropping '{}'",
                event.kind()
            );
            self.counters.dropped_pending.fetch_add(1, Ordering::Relaxed);
            return;
        };

        match &event.payload {
            EventPayload::ScoreUpdate(_) => {
                trace!("[Notifications] score_update never notifies");
            }
            EventPayload::RoundBetsStatus(status) => {
                if self.gate(prefs.bell_round_bets, event) {
                    self.emit(messages::round_bets(status));
                }
            }
            EventPayload::MatchStatusUpdate(update) => self.route_match_status(prefs, update),
            EventPayload::RankingWinner(placement) => {
                if self.gate(prefs.bell_ranking, event) {
                    self.emit(messages::ranking_winner(placement));
                }
            }
            EventPayload::RankingTopN(placement) => {
                if self.gate(prefs.bell_ranking, event) {
                    self.emit(messages::ranking_top_n(placement));
                }
            }
            // Delivered by push from the backend; nothing to show here
            EventPayload::RoundFinished(_)
            | EventPayload::RoundUnfinished(_)
            | EventPayload::RoundStatusUpdate(_) => {
                trace!("[Notifications] '{}' received, no notification", event.kind());
            }
        }
    }

    fn route_match_status(&self, prefs: &NotificationPreferences, update: &MatchStatusUpdate) {
        let key = update.dedup_key();
        if !self.dedup.lock().check_and_insert(key.clone()) {
            debug!("[Notifications] Duplicate match status '{}', skipping", key);
            self.counters.duplicates.fetch_add(1, Ordering::Relaxed);
            return;
        }

        let favorite_plays = self
            .user
            .current_user()
            .is_some_and(|user| user.favorite_team_plays(&update.home_team, &update.away_team));

        let wanted = prefs.bell_match_status_all_teams
            || (prefs.bell_match_status_favorite_team && favorite_plays);
        if !wanted {
            debug!(
                "[Notifications] Match status for {} x {} disabled by preferences",
                update.home_team, update.away_team
            );
            self.counters.gated.fetch_add(1, Ordering::Relaxed);
            return;
        }

        if update.is_live() {
            self.emit(messages::match_started(update));
        } else if update.is_finished() {
            self.emit(messages::match_finished(update));
        } else {
            trace!("[Notifications] Match status '{}' not notified", update.status);
        }
    }

    fn gate(&self, enabled: bool, event: &StreamEvent) -> bool {
        if !enabled {
            debug!("[Notifications] '{}' disabled by preferences", event.kind());
            self.counters.gated.fetch_add(1, Ordering::Relaxed);
        }
        enabled
    }

    fn emit(&self, notification: Notification) {
        info!(
            "[Notifications] {} | {} | {}",
            notification.kind, notification.title, notification.body
        );
        self.counters.emitted.fetch_add(1, Ordering::Relaxed);
        self.sink.add_notification(notification);
    }
}
