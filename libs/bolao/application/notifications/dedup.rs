use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;

/// Time-windowed set of recently seen keys
///
/// A key is a duplicate while it was first inserted less than `window`
/// ago. Expired entries are pruned lazily on insert, no timers involved.
#[derive(Debug)]
pub struct DedupCache {
    window: Duration,
    seen: HashMap<String, Instant>,
}

impl DedupCache {
    pub const DEFAULT_WINDOW: Duration = Duration::from_secs(5 * 60);

    pub fn new(window: Duration) -> Self {
        Self {
            window,
            seen: HashMap::new(),
        }
    }

    /// Record `key`; returns `false` if it is still inside the window
    pub fn check_and_insert(&mut self, key: impl Into<String>) -> bool {
        let now = Instant::now();
        self.prune(now);

        let key = key.into();
        if self.seen.contains_key(&key) {
            return false;
        }
        self.seen.insert(key, now);
        true
    }

    pub fn contains(&self, key: &str) -> bool {
        self.seen
            .get(key)
            .is_some_and(|inserted| inserted.elapsed() < self.window)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    fn prune(&mut self, now: Instant) {
        let window = self.window;
        self.seen
            .retain(|_, inserted| now.saturating_duration_since(*inserted) < window);
    }
}

impl Default for DedupCache {
    fn default() -> Self {
        Self::new(Self::DEFAULT_WINDOW)
    }
}
