use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// The signed-in user, as far as notification routing cares
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub id: String,
    #[serde(default)]
    pub favorite_team: Option<String>,
}

impl CurrentUser {
    pub fn new(id: impl Into<String>, favorite_team: Option<String>) -> Self {
        Self {
            id: id.into(),
            favorite_team,
        }
    }

    /// Whether the favorite team is one of the two sides (case-insensitive)
    pub fn favorite_team_plays(&self, home_team: &str, away_team: &str) -> bool {
        let favorite = match self.favorite_team.as_deref().map(str::trim) {
            Some(team) if !team.is_empty() => team.to_lowercase(),
            _ => return false,
        };

        [home_team, away_team]
            .iter()
            .any(|team| team.trim().to_lowercase() == favorite)
    }
}

/// Synchronous access to the current user (or `None` when signed out)
pub trait CurrentUserProvider: Send + Sync {
    fn current_user(&self) -> Option<CurrentUser>;
}

impl CurrentUserProvider for Option<CurrentUser> {
    fn current_user(&self) -> Option<CurrentUser> {
        self.clone()
    }
}

impl CurrentUserProvider for CurrentUser {
    fn current_user(&self) -> Option<CurrentUser> {
        Some(self.clone())
    }
}

/// Shared, updatable user slot (sign-in, sign-out, favorite team change)
#[derive(Debug, Clone, Default)]
pub struct SharedUser {
    inner: Arc<RwLock<Option<CurrentUser>>>,
}

impl SharedUser {
    pub fn new(user: Option<CurrentUser>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(user)),
        }
    }

    pub fn set(&self, user: CurrentUser) {
        *self.inner.write() = Some(user);
    }

    pub fn clear(&self) {
        *self.inner.write() = None;
    }
}

impl CurrentUserProvider for SharedUser {
    fn current_user(&self) -> Option<CurrentUser> {
        self.inner.read().clone()
    }
}
