use serde::{Deserialize, Serialize};

/// Which bell notifications the user wants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPreferences {
    pub bell_round_bets: bool,
    pub bell_match_status_all_teams: bool,
    pub bell_match_status_favorite_team: bool,
    pub bell_ranking: bool,
}

impl NotificationPreferences {
    /// Everything on; used whenever preferences cannot be loaded
    pub const ALL_ENABLED: Self = Self {
        bell_round_bets: true,
        bell_match_status_all_teams: true,
        bell_match_status_favorite_team: true,
        bell_ranking: true,
    };
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self::ALL_ENABLED
    }
}

/// Preferences as returned by the API; any missing flag means enabled
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PreferencesResponse {
    pub bell_round_bets: Option<bool>,
    pub bell_match_status_all_teams: Option<bool>,
    pub bell_match_status_favorite_team: Option<bool>,
    pub bell_ranking: Option<bool>,
}

impl From<PreferencesResponse> for NotificationPreferences {
    fn from(response: PreferencesResponse) -> Self {
        Self {
            bell_round_bets: response.bell_round_bets.unwrap_or(true),
            bell_match_status_all_teams: response.bell_match_status_all_teams.unwrap_or(true),
            bell_match_status_favorite_team: response
                .bell_match_status_favorite_team
                .unwrap_or(true),
            bell_ranking: response.bell_ranking.unwrap_or(true),
        }
    }
}

impl From<NotificationPreferences> for PreferencesResponse {
    fn from(prefs: NotificationPreferences) -> Self {
        Self {
            bell_round_bets: Some(prefs.bell_round_bets),
            bell_match_status_all_teams: Some(prefs.bell_match_status_all_teams),
            bell_match_status_favorite_team: Some(prefs.bell_match_status_favorite_team),
            bell_ranking: Some(prefs.bell_ranking),
        }
    }
}
