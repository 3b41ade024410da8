//! Domain Layer
//!
//! Plain data types for the live event stream and the notifications it
//! produces. No I/O lives here.

pub mod events;
pub mod notification;
pub mod preferences;
pub mod user;

pub use events::{
    decode_event, DecodeError, EntityId, EventKind, EventPayload, GoalSide, MatchStatusUpdate,
    RankingPlacement, RankingTopN, RoundBetsStatus, RoundRef, RoundStatusUpdate, ScoreUpdate,
    StreamEvent,
};
pub use notification::{Notification, NotificationKind};
pub use preferences::{NotificationPreferences, PreferencesResponse};
pub use user::{CurrentUser, CurrentUserProvider, SharedUser};
