//! Application Layer
//!
//! Orchestrates domain types into behaviour. Depends on the domain layer
//! and on the event-source trait from hyperstream, not on concrete clients.

pub mod notifications;

pub use notifications::{NotificationRouter, RouterConfig};
