//! Bolão Live - Main Library
//!
//! Real-time match, round and ranking notifications for the bolão app.
//!
//! ## Architecture
//!
//! - **bin_common**: Common utilities for binary executables (CLI, runners)
//! - **bolao**: Domain, notification routing and infrastructure (re-exported from workspace)
//! - **hyperstream**: Server-Sent-Events client library (re-exported from workspace)
//!
//! ## Usage in Binaries
//!
//! ```rust,ignore
//! use bolao_live::bin_common::{load_config_from_env, ConfigType};
//! use bolao_live::bolao::LiveConfig;
//! ```

// Re-export workspace libraries for convenience
pub use bolao;
pub use hyperstream;

// Binary common utilities
pub mod bin_common {
    //! Common utilities for binary executables

    pub mod cli;
    pub mod runner;

    pub use cli::{load_config_from_env, ConfigType};
    pub use runner::{BinaryRunner, RunConfig};
}
