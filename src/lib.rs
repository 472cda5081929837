//! User Console - Terminal Front-End for a User-Management API
//!
//! A Rust application providing:
//! - Connectivity testing against a configurable API base URL
//! - User listing with a rendered card view
//! - User creation via a form
//! - A TUI dashboard and one-shot CLI commands over the same handlers

pub mod actions;
pub mod client;
pub mod config;
pub mod render;
pub mod stats;
pub mod status;
pub mod tui;

pub use actions::{Actions, UiEvent};
pub use client::{ApiError, NewUser, User, UserApi};
pub use config::{AppConfig, SharedConfig};
pub use stats::{create_shared_stats, Counters, SharedStats};

/// Application result type
pub type Result<T> = anyhow::Result<T>;
