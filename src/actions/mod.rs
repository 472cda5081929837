//! Command handlers for user actions
//!
//! One handler per user action, dispatched by whichever front-end is driving
//! (TUI keys or CLI subcommands). Handlers report back exclusively through
//! `UiEvent` values; each one writes only to its own display region.

use crate::client::{ApiError, NewUser, UserApi};
use crate::config::SharedConfig;
use crate::render::{render_users, UserListView};
use crate::stats::SharedStats;
use crate::status::StatusMessage;
use tokio::sync::mpsc;

/// Messages from handlers to the active front-end
#[derive(Debug, Clone)]
pub enum UiEvent {
    /// Update the connection-status region
    Connection(StatusMessage),
    /// Update the creation-result region
    Create(StatusMessage),
    /// A user was created; the form should be cleared
    UserCreated,
    /// List fetch started: show loading, clear the error indicator and the
    /// prior rendering
    UsersLoading,
    /// List fetch finished with a fresh rendering
    UsersLoaded(UserListView),
    /// List fetch failed; leave the list area empty
    UsersError,
    /// No base URL configured; show the list placeholder
    UsersUnconfigured,
    /// Connectivity lost
    Offline,
}

/// Handlers for the four user actions
#[derive(Clone)]
pub struct Actions {
    client: UserApi,
    config: SharedConfig,
    stats: SharedStats,
    events: mpsc::UnboundedSender<UiEvent>,
}

impl Actions {
    pub fn new(
        client: UserApi,
        config: SharedConfig,
        stats: SharedStats,
        events: mpsc::UnboundedSender<UiEvent>,
    ) -> Self {
        Self {
            client,
            config,
            stats,
            events,
        }
    }

    fn send(&self, event: UiEvent) {
        // A closed channel means the front-end is gone; nothing left to update
        let _ = self.events.send(event);
    }

    /// URL-change handler: update the session's base URL
    pub fn set_base_url(&self, url: &str) {
        self.config.set_api_url(url.to_string());
        tracing::debug!(url = %url, "API URL updated");
    }

    /// Probe the users endpoint and report the outcome to the
    /// connection-status region
    pub async fn test_connection(&self) {
        let base_url = self.config.api_url();

        if base_url.is_empty() {
            self.send(UiEvent::Connection(StatusMessage::error(
                "Please enter an API URL first",
            )));
            return;
        }

        self.send(UiEvent::Connection(StatusMessage::loading(
            "Testing connection...",
        )));

        match self.client.probe(&base_url).await {
            Ok(status) if (200..300).contains(&status) => {
                self.send(UiEvent::Connection(StatusMessage::success(
                    "✅ Connection successful! API is responding.",
                )));
            }
            Ok(status) => {
                self.send(UiEvent::Connection(StatusMessage::error(format!(
                    "❌ Connection failed with status: {status}"
                ))));
            }
            Err(e) => {
                tracing::error!(error = %e, "Connection test failed");
                self.send(UiEvent::Connection(StatusMessage::error(
                    "❌ Connection failed. Please check the URL and network connectivity.",
                )));
            }
        }
    }

    /// Submit a new user. Field validation runs before the URL check, and
    /// both run before any network call.
    pub async fn submit_user(&self, name: &str, email: &str) {
        let Some(input) = NewUser::parse(name, email) else {
            self.send(UiEvent::Create(StatusMessage::error(
                "Please fill in all required fields",
            )));
            return;
        };

        let base_url = self.config.api_url();
        if base_url.is_empty() {
            self.send(UiEvent::Create(StatusMessage::error(
                "Please configure the API URL first",
            )));
            return;
        }

        self.send(UiEvent::Create(StatusMessage::loading("Creating user...")));

        match self.client.create_user(&base_url, &input).await {
            Ok(_) => {
                self.send(UiEvent::Create(StatusMessage::success(format!(
                    "✅ User \"{}\" created successfully!",
                    input.name
                ))));
                self.send(UiEvent::UserCreated);
                self.stats.record_user_created();

                // Refresh the users list so the new record shows up
                self.refresh_users().await;
            }
            Err(ApiError::Status { message, .. }) => {
                let message = message.unwrap_or_else(|| "Failed to create user".to_string());
                self.send(UiEvent::Create(StatusMessage::error(format!(
                    "❌ Error: {message}"
                ))));
            }
            Err(e) => {
                tracing::error!(error = %e, "Error creating user");
                self.send(UiEvent::Create(StatusMessage::error(
                    "❌ Network error. Please check your connection and API URL.",
                )));
            }
        }
    }

    /// Fetch the full user list and emit a fresh rendering.
    /// Every path emits exactly one terminal event after `UsersLoading`, so
    /// the loading indicator always ends up cleared.
    pub async fn refresh_users(&self) {
        self.send(UiEvent::UsersLoading);

        let base_url = self.config.api_url();
        if base_url.is_empty() {
            self.send(UiEvent::UsersUnconfigured);
            return;
        }

        match self.client.list_users(&base_url).await {
            Ok(users) => {
                self.send(UiEvent::UsersLoaded(render_users(&users)));
                self.stats.record_refresh();
            }
            Err(e) => {
                tracing::error!(error = %e, "Error loading users");
                self.send(UiEvent::UsersError);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::stats::create_shared_stats;
    use crate::status::Severity;

    fn setup() -> (Actions, mpsc::UnboundedReceiver<UiEvent>, SharedStats) {
        let config = SharedConfig::new(AppConfig::default());
        let stats = create_shared_stats(100);
        let client = UserApi::new(stats.clone());
        let (tx, rx) = mpsc::unbounded_channel();
        (Actions::new(client, config, stats.clone(), tx), rx, stats)
    }

    #[tokio::test]
    async fn test_connection_requires_url() {
        let (actions, mut rx, _) = setup();

        actions.test_connection().await;

        let UiEvent::Connection(message) = rx.try_recv().unwrap() else {
            panic!("expected connection event");
        };
        assert_eq!(message.severity, Severity::Error);
        assert_eq!(message.text, "Please enter an API URL first");
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_submit_validates_fields_before_url() {
        // Both the fields and the URL are missing; the field message wins
        let (actions, mut rx, stats) = setup();

        actions.submit_user("  ", "").await;

        let UiEvent::Create(message) = rx.try_recv().unwrap() else {
            panic!("expected create event");
        };
        assert_eq!(message.text, "Please fill in all required fields");
        assert!(rx.try_recv().is_err());
        assert_eq!(stats.counters().users_created, 0);
        assert_eq!(stats.request_count(), 0);
    }

    #[tokio::test]
    async fn test_submit_requires_url() {
        let (actions, mut rx, stats) = setup();

        actions.submit_user("Ada", "ada@example.com").await;

        let UiEvent::Create(message) = rx.try_recv().unwrap() else {
            panic!("expected create event");
        };
        assert_eq!(message.text, "Please configure the API URL first");
        assert_eq!(stats.request_count(), 0);
    }

    #[tokio::test]
    async fn test_refresh_without_url_shows_placeholder() {
        let (actions, mut rx, stats) = setup();

        actions.refresh_users().await;

        assert!(matches!(rx.try_recv().unwrap(), UiEvent::UsersLoading));
        assert!(matches!(rx.try_recv().unwrap(), UiEvent::UsersUnconfigured));
        assert_eq!(stats.counters().refreshes, 0);
        assert_eq!(stats.request_count(), 0);
    }

    #[tokio::test]
    async fn test_set_base_url() {
        let (actions, _rx, _) = setup();

        actions.set_base_url("http://localhost:7071");

        assert_eq!(actions.config.api_url(), "http://localhost:7071");
    }
}
