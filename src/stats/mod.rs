//! Session statistics module
//!
//! Tracks the two display counters and a bounded feed of recent requests.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Display counters, reset only by restarting the application
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct Counters {
    /// Users created through the form since startup
    pub users_created: u64,
    /// Successful list refreshes since startup
    pub refreshes: u64,
}

/// A single request shown in the recent-requests feed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestEvent {
    /// Correlation ID sent with the request
    pub correlation_id: String,
    /// HTTP method
    pub method: String,
    /// Request path relative to the base URL
    pub endpoint: String,
    /// Response status code (if a response arrived)
    pub status: Option<u16>,
    /// Timestamp when the request completed
    pub timestamp: DateTime<Utc>,
}

impl RequestEvent {
    /// Create a new request event
    pub fn new(correlation_id: String, method: &str, endpoint: &str) -> Self {
        Self {
            correlation_id,
            method: method.to_string(),
            endpoint: endpoint.to_string(),
            status: None,
            timestamp: Utc::now(),
        }
    }

    /// Set the status code
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }
}

/// Session statistics collector
#[derive(Debug)]
pub struct StatsCollector {
    counters: RwLock<Counters>,
    /// Recent requests, oldest first
    recent: RwLock<Vec<RequestEvent>>,
    /// Maximum number of feed entries to keep in memory
    max_entries: usize,
}

impl StatsCollector {
    /// Create a new statistics collector
    pub fn new(max_entries: usize) -> Self {
        Self {
            counters: RwLock::new(Counters::default()),
            recent: RwLock::new(Vec::with_capacity(max_entries)),
            max_entries,
        }
    }

    /// Increment the users-created counter
    pub fn record_user_created(&self) {
        self.counters.write().users_created += 1;
    }

    /// Increment the refresh counter
    pub fn record_refresh(&self) {
        self.counters.write().refreshes += 1;
    }

    /// Get a copy of the current counters
    pub fn counters(&self) -> Counters {
        *self.counters.read()
    }

    /// Record a completed request in the feed
    pub fn record_request(&self, event: RequestEvent) {
        let mut recent = self.recent.write();
        if recent.len() >= self.max_entries {
            // Remove oldest entries when at capacity
            recent.drain(0..self.max_entries / 10);
        }
        recent.push(event);
    }

    /// Get the most recent requests, newest first
    pub fn recent(&self, limit: usize) -> Vec<RequestEvent> {
        self.recent
            .read()
            .iter()
            .rev()
            .take(limit)
            .cloned()
            .collect()
    }

    /// Get the count of recorded requests
    pub fn request_count(&self) -> usize {
        self.recent.read().len()
    }
}

/// Shared statistics collector for use across tasks
pub type SharedStats = Arc<StatsCollector>;

/// Create a new shared statistics collector
pub fn create_shared_stats(max_entries: usize) -> SharedStats {
    Arc::new(StatsCollector::new(max_entries))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let stats = StatsCollector::new(100);

        stats.record_user_created();
        stats.record_refresh();
        stats.record_refresh();

        let counters = stats.counters();
        assert_eq!(counters.users_created, 1);
        assert_eq!(counters.refreshes, 2);
    }

    #[test]
    fn test_record_request() {
        let stats = StatsCollector::new(100);
        let event = RequestEvent::new("web-abc123def".to_string(), "GET", "/api/users")
            .with_status(200);

        stats.record_request(event);

        assert_eq!(stats.request_count(), 1);
        let recent = stats.recent(10);
        assert_eq!(recent[0].status, Some(200));
        assert_eq!(recent[0].method, "GET");
    }

    #[test]
    fn test_recent_is_newest_first() {
        let stats = StatsCollector::new(100);
        for i in 0..5 {
            stats.record_request(RequestEvent::new(
                format!("web-{i:09}"),
                "GET",
                "/api/users",
            ));
        }

        let recent = stats.recent(2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].correlation_id, "web-000000004");
    }

    #[test]
    fn test_max_entries() {
        let stats = StatsCollector::new(20);

        for i in 0..30 {
            stats.record_request(RequestEvent::new(format!("web-{i}"), "GET", "/api/users"));
        }

        // Should have removed some entries
        assert!(stats.request_count() < 30);
    }
}
