use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub server_url: String,
    pub events_path: String,
    pub scan_path: String,
    pub request_timeout_secs: u64,
    pub tick_rate_ms: u64,
    pub max_completed_display: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            events_path: "/api/scanning".to_string(),
            scan_path: "/api/scanning".to_string(),
            request_timeout_secs: 10,
            tick_rate_ms: 100,
            max_completed_display: 500,
        }
    }
}

impl Settings {
    pub fn events_url(&self) -> String {
        join_url(&self.server_url, &self.events_path)
    }

    pub fn scan_url(&self) -> String {
        join_url(&self.server_url, &self.scan_path)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms.max(10))
    }
}

/// Join with exactly one `/` between base and path.
pub fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        return base.to_string();
    }
    format!("{}/{}", base, path)
}
