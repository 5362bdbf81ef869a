use std::time::Duration;

use chrono::TimeDelta;

/// Default database file.
pub const DEFAULT_DATABASE: &str = "goodwill.db";

/// Runtime settings for a [`crate::application::GoodwillService`].
#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: String,
    /// Points granted for one blood donation
    pub donation_reward: i64,
    /// Visits closer together than this belong to the same session
    pub session_window: TimeDelta,
    /// Simulated search time before a blood request is confirmed
    pub search_delay: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: DEFAULT_DATABASE.to_string(),
            donation_reward: 15,
            session_window: TimeDelta::minutes(30),
            search_delay: Duration::from_secs(2),
        }
    }
}

impl Config {
    pub fn with_database(mut self, path: impl Into<String>) -> Self {
        self.database_path = path.into();
        self
    }

    pub fn with_search_delay(mut self, delay: Duration) -> Self {
        self.search_delay = delay;
        self
    }

    /// Connection URL that creates the database file if needed.
    pub fn create_url(&self) -> String {
        format!("sqlite:{}?mode=rwc", self.database_path)
    }

    /// Connection URL for an existing database.
    pub fn connect_url(&self) -> String {
        format!("sqlite:{}", self.database_path)
    }
}
