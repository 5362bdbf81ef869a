use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Community counters shown on the landing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageStats {
    pub donations_count: u64,
    pub users_count: u64,
    pub recipients_count: u64,
    pub last_visit: Option<DateTime<Utc>>,
}

impl Default for UsageStats {
    fn default() -> Self {
        Self {
            donations_count: 2481,
            users_count: 5723,
            recipients_count: 1897,
            last_visit: None,
        }
    }
}

impl UsageStats {
    /// Register a visit at `now`. A visit counts as a new user session when
    /// there was no previous visit or the last one is older than `window`.
    /// Returns true for a new session.
    pub fn register_visit(&mut self, now: DateTime<Utc>, window: TimeDelta) -> bool {
        let new_session = match self.last_visit {
            Some(last) => now - last > window,
            None => true,
        };
        if new_session {
            self.users_count += 1;
        }
        self.last_visit = Some(now);
        new_session
    }

    pub fn record_donation(&mut self) {
        self.donations_count += 1;
    }

    pub fn record_request(&mut self) {
        self.recipients_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> TimeDelta {
        TimeDelta::minutes(30)
    }

    #[test]
    fn test_first_visit_is_new_session() {
        let mut stats = UsageStats::default();
        let now = Utc::now();
        assert!(stats.register_visit(now, window()));
        assert_eq!(stats.users_count, 5724);
        assert_eq!(stats.last_visit, Some(now));
    }

    #[test]
    fn test_visit_within_window_does_not_count() {
        let mut stats = UsageStats::default();
        let now = Utc::now();
        stats.register_visit(now, window());

        let later = now + TimeDelta::minutes(10);
        assert!(!stats.register_visit(later, window()));
        assert_eq!(stats.users_count, 5724);
        assert_eq!(stats.last_visit, Some(later));
    }

    #[test]
    fn test_visit_after_window_counts() {
        let mut stats = UsageStats::default();
        let now = Utc::now();
        stats.register_visit(now, window());

        assert!(stats.register_visit(now + TimeDelta::minutes(31), window()));
        assert_eq!(stats.users_count, 5725);
    }
}
