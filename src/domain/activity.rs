use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Donation,
    Purchase,
    Redemption,
}

impl ActivityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::Donation => "donation",
            ActivityKind::Purchase => "purchase",
            ActivityKind::Redemption => "redemption",
        }
    }
}

impl std::fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// One point movement in the user's history. Entries are append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub id: Uuid,
    pub kind: ActivityKind,
    /// Signed: positive for earned, negative for spent
    pub points: i64,
    pub details: String,
    pub recorded_at: DateTime<Utc>,
}

impl ActivityEntry {
    pub fn new(kind: ActivityKind, points: i64, details: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            points,
            details: details.into(),
            recorded_at: Utc::now(),
        }
    }
}
