mod memory;
mod sqlite;
mod state;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

pub use memory::*;
pub use sqlite::*;
pub use state::*;

/// SQL migration for the key-value table
pub const MIGRATION_001_INITIAL: &str = include_str!("migrations/001_initial.sql");

/// Logical keys of the persisted entries.
pub mod keys {
    pub const POINTS: &str = "goodwill-points";
    pub const CART: &str = "goodwill-cart";
    pub const DONORS: &str = "blood-donors";
    pub const REQUESTS: &str = "blood-requests";
    pub const STATS: &str = "goodwill-stats";
    pub const ACTIVITY: &str = "goodwill-activity";
}

/// Persistent string key-value store. Values are JSON documents.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn load(&self, key: &str) -> Result<Option<String>>;
    async fn save(&self, key: &str, value: &str) -> Result<()>;
}

pub type DynKeyValueStore = Arc<dyn KeyValueStore>;
