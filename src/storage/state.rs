use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::KeyValueStore;

/// How a persisted value was obtained at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The stored document was decoded successfully.
    Restored,
    /// Nothing usable was stored; the default value is in use.
    Defaulted(DefaultReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultReason {
    Missing,
    Malformed(String),
}

impl LoadOutcome {
    pub fn is_restored(&self) -> bool {
        matches!(self, LoadOutcome::Restored)
    }
}

impl std::fmt::Display for LoadOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadOutcome::Restored => write!(f, "restored"),
            LoadOutcome::Defaulted(DefaultReason::Missing) => write!(f, "defaulted (missing)"),
            LoadOutcome::Defaulted(DefaultReason::Malformed(err)) => {
                write!(f, "defaulted (malformed: {})", err)
            }
        }
    }
}

/// A decoded value together with how it was obtained.
#[derive(Debug, Clone)]
pub struct Loaded<T> {
    pub value: T,
    pub outcome: LoadOutcome,
}

/// Load and decode the JSON document under `key`, falling back to
/// `T::default()` when it is absent or cannot be decoded.
/// Only store failures are returned as errors.
pub async fn load_json<T>(store: &dyn KeyValueStore, key: &str) -> Result<Loaded<T>>
where
    T: DeserializeOwned + Default,
{
    let Some(raw) = store.load(key).await? else {
        debug!(key, "no stored value, using default");
        return Ok(Loaded {
            value: T::default(),
            outcome: LoadOutcome::Defaulted(DefaultReason::Missing),
        });
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Loaded {
            value,
            outcome: LoadOutcome::Restored,
        }),
        Err(err) => {
            warn!(key, error = %err, "stored value is malformed, using default");
            Ok(Loaded {
                value: T::default(),
                outcome: LoadOutcome::Defaulted(DefaultReason::Malformed(err.to_string())),
            })
        }
    }
}

/// Encode `value` as JSON and store it under `key`.
pub async fn save_json<T>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
{
    let raw = serde_json::to_string(value)
        .with_context(|| format!("Failed to encode value for '{}'", key))?;
    store.save(key, &raw).await
}
