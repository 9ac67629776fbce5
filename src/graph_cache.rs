//! Persistent graph cache.
//!
//! Building the link graph means re-indexing the whole vault, so the last
//! result is kept in a single storage slot and shown immediately on the next
//! open. Entries never expire: the host refreshes them in the background or on
//! an explicit refresh, and the age is only ever displayed.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::CacheError;

/// Storage slot shared with the host; other host keys must not reuse it.
pub const CACHE_KEY: &str = "obails-graph-cache";

const SECOND_MS: i64 = 1000;

/// String key-value store the cache is written to.
pub trait GraphCacheStorage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String);
    fn remove(&mut self, key: &str);
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CachedGraph<T = serde_json::Value> {
    pub data: T,
    /// Epoch milliseconds of the fetch that produced `data`.
    pub timestamp: i64,
}

impl<T> CachedGraph<T> {
    pub fn now(data: T) -> Self {
        create_cache_entry(data, now_ms())
    }
}

impl CachedGraph<()> {
    /// Header of an entry whose `data` is never looked at, built from a JS
    /// millisecond count. Fractions truncate, out-of-range values saturate
    /// and `NaN` becomes 0.
    pub fn stamped(timestamp_ms: f64) -> Self {
        create_cache_entry((), timestamp_ms as i64)
    }
}

pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

pub fn is_cache_valid<T>(cache: Option<&CachedGraph<T>>) -> bool {
    cache.is_some()
}

pub fn get_cache_age_ms<T>(cache: Option<&CachedGraph<T>>, now: i64) -> i64 {
    match cache {
        Some(cache) => now.saturating_sub(cache.timestamp).max(0),
        None => 0,
    }
}

/// Single-unit age label, e.g. `"3h ago"`.
pub fn get_cache_age_text<T>(cache: Option<&CachedGraph<T>>, now: i64) -> String {
    let ms = get_cache_age_ms(cache, now);
    if ms <= 0 {
        return "just now".to_string();
    }

    let seconds = ms / SECOND_MS;
    let minutes = seconds / 60;
    let hours = minutes / 60;
    let days = hours / 24;

    if days > 0 {
        format!("{days}d ago")
    } else if hours > 0 {
        format!("{hours}h ago")
    } else if minutes > 0 {
        format!("{minutes}m ago")
    } else {
        format!("{seconds}s ago")
    }
}

pub fn get_cache_age_text_now<T>(cache: Option<&CachedGraph<T>>) -> String {
    get_cache_age_text(cache, now_ms())
}

pub fn create_cache_entry<T>(data: T, timestamp: i64) -> CachedGraph<T> {
    CachedGraph { data, timestamp }
}

/// Overwrites the slot with `cache`.
pub fn save_cache<S, T>(storage: &mut S, cache: &CachedGraph<T>) -> Result<(), CacheError>
where
    S: GraphCacheStorage + ?Sized,
    T: Serialize,
{
    let encoded = serde_json::to_string(cache).map_err(CacheError::Serialize)?;
    storage.set(CACHE_KEY, encoded);
    tracing::debug!(timestamp = cache.timestamp, "graph cache saved");
    Ok(())
}

/// Reads the slot. A payload that no longer decodes counts as a miss.
pub fn load_cache<S, T>(storage: &S) -> Option<CachedGraph<T>>
where
    S: GraphCacheStorage + ?Sized,
    T: DeserializeOwned,
{
    let cached = storage.get(CACHE_KEY)?;
    if cached.is_empty() {
        return None;
    }
    match serde_json::from_str(&cached) {
        Ok(cache) => Some(cache),
        Err(e) => {
            tracing::warn!("Ignoring unreadable graph cache: {}", e);
            None
        }
    }
}

pub fn clear_cache<S>(storage: &mut S)
where
    S: GraphCacheStorage + ?Sized,
{
    storage.remove(CACHE_KEY);
}
