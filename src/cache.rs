//! Session-scoped memo of the last fetched energy range.
//!
//! The blob sits under a fixed key of the session store. A one-shot marker,
//! set after every successful save, makes the next lookup miss no matter
//! which range is asked for.

use crate::dates::date_key;
use crate::models::EnergyLevels;
use crate::storage::KeyValueStore;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const RANGE_CACHE_KEY: &str = "energy-levels:range-cache";
pub const FORCE_REFRESH_KEY: &str = "energy-levels:force-refresh";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheStatus {
    Success,
    Empty,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeCacheEntry {
    pub from: String,
    pub to: String,
    pub levels: Vec<EnergyLevels>,
    pub status: CacheStatus,
}

impl RangeCacheEntry {
    pub fn new(from: NaiveDate, to: NaiveDate, levels: Vec<EnergyLevels>) -> Self {
        let status = if levels.is_empty() {
            CacheStatus::Empty
        } else {
            CacheStatus::Success
        };
        Self {
            from: date_key(from),
            to: date_key(to),
            levels,
            status,
        }
    }

    fn matches(&self, from: NaiveDate, to: NaiveDate) -> bool {
        self.from == date_key(from) && self.to == date_key(to)
    }
}

pub fn read_range_cache(store: &impl KeyValueStore) -> Option<RangeCacheEntry> {
    let raw = store.get(RANGE_CACHE_KEY)?;
    let entry: RangeCacheEntry = serde_json::from_str(&raw).ok()?;
    if entry.from.is_empty() || entry.to.is_empty() {
        return None;
    }
    Some(entry)
}

pub fn write_range_cache(store: &mut impl KeyValueStore, entry: &RangeCacheEntry) {
    match serde_json::to_string(entry) {
        Ok(raw) => store.set(RANGE_CACHE_KEY, raw),
        Err(err) => debug!("range cache not written: {err}"),
    }
}

pub fn clear_range_cache(store: &mut impl KeyValueStore) {
    store.remove(RANGE_CACHE_KEY);
}

pub fn mark_force_refresh(store: &mut impl KeyValueStore) {
    store.set(FORCE_REFRESH_KEY, "1".to_string());
}

/// Consumes the force-refresh marker, reporting whether it was set.
pub fn take_force_refresh(store: &mut impl KeyValueStore) -> bool {
    let marked = store.get(FORCE_REFRESH_KEY).is_some();
    if marked {
        store.remove(FORCE_REFRESH_KEY);
    }
    marked
}

/// Exact-match lookup honouring the force-refresh marker.
pub fn lookup(
    store: &mut impl KeyValueStore,
    from: NaiveDate,
    to: NaiveDate,
) -> Option<RangeCacheEntry> {
    if take_force_refresh(store) {
        clear_range_cache(store);
        return None;
    }
    read_range_cache(store).filter(|entry| entry.matches(from, to))
}

/// Drops the cached blob and arms the marker after a successful save.
pub fn invalidate_after_save(store: &mut impl KeyValueStore) {
    clear_range_cache(store);
    mark_force_refresh(store);
}
