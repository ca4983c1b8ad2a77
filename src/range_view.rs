use crate::api::ApiClient;
use crate::cache::{self, CacheStatus, RangeCacheEntry};
use crate::chart::{ChartPoint, build_chart_data};
use crate::errors::{ApiError, ErrorKind};
use crate::fetch::{LatestRequest, ViewError, join_latest};
use crate::models::EnergyLevels;
use crate::range::RangeSelection;
use crate::storage::MemoryStore;
use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewStatus {
    Idle,
    Loading,
    Success,
    Empty,
    Error(ErrorKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeSource {
    Cache,
    Network,
}

/// State of the energy levels range page.
#[derive(Debug)]
pub struct RangeView {
    pub selection: RangeSelection,
    pub levels: Vec<EnergyLevels>,
    pub status: ViewStatus,
    requests: LatestRequest,
}

impl RangeView {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            selection: RangeSelection::new(today),
            levels: Vec::new(),
            status: ViewStatus::Idle,
            requests: LatestRequest::default(),
        }
    }

    pub fn chart_data(&self) -> Vec<ChartPoint> {
        build_chart_data(&self.levels, self.selection.from, self.selection.to)
    }

    fn apply(&mut self, entry: RangeCacheEntry) {
        self.status = match entry.status {
            CacheStatus::Success => ViewStatus::Success,
            CacheStatus::Empty => ViewStatus::Empty,
        };
        self.levels = entry.levels;
    }

    fn fail(&mut self, kind: ErrorKind) {
        self.status = ViewStatus::Error(kind);
    }

    /// Drops any in-flight load, as when the page goes away.
    pub fn cancel(&mut self) {
        self.requests.cancel();
    }
}

/// Cache-aware range fetch. `bypass_cache` skips the lookup but still
/// consumes a pending force-refresh marker.
pub async fn fetch_range(
    api: &ApiClient,
    storage: &Mutex<MemoryStore>,
    token: &str,
    from: NaiveDate,
    to: NaiveDate,
    bypass_cache: bool,
) -> Result<(RangeCacheEntry, RangeSource), ApiError> {
    {
        let mut store = storage.lock().await;
        if bypass_cache {
            cache::take_force_refresh(&mut *store);
        } else if let Some(hit) = cache::lookup(&mut *store, from, to) {
            debug!(%from, %to, "range served from cache");
            return Ok((hit, RangeSource::Cache));
        }
    }

    let levels = api.energy_levels_range(token, from, to).await?;
    let entry = RangeCacheEntry::new(from, to, levels);
    cache::write_range_cache(&mut *storage.lock().await, &entry);
    Ok((entry, RangeSource::Network))
}

/// Loads the view's current selection. Only the latest load is applied.
pub async fn load(
    view: &Mutex<RangeView>,
    storage: Arc<Mutex<MemoryStore>>,
    api: ApiClient,
    token: String,
    bypass_cache: bool,
) -> Result<(), ViewError> {
    let (ticket, handle) = {
        let mut view = view.lock().await;
        let (from, to) = (view.selection.from, view.selection.to);
        view.status = ViewStatus::Loading;
        view.requests.start(async move {
            fetch_range(&api, &storage, &token, from, to, bypass_cache).await
        })
    };

    let outcome = join_latest(handle).await?;

    let mut view = view.lock().await;
    if !view.requests.finish(ticket) {
        return Err(ViewError::Superseded);
    }
    match outcome {
        Ok((entry, _)) => view.apply(entry),
        Err(ApiError::Unauthorized) => {
            view.status = ViewStatus::Idle;
            return Err(ViewError::Unauthorized);
        }
        Err(err) => {
            warn!("energy range load failed: {err}");
            view.fail(err.kind());
        }
    }
    Ok(())
}
