use crate::analytics::{self, AnalyticsEvent};
use crate::api::ApiClient;
use crate::chart::total_hours;
use crate::dates::{date_key, last_complete_week, parse_date};
use crate::errors::{ApiError, ErrorKind};
use crate::fetch::ViewError;
use crate::models::SpendingSlice;
use chrono::NaiveDate;
use serde_json::json;
use tracing::warn;

pub const INVALID_DATES: &str = "Please use valid start and end dates.";
pub const START_AFTER_END: &str = "Start date cannot be after end date.";

#[derive(Debug, Clone, PartialEq)]
pub enum SpendingError {
    /// Rejected before any request was made.
    Invalid(&'static str),
    Failed { kind: ErrorKind, detail: String },
}

/// Everything the time-spending page renders.
#[derive(Debug, Clone, PartialEq)]
pub struct SpendingView {
    pub start: String,
    pub end: String,
    pub slices: Vec<SpendingSlice>,
    pub total_hours: f64,
    pub error: Option<SpendingError>,
}

impl SpendingView {
    fn new(start: String, end: String) -> Self {
        Self {
            start,
            end,
            slices: Vec::new(),
            total_hours: 0.0,
            error: None,
        }
    }
}

pub fn default_range(today: NaiveDate) -> (String, String) {
    let (start, end) = last_complete_week(today);
    (date_key(start), date_key(end))
}

pub fn validate_range(start: &str, end: &str) -> Result<(NaiveDate, NaiveDate), &'static str> {
    let (Some(start), Some(end)) = (parse_date(start), parse_date(end)) else {
        return Err(INVALID_DATES);
    };
    if start > end {
        return Err(START_AFTER_END);
    }
    Ok((start, end))
}

/// Loads the spending breakdown. Only an expired session escapes as an error;
/// everything else is rendered inline.
pub async fn load(
    api: &ApiClient,
    token: &str,
    start: String,
    end: String,
) -> Result<SpendingView, ViewError> {
    let mut view = SpendingView::new(start, end);
    let (start, end) = match validate_range(&view.start, &view.end) {
        Ok(range) => range,
        Err(message) => {
            view.error = Some(SpendingError::Invalid(message));
            return Ok(view);
        }
    };

    match api.spending(token, start, end).await {
        Ok(slices) => {
            view.total_hours = total_hours(&slices);
            view.slices = slices;
        }
        Err(ApiError::Unauthorized) => return Err(ViewError::Unauthorized),
        Err(err) => {
            let kind = err.kind();
            warn!(kind = kind.as_str(), "time spending load failed: {err}");
            analytics::track(
                AnalyticsEvent::TimespendingLoadFailed,
                json!({ "kind": kind.as_str() }),
            );
            view.error = Some(SpendingError::Failed {
                kind,
                detail: err.to_string(),
            });
        }
    }
    Ok(view)
}
