use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalyticsEvent {
    AuthLoginSuccess,
    AuthRedirectBlocked,
    TimespendingLoadFailed,
}

impl AnalyticsEvent {
    pub fn name(self) -> &'static str {
        match self {
            Self::AuthLoginSuccess => "auth_login_success",
            Self::AuthRedirectBlocked => "auth_redirect_blocked",
            Self::TimespendingLoadFailed => "timespending_load_failed",
        }
    }
}

/// Emits a product analytics event on the `analytics` tracing target.
pub fn track(event: AnalyticsEvent, payload: serde_json::Value) {
    info!(
        target: "analytics",
        event = event.name(),
        payload = %payload,
        timestamp = %chrono::Utc::now().to_rfc3339(),
        "analytics event"
    );
}
