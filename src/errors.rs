use axum::http::{header, StatusCode};
use serde::Serialize;
use thiserror::Error;

/// Error surfaced to the browser by a handler.
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
    pub location: Option<String>,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
            location: None,
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
            location: None,
        }
    }

    pub fn superseded() -> Self {
        Self {
            status: StatusCode::CONFLICT,
            message: "superseded by a newer request".to_string(),
            location: None,
        }
    }

    /// Navigation rather than failure: guards and expired sessions.
    pub fn redirect(location: impl Into<String>) -> Self {
        Self {
            status: StatusCode::SEE_OTHER,
            message: String::new(),
            location: Some(location.into()),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status, self.message)
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::internal(err)
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        match self.location {
            Some(location) => (self.status, [(header::LOCATION, location)]).into_response(),
            None => (self.status, self.message).into_response(),
        }
    }
}

/// The two failure categories the pages distinguish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    Offline,
    Generic,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Offline => "offline",
            Self::Generic => "generic",
        }
    }
}

/// Failure of a call to the backend API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("backend unreachable: {0}")]
    Offline(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("not found")]
    NotFound,

    #[error("HTTP {0}")]
    Status(u16),

    #[error("malformed response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Offline(_) => ErrorKind::Offline,
            _ => ErrorKind::Generic,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return Self::Decode(err.to_string());
        }
        if let Some(status) = err.status() {
            return Self::Status(status.as_u16());
        }
        Self::Offline(err.to_string())
    }
}
