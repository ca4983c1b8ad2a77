use std::{env, fmt::Display, path::PathBuf, str::FromStr, time::Duration};
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub api_base_url: String,
    pub data_path: PathBuf,
    pub timezone: String,
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            port: load_or("PORT", 8080),
            api_base_url: env::var("ENERGY_API_BASE_URL")
                .ok()
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| "http://127.0.0.1:8081/api".to_string()),
            data_path: resolve_data_path(),
            timezone: env::var("ENERGY_TIMEZONE").unwrap_or_else(|_| "UTC".to_string()),
            request_timeout: Duration::from_secs(load_or("ENERGY_HTTP_TIMEOUT_SECS", 15)),
        }
    }
}

/// Durable store for the session tokens.
pub fn resolve_data_path() -> PathBuf {
    if let Ok(path) = env::var("APP_DATA_PATH") {
        return PathBuf::from(path);
    }

    PathBuf::from("data/session.json")
}

fn load_or<T>(key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|err| {
            warn!("invalid {key} value {raw:?}: {err}, using default {default}");
            default
        }),
        Err(_) => {
            info!("{key} not set, using default: {default}");
            default
        }
    }
}
