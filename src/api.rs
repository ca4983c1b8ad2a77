//! Typed client for the energy journal backend.
//!
//! Every call maps transport failures to [`ApiError::Offline`] and a `401`
//! to [`ApiError::Unauthorized`], so callers can treat expired sessions
//! uniformly.

use crate::dates::date_key;
use crate::errors::ApiError;
use crate::models::{
    ActivationResponse, AuthTokens, CreateUserAccepted, CreateUserRequest, EnergyLevels,
    LoginRequest, Profile, RefreshRequest, SpendingSlice,
};
use chrono::NaiveDate;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ApiError::Offline(err.to_string()))?;
        Ok(Self::with_client(http, base_url))
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub async fn create_user(
        &self,
        request: &CreateUserRequest,
    ) -> Result<CreateUserAccepted, ApiError> {
        let response = send(self.http.post(self.url("/users")).json(request)).await?;
        decode(response).await
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<AuthTokens, ApiError> {
        let response = send(self.http.post(self.url("/users/login")).json(request)).await?;
        decode(response).await
    }

    pub async fn activate(&self, token: &str) -> Result<ActivationResponse, ApiError> {
        let request = self
            .http
            .post(self.url("/users/activate"))
            .query(&[("token", token)]);
        decode(send(request).await?).await
    }

    pub async fn refresh(&self, refresh_token: &str) -> Result<AuthTokens, ApiError> {
        let body = RefreshRequest {
            refresh_token: refresh_token.to_string(),
        };
        let response = send(self.http.post(self.url("/users/refresh")).json(&body)).await?;
        decode(response).await
    }

    pub async fn me(&self, token: &str) -> Result<Profile, ApiError> {
        let request = self.http.get(self.url("/users/me")).bearer_auth(token);
        let payload: Value = decode(send(request).await?).await?;
        Ok(Profile::from_payload(&payload))
    }

    /// `Ok(None)` when the day has no entry.
    pub async fn energy_levels(
        &self,
        token: &str,
        date: NaiveDate,
    ) -> Result<Option<EnergyLevels>, ApiError> {
        let request = self
            .http
            .get(self.url("/energy/levels"))
            .query(&[("date", date_key(date))])
            .bearer_auth(token);
        match send(request).await {
            Ok(response) => {
                let payload: Value = decode(response).await?;
                Ok(Some(EnergyLevels::from_payload(&payload)))
            }
            Err(ApiError::NotFound) => Ok(None),
            Err(err) => Err(err),
        }
    }

    pub async fn energy_levels_range(
        &self,
        token: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<EnergyLevels>, ApiError> {
        let request = self
            .http
            .get(self.url("/energy/levels/range"))
            .query(&[("from", date_key(from)), ("to", date_key(to))])
            .bearer_auth(token);
        let payload: Value = decode(send(request).await?).await?;
        Ok(EnergyLevels::list_from_payload(&payload))
    }

    /// Upserts one day and returns the record as the backend stored it.
    pub async fn save_energy_levels(
        &self,
        token: &str,
        levels: &EnergyLevels,
    ) -> Result<EnergyLevels, ApiError> {
        let request = self
            .http
            .put(self.url("/energy/levels"))
            .json(&levels.to_save_body())
            .bearer_auth(token);
        let payload: Value = decode(send(request).await?).await?;
        Ok(EnergyLevels::from_payload(&payload))
    }

    pub async fn spending(
        &self,
        token: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<SpendingSlice>, ApiError> {
        let request = self
            .http
            .get(self.url("/calendar/spending"))
            .query(&[("start", date_key(start)), ("end", date_key(end))])
            .bearer_auth(token);
        let payload: Value = decode(send(request).await?).await?;
        Ok(spending_from_payload(&payload))
    }
}

async fn send(request: RequestBuilder) -> Result<Response, ApiError> {
    let response = request.send().await.map_err(|err| {
        warn!("backend request failed: {err}");
        ApiError::Offline(err.to_string())
    })?;

    match response.status() {
        status if status.is_success() => Ok(response),
        StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized),
        StatusCode::NOT_FOUND => Err(ApiError::NotFound),
        status => {
            debug!(url = %response.url(), %status, "backend rejected request");
            Err(ApiError::Status(status.as_u16()))
        }
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|err| ApiError::Decode(err.to_string()))
}

/// Keeps finite numeric entries, largest first.
pub fn spending_from_payload(payload: &Value) -> Vec<SpendingSlice> {
    let Some(entries) = payload.as_object() else {
        return Vec::new();
    };
    let mut slices: Vec<SpendingSlice> = entries
        .iter()
        .filter_map(|(name, hours)| {
            let hours = hours.as_f64().filter(|hours| hours.is_finite())?;
            Some(SpendingSlice {
                name: name.clone(),
                hours,
            })
        })
        .collect();
    slices.sort_by(|a, b| b.hours.total_cmp(&a.hours));
    slices
}
