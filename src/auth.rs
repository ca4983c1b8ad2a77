use crate::api::ApiClient;
use crate::errors::ApiError;
use crate::models::Profile;
use crate::session::Session;
use crate::storage::KeyValueStore;
use serde::Serialize;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthStatus {
    Loading,
    Authenticated,
    Anonymous,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthState {
    pub status: AuthStatus,
    pub email: Option<String>,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            status: AuthStatus::Loading,
            email: None,
        }
    }
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        self.status == AuthStatus::Authenticated
    }

    pub fn sign_in(&mut self, email: impl Into<String>) {
        self.status = AuthStatus::Authenticated;
        self.email = Some(email.into());
    }

    pub fn sign_out<S: KeyValueStore>(&mut self, session: &mut Session<S>) {
        session.clear();
        self.become_anonymous();
    }

    fn become_anonymous(&mut self) {
        self.status = AuthStatus::Anonymous;
        self.email = None;
    }

    /// Applies the outcome of a profile check. Only a confirmed `401`
    /// discards the stored credentials.
    pub fn resolve_profile<S: KeyValueStore>(
        &mut self,
        session: &mut Session<S>,
        outcome: Result<Profile, ApiError>,
    ) {
        match outcome {
            Ok(profile) => {
                self.status = AuthStatus::Authenticated;
                self.email = profile.email;
            }
            Err(ApiError::Unauthorized) => {
                info!("stored session rejected, signing out");
                session.clear();
                self.become_anonymous();
            }
            Err(err) => {
                warn!("profile check failed: {err}");
                self.become_anonymous();
            }
        }
    }
}

/// Resolves the initial `Loading` status against `GET /users/me`.
pub async fn check_profile<S: KeyValueStore>(
    api: &ApiClient,
    session: &mut Session<S>,
) -> AuthState {
    let mut state = AuthState::default();
    let Some(token) = session.id_token() else {
        state.become_anonymous();
        return state;
    };

    let outcome = api.me(&token).await;
    state.resolve_profile(session, outcome);
    state
}
