use crate::api::ApiClient;
use crate::auth::AuthState;
use crate::config::Config;
use crate::dates::today;
use crate::edit_form::EditForm;
use crate::errors::AppError;
use crate::range_view::RangeView;
use crate::session::Session;
use crate::storage::{FileStore, MemoryStore};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

/// One browser tab's worth of client state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub api: ApiClient,
    pub session: Arc<Mutex<Session<FileStore>>>,
    pub auth: Arc<Mutex<AuthState>>,
    pub session_storage: Arc<Mutex<MemoryStore>>,
    pub range_view: Arc<Mutex<RangeView>>,
    pub edit_form: Arc<Mutex<EditForm>>,
}

impl AppState {
    pub fn new(config: Config, api: ApiClient, session: Session<FileStore>, auth: AuthState) -> Self {
        let today = today();
        Self {
            config: Arc::new(config),
            api,
            session: Arc::new(Mutex::new(session)),
            auth: Arc::new(Mutex::new(auth)),
            session_storage: Arc::new(Mutex::new(MemoryStore::default())),
            range_view: Arc::new(Mutex::new(RangeView::new(today))),
            edit_form: Arc::new(Mutex::new(EditForm::new(today))),
        }
    }

    pub async fn token(&self) -> Option<String> {
        self.session.lock().await.id_token()
    }

    /// Drops the stored credentials after the backend rejected them.
    pub async fn expire_session(&self) -> Result<(), AppError> {
        let mut session = self.session.lock().await;
        self.auth.lock().await.sign_out(&mut session);
        session.store_mut().flush().await?;
        self.range_view.lock().await.cancel();
        self.edit_form.lock().await.cancel();
        info!("session expired, credentials cleared");
        Ok(())
    }
}
