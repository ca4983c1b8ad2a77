use crate::api::ApiClient;
use crate::cache;
use crate::dates::date_key;
use crate::errors::ApiError;
use crate::fetch::{LatestRequest, ViewError, join_latest};
use crate::models::EnergyLevels;
use crate::storage::MemoryStore;
use chrono::NaiveDate;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{info, warn};

pub const DEFAULT_LEVEL: i64 = 5;
pub const DEFAULT_CONTEXT_LEVEL: i64 = 3;
pub const TOAST_DURATION: Duration = Duration::from_secs(3);

pub const LOAD_ERROR: &str = "Could not load data for this date. Please try again.";
pub const SAVE_ERROR: &str = "Failed to save. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormStatus {
    Loading,
    Idle,
    Saving,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormStep {
    Scores,
    Context,
}

#[derive(Debug, Clone)]
struct Toast {
    levels: EnergyLevels,
    shown_at: Instant,
}

/// State of the energy levels edit page.
#[derive(Debug)]
pub struct EditForm {
    pub date: NaiveDate,
    pub draft: EnergyLevels,
    pub step: FormStep,
    pub status: FormStatus,
    pub has_existing: bool,
    pub load_error: Option<&'static str>,
    pub save_error: Option<&'static str>,
    toast: Option<Toast>,
    requests: LatestRequest,
    saves: u64,
}

fn default_levels(date: NaiveDate) -> EnergyLevels {
    EnergyLevels {
        date: date_key(date),
        physical: DEFAULT_LEVEL,
        mental: DEFAULT_LEVEL,
        emotional: DEFAULT_LEVEL,
        sleep_quality: Some(DEFAULT_CONTEXT_LEVEL),
        stress_level: Some(DEFAULT_CONTEXT_LEVEL),
        ..EnergyLevels::default()
    }
}

/// Fills context scores the record left out with their defaults.
fn with_defaults(levels: EnergyLevels) -> EnergyLevels {
    EnergyLevels {
        sleep_quality: levels.sleep_quality.or(Some(DEFAULT_CONTEXT_LEVEL)),
        stress_level: levels.stress_level.or(Some(DEFAULT_CONTEXT_LEVEL)),
        ..levels
    }
}

impl EditForm {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            date: today,
            draft: default_levels(today),
            step: FormStep::Scores,
            status: FormStatus::Loading,
            has_existing: false,
            load_error: None,
            save_error: None,
            toast: None,
            requests: LatestRequest::default(),
            saves: 0,
        }
    }

    /// Switching day resets the context step; scores follow the next load.
    pub fn select_date(&mut self, date: NaiveDate) {
        if date == self.date {
            return;
        }
        self.date = date;
        self.step = FormStep::Scores;
        self.reset_context();
        self.draft.date = date_key(date);
    }

    fn reset_context(&mut self) {
        let defaults = default_levels(self.date);
        self.draft = EnergyLevels {
            physical: self.draft.physical,
            mental: self.draft.mental,
            emotional: self.draft.emotional,
            ..defaults
        };
    }

    fn apply_loaded(&mut self, loaded: Option<EnergyLevels>) {
        match loaded {
            Some(levels) => {
                self.draft = with_defaults(EnergyLevels {
                    date: date_key(self.date),
                    ..levels
                });
                self.has_existing = true;
            }
            None => {
                self.draft = default_levels(self.date);
                self.has_existing = false;
            }
        }
    }

    fn fail_load(&mut self) {
        self.draft = default_levels(self.date);
        self.has_existing = false;
        self.load_error = Some(LOAD_ERROR);
    }

    fn apply_saved(&mut self, saved: EnergyLevels, now: Instant) {
        self.draft = with_defaults(saved.clone());
        self.has_existing = true;
        self.toast = Some(Toast {
            levels: saved,
            shown_at: now,
        });
        self.status = FormStatus::Idle;
    }

    fn fail_save(&mut self) {
        self.save_error = Some(SAVE_ERROR);
        self.status = FormStatus::Idle;
    }

    /// The saved record while its confirmation is still on screen.
    pub fn toast(&self, now: Instant) -> Option<&EnergyLevels> {
        self.toast
            .as_ref()
            .filter(|toast| now.duration_since(toast.shown_at) < TOAST_DURATION)
            .map(|toast| &toast.levels)
    }

    pub fn scores_disabled(&self) -> bool {
        self.status == FormStatus::Loading
    }

    pub fn context_disabled(&self) -> bool {
        self.status != FormStatus::Idle
    }

    pub fn cancel(&mut self) {
        self.requests.cancel();
    }
}

/// Loads the form's current date. A newer load discards this one.
pub async fn load(
    form: &Mutex<EditForm>,
    api: ApiClient,
    token: String,
) -> Result<(), ViewError> {
    let (ticket, handle) = {
        let mut form = form.lock().await;
        let date = form.date;
        form.status = FormStatus::Loading;
        form.load_error = None;
        form.save_error = None;
        form.requests
            .start(async move { api.energy_levels(&token, date).await })
    };

    let outcome = join_latest(handle).await?;

    let mut form = form.lock().await;
    if !form.requests.finish(ticket) {
        return Err(ViewError::Superseded);
    }
    form.status = FormStatus::Idle;
    match outcome {
        Ok(loaded) => form.apply_loaded(loaded),
        Err(ApiError::Unauthorized) => return Err(ViewError::Unauthorized),
        Err(err) => {
            warn!(date = %form.date, "energy levels load failed: {err}");
            form.fail_load();
        }
    }
    Ok(())
}

/// Puts a form left in `Saving` back to `Idle` when the save future is
/// dropped before its outcome was applied.
struct PendingSave {
    form: Arc<Mutex<EditForm>>,
    save: u64,
    settled: bool,
}

impl PendingSave {
    fn settle(mut self) {
        self.settled = true;
    }
}

fn abandon_save(form: &mut EditForm, save: u64) {
    if form.saves == save && form.status == FormStatus::Saving {
        warn!(date = %form.draft.date, "energy levels save abandoned");
        form.status = FormStatus::Idle;
    }
}

impl Drop for PendingSave {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let save = self.save;
        match self.form.try_lock() {
            Ok(mut form) => abandon_save(&mut form, save),
            Err(_) => {
                let form = Arc::clone(&self.form);
                if let Ok(runtime) = tokio::runtime::Handle::try_current() {
                    runtime.spawn(async move { abandon_save(&mut *form.lock().await, save) });
                }
            }
        }
    }
}

/// Saves `draft` and, on success, invalidates the range cache.
pub async fn save(
    form: &Arc<Mutex<EditForm>>,
    storage: &Mutex<MemoryStore>,
    api: &ApiClient,
    token: &str,
    draft: EnergyLevels,
) -> Result<(), ViewError> {
    let pending = {
        let mut guard = form.lock().await;
        guard.requests.cancel();
        guard.saves += 1;
        guard.status = FormStatus::Saving;
        guard.save_error = None;
        guard.draft = draft.clone();
        PendingSave {
            form: Arc::clone(form),
            save: guard.saves,
            settled: false,
        }
    };

    let outcome = api.save_energy_levels(token, &draft).await;

    let mut form = form.lock().await;
    pending.settle();
    match outcome {
        Ok(saved) => {
            info!(date = %saved.date, "energy levels saved");
            form.apply_saved(saved, Instant::now());
            cache::invalidate_after_save(&mut *storage.lock().await);
        }
        Err(ApiError::Unauthorized) => {
            form.status = FormStatus::Idle;
            return Err(ViewError::Unauthorized);
        }
        Err(err) => {
            warn!(date = %draft.date, "energy levels save failed: {err}");
            form.fail_save();
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::parse_date;
    use crate::models::Nutrition;

    fn d(value: &str) -> NaiveDate {
        parse_date(value).expect("valid date")
    }

    #[test]
    fn missing_entry_falls_back_to_defaults() {
        let mut form = EditForm::new(d("2026-02-10"));
        form.apply_loaded(None);
        assert!(!form.has_existing);
        assert_eq!(form.draft.physical, DEFAULT_LEVEL);
        assert_eq!(form.draft.sleep_quality, Some(DEFAULT_CONTEXT_LEVEL));
        assert_eq!(form.draft.date, "2026-02-10");
    }

    #[test]
    fn existing_entry_fills_the_form() {
        let mut form = EditForm::new(d("2026-02-10"));
        form.apply_loaded(Some(EnergyLevels {
            date: "2026-02-10".into(),
            physical: 8,
            mental: 2,
            emotional: 4,
            nutrition: Some(Nutrition::Poor),
            ..EnergyLevels::default()
        }));
        assert!(form.has_existing);
        assert_eq!(form.draft.physical, 8);
        assert_eq!(form.draft.nutrition, Some(Nutrition::Poor));
        assert_eq!(form.draft.stress_level, Some(DEFAULT_CONTEXT_LEVEL));
    }

    #[test]
    fn changing_date_resets_context_and_step() {
        let mut form = EditForm::new(d("2026-02-10"));
        form.draft.physical = 9;
        form.draft.notes = Some("long day".into());
        form.step = FormStep::Context;

        form.select_date(d("2026-02-11"));
        assert_eq!(form.step, FormStep::Scores);
        assert_eq!(form.draft.notes, None);
        assert_eq!(form.draft.physical, 9);
        assert_eq!(form.draft.date, "2026-02-11");
    }

    #[test]
    fn failed_load_sets_retryable_error() {
        let mut form = EditForm::new(d("2026-02-10"));
        form.draft.physical = 1;
        form.fail_load();
        assert_eq!(form.load_error, Some(LOAD_ERROR));
        assert_eq!(form.draft.physical, DEFAULT_LEVEL);
    }

    #[test]
    fn saved_record_replaces_draft_and_shows_toast() {
        let mut form = EditForm::new(d("2026-02-10"));
        form.status = FormStatus::Saving;
        let saved = EnergyLevels {
            date: "2026-02-10".into(),
            physical: 7,
            mental: 7,
            emotional: 7,
            ..EnergyLevels::default()
        };
        let now = Instant::now();
        form.apply_saved(saved.clone(), now);

        assert_eq!(form.status, FormStatus::Idle);
        assert!(form.has_existing);
        assert_eq!(form.draft.physical, 7);
        assert_eq!(form.toast(now + Duration::from_secs(1)), Some(&saved));
        assert_eq!(form.toast(now + TOAST_DURATION), None);
    }

    #[tokio::test]
    async fn dropped_save_releases_the_form() {
        // Accepts connections and never answers.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let api = ApiClient::with_client(reqwest::Client::new(), format!("http://{addr}/api"));
        let storage = Mutex::new(MemoryStore::default());
        let form = Arc::new(Mutex::new(EditForm::new(d("2026-02-10"))));
        let draft = EnergyLevels {
            date: "2026-02-10".into(),
            physical: 6,
            ..EnergyLevels::default()
        };

        let outcome = tokio::time::timeout(
            Duration::from_millis(200),
            save(&form, &storage, &api, "t", draft),
        )
        .await;
        assert!(outcome.is_err());

        let form = form.lock().await;
        assert_eq!(form.status, FormStatus::Idle);
        assert!(!form.context_disabled());
        assert_eq!(form.draft.physical, 6);
        assert_eq!(form.save_error, None);
    }

    #[test]
    fn failed_save_keeps_input() {
        let mut form = EditForm::new(d("2026-02-10"));
        form.draft.mental = 2;
        form.status = FormStatus::Saving;
        form.fail_save();
        assert_eq!(form.save_error, Some(SAVE_ERROR));
        assert_eq!(form.draft.mental, 2);
        assert!(!form.context_disabled());
    }
}
