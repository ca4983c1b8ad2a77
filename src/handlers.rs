use crate::analytics::{self, AnalyticsEvent};
use crate::cache::{self, CacheStatus};
use crate::chart::{ChartPoint, build_chart_data};
use crate::dates::{date_key, parse_date, today};
use crate::edit_form::{self, FormStep};
use crate::errors::{ApiError, AppError};
use crate::fetch::ViewError;
use crate::forms::{EnergyForm, LoginForm, SignupForm};
use crate::guards::{Access, GuardOutcome, HOME_PATH, LOGIN_PATH, guard};
use crate::models::{CreateUserRequest, LoginRequest};
use crate::range::{Preset, RangeField, check_span};
use crate::range_view::{self, RangeSource};
use crate::spending;
use crate::state::AppState;
use crate::ui::{
    ActivationOutcome, AuthPage, Feedback, render_activate, render_auth, render_edit_page,
    render_landing, render_pending, render_range_page, render_spending,
};
use axum::{
    Form, Json,
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Instant;
use tracing::{info, warn};

type PageResult = Result<Response, AppError>;

/// Applies the route's access policy. `Some` short-circuits the handler.
async fn enforce(state: &AppState, access: Access, path: &str) -> Option<Response> {
    let auth = state.auth.lock().await.clone();
    match guard(access, auth.status) {
        GuardOutcome::Allow => None,
        GuardOutcome::Pending => Some(Html(render_pending(&auth)).into_response()),
        GuardOutcome::Redirect(target) => {
            if access == Access::Protected {
                analytics::track(AnalyticsEvent::AuthRedirectBlocked, json!({ "path": path }));
            }
            Some(Redirect::to(target).into_response())
        }
    }
}

/// The stored bearer token, or a redirect to the login page.
async fn bearer(state: &AppState) -> Result<String, AppError> {
    match state.token().await {
        Some(token) => Ok(token),
        None => {
            state.expire_session().await?;
            Err(AppError::redirect(LOGIN_PATH))
        }
    }
}

async fn view_failure(state: &AppState, err: ViewError) -> AppError {
    match err {
        ViewError::Superseded => AppError::superseded(),
        ViewError::Unauthorized => match state.expire_session().await {
            Ok(()) => AppError::redirect(LOGIN_PATH),
            Err(err) => err,
        },
    }
}

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let auth = state.auth.lock().await.clone();
    Html(render_landing(&auth))
}

pub async fn auth_page(State(state): State<AppState>) -> PageResult {
    if let Some(response) = enforce(&state, Access::AnonymousOnly, LOGIN_PATH).await {
        return Ok(response);
    }
    let auth = state.auth.lock().await.clone();
    Ok(Html(render_auth(&auth, &AuthPage::default())).into_response())
}

pub async fn login(State(state): State<AppState>, Form(form): Form<LoginForm>) -> PageResult {
    if let Some(response) = enforce(&state, Access::AnonymousOnly, "/auth/login").await {
        return Ok(response);
    }

    let email = form.email.trim().to_string();
    let mut page = AuthPage {
        login_email: email.clone(),
        login_errors: LoginForm {
            email: email.clone(),
            password: form.password.clone(),
        }
        .validate(),
        ..AuthPage::default()
    };

    if page.login_errors.is_empty() {
        let request = LoginRequest {
            email: email.clone(),
            password: form.password,
        };
        match state.api.login(&request).await {
            Ok(tokens) => {
                {
                    let mut session = state.session.lock().await;
                    session.persist(&tokens.id_token, &tokens.refresh_token);
                    session.store_mut().flush().await?;
                }
                state.auth.lock().await.sign_in(email.clone());
                info!(email = %email, "signed in");
                analytics::track(AnalyticsEvent::AuthLoginSuccess, json!({ "method": "password" }));
                return Ok(Redirect::to(HOME_PATH).into_response());
            }
            Err(err) => {
                warn!("login failed: {err}");
                page.login_feedback = Some(Feedback {
                    success: false,
                    message: "Invalid email or password.".to_string(),
                });
            }
        }
    }

    let auth = state.auth.lock().await.clone();
    Ok(Html(render_auth(&auth, &page)).into_response())
}

pub async fn signup(State(state): State<AppState>, Form(form): Form<SignupForm>) -> PageResult {
    if let Some(response) = enforce(&state, Access::AnonymousOnly, "/auth/signup").await {
        return Ok(response);
    }

    let form = SignupForm {
        email: form.email.trim().to_string(),
        ..form
    };
    let mut page = AuthPage {
        signup_email: form.email.clone(),
        signup_errors: form.validate(),
        ..AuthPage::default()
    };

    if page.signup_errors.is_empty() {
        let request = CreateUserRequest {
            email: form.email,
            password: form.password,
            confirm_password: form.confirm_password,
            timezone: Some(state.config.timezone.clone()),
        };
        page.signup_feedback = Some(match state.api.create_user(&request).await {
            Ok(_) => {
                info!(email = %request.email, "account created, awaiting activation");
                page.signup_email.clear();
                Feedback {
                    success: true,
                    message: "Check your email to activate your account.".to_string(),
                }
            }
            Err(err) => {
                warn!("signup failed: {err}");
                Feedback {
                    success: false,
                    message: "Unable to create account. Please try again.".to_string(),
                }
            }
        });
    }

    let auth = state.auth.lock().await.clone();
    Ok(Html(render_auth(&auth, &page)).into_response())
}

pub async fn logout(State(state): State<AppState>) -> PageResult {
    {
        let mut session = state.session.lock().await;
        state.auth.lock().await.sign_out(&mut session);
        session.store_mut().flush().await?;
    }
    state.range_view.lock().await.cancel();
    state.edit_form.lock().await.cancel();
    cache::clear_range_cache(&mut *state.session_storage.lock().await);
    info!("signed out");
    Ok(Redirect::to(LOGIN_PATH).into_response())
}

/// Rotates both stored tokens.
pub async fn refresh_tokens(State(state): State<AppState>) -> PageResult {
    if let Some(response) = enforce(&state, Access::Protected, "/auth/refresh").await {
        return Ok(response);
    }

    let refresh_token = state.session.lock().await.refresh_token();
    let Some(refresh_token) = refresh_token else {
        state.expire_session().await?;
        return Err(AppError::redirect(LOGIN_PATH));
    };

    match state.api.refresh(&refresh_token).await {
        Ok(tokens) => {
            let mut session = state.session.lock().await;
            session.persist(&tokens.id_token, &tokens.refresh_token);
            session.store_mut().flush().await?;
            info!("tokens refreshed");
            Ok(Redirect::to(HOME_PATH).into_response())
        }
        Err(ApiError::Unauthorized) => {
            state.expire_session().await?;
            Err(AppError::redirect(LOGIN_PATH))
        }
        Err(err) => {
            warn!("token refresh failed: {err}");
            Err(AppError::internal(err))
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ActivateQuery {
    pub token: Option<String>,
}

pub async fn activate(
    State(state): State<AppState>,
    Query(query): Query<ActivateQuery>,
) -> PageResult {
    if let Some(response) = enforce(&state, Access::AnonymousOnly, "/activate").await {
        return Ok(response);
    }

    let token = query.token.unwrap_or_default();
    let outcome = if token.trim().is_empty() {
        ActivationOutcome::MissingToken
    } else {
        match state.api.activate(token.trim()).await {
            Ok(response) => {
                info!(detail = %response.message, "account activated");
                ActivationOutcome::Activated
            }
            Err(err) => {
                warn!("activation failed: {err}");
                ActivationOutcome::Failed
            }
        }
    };

    let auth = state.auth.lock().await.clone();
    Ok(Html(render_activate(&auth, outcome)).into_response())
}

#[derive(Debug, Deserialize)]
pub struct SpendingQuery {
    pub start: Option<String>,
    pub end: Option<String>,
}

pub async fn timespending(
    State(state): State<AppState>,
    Query(query): Query<SpendingQuery>,
) -> PageResult {
    if let Some(response) = enforce(&state, Access::Protected, HOME_PATH).await {
        return Ok(response);
    }
    let token = bearer(&state).await?;

    let (default_start, default_end) = spending::default_range(today());
    let start = query.start.unwrap_or(default_start);
    let end = query.end.unwrap_or(default_end);

    let view = match spending::load(&state.api, &token, start, end).await {
        Ok(view) => view,
        Err(err) => return Err(view_failure(&state, err).await),
    };

    let auth = state.auth.lock().await.clone();
    Ok(Html(render_spending(&auth, &view)).into_response())
}

#[derive(Debug, Default, Deserialize)]
pub struct RangeQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    pub preset: Option<String>,
    pub field: Option<String>,
    pub refresh: Option<String>,
}

impl RangeQuery {
    fn wants_refresh(&self) -> bool {
        matches!(self.refresh.as_deref(), Some("1" | "true"))
    }
}

pub async fn energy_levels(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> PageResult {
    if let Some(response) = enforce(&state, Access::Protected, "/energy/levels").await {
        return Ok(response);
    }
    let token = bearer(&state).await?;

    {
        let mut view = state.range_view.lock().await;
        let selection = &mut view.selection;
        match query.preset.as_deref().and_then(Preset::parse) {
            Some(preset) => selection.apply_preset(preset, today()),
            None => {
                let from = query.from.as_deref().and_then(parse_date);
                let to = query.to.as_deref().and_then(parse_date);
                match query.field.as_deref().and_then(RangeField::parse) {
                    Some(RangeField::From) => {
                        if let Some(from) = from {
                            selection.edit(RangeField::From, from);
                        }
                    }
                    Some(RangeField::To) => {
                        if let Some(to) = to {
                            selection.edit(RangeField::To, to);
                        }
                    }
                    None => {
                        if let Some(from) = from.filter(|from| *from != selection.from) {
                            selection.edit(RangeField::From, from);
                        }
                        if let Some(to) = to.filter(|to| *to != selection.to) {
                            selection.edit(RangeField::To, to);
                        }
                    }
                }
            }
        }
    }

    if let Err(err) = range_view::load(
        &state.range_view,
        state.session_storage.clone(),
        state.api.clone(),
        token,
        query.wants_refresh(),
    )
    .await
    {
        return Err(view_failure(&state, err).await);
    }

    let auth = state.auth.lock().await.clone();
    let view = state.range_view.lock().await;
    Ok(Html(render_range_page(&auth, &view)).into_response())
}

#[derive(Debug, Deserialize)]
pub struct EditQuery {
    pub date: Option<String>,
    pub step: Option<u8>,
}

pub async fn edit_page(
    State(state): State<AppState>,
    Query(query): Query<EditQuery>,
) -> PageResult {
    if let Some(response) = enforce(&state, Access::Protected, "/energy/levels/edit").await {
        return Ok(response);
    }
    let token = bearer(&state).await?;

    let date = query.date.as_deref().and_then(parse_date).unwrap_or_else(today);
    {
        let mut form = state.edit_form.lock().await;
        form.select_date(date);
        form.step = match query.step {
            Some(2) => FormStep::Context,
            _ => FormStep::Scores,
        };
    }

    // A bare visit or a date change loads the day; step navigation does not.
    if query.step.is_none() {
        if let Err(err) = edit_form::load(&state.edit_form, state.api.clone(), token).await {
            return Err(view_failure(&state, err).await);
        }
    }

    let auth = state.auth.lock().await.clone();
    let form = state.edit_form.lock().await;
    Ok(Html(render_edit_page(&auth, &form, Instant::now())).into_response())
}

pub async fn edit_submit(
    State(state): State<AppState>,
    Form(submission): Form<EnergyForm>,
) -> PageResult {
    if let Some(response) = enforce(&state, Access::Protected, "/energy/levels/edit").await {
        return Ok(response);
    }
    let token = bearer(&state).await?;

    let action = submission.action.clone();
    let date = parse_date(&submission.date)
        .ok_or_else(|| AppError::bad_request("date must be YYYY-MM-DD"))?;
    let levels = submission.into_levels().map_err(AppError::bad_request)?;
    let date_key = date_key(date);

    match action.as_str() {
        "next" | "back" => {
            let mut form = state.edit_form.lock().await;
            if form.date != date {
                // A different day: load it instead of carrying this draft over.
                form.select_date(date);
                return Ok(Redirect::to(&format!("/energy/levels/edit?date={date_key}")).into_response());
            }
            form.draft = levels;
            let step = if action == "next" { 2 } else { 1 };
            Ok(Redirect::to(&format!("/energy/levels/edit?date={date_key}&step={step}")).into_response())
        }
        "save" => {
            state.edit_form.lock().await.select_date(date);
            if let Err(err) = edit_form::save(
                &state.edit_form,
                &state.session_storage,
                &state.api,
                &token,
                levels,
            )
            .await
            {
                return Err(view_failure(&state, err).await);
            }
            Ok(Redirect::to(&format!("/energy/levels/edit?date={date_key}&step=2")).into_response())
        }
        other => Err(AppError::bad_request(format!("unknown action {other:?}"))),
    }
}

#[derive(Debug, Deserialize)]
pub struct ChartQuery {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub refresh: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChartResponse {
    pub from: String,
    pub to: String,
    pub status: CacheStatus,
    pub source: RangeSource,
    pub points: Vec<ChartPoint>,
}

/// Gap-filled series for a range, through the same cache as the page.
pub async fn chart_data(
    State(state): State<AppState>,
    Query(query): Query<ChartQuery>,
) -> Result<Json<ChartResponse>, AppError> {
    if !state.auth.lock().await.is_authenticated() {
        return Err(AppError::redirect(LOGIN_PATH));
    }
    let token = bearer(&state).await?;

    let (Some(from), Some(to)) = (parse_date(&query.from), parse_date(&query.to)) else {
        return Err(AppError::bad_request("from and to must be YYYY-MM-DD"));
    };
    check_span(from, to).map_err(AppError::bad_request)?;

    let bypass = matches!(query.refresh.as_deref(), Some("1" | "true"));
    let (entry, source) =
        match range_view::fetch_range(&state.api, &state.session_storage, &token, from, to, bypass)
            .await
        {
            Ok(fetched) => fetched,
            Err(ApiError::Unauthorized) => {
                state.expire_session().await?;
                return Err(AppError::redirect(LOGIN_PATH));
            }
            Err(err) => {
                warn!("chart data load failed: {err}");
                return Err(AppError::internal(err));
            }
        };

    Ok(Json(ChartResponse {
        from: date_key(from),
        to: date_key(to),
        status: entry.status,
        source,
        points: build_chart_data(&entry.levels, from, to),
    }))
}
