use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/auth", get(handlers::auth_page))
        .route("/auth/login", post(handlers::login))
        .route("/auth/signup", post(handlers::signup))
        .route("/auth/logout", post(handlers::logout))
        .route("/auth/refresh", post(handlers::refresh_tokens))
        .route("/activate", get(handlers::activate))
        .route("/timespending", get(handlers::timespending))
        .route("/energy/levels", get(handlers::energy_levels))
        .route(
            "/energy/levels/edit",
            get(handlers::edit_page).post(handlers::edit_submit),
        )
        .route("/api/energy/chart", get(handlers::chart_data))
        .with_state(state)
}
