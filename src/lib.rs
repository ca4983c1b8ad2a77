pub mod analytics;
pub mod api;
pub mod app;
pub mod auth;
pub mod cache;
pub mod chart;
pub mod config;
pub mod dates;
pub mod edit_form;
pub mod errors;
pub mod fetch;
pub mod forms;
pub mod guards;
pub mod handlers;
pub mod models;
pub mod range;
pub mod range_view;
pub mod session;
pub mod spending;
pub mod state;
pub mod storage;
pub mod ui;

pub use app::router;
pub use config::Config;
pub use state::AppState;
