use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};
use tower_http::cors::CorsLayer;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/login", post(handlers::login))
        .route("/api/logout", post(handlers::logout))
        .route("/api/register", post(handlers::register))
        .route("/api/password-recovery", post(handlers::password_recovery))
        .route("/api/me", get(handlers::dashboard))
        .route("/api/punches/today", get(handlers::get_today_punches))
        .route("/api/punches", post(handlers::register_punch))
        .route("/api/mirror", get(handlers::get_mirror))
        .route("/api/leave-requests", post(handlers::submit_leave_request))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
