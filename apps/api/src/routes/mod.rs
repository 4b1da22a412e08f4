pub mod health;
pub mod templates;


use axum::{
    routing::{get, post},
    Router,
};

use crate::auth::handlers as auth;
use crate::profile::handlers as profile;
use crate::resumes::handlers as resumes;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Auth API
        .route("/api/auth/signup", post(auth::handle_signup))
        .route("/api/auth/login", post(auth::handle_login))
        .route("/api/auth/logout", post(auth::handle_logout))
        .route(
            "/api/auth/forgot-password",
            post(auth::handle_forgot_password),
        )
        .route(
            "/api/auth/reset-password",
            post(auth::handle_reset_password),
        )
        // Profile API
        .route(
            "/api/user/profile",
            get(profile::handle_get_profile).put(profile::handle_update_profile),
        )
        // Resume API
        .route(
            "/api/resumes",
            get(resumes::handle_list_resumes).post(resumes::handle_create_resume),
        )
        .route(
            "/api/resumes/:id",
            get(resumes::handle_get_resume)
                .patch(resumes::handle_update_resume)
                .delete(resumes::handle_delete_resume),
        )
        .route(
            "/api/resumes/:id/export",
            get(resumes::handle_export_resume),
        )
        // Template catalogue
        .route("/api/templates", get(templates::handle_list_templates))
        .route("/api/templates/:id", get(templates::handle_get_template))
        .with_state(state)
}
