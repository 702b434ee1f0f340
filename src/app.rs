use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use std::path::Path;
use tower_http::{services::ServeDir, trace::TraceLayer};

pub fn router(state: AppState, static_dir: &Path) -> Router {
    Router::new()
        .route("/", get(handlers::user_index))
        .route("/section/:name", get(handlers::user_section))
        .route("/api/sections/:name", get(handlers::user_section_json))
        .route("/forms/:form", post(handlers::user_form))
        .route("/actions/:action", post(handlers::user_action))
        .route("/logout", post(handlers::user_logout))
        .route("/panels/habit/:id", get(handlers::habit_panel))
        .route("/panels/assign/:kind", get(handlers::assign_panel))
        .route("/panels/assign-custom/:kind", get(handlers::assign_custom_panel))
        .route("/panels/longest-streak", get(handlers::longest_streak_panel))
        .route("/panels/strugglest", get(handlers::strugglest_panel))
        .route("/admin", get(handlers::admin_index))
        .route("/admin/section/:name", get(handlers::admin_section))
        .route("/admin/api/sections/:name", get(handlers::admin_section_json))
        .route("/admin/forms/:form", post(handlers::admin_form))
        .route("/admin/actions/:action", post(handlers::admin_action))
        .route("/admin/logout", post(handlers::admin_logout))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
