use crate::content::{RowAction, SectionView};
use crate::errors::AppError;
use crate::forms::Submitted;
use crate::models::HabitKind;
use crate::state::AppState;
use crate::ui::{render_page, Page};
use crate::views::admin::{self, AdminForm};
use crate::views::user::{self, Highlight, UserForm};
use crate::views::View;
use axum::{
    extract::{Path, Query, State},
    response::{Html, Redirect},
    Form, Json,
};
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct ActionRequest {
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct KindQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl KindQuery {
    fn habit_kind(&self) -> Option<HabitKind> {
        self.kind.as_deref().and_then(HabitKind::parse)
    }
}

fn page(
    state: &AppState,
    view: View,
    active: Option<&str>,
    section: &SectionView,
    authenticated: bool,
) -> Html<String> {
    Html(render_page(&Page {
        view,
        active,
        section,
        authenticated,
        backend_url: state.backend.base_url(),
    }))
}

fn parse_kind(kind: &str) -> Result<HabitKind, AppError> {
    HabitKind::parse(kind).ok_or_else(|| AppError::InvalidKind(kind.to_string()))
}

// User view

pub async fn user_index(State(state): State<AppState>) -> Html<String> {
    render_user_section(&state, "home").await
}

pub async fn user_section(State(state): State<AppState>, Path(name): Path<String>) -> Html<String> {
    render_user_section(&state, &name).await
}

async fn render_user_section(state: &AppState, name: &str) -> Html<String> {
    let session = state.user_session().await;
    let section = user::load_section(&state.backend, &session, name).await;
    page(state, View::User, Some(name), &section, session.is_authenticated())
}

pub async fn user_section_json(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Json<SectionView> {
    let session = state.user_session().await;
    Json(user::load_section(&state.backend, &session, &name).await)
}

pub async fn user_form(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Form(fields): Form<Submitted>,
) -> Result<Redirect, AppError> {
    let form = UserForm::from_slug(&slug).ok_or_else(|| AppError::UnknownForm(slug.clone()))?;
    let next = user::submit_form(&state, form, &fields).await;
    Ok(Redirect::to(&View::User.section_path(next.name())))
}

pub async fn user_action(
    Path(slug): Path<String>,
    Form(request): Form<ActionRequest>,
) -> Result<Redirect, AppError> {
    match RowAction::from_slug(&slug) {
        Some(RowAction::ManageHabit) => Ok(Redirect::to(&habit_panel_path(&request.value))),
        _ => Err(AppError::UnknownAction(slug)),
    }
}

/// Panel route for a habit id posted by the browser, percent-encoded so it is
/// always a valid `Location` header.
fn habit_panel_path(id: &str) -> String {
    format!("/panels/habit/{}", urlencoding::encode(id))
}

pub async fn user_logout(State(state): State<AppState>) -> Redirect {
    state.user.lock().await.sign_out();
    info!("user signed out");
    Redirect::to("/")
}

pub async fn habit_panel(State(state): State<AppState>, Path(id): Path<String>) -> Html<String> {
    let session = state.user_session().await;
    let section = user::habit_panel(&state.backend, &session, &id).await;
    page(&state, View::User, None, &section, session.is_authenticated())
}

pub async fn assign_panel(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> Result<Html<String>, AppError> {
    let kind = parse_kind(&kind)?;
    let session = state.user_session().await;
    let section = user::assign_panel(&state.backend, &session, kind).await;
    Ok(page(&state, View::User, None, &section, session.is_authenticated()))
}

pub async fn assign_custom_panel(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> Result<Html<String>, AppError> {
    let kind = parse_kind(&kind)?;
    let session = state.user_session().await;
    let section = user::assign_custom_panel(&session, kind);
    Ok(page(&state, View::User, None, &section, session.is_authenticated()))
}

pub async fn longest_streak_panel(
    State(state): State<AppState>,
    Query(query): Query<KindQuery>,
) -> Html<String> {
    highlight_panel(&state, Highlight::LongestStreak, query.habit_kind()).await
}

pub async fn strugglest_panel(
    State(state): State<AppState>,
    Query(query): Query<KindQuery>,
) -> Html<String> {
    highlight_panel(&state, Highlight::Strugglest, query.habit_kind()).await
}

async fn highlight_panel(
    state: &AppState,
    highlight: Highlight,
    kind: Option<HabitKind>,
) -> Html<String> {
    let session = state.user_session().await;
    let section = user::highlight_panel(&state.backend, &session, highlight, kind).await;
    page(state, View::User, None, &section, session.is_authenticated())
}

// Admin view

pub async fn admin_index(State(state): State<AppState>) -> Html<String> {
    render_admin_section(&state, "home").await
}

pub async fn admin_section(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Html<String> {
    render_admin_section(&state, &name).await
}

async fn render_admin_section(state: &AppState, name: &str) -> Html<String> {
    let session = state.admin_session().await;
    let section = admin::load_section(&state.backend, &session, name).await;
    page(state, View::Admin, Some(name), &section, session.is_authenticated())
}

pub async fn admin_section_json(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Json<SectionView> {
    let session = state.admin_session().await;
    Json(admin::load_section(&state.backend, &session, &name).await)
}

pub async fn admin_form(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Form(fields): Form<Submitted>,
) -> Result<Redirect, AppError> {
    let form = AdminForm::from_slug(&slug).ok_or_else(|| AppError::UnknownForm(slug.clone()))?;
    let next = admin::submit_form(&state, form, &fields).await;
    Ok(Redirect::to(&View::Admin.section_path(next.name())))
}

pub async fn admin_action(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Form(request): Form<ActionRequest>,
) -> Result<Redirect, AppError> {
    let action = RowAction::from_slug(&slug).ok_or_else(|| AppError::UnknownAction(slug.clone()))?;
    let next = admin::run_action(&state, action, &request.value)
        .await
        .ok_or(AppError::UnknownAction(slug))?;
    Ok(Redirect::to(&View::Admin.section_path(next.name())))
}

pub async fn admin_logout(State(state): State<AppState>) -> Redirect {
    state.admin.lock().await.sign_out();
    info!("admin signed out");
    Redirect::to("/admin")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::LOCATION;
    use axum::response::IntoResponse;

    async fn manage(value: &str) -> Result<Redirect, AppError> {
        user_action(
            Path("manage-habit".to_string()),
            Form(ActionRequest {
                value: value.to_string(),
            }),
        )
        .await
    }

    #[tokio::test]
    async fn manage_redirect_encodes_the_habit_id() {
        let response = manage("h1\nx/../y").await.unwrap().into_response();
        assert_eq!(response.headers()[LOCATION], "/panels/habit/h1%0Ax%2F..%2Fy");

        let response = manage("65f0c2a1").await.unwrap().into_response();
        assert_eq!(response.headers()[LOCATION], "/panels/habit/65f0c2a1");
    }

    #[tokio::test]
    async fn admin_only_actions_are_unknown_to_the_user_view() {
        let result = user_action(
            Path("remove-user".to_string()),
            Form(ActionRequest {
                value: "u1".to_string(),
            }),
        )
        .await;
        assert!(matches!(result, Err(AppError::UnknownAction(slug)) if slug == "remove-user"));
    }
}
