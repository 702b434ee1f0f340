//! Admin view: user and habit catalogue management.

use super::{logged_in, not_logged_in, placeholder};
use crate::backend::{self, BackendClient};
use crate::content::{Cell, Form, Input, Item, RowAction, SectionView, SelectOption, Table};
use crate::forms::{self, Submitted};
use crate::session::{Credentials, Session};
use crate::state::AppState;
use serde_json::Value;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminSection {
    Home,
    Users,
    Habits,
}

impl AdminSection {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "home" => Some(AdminSection::Home),
            "users" => Some(AdminSection::Users),
            "habits" => Some(AdminSection::Habits),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            AdminSection::Home => "home",
            AdminSection::Users => "users",
            AdminSection::Habits => "habits",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminForm {
    Login,
    CreateHabit,
}

impl AdminForm {
    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "login" => Some(AdminForm::Login),
            "create-habit" => Some(AdminForm::CreateHabit),
            _ => None,
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            AdminForm::Login => "login",
            AdminForm::CreateHabit => "create-habit",
        }
    }

    pub fn spec(self) -> Form {
        let submit_to = format!("/admin/forms/{}", self.slug());
        match self {
            AdminForm::Login => Form::new(
                submit_to,
                "admin/validate",
                vec![
                    Input::text("username", "Admin Username"),
                    Input::password("password", "Admin Password"),
                ],
            )
            .button("Login"),
            AdminForm::CreateHabit => Form::new(
                submit_to,
                "/habit/add",
                vec![
                    Input::text("name", "Habit Name"),
                    Input::select(
                        "type",
                        "Habit Type",
                        vec![
                            SelectOption::new("daily", "Daily"),
                            SelectOption::new("weekly", "Weekly"),
                        ],
                    ),
                    Input::text("category", "Habit Category"),
                    Input::text("subcategory", "Habit Sub Category"),
                    Input::text("description", "Habit Description"),
                ],
            )
            .button("Create")
            .authorized(),
        }
    }
}

/// Routes a section name to its builder.
pub async fn load_section(backend: &BackendClient, session: &Session, name: &str) -> SectionView {
    match AdminSection::from_name(name) {
        Some(AdminSection::Home) => home(session),
        Some(AdminSection::Users) => users(backend, session).await,
        Some(AdminSection::Habits) => habits(backend, session).await,
        None => placeholder(),
    }
}

fn home(session: &Session) -> SectionView {
    let items = if session.is_authenticated() {
        logged_in("ADMIN AUTHORIZED")
    } else {
        vec![Item::title("LOG IN"), Item::Separator, Item::Form(AdminForm::Login.spec())]
    };
    SectionView::single("Home", items)
}

async fn users(backend: &BackendClient, session: &Session) -> SectionView {
    if !session.is_authenticated() {
        return SectionView::single("Users Manager", not_logged_in());
    }

    let table = Table::new(
        ["User Name", "Email", "Name", "Action"],
        users_rows(backend, session).await,
    );
    SectionView::single("Users Manager", vec![Item::title("Users"), Item::Table(table)])
}

async fn users_rows(backend: &BackendClient, session: &Session) -> Vec<Vec<Cell>> {
    match backend.list_users(session.credentials()).await {
        Ok(users) => users
            .into_iter()
            .map(|user| {
                vec![
                    Cell::text(user.username),
                    Cell::text(user.email),
                    Cell::text(user.name),
                    Cell::action(RowAction::RemoveUser, user.id, "Remove"),
                ]
            })
            .collect(),
        Err(err) => {
            error!("failed to fetch users: {err}");
            Vec::new()
        }
    }
}

async fn habits(backend: &BackendClient, session: &Session) -> SectionView {
    if !session.is_authenticated() {
        return SectionView::single("Habits Manager", not_logged_in());
    }

    let table = Table::new(
        ["Name", "Type", "Description", "Category", "Sub-Category", "Action"],
        habits_rows(backend).await,
    );
    SectionView::single(
        "Habits Manager",
        vec![
            Item::title_left("Create new Habit"),
            Item::Form(AdminForm::CreateHabit.spec()),
            Item::title("Actual Habits"),
            Item::Table(table),
        ],
    )
}

async fn habits_rows(backend: &BackendClient) -> Vec<Vec<Cell>> {
    match backend.list_habits(None).await {
        Ok(habits) => habits
            .into_iter()
            .map(|habit| {
                vec![
                    Cell::text(habit.name),
                    Cell::text(habit.kind.unwrap_or_default()),
                    Cell::text(habit.description.unwrap_or_default()),
                    Cell::text(habit.category.unwrap_or_default()),
                    Cell::text(habit.subcategory.unwrap_or_default()),
                    Cell::action(RowAction::RemoveHabit, habit.id, "Remove"),
                ]
            })
            .collect(),
        Err(err) => {
            error!("failed to fetch habits: {err}");
            Vec::new()
        }
    }
}

/// Whether an `admin/validate` reply accepts the credentials.
pub fn login_accepted(reply: &Value) -> bool {
    backend::is_success(reply) || reply.get("validated").and_then(Value::as_bool).unwrap_or(false)
}

/// Handles a submitted admin form and returns the section to show next.
pub async fn submit_form(state: &AppState, form: AdminForm, submitted: &Submitted) -> AdminSection {
    let session = state.admin_session().await;
    let spec = form.spec();
    let mut payload = forms::collect_fields(&spec, submitted);
    if spec.authorized {
        if let Some(creds) = session.credentials() {
            creds.attach(&mut payload);
        }
    }
    let attempted = Credentials::from_payload(&payload);

    let reply = forms::submit(&state.backend, &spec, payload).await;

    match form {
        AdminForm::Login => {
            let accepted = login_accepted(&reply);
            info!(
                username = attempted
                    .as_ref()
                    .map(|creds| creds.username.as_str())
                    .unwrap_or_default(),
                accepted,
                "admin login"
            );
            state.admin.lock().await.sign_in(attempted, accepted);
            AdminSection::Home
        }
        AdminForm::CreateHabit => {
            if !backend::is_success(&reply) {
                warn!(error = backend::error_message(&reply), "habit was not created");
            }
            AdminSection::Habits
        }
    }
}

/// Runs a row action and returns the section to reload. The section is reloaded
/// whatever the backend answered.
pub async fn run_action(state: &AppState, action: RowAction, value: &str) -> Option<AdminSection> {
    let session = state.admin_session().await;
    let creds = session.credentials();

    let (result, section) = match action {
        RowAction::RemoveUser => (
            state.backend.delete_user(creds, value).await,
            AdminSection::Users,
        ),
        RowAction::RemoveHabit => (
            state.backend.remove_habit(creds, value).await,
            AdminSection::Habits,
        ),
        RowAction::ManageHabit => return None,
    };

    match result {
        Ok(reply) if backend::is_success(&reply) => {
            info!(action = action.slug(), id = value, "row action applied")
        }
        Ok(reply) => warn!(
            action = action.slug(),
            id = value,
            error = backend::error_message(&reply),
            "row action rejected"
        ),
        Err(err) => error!(action = action.slug(), id = value, "row action failed: {err}"),
    }
    Some(section)
}
