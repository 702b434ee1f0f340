//! User view: login/registration, habit reviews and habit panels.

use super::{logged_in, not_logged_in, placeholder};
use crate::backend::{self, BackendClient};
use crate::content::{
    Align, Cell, Column, Form, Input, Item, RowAction, SectionView, SelectOption, Table,
};
use crate::forms::{self, Submitted};
use crate::models::{display_value, Habit, HabitKind};
use crate::render::Element;
use crate::session::{Credentials, Session};
use crate::state::AppState;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserSection {
    Home,
    HabitsReview,
    HabitsDayReview,
    HabitsWeekReview,
}

impl UserSection {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "home" => Some(UserSection::Home),
            "habitsReview" => Some(UserSection::HabitsReview),
            "habitsDayReview" => Some(UserSection::HabitsDayReview),
            "habitsWeekReview" => Some(UserSection::HabitsWeekReview),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            UserSection::Home => "home",
            UserSection::HabitsReview => "habitsReview",
            UserSection::HabitsDayReview => "habitsDayReview",
            UserSection::HabitsWeekReview => "habitsWeekReview",
        }
    }

    pub fn for_kind(kind: Option<HabitKind>) -> Self {
        match kind {
            Some(HabitKind::Daily) => UserSection::HabitsDayReview,
            Some(HabitKind::Weekly) => UserSection::HabitsWeekReview,
            None => UserSection::HabitsReview,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserForm {
    Login,
    Register,
    Assign(HabitKind),
    AssignCustom(HabitKind),
    Remove,
    Complete(HabitKind),
}

impl UserForm {
    pub fn from_slug(slug: &str) -> Option<Self> {
        let kinded = |prefix: &str| slug.strip_prefix(prefix).and_then(HabitKind::parse);
        match slug {
            "login" => Some(UserForm::Login),
            "register" => Some(UserForm::Register),
            "remove-habit" => Some(UserForm::Remove),
            _ => kinded("assign-custom-")
                .map(UserForm::AssignCustom)
                .or_else(|| kinded("assign-").map(UserForm::Assign))
                .or_else(|| kinded("complete-").map(UserForm::Complete)),
        }
    }

    pub fn slug(self) -> String {
        match self {
            UserForm::Login => "login".to_string(),
            UserForm::Register => "register".to_string(),
            UserForm::Assign(kind) => format!("assign-{kind}"),
            UserForm::AssignCustom(kind) => format!("assign-custom-{kind}"),
            UserForm::Remove => "remove-habit".to_string(),
            UserForm::Complete(kind) => format!("complete-{kind}"),
        }
    }

    fn submit_to(self) -> String {
        format!("/forms/{}", self.slug())
    }

    /// Form descriptor without any data-dependent values.
    pub fn spec(self) -> Form {
        match self {
            UserForm::Assign(kind) => assign_form(kind, Vec::new()),
            UserForm::Remove => remove_form(""),
            UserForm::Complete(kind) => complete_form(kind, ""),
            UserForm::Login => Form::new(
                self.submit_to(),
                "/login",
                vec![Input::text("username", "Username"), Input::password("password", "Password")],
            )
            .button("Login"),
            UserForm::Register => Form::new(
                self.submit_to(),
                "/register",
                vec![
                    Input::text("username", "Username"),
                    Input::password("password", "Password"),
                    Input::text("name", "Your Name"),
                    Input::email("email", "Email"),
                ],
            )
            .button("Register"),
            UserForm::AssignCustom(kind) => Form::new(
                self.submit_to(),
                "/user/assign_custom_habit",
                vec![
                    Input::hidden("type", kind.as_str()),
                    Input::text("name", "Habit Name"),
                    Input::text("category", "Habit Category"),
                    Input::text("subcategory", "Habit Sub Category"),
                    Input::text("description", "Habit Description"),
                    Input::date("start_range", "assign_custom", "Start Range"),
                    Input::date("end_range", "assign_custom", "End Range"),
                ],
            )
            .button("Assign")
            .authorized(),
        }
    }
}

fn assign_form(kind: HabitKind, options: Vec<SelectOption>) -> Form {
    Form::new(
        UserForm::Assign(kind).submit_to(),
        "/user/assign_habit",
        vec![
            Input::hidden("type", kind.as_str()),
            Input::select("habit_id", "Select Habit", options),
            Input::date("start_range", "assign", "Start Range"),
            Input::date("end_range", "assign", "End Range"),
        ],
    )
    .button("Assign")
    .authorized()
}

fn remove_form(habit_id: &str) -> Form {
    Form::new(
        UserForm::Remove.submit_to(),
        "/user/remove_habit",
        vec![Input::hidden("habit_id", habit_id)],
    )
    .button("Remove")
    .button_style("btn btn-outline-danger")
    .authorized()
}

fn complete_form(kind: HabitKind, habit_id: &str) -> Form {
    Form::new(
        UserForm::Complete(kind).submit_to(),
        kind.completion_endpoint(),
        vec![
            Input::hidden("habit_id", habit_id),
            Input::hidden("continue_habit", "true"),
            Input::date("completion_date", "complete", "Completion Date"),
        ],
    )
    .button("Complete")
    .button_style("btn btn-outline-success")
    .authorized()
}

/// Routes a section name to its builder.
pub async fn load_section(backend: &BackendClient, session: &Session, name: &str) -> SectionView {
    match UserSection::from_name(name) {
        Some(UserSection::Home) => home(session),
        Some(UserSection::HabitsReview) => habits(backend, session, None).await,
        Some(UserSection::HabitsDayReview) => {
            habits(backend, session, Some(HabitKind::Daily)).await
        }
        Some(UserSection::HabitsWeekReview) => {
            habits(backend, session, Some(HabitKind::Weekly)).await
        }
        None => placeholder(),
    }
}

fn home(session: &Session) -> SectionView {
    let items = if session.is_authenticated() {
        logged_in(format!("WELCOME {}", session.username()))
    } else {
        vec![
            Item::title("Log In"),
            Item::Form(UserForm::Login.spec()),
            Item::Separator,
            Item::title("or"),
            Item::Separator,
            Item::title("Register"),
            Item::Form(UserForm::Register.spec()),
        ]
    };
    SectionView::single("Home", items)
}

async fn habits(
    backend: &BackendClient,
    session: &Session,
    kind: Option<HabitKind>,
) -> SectionView {
    let header = match kind {
        Some(kind) => format!("Habits Manager ({kind})"),
        None => "Habits Manager".to_string(),
    };
    if !session.is_authenticated() {
        return SectionView::single(header, not_logged_in());
    }

    let mut headers = vec!["Name"];
    if kind.is_none() {
        headers.push("type");
    }
    headers.extend([
        "Description",
        "Status",
        "Streak",
        "Longest Streak",
        "Total Completions",
        "Expand/Manage",
    ]);

    let rows = habit_rows(backend, session, kind).await;
    SectionView::columns(
        header,
        vec![
            Column::new(2, vec![Item::div(habit_menu(kind))]),
            Column::new(
                10,
                vec![
                    Item::title("Actual Habits"),
                    Item::Table(Table::new(headers, rows)),
                ],
            ),
        ],
    )
}

async fn habit_rows(
    backend: &BackendClient,
    session: &Session,
    kind: Option<HabitKind>,
) -> Vec<Vec<Cell>> {
    let habits = match backend.user_habits(session.credentials(), kind).await {
        Ok(habits) => habits,
        Err(err) => {
            error!("failed to fetch user habits: {err}");
            return Vec::new();
        }
    };

    habits
        .into_iter()
        .map(|habit| {
            let mut row = vec![Cell::text(&habit.name)];
            if kind.is_none() {
                row.push(Cell::text(habit.kind.clone().unwrap_or_default()));
            }
            row.extend([
                Cell::text(habit.description.clone().unwrap_or_default()),
                Cell::text(habit.status.clone().unwrap_or_default()),
                Cell::text(habit.streak.as_ref().map(display_value).unwrap_or_default()),
                Cell::text(habit.longest_streak.as_ref().map(display_value).unwrap_or_default()),
                Cell::text(habit.total_completions()),
                Cell::styled_action(
                    RowAction::ManageHabit,
                    habit.id,
                    "Manage",
                    "btn btn-outline-warning",
                ),
            ]);
            row
        })
        .collect()
}

struct MenuEntry {
    label: &'static str,
    icon: &'static str,
    href: String,
}

fn habit_menu(kind: Option<HabitKind>) -> String {
    let query = kind.map(|kind| format!("?type={kind}")).unwrap_or_default();
    let mut entries = Vec::new();
    if let Some(kind) = kind {
        entries.push(MenuEntry {
            label: "Assign New<br>Habit",
            icon: "fas fa-calendar-plus",
            href: format!("/panels/assign/{kind}"),
        });
        entries.push(MenuEntry {
            label: "Assign New<br>Custom Habit",
            icon: "fas fa-calendar-plus",
            href: format!("/panels/assign-custom/{kind}"),
        });
    }
    entries.push(MenuEntry {
        label: "Longest Streak<br>Habit",
        icon: "fas fa-hand-peace",
        href: format!("/panels/longest-streak{query}"),
    });
    entries.push(MenuEntry {
        label: "Most Struggle<br>Habit",
        icon: "fas fa-thumbs-down",
        href: format!("/panels/strugglest{query}"),
    });

    let list = entries.into_iter().fold(
        Element::new("ul")
            .class("list-unstyled d-flex flex-column align-items-center vertical-menu"),
        |list, entry| {
            let mut label = Element::new("p").class("m-0");
            label.push_raw(entry.label);
            list.child(
                Element::new("li").class("my-2 text-center").child(
                    Element::new("a")
                        .attr("href", entry.href)
                        .child(Element::new("i").class(entry.icon).attr("aria-hidden", "true"))
                        .child(label),
                ),
            )
        },
    );
    Element::new("div").child(list).to_html()
}

// Panels: detail pages reached from the habit tables and menus.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight {
    LongestStreak,
    Strugglest,
}

impl Highlight {
    pub fn title(self) -> &'static str {
        match self {
            Highlight::LongestStreak => "Longest Streak Habit",
            Highlight::Strugglest => "Most Struggle Habit",
        }
    }
}

pub async fn habit_panel(backend: &BackendClient, session: &Session, id: &str) -> SectionView {
    if !session.is_authenticated() {
        return SectionView::single("Habit Info", not_logged_in());
    }

    match backend.user_habits(session.credentials(), None).await {
        Ok(habits) => match habits.into_iter().find(|habit| habit.id == id) {
            Some(habit) => SectionView::columns("Habit Info", habit_info(&habit)),
            None => SectionView::single("Habit Info", vec![Item::paragraph("Habit not found")]),
        },
        Err(err) => {
            error!(id, "failed to fetch habit: {err}");
            SectionView::single("Habit Info", vec![Item::paragraph("Habit not found")])
        }
    }
}

pub async fn assign_panel(
    backend: &BackendClient,
    session: &Session,
    kind: HabitKind,
) -> SectionView {
    let title = format!("Assign New Habit ({kind})");
    if !session.is_authenticated() {
        return SectionView::single(title, not_logged_in());
    }

    let options = match backend.list_habits(Some(kind)).await {
        Ok(habits) => habits
            .into_iter()
            .map(|habit| {
                let label = format!("{} - {}", habit.name, habit.category.unwrap_or_default());
                SelectOption::new(habit.id, label)
            })
            .collect(),
        Err(err) => {
            error!(%kind, "failed to fetch habit options: {err}");
            Vec::new()
        }
    };
    SectionView::columns(title, vec![Column::full(vec![Item::Form(assign_form(kind, options))])])
}

pub fn assign_custom_panel(session: &Session, kind: HabitKind) -> SectionView {
    let title = format!("Assign New Custom Habit ({kind})");
    if !session.is_authenticated() {
        return SectionView::single(title, not_logged_in());
    }
    SectionView::columns(
        title,
        vec![Column::full(vec![Item::Form(UserForm::AssignCustom(kind).spec())])],
    )
}

pub async fn highlight_panel(
    backend: &BackendClient,
    session: &Session,
    highlight: Highlight,
    kind: Option<HabitKind>,
) -> SectionView {
    if !session.is_authenticated() {
        return SectionView::single(highlight.title(), not_logged_in());
    }

    let creds = session.credentials();
    let found = match highlight {
        Highlight::LongestStreak => backend.longest_streak(creds, kind).await,
        Highlight::Strugglest => backend.strugglest_habit(creds, kind).await,
    };
    match found {
        Ok(Some(habit)) => SectionView::columns(highlight.title(), habit_info(&habit)),
        Ok(None) => SectionView::single(
            highlight.title(),
            vec![Item::paragraph("No habits to show yet")],
        ),
        Err(err) => {
            error!(panel = highlight.title(), "failed to fetch habit: {err}");
            SectionView::single(highlight.title(), vec![Item::paragraph("No habits to show yet")])
        }
    }
}

fn habit_info(habit: &Habit) -> Vec<Column> {
    let mut columns = vec![
        Column::full(vec![Item::Table(Table::new(Vec::<String>::new(), habit_details(habit)))]),
        Column::full(vec![Item::title_left("Remove Habit")]),
        Column::full(vec![Item::Form(remove_form(&habit.id))]),
    ];
    match habit.habit_kind() {
        Some(kind) => {
            columns.push(Column::full(vec![Item::Separator, Item::title_left("Complete Habit")]));
            columns.push(Column::full(vec![Item::Form(complete_form(kind, &habit.id))]));
        }
        None => warn!(
            id = %habit.id,
            kind = ?habit.kind,
            "habit has no known type, completion disabled"
        ),
    }
    columns
}

/// Key/value rows for the fields a habit actually carries.
pub fn habit_details(habit: &Habit) -> Vec<Vec<Cell>> {
    let text = |value: &Option<String>| value.clone().filter(|value| !value.is_empty());
    let loose = |value: &Option<serde_json::Value>| {
        value.as_ref().map(display_value).filter(|value| !value.is_empty() && value != "0")
    };

    let fields = [
        ("Name", Some(habit.name.clone()).filter(|name| !name.is_empty())),
        ("Category", text(&habit.category)),
        ("Sub Category", text(&habit.subcategory)),
        ("Description/Task Specification", text(&habit.description)),
        ("Creation Date", loose(&habit.creation_date)),
        ("Expected Start Range Date", loose(&habit.start_range)),
        ("Expected End Range Date", loose(&habit.end_range)),
        ("Last Completion Date", loose(&habit.completion_datetime)),
        ("Actual Status", text(&habit.status)),
        ("Actual Streak", loose(&habit.streak)),
        ("Longest Streak", loose(&habit.longest_streak)),
        (
            "Total Times Completed",
            habit.completion_datetimes.as_ref().map(|done| done.len().to_string()),
        ),
    ];

    fields
        .into_iter()
        .filter_map(|(label, value)| {
            value.map(|value| {
                vec![
                    Cell::aligned(label, Align::Right),
                    Cell::aligned(value, Align::Left),
                ]
            })
        })
        .collect()
}

/// Handles a submitted user form and returns the section to show next.
pub async fn submit_form(state: &AppState, form: UserForm, submitted: &Submitted) -> UserSection {
    let session = state.user_session().await;
    let spec = form.spec();
    let mut payload = forms::collect_fields(&spec, submitted);
    if spec.authorized {
        if let Some(creds) = session.credentials() {
            creds.attach(&mut payload);
        }
    }
    let attempted = Credentials::from_payload(&payload);

    let reply = forms::submit(&state.backend, &spec, payload).await;
    let succeeded = backend::is_success(&reply);
    if !succeeded {
        warn!(form = %form.slug(), error = backend::error_message(&reply), "form rejected");
    }

    match form {
        UserForm::Login | UserForm::Register => {
            info!(
                username = attempted
                    .as_ref()
                    .map(|creds| creds.username.as_str())
                    .unwrap_or_default(),
                accepted = succeeded,
                form = %form.slug(),
                "user login"
            );
            state.user.lock().await.sign_in(attempted, succeeded);
            UserSection::Home
        }
        UserForm::Assign(kind) | UserForm::AssignCustom(kind) | UserForm::Complete(kind) => {
            UserSection::for_kind(Some(kind))
        }
        UserForm::Remove => UserSection::HabitsReview,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;

    fn offline_backend() -> BackendClient {
        BackendClient::new("http://127.0.0.1:9", Duration::from_millis(200)).unwrap()
    }

    #[test]
    fn form_slugs_parse() {
        for form in [
            UserForm::Login,
            UserForm::Register,
            UserForm::Assign(HabitKind::Daily),
            UserForm::AssignCustom(HabitKind::Weekly),
            UserForm::Remove,
            UserForm::Complete(HabitKind::Weekly),
        ] {
            assert_eq!(UserForm::from_slug(&form.slug()), Some(form));
        }
        assert_eq!(UserForm::from_slug("assign-monthly"), None);
    }

    #[test]
    fn complete_form_targets_kind_endpoint() {
        let spec = UserForm::Complete(HabitKind::Weekly).spec();
        assert_eq!(spec.endpoint, "user/update_weekly_habit");
        assert_eq!(spec.submit_to, "/forms/complete-weekly");
        assert!(spec.authorized);
    }

    #[test]
    fn habit_details_skip_missing_fields() {
        let habit: Habit = serde_json::from_value(json!({
            "_id": "h1",
            "name": "Read",
            "category": "Mind",
            "streak": 4,
            "longest_streak": 0,
            "completion_datetimes": []
        }))
        .unwrap();

        let labels: Vec<_> = habit_details(&habit)
            .into_iter()
            .map(|row| match &row[0] {
                Cell::Text { value, .. } => value.clone(),
                other => panic!("unexpected cell {other:?}"),
            })
            .collect();
        assert_eq!(labels, ["Name", "Category", "Actual Streak", "Total Times Completed"]);
    }

    #[tokio::test]
    async fn unknown_section_routes_to_placeholder() {
        let view = load_section(&offline_backend(), &Session::default(), "dayReview").await;
        assert_eq!(view.header, "Section not Available");
    }

    #[tokio::test]
    async fn filtered_review_drops_type_column_and_adds_assign_menu() {
        let mut session = Session::default();
        session.sign_in(Some(Credentials::new("ana", "pw")), true);

        let view = load_section(&offline_backend(), &session, "habitsDayReview").await;
        assert_eq!(view.header, "Habits Manager (daily)");
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["layout"], "columns");
        assert_eq!(json["content"][0]["cols"], 2);
        assert!(json["content"][0]["content"][0]["html"]
            .as_str()
            .unwrap()
            .contains("/panels/assign/daily"));
        let headers = &json["content"][1]["content"][1]["headers"];
        assert_eq!(headers.as_array().unwrap().len(), 7);
        assert_eq!(headers[1], "Description");
    }

    #[tokio::test]
    async fn home_welcomes_authenticated_user() {
        let mut session = Session::default();
        let view = load_section(&offline_backend(), &session, "home").await;
        assert_eq!(view.header, "Home");
        assert_eq!(serde_json::to_value(&view).unwrap()["content"].as_array().unwrap().len(), 7);

        session.sign_in(Some(Credentials::new("ana", "pw")), true);
        let view = load_section(&offline_backend(), &session, "home").await;
        assert_eq!(serde_json::to_value(&view).unwrap()["content"][0]["text"], "WELCOME ana");
    }

    #[tokio::test]
    async fn login_against_unreachable_backend_stays_signed_out() {
        let state = AppState::new(offline_backend());
        let fields: Submitted = [("username", "ana"), ("password", "secret")]
            .into_iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();

        let next = submit_form(&state, UserForm::Login, &fields).await;
        assert_eq!(next, UserSection::Home);
        let session = state.user_session().await;
        assert!(!session.is_authenticated());
        assert_eq!(session.username(), "ana");
    }
}
