//! View controllers: section routers and builders for the admin and user pages.

pub mod admin;
pub mod user;

use crate::content::{Item, Layout, SectionView};
use crate::render::{render_columns, render_content, Element};

pub const NOT_AVAILABLE_HEADER: &str = "Section not Available";

const LOGGED_IN_BADGE: &str =
    "<i class='fa-solid fa-circle-check' style='color:#73c66f'></i> LOGGED IN";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Admin,
    User,
}

pub struct NavEntry {
    pub section: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
}

const ADMIN_NAV: &[NavEntry] = &[
    NavEntry {
        section: "home",
        label: "Home",
        icon: "fas fa-house",
    },
    NavEntry {
        section: "users",
        label: "Users",
        icon: "fas fa-users",
    },
    NavEntry {
        section: "habits",
        label: "Habits",
        icon: "fas fa-list-check",
    },
];

const USER_NAV: &[NavEntry] = &[
    NavEntry {
        section: "home",
        label: "Home",
        icon: "fas fa-house",
    },
    NavEntry {
        section: "habitsReview",
        label: "All<br>Habits",
        icon: "fas fa-list",
    },
    NavEntry {
        section: "habitsDayReview",
        label: "Daily<br>Review",
        icon: "fas fa-calendar-day",
    },
    NavEntry {
        section: "habitsWeekReview",
        label: "Weekly<br>Review",
        icon: "fas fa-calendar-week",
    },
];

impl View {
    pub fn title(self) -> &'static str {
        match self {
            View::Admin => "Habit Tracker Admin",
            View::User => "Habit Tracker",
        }
    }

    pub fn nav(self) -> &'static [NavEntry] {
        match self {
            View::Admin => ADMIN_NAV,
            View::User => USER_NAV,
        }
    }

    pub fn section_path(self, name: &str) -> String {
        match (self, name) {
            (View::Admin, "home") => "/admin".to_string(),
            (View::Admin, name) => format!("/admin/section/{name}"),
            (View::User, "home") => "/".to_string(),
            (View::User, name) => format!("/section/{name}"),
        }
    }

    pub fn logout_path(self) -> &'static str {
        match self {
            View::Admin => "/admin/logout",
            View::User => "/logout",
        }
    }
}

/// Content shown for section names no router knows.
pub fn placeholder() -> SectionView {
    SectionView::single(
        NOT_AVAILABLE_HEADER,
        vec![Item::paragraph("Not Available Content, under construction")],
    )
}

pub fn not_logged_in() -> Vec<Item> {
    vec![Item::title("Not logged in"), Item::Separator, Item::paragraph("Please log in")]
}

pub fn logged_in(title: impl Into<String>) -> Vec<Item> {
    vec![Item::title(title), Item::Separator, Item::paragraph(LOGGED_IN_BADGE)]
}

/// Renders a section's layout into the page body container.
pub fn render_section(view: &SectionView) -> String {
    let mut container = Element::new("div").attr("id", "body-container").class("fade-in");
    match &view.layout {
        Layout::Single(items) => render_content(&mut container, items),
        Layout::Columns(columns) => render_columns(&mut container, columns),
    }
    container.to_html()
}
