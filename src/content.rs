//! Declarative content descriptors.
//!
//! Section builders produce lists of [`Item`]s which the renderer turns into
//! markup. Descriptors are plain data: they serialize to the JSON shape served
//! by the `api/sections` endpoints and can be read back from it.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    #[default]
    Center,
    Right,
}

impl Align {
    pub fn as_css(self) -> &'static str {
        match self {
            Align::Left => "left",
            Align::Center => "center",
            Align::Right => "right",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Item {
    Title {
        text: String,
        #[serde(default)]
        align: Align,
    },
    /// Trusted inline HTML.
    #[serde(alias = "parragraph")]
    Paragraph {
        text: String,
        #[serde(default)]
        align: Align,
    },
    /// Trusted HTML block, used for prebuilt widgets such as menus.
    Div {
        html: String,
        #[serde(default)]
        align: Align,
    },
    Separator,
    Table(Table),
    Form(Form),
    #[serde(other)]
    Unsupported,
}

impl Item {
    pub fn title(text: impl Into<String>) -> Self {
        Item::Title {
            text: text.into(),
            align: Align::Center,
        }
    }

    pub fn title_left(text: impl Into<String>) -> Self {
        Item::Title {
            text: text.into(),
            align: Align::Left,
        }
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        Item::Paragraph {
            text: text.into(),
            align: Align::Center,
        }
    }

    pub fn div(html: impl Into<String>) -> Self {
        Item::Div {
            html: html.into(),
            align: Align::Center,
        }
    }
}

/// A group of items occupying `cols` units of a 12-unit row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub cols: u8,
    pub content: Vec<Item>,
}

impl Column {
    pub fn new(cols: u8, content: Vec<Item>) -> Self {
        Self { cols, content }
    }

    pub fn full(content: Vec<Item>) -> Self {
        Self::new(12, content)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new<S: Into<String>>(
        headers: impl IntoIterator<Item = S>,
        rows: Vec<Vec<Cell>>,
    ) -> Self {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Cell {
    Text {
        value: String,
        #[serde(default)]
        align: Align,
    },
    /// A button that posts `value` to the route bound to `action`.
    Action {
        value: String,
        #[serde(default)]
        label: Option<String>,
        #[serde(default)]
        style: Option<String>,
        action: RowAction,
    },
}

impl Cell {
    pub fn text(value: impl ToString) -> Self {
        Cell::Text {
            value: value.to_string(),
            align: Align::Center,
        }
    }

    pub fn aligned(value: impl ToString, align: Align) -> Self {
        Cell::Text {
            value: value.to_string(),
            align,
        }
    }

    pub fn action(action: RowAction, value: impl Into<String>, label: impl Into<String>) -> Self {
        Cell::Action {
            value: value.into(),
            label: Some(label.into()),
            style: None,
            action,
        }
    }

    pub fn styled_action(
        action: RowAction,
        value: impl Into<String>,
        label: impl Into<String>,
        style: impl Into<String>,
    ) -> Self {
        Cell::Action {
            value: value.into(),
            label: Some(label.into()),
            style: Some(style.into()),
            action,
        }
    }
}

/// Per-row operations a table can offer. Each one is served by a route under
/// its view's `actions/` prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RowAction {
    RemoveUser,
    RemoveHabit,
    ManageHabit,
}

impl RowAction {
    pub fn slug(self) -> &'static str {
        match self {
            RowAction::RemoveUser => "remove-user",
            RowAction::RemoveHabit => "remove-habit",
            RowAction::ManageHabit => "manage-habit",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "remove-user" => Some(RowAction::RemoveUser),
            "remove-habit" => Some(RowAction::RemoveHabit),
            "manage-habit" => Some(RowAction::ManageHabit),
            _ => None,
        }
    }

    /// Local route the action button posts to.
    pub fn route(self) -> String {
        match self {
            RowAction::RemoveUser | RowAction::RemoveHabit => {
                format!("/admin/actions/{}", self.slug())
            }
            RowAction::ManageHabit => format!("/actions/{}", self.slug()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Form {
    /// Local route the browser posts the form to.
    pub submit_to: String,
    /// Backend endpoint the collected fields are sent to.
    pub endpoint: String,
    pub inputs: Vec<Input>,
    #[serde(default = "default_button_label")]
    pub button_label: String,
    #[serde(default)]
    pub button_style: Option<String>,
    #[serde(default = "default_button_align")]
    pub button_align: Align,
    /// Attach the session credentials on submission.
    #[serde(default)]
    pub authorized: bool,
}

fn default_button_label() -> String {
    "Submit".to_string()
}

fn default_button_align() -> Align {
    Align::Left
}

impl Form {
    pub fn new(
        submit_to: impl Into<String>,
        endpoint: impl Into<String>,
        inputs: Vec<Input>,
    ) -> Self {
        Self {
            submit_to: submit_to.into(),
            endpoint: endpoint.into(),
            inputs,
            button_label: default_button_label(),
            button_style: None,
            button_align: default_button_align(),
            authorized: false,
        }
    }

    pub fn button(mut self, label: impl Into<String>) -> Self {
        self.button_label = label.into();
        self
    }

    pub fn button_style(mut self, style: impl Into<String>) -> Self {
        self.button_style = Some(style.into());
        self
    }

    pub fn authorized(mut self) -> Self {
        self.authorized = true;
        self
    }
}

/// Fields shared by the text, password and email inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextField {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub placeholder: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl TextField {
    fn new(name: impl Into<String>, placeholder: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            placeholder: placeholder.into(),
            label: String::new(),
            value: None,
        }
    }

    /// Hint shown in the empty control: the placeholder, or the label when no
    /// placeholder is given.
    pub fn hint(&self) -> &str {
        if self.placeholder.is_empty() {
            &self.label
        } else {
            &self.placeholder
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Input {
    Text(TextField),
    Password(TextField),
    Email(TextField),
    Checkbox {
        name: String,
        label: String,
    },
    Select {
        name: String,
        #[serde(default)]
        placeholder: String,
        #[serde(default)]
        options: Vec<SelectOption>,
    },
    Slider {
        name: String,
        #[serde(default)]
        value: Option<String>,
    },
    /// Paired date and time controls submitted as `{prefix}{name}_date` and
    /// `{prefix}{name}_time`, collected into one `YYYY-MM-DD HH:MM` field.
    Date {
        name: String,
        #[serde(default)]
        prefix: String,
        #[serde(default)]
        label: String,
    },
    Hidden {
        name: String,
        #[serde(default)]
        value: String,
    },
    #[serde(other)]
    Unsupported,
}

impl Input {
    pub fn text(name: impl Into<String>, placeholder: impl Into<String>) -> Self {
        Input::Text(TextField::new(name, placeholder))
    }

    pub fn password(name: impl Into<String>, placeholder: impl Into<String>) -> Self {
        Input::Password(TextField::new(name, placeholder))
    }

    pub fn email(name: impl Into<String>, placeholder: impl Into<String>) -> Self {
        Input::Email(TextField::new(name, placeholder))
    }

    pub fn select(
        name: impl Into<String>,
        placeholder: impl Into<String>,
        options: Vec<SelectOption>,
    ) -> Self {
        Input::Select {
            name: name.into(),
            placeholder: placeholder.into(),
            options,
        }
    }

    pub fn date(
        name: impl Into<String>,
        prefix: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Input::Date {
            name: name.into(),
            prefix: prefix.into(),
            label: label.into(),
        }
    }

    pub fn hidden(name: impl Into<String>, value: impl Into<String>) -> Self {
        Input::Hidden {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Input::Text(TextField { name, .. })
            | Input::Password(TextField { name, .. })
            | Input::Email(TextField { name, .. }) => Some(name),
            Input::Checkbox { name, .. }
            | Input::Select { name, .. }
            | Input::Slider { name, .. }
            | Input::Date { name, .. }
            | Input::Hidden { name, .. } => Some(name),
            Input::Unsupported => None,
        }
    }
}

/// The content of one section: a single column of items or a row of columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "layout", content = "content", rename_all = "lowercase")]
pub enum Layout {
    Single(Vec<Item>),
    Columns(Vec<Column>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionView {
    pub header: String,
    #[serde(flatten)]
    pub layout: Layout,
}

impl SectionView {
    pub fn single(header: impl Into<String>, items: Vec<Item>) -> Self {
        Self {
            header: header.into(),
            layout: Layout::Single(items),
        }
    }

    pub fn columns(header: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            header: header.into(),
            layout: Layout::Columns(columns),
        }
    }
}
