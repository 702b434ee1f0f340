use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HabitKind {
    Daily,
    Weekly,
}

impl HabitKind {
    pub fn as_str(self) -> &'static str {
        match self {
            HabitKind::Daily => "daily",
            HabitKind::Weekly => "weekly",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "daily" => Some(HabitKind::Daily),
            "weekly" => Some(HabitKind::Weekly),
            _ => None,
        }
    }

    /// Backend endpoint that records a completion for this kind of habit.
    pub fn completion_endpoint(self) -> &'static str {
        match self {
            HabitKind::Daily => "user/update_daily_habit",
            HabitKind::Weekly => "user/update_weekly_habit",
        }
    }
}

impl fmt::Display for HabitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
}

/// A habit record as returned by the backend. Catalogue habits only carry the
/// descriptive fields; habits assigned to a user add tracking metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Habit {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub subcategory: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub streak: Option<Value>,
    #[serde(default)]
    pub longest_streak: Option<Value>,
    #[serde(default)]
    pub creation_date: Option<Value>,
    #[serde(default)]
    pub start_range: Option<Value>,
    #[serde(default)]
    pub end_range: Option<Value>,
    #[serde(default)]
    pub completion_datetime: Option<Value>,
    #[serde(default)]
    pub completion_datetimes: Option<Vec<Value>>,
}

impl Habit {
    pub fn habit_kind(&self) -> Option<HabitKind> {
        self.kind.as_deref().and_then(HabitKind::parse)
    }

    pub fn total_completions(&self) -> usize {
        self.completion_datetimes.as_ref().map_or(0, Vec::len)
    }
}

#[derive(Debug, Deserialize)]
pub struct UsersReply {
    pub users: Vec<User>,
}

#[derive(Debug, Deserialize)]
pub struct HabitsReply {
    pub habits: Vec<Habit>,
}

#[derive(Debug, Deserialize)]
pub struct HabitReply {
    #[serde(default)]
    pub success: bool,
    pub habit: Option<Habit>,
}

/// Renders a loosely typed backend value as table text.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn habit_parses_sparse_records() {
        let habit: Habit = serde_json::from_value(json!({
            "_id": "h1",
            "name": "Read",
            "type": "weekly",
            "streak": 3,
            "completion_datetimes": ["2024-03-01 14:30", "2024-03-08 10:00"]
        }))
        .unwrap();

        assert_eq!(habit.id, "h1");
        assert_eq!(habit.habit_kind(), Some(HabitKind::Weekly));
        assert_eq!(habit.total_completions(), 2);
        assert_eq!(display_value(habit.streak.as_ref().unwrap()), "3");
        assert!(habit.description.is_none());
    }

    #[test]
    fn kind_routes_completions() {
        assert_eq!(HabitKind::Daily.completion_endpoint(), "user/update_daily_habit");
        assert_eq!(HabitKind::parse("weekly"), Some(HabitKind::Weekly));
        assert_eq!(HabitKind::parse("monthly"), None);
    }
}
