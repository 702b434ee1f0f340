use crate::backend::{self, BackendClient};
use crate::content::{Form, Input, TextField};
use chrono::{NaiveDate, NaiveTime};
use reqwest::Method;
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::{error, warn};

/// Field values posted by the browser, keyed by control name.
pub type Submitted = HashMap<String, String>;

/// Builds the backend payload for `form` from the submitted control values.
pub fn collect_fields(form: &Form, submitted: &Submitted) -> Map<String, Value> {
    let mut payload = Map::new();
    for input in &form.inputs {
        match input {
            Input::Text(TextField { name, .. })
            | Input::Password(TextField { name, .. })
            | Input::Email(TextField { name, .. })
            | Input::Select { name, .. }
            | Input::Slider { name, .. }
            | Input::Hidden { name, .. } => {
                let value = submitted.get(name).cloned().unwrap_or_default();
                payload.insert(name.clone(), Value::String(value));
            }
            Input::Checkbox { name, .. } => {
                payload.insert(name.clone(), Value::Bool(submitted.contains_key(name)));
            }
            Input::Date { name, prefix, .. } => {
                let date = submitted.get(&format!("{prefix}{name}_date"));
                let time = submitted.get(&format!("{prefix}{name}_time"));
                if let (Some(date), Some(time)) = (date, time) {
                    if let Some(stamp) = service_timestamp(date, time) {
                        payload.insert(name.clone(), Value::String(stamp));
                    }
                }
            }
            Input::Unsupported => {}
        }
    }
    payload
}

/// Joins a `YYYY-MM-DD` date and an `HH:MM` time into the backend's
/// `YYYY-MM-DD HH:MM` format. Blank or malformed parts yield `None`.
pub fn service_timestamp(date: &str, time: &str) -> Option<String> {
    let (date, time) = (date.trim(), time.trim());
    if date.is_empty() || time.is_empty() {
        return None;
    }

    let parsed_date = NaiveDate::parse_from_str(date, "%Y-%m-%d");
    let parsed_time = NaiveTime::parse_from_str(time, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M:%S"));

    match (parsed_date, parsed_time) {
        (Ok(date), Ok(time)) => Some(date.and_time(time).format("%Y-%m-%d %H:%M").to_string()),
        _ => {
            warn!(date, time, "ignoring malformed date/time pair");
            None
        }
    }
}

/// Posts the collected payload to the form's backend endpoint.
///
/// A failed request is turned into `{"success": false, "error": ...}` so callers
/// handle every outcome by inspecting one reply.
pub async fn submit(client: &BackendClient, form: &Form, payload: Map<String, Value>) -> Value {
    match client.send_request(&form.endpoint, Method::POST, Some(payload)).await {
        Ok(reply) => reply,
        Err(err) => {
            error!(endpoint = %form.endpoint, "form submission failed: {err}");
            backend::failure(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::SelectOption;
    use serde_json::json;

    fn submitted(pairs: &[(&str, &str)]) -> Submitted {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn unreachable_backend_yields_failure_reply() {
        let client =
            BackendClient::new("http://127.0.0.1:9", std::time::Duration::from_millis(200))
                .unwrap();
        let form = Form::new("/forms/login", "/login", vec![Input::text("username", "Username")]);
        let payload = collect_fields(&form, &submitted(&[("username", "ana")]));

        let reply = submit(&client, &form, payload).await;
        assert_eq!(reply["success"], json!(false));
        assert!(reply["error"].as_str().is_some_and(|error| !error.is_empty()));
        assert!(!backend::is_success(&reply));
    }

    #[test]
    fn date_and_time_combine_into_service_format() {
        assert_eq!(service_timestamp("2024-03-01", "14:30").as_deref(), Some("2024-03-01 14:30"));
        assert_eq!(
            service_timestamp("2024-03-01", "07:05:59").as_deref(),
            Some("2024-03-01 07:05")
        );
    }

    #[test]
    fn incomplete_date_pairs_are_dropped() {
        assert_eq!(service_timestamp("", "14:30"), None);
        assert_eq!(service_timestamp("2024-03-01", ""), None);
        assert_eq!(service_timestamp("2024-13-01", "14:30"), None);
    }

    #[test]
    fn collect_fields_reads_each_input() {
        let form = Form::new(
            "/forms/complete-daily",
            "user/update_daily_habit",
            vec![
                Input::hidden("habit_id", ""),
                Input::hidden("continue_habit", "true"),
                Input::select("mood", "Mood", vec![SelectOption::new("ok", "Ok")]),
                Input::Checkbox {
                    name: "remind".into(),
                    label: "Remind me".into(),
                },
                Input::date("completion_date", "complete", "Completion Date"),
                Input::Unsupported,
            ],
        );
        let fields = submitted(&[
            ("habit_id", "h1"),
            ("continue_habit", "true"),
            ("mood", "ok"),
            ("completecompletion_date_date", "2024-03-01"),
            ("completecompletion_date_time", "14:30"),
            ("ignored", "x"),
        ]);

        assert_eq!(
            Value::Object(collect_fields(&form, &fields)),
            json!({
                "habit_id": "h1",
                "continue_habit": "true",
                "mood": "ok",
                "remind": false,
                "completion_date": "2024-03-01 14:30"
            })
        );
    }

    #[test]
    fn missing_time_omits_the_date_field() {
        let form = Form::new("/forms/x", "/x", vec![Input::date("start_range", "assign", "Start")]);
        let fields = submitted(&[("assignstart_range_date", "2024-03-01")]);
        assert!(collect_fields(&form, &fields).is_empty());
    }
}
