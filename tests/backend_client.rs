mod common;

use common::MockBackend;
use habit_front::backend::{BackendClient, BackendError};
use habit_front::models::HabitKind;
use habit_front::session::Credentials;
use reqwest::Method;
use serde_json::{json, Value};
use std::time::Duration;

fn client_for(mock: &MockBackend) -> BackendClient {
    BackendClient::new(mock.base_url.clone(), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn credentials_travel_only_in_the_authorization_header() {
    let mock = MockBackend::start().await;
    let client = client_for(&mock);

    let payload = json!({ "_id": "h1", "username": "admin", "password": "admin1234" });
    let reply = client
        .send_request("/habit/remove", Method::DELETE, payload.as_object().cloned())
        .await
        .unwrap();
    assert_eq!(reply, json!({ "success": true }));

    let recorded = mock.requests_to("/habit/remove");
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].basic_auth.as_deref(), Some("admin:admin1234"));
    let body = recorded[0].body.clone().unwrap();
    assert_eq!(body, json!({ "_id": "h1" }));
    assert!(body.get("username").is_none() && body.get("password").is_none());
}

#[tokio::test]
async fn relative_endpoints_and_get_requests() {
    let mock = MockBackend::start().await;
    let client = client_for(&mock);

    let payload = json!({ "username": "admin", "password": "admin1234" });
    let reply = client
        .send_request("admin/validate", Method::POST, payload.as_object().cloned())
        .await
        .unwrap();
    assert_eq!(reply["success"], Value::Bool(true));

    let habits = client.list_habits(Some(HabitKind::Daily)).await.unwrap();
    assert_eq!(habits.len(), 2);

    let recorded = mock.requests();
    assert_eq!(recorded[0].path, "/admin/validate");
    assert_eq!(recorded[1].method, Method::GET);
    assert_eq!(recorded[1].query.as_deref(), Some("type=daily"));
    assert!(recorded[1].body.is_none());
    assert!(recorded[1].basic_auth.is_none());
}

#[tokio::test]
async fn query_parameters_are_encoded() {
    let mock = MockBackend::start().await;
    let client = client_for(&mock);

    client
        .send_with_query("/habits", Method::GET, &[("category", "Mind & Body")], None)
        .await
        .unwrap();
    client.list_habits(None).await.unwrap();

    let recorded = mock.requests();
    assert_eq!(recorded[0].path, "/habits");
    assert_eq!(recorded[0].query.as_deref(), Some("category=Mind+%26+Body"));
    assert!(recorded[1].query.is_none());
}

#[tokio::test]
async fn typed_helpers_decode_collections() {
    let mock = MockBackend::start().await;
    let client = client_for(&mock);
    let creds = Credentials::new("ana", "secret");

    let users = client.list_users(Some(&creds)).await.unwrap();
    assert_eq!(users.iter().map(|user| user.id.as_str()).collect::<Vec<_>>(), ["u1", "u2"]);

    let habits = client.user_habits(Some(&creds), Some(HabitKind::Daily)).await.unwrap();
    assert_eq!(habits[0].total_completions(), 2);

    let recorded = mock.requests_to("/user/habits");
    assert_eq!(recorded[0].body, Some(json!({ "type": "daily" })));
    assert_eq!(recorded[0].basic_auth.as_deref(), Some("ana:secret"));
}

#[tokio::test]
async fn rejected_replies_are_values_not_errors() {
    let mock = MockBackend::start().await;
    let client = client_for(&mock);

    let reply = client.send_request("/user/delete", Method::DELETE, None).await.unwrap();
    assert_eq!(reply["success"], Value::Bool(false));
    assert_eq!(reply["error"], "User not found");
    assert_eq!(mock.requests_to("/user/delete")[0].body, Some(json!({})));

    let longest = client.longest_streak(None, None).await.unwrap();
    assert!(longest.is_none());
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
    let client = BackendClient::new("http://127.0.0.1:9", Duration::from_millis(500)).unwrap();
    let err = client.send_request("/login", Method::POST, None).await.unwrap_err();
    assert!(matches!(err, BackendError::Transport { .. }), "unexpected error: {err}");
}
