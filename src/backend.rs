//! HTTP client for the habit backend.
//!
//! Every call goes through [`BackendClient::send_request`], which lifts
//! `username`/`password` out of the JSON payload into a Basic-Auth header.

use crate::models::{Habit, HabitKind, HabitReply, HabitsReply, User, UsersReply};
use crate::session::Credentials;
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error};

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

#[derive(Debug, Clone)]
pub struct BackendClient {
    http: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, BackendError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, endpoint: &str) -> String {
        if endpoint.starts_with('/') {
            format!("{}{endpoint}", self.base_url)
        } else {
            format!("{}/{endpoint}", self.base_url)
        }
    }

    /// Sends one request to the backend and returns its JSON reply.
    ///
    /// HTTP error statuses are not errors here: the backend answers failures with
    /// a JSON body such as `{"success": false, "error": "..."}`, which callers
    /// inspect. Only transport failures and non-JSON bodies are reported as `Err`.
    pub async fn send_request(
        &self,
        endpoint: &str,
        method: Method,
        payload: Option<Map<String, Value>>,
    ) -> Result<Value, BackendError> {
        self.send_with_query(endpoint, method, &[], payload).await
    }

    /// [`send_request`](Self::send_request) with URL query parameters, encoded
    /// by the HTTP client.
    pub async fn send_with_query(
        &self,
        endpoint: &str,
        method: Method,
        query: &[(&str, &str)],
        payload: Option<Map<String, Value>>,
    ) -> Result<Value, BackendError> {
        let mut body = payload.unwrap_or_default();
        let credentials = split_credentials(&mut body);

        debug!(%method, endpoint, authorized = credentials.is_some(), "backend request");

        let mut request = self.http.request(method.clone(), self.url(endpoint));
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(creds) = &credentials {
            request = request.basic_auth(&creds.username, Some(&creds.password));
        }
        if method != Method::GET {
            request = request.json(&Value::Object(body));
        }

        let transport = |source| BackendError::Transport {
            endpoint: endpoint.to_string(),
            source,
        };
        let response = request.send().await.map_err(transport)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(transport)?;

        serde_json::from_slice(&bytes).map_err(|source| {
            error!(%status, endpoint, "backend returned a non-JSON body");
            BackendError::Decode {
                endpoint: endpoint.to_string(),
                source,
            }
        })
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        method: Method,
        query: &[(&str, &str)],
        payload: Option<Map<String, Value>>,
    ) -> Result<T, BackendError> {
        let reply = self.send_with_query(endpoint, method, query, payload).await?;
        serde_json::from_value(reply).map_err(|source| BackendError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })
    }

    pub async fn list_users(
        &self,
        credentials: Option<&Credentials>,
    ) -> Result<Vec<User>, BackendError> {
        let reply: UsersReply = self
            .fetch("/users", Method::GET, &[], Some(with_credentials(credentials)))
            .await?;
        Ok(reply.users)
    }

    pub async fn list_habits(&self, kind: Option<HabitKind>) -> Result<Vec<Habit>, BackendError> {
        let query: Vec<(&str, &str)> = kind
            .map(|kind| ("type", kind.as_str()))
            .into_iter()
            .collect();
        let reply: HabitsReply = self.fetch("/habits", Method::GET, &query, None).await?;
        Ok(reply.habits)
    }

    pub async fn user_habits(
        &self,
        credentials: Option<&Credentials>,
        kind: Option<HabitKind>,
    ) -> Result<Vec<Habit>, BackendError> {
        let reply: HabitsReply = self
            .fetch("/user/habits", Method::POST, &[], Some(kind_payload(credentials, kind)))
            .await?;
        Ok(reply.habits)
    }

    pub async fn delete_user(
        &self,
        credentials: Option<&Credentials>,
        id: &str,
    ) -> Result<Value, BackendError> {
        let mut payload = with_credentials(credentials);
        payload.insert("_id".into(), Value::String(id.to_string()));
        self.send_request("/user/delete", Method::DELETE, Some(payload))
            .await
    }

    pub async fn remove_habit(
        &self,
        credentials: Option<&Credentials>,
        id: &str,
    ) -> Result<Value, BackendError> {
        let mut payload = with_credentials(credentials);
        payload.insert("_id".into(), Value::String(id.to_string()));
        self.send_request("/habit/remove", Method::DELETE, Some(payload))
            .await
    }

    /// `/user/longest_streak`: the user's habit with the longest streak.
    pub async fn longest_streak(
        &self,
        credentials: Option<&Credentials>,
        kind: Option<HabitKind>,
    ) -> Result<Option<Habit>, BackendError> {
        self.highlighted_habit("/user/longest_streak", credentials, kind).await
    }

    /// `/user/strugglest_habit`: the user's habit with the most missed periods.
    pub async fn strugglest_habit(
        &self,
        credentials: Option<&Credentials>,
        kind: Option<HabitKind>,
    ) -> Result<Option<Habit>, BackendError> {
        self.highlighted_habit("/user/strugglest_habit", credentials, kind).await
    }

    async fn highlighted_habit(
        &self,
        endpoint: &str,
        credentials: Option<&Credentials>,
        kind: Option<HabitKind>,
    ) -> Result<Option<Habit>, BackendError> {
        let reply: HabitReply = self
            .fetch(endpoint, Method::POST, &[], Some(kind_payload(credentials, kind)))
            .await?;
        Ok(if reply.success { reply.habit } else { None })
    }
}

/// Removes `username` and `password` from a payload. Returns them as
/// credentials when both are present and non-empty.
pub fn split_credentials(payload: &mut Map<String, Value>) -> Option<Credentials> {
    let username = payload.remove("username");
    let password = payload.remove("password");

    match (username, password) {
        (Some(Value::String(username)), Some(Value::String(password)))
            if !username.is_empty() && !password.is_empty() =>
        {
            Some(Credentials::new(username, password))
        }
        _ => None,
    }
}

pub fn is_success(reply: &Value) -> bool {
    reply.get("success").and_then(Value::as_bool).unwrap_or(false)
}

/// Reply used in place of a backend answer when the request itself failed.
pub fn failure(error: impl ToString) -> Value {
    json!({ "success": false, "error": error.to_string() })
}

/// Error text carried by a failed reply, if any.
pub fn error_message(reply: &Value) -> Option<&str> {
    reply.get("error").and_then(Value::as_str)
}

fn with_credentials(credentials: Option<&Credentials>) -> Map<String, Value> {
    let mut payload = Map::new();
    if let Some(creds) = credentials {
        creds.attach(&mut payload);
    }
    payload
}

fn kind_payload(credentials: Option<&Credentials>, kind: Option<HabitKind>) -> Map<String, Value> {
    let mut payload = with_credentials(credentials);
    if let Some(kind) = kind {
        payload.insert("type".into(), Value::String(kind.as_str().to_string()));
    }
    payload
}
