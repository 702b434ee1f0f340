use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Reads `username` and `password` out of a request payload without removing them.
    pub fn from_payload(payload: &Map<String, Value>) -> Option<Self> {
        let username = payload.get("username")?.as_str()?;
        let password = payload.get("password")?.as_str()?;
        Some(Self::new(username, password))
    }

    /// Adds the credentials to a payload so the request client can lift them into
    /// the Authorization header.
    pub fn attach(&self, payload: &mut Map<String, Value>) {
        payload.insert("username".into(), Value::String(self.username.clone()));
        payload.insert("password".into(), Value::String(self.password.clone()));
    }
}

/// Per-view login state. Lives for the lifetime of the process.
#[derive(Debug, Clone, Default)]
pub struct Session {
    credentials: Option<Credentials>,
    authenticated: bool,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    pub fn username(&self) -> &str {
        self.credentials
            .as_ref()
            .map(|creds| creds.username.as_str())
            .unwrap_or_default()
    }

    /// Records the credentials used for a login attempt and whether the backend
    /// accepted them.
    pub fn sign_in(&mut self, credentials: Option<Credentials>, accepted: bool) {
        if credentials.is_some() {
            self.credentials = credentials;
        }
        self.authenticated = accepted;
    }

    pub fn sign_out(&mut self) {
        self.credentials = None;
        self.authenticated = false;
    }
}
