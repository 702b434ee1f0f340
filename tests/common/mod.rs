#![allow(dead_code)]

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, Uri},
    Json, Router,
};
use base64::Engine;
use reqwest::Client;
use serde_json::{json, Value};
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::time::sleep;

/// One request as seen by the mock backend.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    /// Decoded `user:pass` from a Basic Authorization header.
    pub basic_auth: Option<String>,
    pub body: Option<Value>,
}

#[derive(Clone, Default)]
pub struct MockBackend {
    pub base_url: String,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl MockBackend {
    pub async fn start() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock backend");
        let addr = listener.local_addr().unwrap();
        let mock = MockBackend {
            base_url: format!("http://{addr}"),
            requests: Arc::default(),
        };

        let app = Router::new().fallback(record).with_state(mock.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock backend stopped");
        });
        mock
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<Recorded> {
        self.requests().into_iter().filter(|req| req.path == path).collect()
    }

    pub fn paths(&self) -> Vec<String> {
        self.requests().into_iter().map(|req| req.path).collect()
    }
}

async fn record(
    State(mock): State<MockBackend>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Json<Value> {
    let basic_auth = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Basic "))
        .and_then(|encoded| base64::engine::general_purpose::STANDARD.decode(encoded).ok())
        .and_then(|decoded| String::from_utf8(decoded).ok());
    let body = if body.is_empty() {
        None
    } else {
        serde_json::from_slice(&body).ok()
    };
    let path = uri.path().to_string();

    let reply = canned_reply(&path, basic_auth.as_deref());
    mock.requests.lock().unwrap().push(Recorded {
        method,
        path,
        query: uri.query().map(str::to_string),
        basic_auth,
        body,
    });
    Json(reply)
}

fn canned_reply(path: &str, auth: Option<&str>) -> Value {
    match path {
        "/admin/validate" => json!({ "success": auth == Some("admin:admin1234") }),
        "/login" | "/register" => json!({ "success": auth == Some("ana:secret") }),
        "/users" => json!({
            "success": true,
            "users": [
                { "_id": "u1", "username": "ana", "email": "ana@example.com", "name": "Ana" },
                { "_id": "u2", "username": "bo", "email": "bo@example.com", "name": "Bo" }
            ]
        }),
        "/habits" => json!({
            "success": true,
            "habits": [
                {
                    "_id": "h1", "name": "Read", "type": "daily",
                    "category": "Mind", "subcategory": "Books", "description": "Read 20 pages"
                },
                {
                    "_id": "h2", "name": "Run", "type": "weekly",
                    "category": "Body", "subcategory": "Cardio", "description": "Run 5k"
                }
            ]
        }),
        "/user/habits" => json!({
            "success": true,
            "habits": [
                {
                    "_id": "h1", "name": "Read", "type": "daily", "description": "Read 20 pages",
                    "status": "active", "streak": 3, "longest_streak": 5,
                    "completion_datetimes": ["2024-03-01 14:30", "2024-03-02 14:30"]
                }
            ]
        }),
        "/user/delete" => json!({ "success": false, "error": "User not found" }),
        _ => json!({ "success": true }),
    }
}

#[cfg(unix)]
mod cleanup {
    use once_cell::sync::Lazy;
    use std::sync::{Mutex, Once};

    static REGISTER: Once = Once::new();
    static PIDS: Lazy<Mutex<Vec<i32>>> = Lazy::new(|| Mutex::new(Vec::new()));

    pub fn register(pid: u32) {
        REGISTER.call_once(|| unsafe {
            libc::atexit(on_exit);
        });
        if let Ok(mut pids) = PIDS.lock() {
            pids.push(pid as i32);
        }
    }

    extern "C" fn on_exit() {
        if let Ok(pids) = PIDS.lock() {
            for &pid in pids.iter() {
                unsafe {
                    libc::kill(pid, libc::SIGTERM);
                }
            }
        }
    }
}

pub struct Frontend {
    pub base_url: String,
    child: Child,
}

impl Drop for Frontend {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/sections/home")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("frontend did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

/// Spawns the frontend binary against the given backend.
pub async fn spawn_frontend(backend_url: &str) -> Frontend {
    let port = pick_free_port();
    let mut command = Command::new(env!("CARGO_BIN_EXE_habit_front"));
    command
        .env("FRONTEND_PORT", port.to_string())
        .env("BACKEND_URL", backend_url)
        .env("BACKEND_TIMEOUT_SECS", "5");
    start(command, port).await
}

/// Spawns the frontend from a scratch directory whose `.env` file carries the
/// port and backend URL; neither is set in the process environment.
pub async fn spawn_frontend_from_env_file(backend_url: &str) -> Frontend {
    let port = pick_free_port();
    let dir = std::env::temp_dir().join(format!("habit_front_env_{}_{port}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("create scratch dir");
    std::fs::write(
        dir.join(".env"),
        format!("FRONTEND_PORT={port}\nBACKEND_URL={backend_url}\nBACKEND_TIMEOUT_SECS=5\n"),
    )
    .expect("write .env");

    let mut command = Command::new(env!("CARGO_BIN_EXE_habit_front"));
    command
        .current_dir(&dir)
        .env_remove("FRONTEND_PORT")
        .env_remove("PORT")
        .env_remove("BACKEND_URL")
        .env_remove("BACKEND_TIMEOUT_SECS");
    start(command, port).await
}

async fn start(mut command: Command, port: u16) -> Frontend {
    let child = command
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn frontend");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    Frontend { base_url, child }
}
