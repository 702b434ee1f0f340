use crate::backend::BackendClient;
use crate::session::Session;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub backend: BackendClient,
    pub admin: Arc<Mutex<Session>>,
    pub user: Arc<Mutex<Session>>,
}

impl AppState {
    pub fn new(backend: BackendClient) -> Self {
        Self {
            backend,
            admin: Arc::new(Mutex::new(Session::default())),
            user: Arc::new(Mutex::new(Session::default())),
        }
    }

    pub async fn admin_session(&self) -> Session {
        self.admin.lock().await.clone()
    }

    pub async fn user_session(&self) -> Session {
        self.user.lock().await.clone()
    }
}
