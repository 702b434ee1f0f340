pub mod app;
pub mod backend;
pub mod config;
pub mod content;
pub mod errors;
pub mod forms;
pub mod handlers;
pub mod models;
pub mod render;
pub mod session;
pub mod state;
pub mod ui;
pub mod views;

pub use app::router;
pub use backend::BackendClient;
pub use config::Config;
pub use state::AppState;
