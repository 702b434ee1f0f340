use std::{env, fmt::Display, path::PathBuf, str::FromStr, time::Duration};

use tracing::{info, warn};

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";
const DEFAULT_STATIC_DIR: &str = "public";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub backend_url: String,
    pub public_url: Option<String>,
    pub static_dir: PathBuf,
    pub backend_timeout: Duration,
}

impl Config {
    pub fn load() -> Self {
        let port_key = if env::var("FRONTEND_PORT").is_ok() {
            "FRONTEND_PORT"
        } else {
            "PORT"
        };

        Self {
            port: try_load(port_key, DEFAULT_PORT),
            backend_url: normalize_base_url(&try_load(
                "BACKEND_URL",
                DEFAULT_BACKEND_URL.to_string(),
            )),
            public_url: var("FRONTEND_PUBLIC_URL").ok(),
            static_dir: PathBuf::from(try_load(
                "STATIC_DIR",
                DEFAULT_STATIC_DIR.to_string(),
            )),
            backend_timeout: Duration::from_secs(try_load(
                "BACKEND_TIMEOUT_SECS",
                DEFAULT_TIMEOUT_SECS,
            )),
        }
    }

    /// Address announced in the startup log.
    pub fn announce_url(&self) -> String {
        self.public_url
            .clone()
            .unwrap_or_else(|| format!("http://localhost:{}", self.port))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            public_url: None,
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            backend_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

fn var(key: &str) -> Result<String, env::VarError> {
    env::var(key).map(|value| value.trim().to_string())
}

fn try_load<T>(key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    let Ok(raw) = var(key) else {
        info!("{key} not set, using default: {default}");
        return default;
    };

    raw.parse().unwrap_or_else(|err| {
        warn!("invalid {key} value {raw:?}: {err}, using default: {default}");
        default
    })
}

fn normalize_base_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_drops_trailing_slashes() {
        assert_eq!(normalize_base_url("http://backend:5000/"), "http://backend:5000");
        assert_eq!(normalize_base_url("http://backend:5000"), "http://backend:5000");
    }

    #[test]
    fn announce_url_prefers_public_url() {
        let mut config = Config::default();
        assert_eq!(config.announce_url(), "http://localhost:3000");
        config.public_url = Some("https://habits.example".into());
        assert_eq!(config.announce_url(), "https://habits.example");
    }
}
