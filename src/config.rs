use std::{env, path::PathBuf};
use tracing_subscriber::EnvFilter;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_SESSION_PATH: &str = "data/session.json";
pub const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub session_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            base_url: resolve_base_url(),
            session_path: resolve_session_path(),
        }
    }
}

pub fn resolve_base_url() -> String {
    match env::var("RESOLUTIONS_API_BASE") {
        Ok(url) if !url.trim().is_empty() => normalize_base_url(&url),
        _ => DEFAULT_BASE_URL.to_string(),
    }
}

pub fn resolve_session_path() -> PathBuf {
    if let Ok(path) = env::var("RESOLUTIONS_SESSION_PATH") {
        return PathBuf::from(path);
    }

    PathBuf::from(DEFAULT_SESSION_PATH)
}

/// Endpoint paths start with `/`, so a trailing slash on the base is dropped.
pub fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// Log filter from `RUST_LOG`-style directives. Unset or unparseable input
/// falls back to warnings only.
pub fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .filter(|raw| !raw.trim().is_empty())
        .and_then(|raw| EnvFilter::try_new(raw).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}
