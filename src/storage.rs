//! Persistent session store.
//!
//! Holds exactly two string entries, a bearer token and a JSON-encoded user,
//! either in memory or in a JSON file on disk. The two entries are written and
//! removed together; a store that somehow holds only one of them reports no
//! session and drops the leftover.

use crate::errors::ClientResult;
use crate::models::{Session, User};
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::{fs, sync::Mutex};
use tracing::{debug, error, warn};

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";

type Entries = BTreeMap<String, String>;

#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    path: Option<PathBuf>,
    entries: Arc<Mutex<Entries>>,
}

impl SessionStore {
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Opens a file-backed store. A missing or unreadable file starts empty.
    pub async fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = load_entries(&path).await;
        Self {
            path: Some(path),
            entries: Arc::new(Mutex::new(entries)),
        }
    }

    pub async fn set(&self, session: &Session) -> ClientResult<()> {
        let user = serde_json::to_string(&session.user).map_err(std::io::Error::other)?;
        let mut entries = self.entries.lock().await;
        let mut next = entries.clone();
        next.insert(TOKEN_KEY.to_string(), session.token.clone());
        next.insert(USER_KEY.to_string(), user);
        self.persist(&next).await?;
        *entries = next;
        debug!(username = %session.user.username, "session stored");
        Ok(())
    }

    pub async fn get(&self) -> Option<Session> {
        let mut entries = self.entries.lock().await;
        let token = entries.get(TOKEN_KEY).cloned();
        let user = entries
            .get(USER_KEY)
            .map(|raw| serde_json::from_str::<User>(raw));

        match (token, user) {
            (Some(token), Some(Ok(user))) => Some(Session { token, user }),
            (None, None) => None,
            _ => {
                warn!("partial session found, clearing it");
                entries.clear();
                if let Err(err) = self.persist(&entries).await {
                    error!("failed to persist cleared session: {err}");
                }
                None
            }
        }
    }

    pub async fn token(&self) -> Option<String> {
        self.get().await.map(|session| session.token)
    }

    pub async fn clear(&self) -> ClientResult<()> {
        let mut entries = self.entries.lock().await;
        let mut next = entries.clone();
        next.remove(TOKEN_KEY);
        next.remove(USER_KEY);
        let persisted = self.persist(&next).await;
        // Memory always drops the session; a failed write is still reported.
        *entries = next;
        persisted?;
        debug!("session cleared");
        Ok(())
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    async fn persist(&self, entries: &Entries) -> ClientResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        let payload = serde_json::to_vec_pretty(entries).map_err(std::io::Error::other)?;
        fs::write(path, payload).await?;
        Ok(())
    }
}

async fn load_entries(path: &Path) -> Entries {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(entries) => entries,
            Err(err) => {
                error!("failed to parse session file: {err}");
                Entries::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Entries::default(),
        Err(err) => {
            error!("failed to read session file: {err}");
            Entries::default()
        }
    }
}
