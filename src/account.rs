use crate::api::ApiClient;
use crate::errors::{ClientError, ClientResult};
use crate::models::{LeaderboardEntry, Profile};
use tracing::error;

/// Profile screen. The server owns the profile; only `about` is written back.
#[derive(Debug)]
pub struct AccountView {
    api: ApiClient,
    profile: Option<Profile>,
    draft: String,
    editing: bool,
}

impl AccountView {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            profile: None,
            draft: String::new(),
            editing: false,
        }
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub async fn load(&mut self) -> ClientResult<()> {
        match self.api.profile().await {
            Ok(profile) => {
                self.draft = profile.about.clone();
                self.profile = Some(profile);
                Ok(())
            }
            Err(err) => caught("fetch profile", err),
        }
    }

    pub fn begin_edit(&mut self) {
        self.draft = self
            .profile
            .as_ref()
            .map(|p| p.about.clone())
            .unwrap_or_default();
        self.editing = true;
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    pub fn cancel_edit(&mut self) {
        self.begin_edit();
        self.editing = false;
    }

    /// Writes the draft through. On failure the draft and edit mode stay.
    pub async fn save_about(&mut self) -> ClientResult<bool> {
        match self.api.update_about(&self.draft).await {
            Ok(_) => {
                if let Some(profile) = self.profile.as_mut() {
                    profile.about = self.draft.clone();
                }
                self.editing = false;
                Ok(true)
            }
            Err(err) => caught("update about", err).map(|_| false),
        }
    }

    pub fn initials(&self) -> String {
        self.profile
            .as_ref()
            .map(|p| initials(&p.username))
            .unwrap_or_default()
    }

    pub fn reset(&mut self) {
        self.profile = None;
        self.draft.clear();
        self.editing = false;
    }
}

/// First letters of up to two words, uppercased.
pub fn initials(username: &str) -> String {
    let from_words: String = username
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .take(2)
        .collect();
    if !from_words.is_empty() {
        return from_words;
    }
    username.chars().take(2).flat_map(char::to_uppercase).collect()
}

/// Entries sorted by points, highest first.
pub async fn leaderboard(api: &ApiClient) -> ClientResult<Vec<LeaderboardEntry>> {
    let mut entries = api.leaderboard().await?;
    entries.sort_by(|a, b| b.total_points.cmp(&a.total_points));
    Ok(entries)
}

fn caught(action: &str, err: ClientError) -> ClientResult<()> {
    if err.is_unauthorized() {
        return Err(err);
    }
    error!("failed to {action}: {err}");
    Ok(())
}
