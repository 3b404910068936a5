//! Chat-driven task suggestions.
//!
//! Each prompt yields one assistant message with zero or more candidate
//! tasks. Candidates start selected; they can be toggled or removed, and the
//! selected ones of a message can be handed to a [`TaskSink`]. Everything here
//! lives in memory only.

use crate::api::ApiClient;
use crate::errors::ClientResult;
use crate::models::{GenerateResponse, NewResolution};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{error, info};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MessageId(Uuid);

impl MessageId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Position of one candidate within one assistant message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CandidateKey {
    pub message: MessageId,
    pub index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Assistant,
}

#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub id: MessageId,
    pub sender: Sender,
    pub text: String,
}

/// Receives the tasks a user confirmed out of a suggestion set.
#[allow(async_fn_in_trait)]
pub trait TaskSink {
    async fn add_tasks(&mut self, tasks: Vec<NewResolution>) -> ClientResult<usize>;
}

#[derive(Debug)]
pub struct SuggestionPanel {
    api: ApiClient,
    messages: Vec<ChatMessage>,
    candidates: BTreeMap<MessageId, Vec<NewResolution>>,
    selection: BTreeMap<CandidateKey, bool>,
    last_prompt: Option<String>,
}

impl SuggestionPanel {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            messages: Vec::new(),
            candidates: BTreeMap::new(),
            selection: BTreeMap::new(),
            last_prompt: None,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn candidates(&self, message: MessageId) -> &[NewResolution] {
        self.candidates
            .get(&message)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn is_selected(&self, key: CandidateKey) -> bool {
        self.selection.get(&key).copied().unwrap_or(false)
    }

    pub fn selection_len(&self) -> usize {
        self.selection.len()
    }

    /// The newest assistant message that carries candidates.
    pub fn latest_suggestion(&self) -> Option<MessageId> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.sender == Sender::Assistant && self.candidates.contains_key(&m.id))
            .map(|m| m.id)
    }

    /// Sends a prompt and records the assistant reply. Failures other than
    /// `Unauthorized` become an assistant message.
    pub async fn send(&mut self, prompt: &str) -> ClientResult<MessageId> {
        self.push(Sender::User, prompt.to_string());
        self.last_prompt = Some(prompt.to_string());

        match self.api.generate_tasks(prompt).await {
            Ok(resp) => Ok(self.receive(resp)),
            Err(err) if err.is_unauthorized() => Err(err),
            Err(err) => {
                error!("failed to generate tasks: {err}");
                Ok(self.push(Sender::Assistant, format!("Error: {}", err.user_message())))
            }
        }
    }

    /// Re-sends the last prompt, if there was one.
    pub async fn generate_more(&mut self) -> ClientResult<Option<MessageId>> {
        match self.last_prompt.clone() {
            Some(prompt) => self.send(&prompt).await.map(Some),
            None => Ok(None),
        }
    }

    pub(crate) fn receive(&mut self, resp: GenerateResponse) -> MessageId {
        if !resp.success {
            return self.push(Sender::Assistant, "Failed to generate tasks".to_string());
        }
        let id = self.push(Sender::Assistant, resp.message);
        for index in 0..resp.tasks.len() {
            self.selection.insert(CandidateKey { message: id, index }, true);
        }
        info!(message = %id, candidates = resp.tasks.len(), "suggestions received");
        self.candidates.insert(id, resp.tasks);
        id
    }

    pub fn toggle(&mut self, key: CandidateKey) {
        if let Some(selected) = self.selection.get_mut(&key) {
            *selected = !*selected;
        }
    }

    pub fn set_selected(&mut self, key: CandidateKey, selected: bool) {
        if let Some(entry) = self.selection.get_mut(&key) {
            *entry = selected;
        }
    }

    /// Drops a candidate and its selection entry. Later candidates of the same
    /// message shift down one position, and so do their selection keys.
    pub fn remove(&mut self, key: CandidateKey) -> Option<NewResolution> {
        let list = self.candidates.get_mut(&key.message)?;
        if key.index >= list.len() {
            return None;
        }
        let removed = list.remove(key.index);
        let remaining = list.len();

        self.selection.remove(&key);
        for index in key.index..remaining {
            let from = CandidateKey {
                message: key.message,
                index: index + 1,
            };
            if let Some(selected) = self.selection.remove(&from) {
                self.selection.insert(
                    CandidateKey {
                        message: key.message,
                        index,
                    },
                    selected,
                );
            }
        }
        Some(removed)
    }

    pub fn selected_tasks(&self, message: MessageId) -> Vec<NewResolution> {
        let Some(list) = self.candidates.get(&message) else {
            return Vec::new();
        };
        self.selection
            .iter()
            .filter(|(key, selected)| key.message == message && **selected)
            .filter_map(|(key, _)| list.get(key.index).cloned())
            .collect()
    }

    /// Hands the selected candidates of `message` to `sink`. No-op when
    /// nothing is selected.
    pub async fn add_selected<S: TaskSink>(
        &mut self,
        message: MessageId,
        sink: &mut S,
    ) -> ClientResult<usize> {
        let tasks = self.selected_tasks(message);
        if tasks.is_empty() {
            return Ok(0);
        }
        let count = tasks.len();
        sink.add_tasks(tasks).await?;
        self.push(Sender::Assistant, format!("Added {count} task(s) to your list!"));
        Ok(count)
    }

    pub fn clear(&mut self) {
        self.messages.clear();
        self.candidates.clear();
        self.selection.clear();
        self.last_prompt = None;
    }

    fn push(&mut self, sender: Sender, text: String) -> MessageId {
        let id = MessageId::new();
        self.messages.push(ChatMessage { id, sender, text });
        id
    }
}
