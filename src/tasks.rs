//! Task list kept in sync with the server.
//!
//! There is no optimistic update. Every successful mutation is followed by a
//! full list re-fetch and a score refresh; a failed mutation leaves the
//! displayed list untouched. Overlapping calls are neither cancelled nor
//! de-duplicated, so their responses apply in arrival order.

use crate::api::ApiClient;
use crate::errors::{ClientError, ClientResult};
use crate::models::{NewResolution, Resolution};
use crate::stats::ScoreRefresh;
use tracing::{error, info};

#[derive(Debug)]
pub struct TaskBoard {
    api: ApiClient,
    tasks: Vec<Resolution>,
    loaded: bool,
    status: Option<String>,
}

impl TaskBoard {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            tasks: Vec::new(),
            loaded: false,
            status: None,
        }
    }

    pub fn tasks(&self) -> &[Resolution] {
        &self.tasks
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Last caught failure, cleared by the next success.
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub async fn refresh(&mut self) -> ClientResult<()> {
        match self.api.list_resolutions().await {
            Ok(tasks) => {
                self.tasks = tasks;
                self.loaded = true;
                self.status = None;
                Ok(())
            }
            Err(err) => self.caught("fetch tasks", err),
        }
    }

    pub async fn create<S: ScoreRefresh>(
        &mut self,
        task: &NewResolution,
        score: &mut S,
    ) -> ClientResult<bool> {
        if task.title.trim().is_empty() {
            self.status = Some("Task title is required".to_string());
            return Err(ClientError::validation("Task title is required"));
        }
        if let Err(err) = self.api.create_resolution(task).await {
            self.caught("create task", err)?;
            return Ok(false);
        }
        info!(title = %task.title, "task created");
        self.resync(score).await?;
        Ok(true)
    }

    /// Creates each task in order, then re-fetches once. Returns how many
    /// were accepted by the server.
    pub async fn create_many<S: ScoreRefresh>(
        &mut self,
        tasks: &[NewResolution],
        score: &mut S,
    ) -> ClientResult<usize> {
        let mut created = 0;
        for task in tasks {
            match self.api.create_resolution(task).await {
                Ok(_) => created += 1,
                Err(err) => self.caught("create task", err)?,
            }
        }
        if created > 0 {
            info!(created, "tasks created");
            self.resync(score).await?;
        }
        Ok(created)
    }

    pub async fn complete<S: ScoreRefresh>(&mut self, id: i64, score: &mut S) -> ClientResult<bool> {
        if let Err(err) = self.api.complete_resolution(id).await {
            self.caught("complete task", err)?;
            return Ok(false);
        }
        info!(id, "task completed");
        self.resync(score).await?;
        Ok(true)
    }

    pub async fn delete<S: ScoreRefresh>(&mut self, id: i64, score: &mut S) -> ClientResult<bool> {
        if let Err(err) = self.api.delete_resolution(id).await {
            self.caught("delete task", err)?;
            return Ok(false);
        }
        info!(id, "task deleted");
        self.resync(score).await?;
        Ok(true)
    }

    pub fn reset(&mut self) {
        self.tasks.clear();
        self.loaded = false;
        self.status = None;
    }

    async fn resync<S: ScoreRefresh>(&mut self, score: &mut S) -> ClientResult<()> {
        self.refresh().await?;
        score.refresh_score().await
    }

    /// Logs and records a failure. Only `Unauthorized` escapes.
    fn caught(&mut self, action: &str, err: ClientError) -> ClientResult<()> {
        if err.is_unauthorized() {
            return Err(err);
        }
        error!("failed to {action}: {err}");
        self.status = Some(err.user_message());
        Ok(())
    }
}
