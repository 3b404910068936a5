use crate::api::ApiClient;
use crate::errors::ClientResult;
use crate::models::Score;
use tracing::error;

/// Points needed to fill the token ring once.
pub const RING_CAPACITY: i64 = 100;

/// Whatever keeps the points display in step with the server.
#[allow(async_fn_in_trait)]
pub trait ScoreRefresh {
    async fn refresh_score(&mut self) -> ClientResult<()>;
}

#[derive(Debug)]
pub struct ScoreView {
    api: ApiClient,
    score: Option<Score>,
}

impl ScoreView {
    pub fn new(api: ApiClient) -> Self {
        Self { api, score: None }
    }

    pub fn score(&self) -> Option<&Score> {
        self.score.as_ref()
    }

    /// Fetches the score. A caught failure keeps the previous value; only
    /// `Unauthorized` is returned.
    pub async fn refresh(&mut self) -> ClientResult<()> {
        match self.api.score().await {
            Ok(score) => {
                self.score = Some(score);
                Ok(())
            }
            Err(err) if err.is_unauthorized() => Err(err),
            Err(err) => {
                error!("failed to fetch score: {err}");
                Ok(())
            }
        }
    }

    pub fn reset(&mut self) {
        self.score = None;
    }
}

impl ScoreRefresh for ScoreView {
    async fn refresh_score(&mut self) -> ClientResult<()> {
        self.refresh().await
    }
}

/// Fill of the token ring in `0.0..=1.0`.
pub fn ring_fraction(total_points: i64) -> f64 {
    total_points.clamp(0, RING_CAPACITY) as f64 / RING_CAPACITY as f64
}
