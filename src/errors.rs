use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Rejected locally before any request was sent.
    #[error("{0}")]
    Validation(String),

    /// The server answered 401. The session store has already been emptied.
    #[error("not authorized, please log in again")]
    Unauthorized,

    #[error("request failed with status {status}: {}", .detail.as_deref().unwrap_or("no detail"))]
    RequestFailure { status: u16, detail: Option<String> },

    /// No response at all.
    #[error("cannot reach server: {0}")]
    Connectivity(String),

    #[error("unexpected response body: {0}")]
    Decode(String),

    #[error("session storage: {0}")]
    Storage(#[from] std::io::Error),
}

impl ClientError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// Server-provided `detail`, if this is a request failure that carried one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::RequestFailure { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// Short text for a transient status line.
    pub fn user_message(&self) -> String {
        match self {
            Self::RequestFailure {
                detail: Some(detail),
                ..
            } => detail.clone(),
            Self::Connectivity(_) => "Cannot connect to server. Make sure backend is running.".into(),
            other => other.to_string(),
        }
    }
}
