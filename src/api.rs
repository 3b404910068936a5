//! Single gateway for backend calls.
//!
//! Every request carries `Content-Type: application/json`; authenticated
//! requests also carry the bearer token from the session store. A 401 from
//! any endpoint empties the store before the error reaches the caller.

use crate::errors::{ClientError, ClientResult};
use crate::models::{
    AboutRequest, AuthResponse, GenerateRequest, GenerateResponse, LeaderboardEntry,
    LoginRequest, NewResolution, Profile, Resolution, Score, Session, SignupRequest,
};
use crate::storage::SessionStore;
use reqwest::{Client, Method, StatusCode, header};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Auth {
    Anonymous,
    Bearer,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    session: SessionStore,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, session: SessionStore) -> Self {
        Self {
            http: Client::new(),
            base_url: crate::config::normalize_base_url(&base_url.into()),
            session,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Authenticated request returning the decoded body.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> ClientResult<T> {
        let text = self.send(Auth::Bearer, method, path, body).await?;
        decode(path, &text)
    }

    pub async fn health(&self) -> ClientResult<Value> {
        self.request(Method::GET, "/api", None).await
    }

    pub async fn login(&self, username: &str, password: &str) -> ClientResult<Session> {
        let body = to_body(&LoginRequest { username, password })?;
        let text = self.send(Auth::Anonymous, Method::POST, "/api/login", Some(body)).await?;
        let resp: AuthResponse = decode("/api/login", &text)?;
        Ok(resp.into())
    }

    pub async fn signup(&self, username: &str, email: &str, password: &str) -> ClientResult<Session> {
        let body = to_body(&SignupRequest {
            username,
            email,
            password,
        })?;
        let text = self.send(Auth::Anonymous, Method::POST, "/api/signup", Some(body)).await?;
        let resp: AuthResponse = decode("/api/signup", &text)?;
        Ok(resp.into())
    }

    pub async fn list_resolutions(&self) -> ClientResult<Vec<Resolution>> {
        self.request(Method::GET, "/api/resolutions", None).await
    }

    pub async fn create_resolution(&self, task: &NewResolution) -> ClientResult<Value> {
        self.request(Method::POST, "/api/resolutions", Some(to_body(task)?))
            .await
    }

    pub async fn complete_resolution(&self, id: i64) -> ClientResult<Value> {
        self.request(Method::PUT, &format!("/api/resolutions/{id}/complete"), None)
            .await
    }

    pub async fn delete_resolution(&self, id: i64) -> ClientResult<Value> {
        self.request(Method::DELETE, &format!("/api/resolutions/{id}"), None)
            .await
    }

    pub async fn score(&self) -> ClientResult<Score> {
        self.request(Method::GET, "/api/score", None).await
    }

    pub async fn profile(&self) -> ClientResult<Profile> {
        self.request(Method::GET, "/api/profile", None).await
    }

    pub async fn update_about(&self, about: &str) -> ClientResult<Value> {
        self.request(
            Method::PUT,
            "/api/profile/about",
            Some(to_body(&AboutRequest { about })?),
        )
        .await
    }

    pub async fn leaderboard(&self) -> ClientResult<Vec<LeaderboardEntry>> {
        self.request(Method::GET, "/api/leaderboard", None).await
    }

    pub async fn generate_tasks(&self, prompt: &str) -> ClientResult<GenerateResponse> {
        self.request(
            Method::POST,
            "/api/generate-tasks",
            Some(to_body(&GenerateRequest { prompt })?),
        )
        .await
    }

    async fn send(
        &self,
        auth: Auth,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> ClientResult<String> {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self
            .http
            .request(method.clone(), &url)
            .header(header::CONTENT_TYPE, "application/json");

        if auth == Auth::Bearer {
            if let Some(token) = self.session.token().await {
                req = req.bearer_auth(token);
            }
        }
        if let Some(body) = body {
            req = req.body(body.to_string());
        }

        debug!(%method, path, "sending request");
        let response = req.send().await.map_err(|err| {
            warn!(%method, path, "no response: {err}");
            ClientError::Connectivity(err.to_string())
        })?;

        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            // Teardown must not depend on the body arriving intact.
            if let Err(err) = self.session.clear().await {
                error!("failed to clear session after 401: {err}");
            }
            warn!(%method, path, "401 received, session dropped");
            let text = response.text().await.unwrap_or_default();
            return match auth {
                Auth::Bearer => Err(ClientError::Unauthorized),
                Auth::Anonymous => Err(ClientError::RequestFailure {
                    status: status.as_u16(),
                    detail: extract_detail(&text),
                }),
            };
        }

        if !status.is_success() {
            warn!(%method, path, status = status.as_u16(), "request rejected");
            let text = response.text().await.unwrap_or_default();
            return Err(ClientError::RequestFailure {
                status: status.as_u16(),
                detail: extract_detail(&text),
            });
        }

        response
            .text()
            .await
            .map_err(|err| ClientError::Connectivity(err.to_string()))
    }
}

fn to_body<T: serde::Serialize>(value: &T) -> ClientResult<Value> {
    serde_json::to_value(value).map_err(|err| ClientError::Decode(err.to_string()))
}

fn decode<T: DeserializeOwned>(path: &str, text: &str) -> ClientResult<T> {
    // Some mutation endpoints answer with an empty body.
    let text = if text.trim().is_empty() { "null" } else { text };
    serde_json::from_str(text).map_err(|err| {
        error!(path, "failed to decode response: {err}");
        ClientError::Decode(err.to_string())
    })
}

/// Pulls `detail` out of an error body. Non-string details (validation
/// lists) are kept as compact JSON.
pub fn extract_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        Value::String(text) => Some(text.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}
