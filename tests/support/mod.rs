#![allow(dead_code)]

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{Value, json};
use std::{collections::BTreeMap, sync::Arc};
use tokio::{net::TcpListener, sync::Mutex, task::JoinHandle};

type Reply = Result<Json<Value>, (StatusCode, Json<Value>)>;

#[derive(Debug, Clone)]
struct Account {
    email: String,
    password: String,
    about: String,
    points: i64,
    completed: u64,
}

#[derive(Debug, Clone)]
struct Task {
    owner: String,
    body: Value,
}

#[derive(Default)]
struct Db {
    accounts: BTreeMap<String, Account>,
    tokens: BTreeMap<String, String>,
    tasks: BTreeMap<i64, Task>,
    next_id: i64,
    next_token: u64,
    hits: BTreeMap<String, usize>,
}

impl Db {
    fn hit(&mut self, route: &str) {
        *self.hits.entry(route.to_string()).or_default() += 1;
    }

    fn issue_token(&mut self, username: &str) -> String {
        self.next_token += 1;
        let token = format!("token-{}-{}", username, self.next_token);
        self.tokens.insert(token.clone(), username.to_string());
        token
    }

    fn user_for(&self, headers: &HeaderMap) -> Result<String, (StatusCode, Json<Value>)> {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .and_then(|token| self.tokens.get(token).cloned())
            .ok_or_else(|| fail(StatusCode::UNAUTHORIZED, "Could not validate credentials"))
    }
}

#[derive(Clone, Default)]
pub struct MockState {
    db: Arc<Mutex<Db>>,
}

pub struct MockBackend {
    pub base_url: String,
    state: MockState,
    server: JoinHandle<()>,
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}

impl MockBackend {
    pub async fn start() -> Self {
        let state = MockState::default();
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind mock backend");
        let addr = listener.local_addr().unwrap();
        let app = router(state.clone());
        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock backend stopped");
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
            server,
        }
    }

    /// Number of requests seen for e.g. `"GET /api/resolutions"`.
    pub async fn hits(&self, route: &str) -> usize {
        self.state.db.lock().await.hits.get(route).copied().unwrap_or(0)
    }

    pub async fn add_account(&self, username: &str, email: &str, password: &str) {
        self.state.db.lock().await.accounts.insert(
            username.to_string(),
            Account {
                email: email.to_string(),
                password: password.to_string(),
                about: String::new(),
                points: 0,
                completed: 0,
            },
        );
    }

    pub async fn grant_points(&self, username: &str, points: i64) {
        if let Some(account) = self.state.db.lock().await.accounts.get_mut(username) {
            account.points += points;
        }
    }

    /// Invalidates every issued token, as a server-side expiry would.
    pub async fn revoke_tokens(&self) {
        self.state.db.lock().await.tokens.clear();
    }
}

fn fail(status: StatusCode, detail: &str) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "detail": detail })))
}

fn router(state: MockState) -> Router {
    Router::new()
        .route("/api", get(health))
        .route("/api/login", post(login))
        .route("/api/signup", post(signup))
        .route("/api/resolutions", get(list_tasks).post(create_task))
        .route("/api/resolutions/:id", axum::routing::delete(delete_task))
        .route("/api/resolutions/:id/complete", put(complete_task))
        .route("/api/score", get(score))
        .route("/api/profile", get(profile))
        .route("/api/profile/about", put(update_about))
        .route("/api/leaderboard", get(leaderboard))
        .route("/api/generate-tasks", post(generate_tasks))
        .with_state(state)
}

async fn health(State(state): State<MockState>) -> Json<Value> {
    state.db.lock().await.hit("GET /api");
    Json(json!({ "data": "This is data from the backend" }))
}

#[derive(Deserialize)]
struct LoginBody {
    username: String,
    password: String,
}

async fn login(State(state): State<MockState>, Json(body): Json<LoginBody>) -> Reply {
    let mut db = state.db.lock().await;
    db.hit("POST /api/login");
    let Some(account) = db.accounts.get(&body.username).cloned() else {
        return Err(fail(StatusCode::UNAUTHORIZED, "Invalid credentials"));
    };
    if account.password != body.password {
        return Err(fail(StatusCode::UNAUTHORIZED, "Invalid credentials"));
    }
    let token = db.issue_token(&body.username);
    Ok(Json(json!({
        "access_token": token,
        "token_type": "bearer",
        "username": body.username,
        "email": account.email,
    })))
}

#[derive(Deserialize)]
struct SignupBody {
    username: String,
    email: String,
    password: String,
}

async fn signup(State(state): State<MockState>, Json(body): Json<SignupBody>) -> Reply {
    let mut db = state.db.lock().await;
    db.hit("POST /api/signup");
    if db.accounts.contains_key(&body.username) {
        return Err(fail(StatusCode::BAD_REQUEST, "Username already registered"));
    }
    db.accounts.insert(
        body.username.clone(),
        Account {
            email: body.email.clone(),
            password: body.password,
            about: String::new(),
            points: 0,
            completed: 0,
        },
    );
    let token = db.issue_token(&body.username);
    Ok(Json(json!({
        "access_token": token,
        "username": body.username,
        "email": body.email,
    })))
}

async fn list_tasks(State(state): State<MockState>, headers: HeaderMap) -> Reply {
    let mut db = state.db.lock().await;
    db.hit("GET /api/resolutions");
    let user = db.user_for(&headers)?;
    let tasks: Vec<Value> = db
        .tasks
        .values()
        .filter(|task| task.owner == user)
        .map(|task| task.body.clone())
        .collect();
    Ok(Json(Value::Array(tasks)))
}

async fn create_task(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    let mut db = state.db.lock().await;
    db.hit("POST /api/resolutions");
    let user = db.user_for(&headers)?;
    let title = body["title"].as_str().unwrap_or_default().to_string();
    if title.is_empty() {
        return Err(fail(StatusCode::UNPROCESSABLE_ENTITY, "title is required"));
    }
    if body["points"].as_i64().unwrap_or(0) < 0 {
        return Err(fail(StatusCode::UNPROCESSABLE_ENTITY, "points must not be negative"));
    }
    db.next_id += 1;
    let id = db.next_id;
    let task = json!({
        "id": id,
        "title": title,
        "description": body["description"].as_str().unwrap_or_default(),
        "points": body["points"].as_i64().unwrap_or(0),
        "type": body["type"].as_str().unwrap_or("daily"),
        "target_date": body.get("target_date").cloned().unwrap_or(Value::Null),
        "status": "active",
        "completed_today": false,
    });
    db.tasks.insert(
        id,
        Task {
            owner: user,
            body: task.clone(),
        },
    );
    Ok(Json(task))
}

async fn complete_task(
    State(state): State<MockState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Reply {
    let mut db = state.db.lock().await;
    db.hit("PUT /api/resolutions/:id/complete");
    let user = db.user_for(&headers)?;
    let Some(task) = db.tasks.get_mut(&id).filter(|task| task.owner == user) else {
        return Err(fail(StatusCode::NOT_FOUND, "Resolution not found"));
    };
    if task.body["completed_today"] == json!(true) {
        return Err(fail(StatusCode::BAD_REQUEST, "Already completed today"));
    }
    task.body["completed_today"] = json!(true);
    if task.body["type"] == json!("onetime") {
        task.body["status"] = json!("completed");
    }
    let points = task.body["points"].as_i64().unwrap_or(0);
    if let Some(account) = db.accounts.get_mut(&user) {
        account.points += points;
        account.completed += 1;
    }
    Ok(Json(json!({ "message": "Resolution completed", "points_earned": points })))
}

async fn delete_task(
    State(state): State<MockState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Reply {
    let mut db = state.db.lock().await;
    db.hit("DELETE /api/resolutions/:id");
    let user = db.user_for(&headers)?;
    let owned = db.tasks.get(&id).is_some_and(|task| task.owner == user);
    if !owned {
        return Err(fail(StatusCode::NOT_FOUND, "Resolution not found"));
    }
    db.tasks.remove(&id);
    Ok(Json(json!({ "message": "Resolution deleted" })))
}

fn stats(account: &Account) -> Value {
    json!({
        "total_points": account.points,
        "tasks_completed": account.completed,
        "streak": if account.completed > 0 { 1 } else { 0 },
        "level": account.points / 100 + 1,
    })
}

async fn score(State(state): State<MockState>, headers: HeaderMap) -> Reply {
    let mut db = state.db.lock().await;
    db.hit("GET /api/score");
    let user = db.user_for(&headers)?;
    let account = &db.accounts[&user];
    Ok(Json(stats(account)))
}

async fn profile(State(state): State<MockState>, headers: HeaderMap) -> Reply {
    let mut db = state.db.lock().await;
    db.hit("GET /api/profile");
    let user = db.user_for(&headers)?;
    let account = &db.accounts[&user];
    let mut body = stats(account);
    body["username"] = json!(user);
    body["email"] = json!(account.email);
    body["about"] = json!(account.about);
    Ok(Json(body))
}

async fn update_about(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    let mut db = state.db.lock().await;
    db.hit("PUT /api/profile/about");
    let user = db.user_for(&headers)?;
    let about = body["about"].as_str().unwrap_or_default().to_string();
    if about.len() > 200 {
        return Err(fail(StatusCode::BAD_REQUEST, "About text is too long"));
    }
    if let Some(account) = db.accounts.get_mut(&user) {
        account.about = about;
    }
    Ok(Json(json!({ "message": "About updated" })))
}

async fn leaderboard(State(state): State<MockState>, headers: HeaderMap) -> Reply {
    let mut db = state.db.lock().await;
    db.hit("GET /api/leaderboard");
    db.user_for(&headers)?;
    let entries: Vec<Value> = db
        .accounts
        .iter()
        .map(|(name, account)| {
            json!({
                "username": name,
                "total_points": account.points,
                "level": account.points / 100 + 1,
            })
        })
        .collect();
    Ok(Json(Value::Array(entries)))
}

async fn generate_tasks(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    let mut db = state.db.lock().await;
    db.hit("POST /api/generate-tasks");
    db.user_for(&headers)?;
    let prompt = body["prompt"].as_str().unwrap_or_default();
    if prompt.trim().is_empty() {
        return Ok(Json(json!({ "success": false, "message": "", "tasks": [] })));
    }
    Ok(Json(json!({
        "success": true,
        "message": format!("Here are 3 ideas for \"{prompt}\""),
        "tasks": [
            { "title": "Stretch for 10 minutes", "description": "", "points": 5, "type": "daily" },
            { "title": "Run 5k", "description": "easy pace", "points": 20, "type": "daily" },
            { "title": "Sign up for a race", "description": "", "points": 30, "type": "onetime" },
        ],
    })))
}
