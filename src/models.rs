use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub email: String,
}

/// A bearer token paired with the identity it was issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    Daily,
    Onetime,
}

impl TaskKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskKind::Daily => "daily",
            TaskKind::Onetime => "onetime",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub points: i64,
    #[serde(rename = "type")]
    pub kind: TaskKind,
    #[serde(default)]
    pub target_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub completed_today: bool,
}

impl Resolution {
    pub fn is_completed(&self) -> bool {
        self.status == "completed"
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        match (self.kind, self.target_date) {
            (TaskKind::Onetime, Some(due)) => due < today && !self.is_completed(),
            _ => false,
        }
    }
}

/// Body of a create call; also the shape of a generated candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewResolution {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub points: i64,
    #[serde(rename = "type")]
    pub kind: TaskKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_date: Option<NaiveDate>,
}

impl NewResolution {
    pub fn new(title: impl Into<String>, points: i64, kind: TaskKind) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            points,
            kind,
            target_date: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Score {
    #[serde(default)]
    pub total_points: i64,
    #[serde(default)]
    pub tasks_completed: u64,
    #[serde(default)]
    pub streak: u32,
    #[serde(default)]
    pub level: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub about: String,
    #[serde(default)]
    pub total_points: i64,
    #[serde(default)]
    pub tasks_completed: u64,
    #[serde(default)]
    pub streak: u32,
    #[serde(default)]
    pub level: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub username: String,
    #[serde(default)]
    pub total_points: i64,
    #[serde(default)]
    pub level: u32,
}

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct SignupRequest<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub username: String,
    pub email: String,
}

impl From<AuthResponse> for Session {
    fn from(resp: AuthResponse) -> Self {
        Session {
            token: resp.access_token,
            user: User {
                username: resp.username,
                email: resp.email,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AboutRequest<'a> {
    pub about: &'a str,
}

#[derive(Debug, Serialize)]
pub struct GenerateRequest<'a> {
    pub prompt: &'a str,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub tasks: Vec<NewResolution>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolution_reads_backend_shape() {
        let json = r#"{
            "id": 7,
            "title": "Run 5k",
            "description": "",
            "points": 20,
            "type": "daily",
            "target_date": null,
            "status": "active",
            "completed_today": true
        }"#;
        let task: Resolution = serde_json::from_str(json).unwrap();
        assert_eq!(task.kind, TaskKind::Daily);
        assert!(task.completed_today);
        assert!(task.target_date.is_none());
    }

    #[test]
    fn overdue_only_for_open_onetime_tasks() {
        let today = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let mut task = Resolution {
            id: 1,
            title: "File taxes".into(),
            description: String::new(),
            points: 50,
            kind: TaskKind::Onetime,
            target_date: NaiveDate::from_ymd_opt(2026, 1, 1),
            status: "active".into(),
            completed_today: false,
        };
        assert!(task.is_overdue(today));

        task.status = "completed".into();
        assert!(!task.is_overdue(today));

        task.status = "active".into();
        task.kind = TaskKind::Daily;
        assert!(!task.is_overdue(today));
    }

    #[test]
    fn new_resolution_omits_missing_date() {
        let body = serde_json::to_value(NewResolution::new("Read", 10, TaskKind::Onetime)).unwrap();
        assert_eq!(body["type"], "onetime");
        assert!(body.get("target_date").is_none());
    }
}
