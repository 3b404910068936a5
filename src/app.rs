//! Root controller: owns the session, the API client and every view, and
//! turns an `Unauthorized` from any of them into a return to the login screen.

use crate::account::{self, AccountView};
use crate::api::ApiClient;
use crate::auth::AuthFlow;
use crate::chat::{MessageId, SuggestionPanel, TaskSink};
use crate::config::Config;
use crate::errors::ClientResult;
use crate::models::{LeaderboardEntry, NewResolution, Session};
use crate::stats::ScoreView;
use crate::storage::SessionStore;
use crate::tasks::TaskBoard;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Home,
    Chat,
    Account,
    Leaderboard,
}

#[derive(Debug)]
pub struct App {
    pub session: SessionStore,
    pub api: ApiClient,
    pub auth: AuthFlow,
    pub tab: Tab,
    pub board: TaskBoard,
    pub score: ScoreView,
    pub chat: SuggestionPanel,
    pub account: AccountView,
}

/// Chat hand-off target: creates tasks on the board and refreshes the score.
struct BoardSink<'a> {
    board: &'a mut TaskBoard,
    score: &'a mut ScoreView,
}

impl TaskSink for BoardSink<'_> {
    async fn add_tasks(&mut self, tasks: Vec<NewResolution>) -> ClientResult<usize> {
        self.board.create_many(&tasks, &mut *self.score).await
    }
}

impl App {
    pub async fn open(config: &Config) -> Self {
        let session = SessionStore::open(&config.session_path).await;
        Self::with_session(&config.base_url, session).await
    }

    pub async fn with_session(base_url: &str, session: SessionStore) -> Self {
        let api = ApiClient::new(base_url, session.clone());
        Self {
            auth: AuthFlow::resume(api.clone()).await,
            tab: Tab::Home,
            board: TaskBoard::new(api.clone()),
            score: ScoreView::new(api.clone()),
            chat: SuggestionPanel::new(api.clone()),
            account: AccountView::new(api.clone()),
            session,
            api,
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.auth.is_authenticated()
    }

    pub async fn current_session(&self) -> Option<Session> {
        self.session.get().await
    }

    pub fn select_tab(&mut self, tab: Tab) {
        self.tab = tab;
    }

    /// Home screen mount: task list and score are fetched independently.
    pub async fn mount_home(&mut self) -> ClientResult<()> {
        let (tasks, score) = tokio::join!(self.board.refresh(), self.score.refresh());
        self.guard(tasks.and(score))
    }

    pub async fn login(&mut self, username: &str, password: &str) -> ClientResult<Session> {
        self.auth.login(username, password).await
    }

    pub async fn signup(&mut self, username: &str, email: &str, password: &str) -> ClientResult<Session> {
        self.auth.signup(username, email, password).await
    }

    pub async fn logout(&mut self) -> ClientResult<()> {
        self.auth.logout().await?;
        self.reset_views();
        Ok(())
    }

    pub async fn create_task(&mut self, task: &NewResolution) -> ClientResult<bool> {
        let result = self.board.create(task, &mut self.score).await;
        self.guard(result)
    }

    pub async fn complete_task(&mut self, id: i64) -> ClientResult<bool> {
        let result = self.board.complete(id, &mut self.score).await;
        self.guard(result)
    }

    pub async fn delete_task(&mut self, id: i64) -> ClientResult<bool> {
        let result = self.board.delete(id, &mut self.score).await;
        self.guard(result)
    }

    pub async fn suggest(&mut self, prompt: &str) -> ClientResult<MessageId> {
        let result = self.chat.send(prompt).await;
        self.guard(result)
    }

    pub async fn add_suggestions(&mut self, message: MessageId) -> ClientResult<usize> {
        let mut sink = BoardSink {
            board: &mut self.board,
            score: &mut self.score,
        };
        let result = self.chat.add_selected(message, &mut sink).await;
        self.guard(result)
    }

    pub async fn load_account(&mut self) -> ClientResult<()> {
        let result = self.account.load().await;
        self.guard(result)
    }

    pub async fn save_about(&mut self, about: &str) -> ClientResult<bool> {
        self.account.begin_edit();
        self.account.set_draft(about);
        let result = self.account.save_about().await;
        self.guard(result)
    }

    pub async fn leaderboard(&mut self) -> ClientResult<Vec<LeaderboardEntry>> {
        let result = account::leaderboard(&self.api).await;
        self.guard(result)
    }

    /// The session store was already emptied by the API client; this drops
    /// every view back to its initial state and shows the login screen.
    fn guard<T>(&mut self, result: ClientResult<T>) -> ClientResult<T> {
        if let Err(err) = &result {
            if err.is_unauthorized() {
                warn!("session rejected by server, returning to login");
                self.auth.force_login();
                self.reset_views();
            }
        }
        result
    }

    fn reset_views(&mut self) {
        self.tab = Tab::Home;
        self.board.reset();
        self.score.reset();
        self.chat.clear();
        self.account.reset();
    }
}
