use crate::api::ApiClient;
use crate::errors::{ClientError, ClientResult};
use crate::models::Session;
use tracing::{error, info};

pub const LOGIN_INCOMPLETE: &str = "Please enter both username and password!";
pub const SIGNUP_INCOMPLETE: &str = "Please fill in all fields before signing up!";
pub const SIGNUP_SUCCESS: &str = "Account created successfully! Logging you in...";
pub const SERVER_UNREACHABLE: &str = "Cannot connect to server. Make sure backend is running.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScreen {
    Login,
    Signup,
    Authenticated,
}

#[derive(Debug)]
pub struct AuthFlow {
    api: ApiClient,
    screen: AuthScreen,
    warning: Option<String>,
}

impl AuthFlow {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            screen: AuthScreen::Login,
            warning: None,
        }
    }

    /// Starts authenticated when the store already holds a session.
    pub async fn resume(api: ApiClient) -> Self {
        let mut flow = Self::new(api);
        if flow.api.session().get().await.is_some() {
            flow.screen = AuthScreen::Authenticated;
        }
        flow
    }

    pub fn screen(&self) -> AuthScreen {
        self.screen
    }

    pub fn is_authenticated(&self) -> bool {
        self.screen == AuthScreen::Authenticated
    }

    pub fn warning(&self) -> Option<&str> {
        self.warning.as_deref()
    }

    pub fn show_signup(&mut self) {
        if self.screen == AuthScreen::Login {
            self.screen = AuthScreen::Signup;
            self.warning = None;
        }
    }

    pub fn show_login(&mut self) {
        if self.screen == AuthScreen::Signup {
            self.screen = AuthScreen::Login;
            self.warning = None;
        }
    }

    pub async fn login(&mut self, username: &str, password: &str) -> ClientResult<Session> {
        if username.is_empty() || password.is_empty() {
            return Err(self.reject(LOGIN_INCOMPLETE));
        }
        self.warning = None;

        let result = self.api.login(username, password).await;
        self.finish(result, "Login failed").await
    }

    pub async fn signup(
        &mut self,
        username: &str,
        email: &str,
        password: &str,
    ) -> ClientResult<Session> {
        if username.is_empty() || email.is_empty() || password.is_empty() {
            return Err(self.reject(SIGNUP_INCOMPLETE));
        }
        self.warning = None;

        let result = self.api.signup(username, email, password).await;
        let session = self.finish(result, "Signup failed").await?;
        self.warning = Some(SIGNUP_SUCCESS.to_string());
        Ok(session)
    }

    pub async fn logout(&mut self) -> ClientResult<()> {
        self.api.session().clear().await?;
        self.screen = AuthScreen::Login;
        self.warning = None;
        info!("logged out");
        Ok(())
    }

    /// Returns to the login screen after the session was dropped elsewhere.
    pub fn force_login(&mut self) {
        self.screen = AuthScreen::Login;
        self.warning = None;
    }

    fn reject(&mut self, message: &str) -> ClientError {
        self.warning = Some(message.to_string());
        ClientError::validation(message)
    }

    async fn finish(
        &mut self,
        result: ClientResult<Session>,
        fallback: &str,
    ) -> ClientResult<Session> {
        match result {
            Ok(session) => {
                self.api.session().set(&session).await?;
                self.screen = AuthScreen::Authenticated;
                info!(username = %session.user.username, "authenticated");
                Ok(session)
            }
            Err(err) => {
                error!("authentication error: {err}");
                self.warning = Some(match &err {
                    ClientError::Connectivity(_) => SERVER_UNREACHABLE.to_string(),
                    other => other.detail().unwrap_or(fallback).to_string(),
                });
                Err(err)
            }
        }
    }
}
