use crate::app::{App, Tab};
use crate::auth::AuthScreen;
use crate::chat::CandidateKey;
use crate::errors::{ClientError, ClientResult};
use crate::models::{NewResolution, TaskKind};
use crate::ui;
use chrono::NaiveDate;
use clap::{Subcommand, ValueEnum};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum KindArg {
    Daily,
    Onetime,
}

impl From<KindArg> for TaskKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Daily => TaskKind::Daily,
            KindArg::Onetime => TaskKind::Onetime,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check that the backend answers
    Health,
    /// Log in and store the session
    Login {
        username: String,
        #[arg(long, env = "RESOLUTIONS_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account and store the session
    Signup {
        username: String,
        email: String,
        #[arg(long, env = "RESOLUTIONS_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Show who is logged in
    Whoami,
    /// List tasks and the current score
    Tasks,
    /// Create a task
    Add {
        title: String,
        #[arg(long, default_value_t = 10)]
        points: i64,
        #[arg(long = "type", value_enum, default_value = "daily")]
        kind: KindArg,
        #[arg(long, default_value = "")]
        description: String,
        /// Target date, YYYY-MM-DD
        #[arg(long)]
        due: Option<NaiveDate>,
    },
    /// Mark a task complete
    Complete { id: i64 },
    /// Delete a task
    Delete { id: i64 },
    /// Show the score
    Score,
    /// Show the profile
    Profile,
    /// Replace the profile "about" text
    About { text: String },
    /// Show the leaderboard
    Leaderboard,
    /// Ask for task suggestions and add the selected ones
    Suggest {
        prompt: String,
        /// Candidate indices to leave out
        #[arg(long = "skip")]
        skip: Vec<usize>,
        /// Show suggestions without adding them
        #[arg(long)]
        dry_run: bool,
    },
}

pub async fn run(app: &mut App, command: Command) -> ClientResult<String> {
    match command {
        Command::Health => {
            let body = app.api.health().await?;
            Ok(format!("Connected: {body}\n"))
        }
        Command::Login { username, password } => {
            let session = app.login(&username, &password).await?;
            Ok(format!("Logged in as {}\n", session.user.username))
        }
        Command::Signup {
            username,
            email,
            password,
        } => {
            app.auth.show_signup();
            let session = app.signup(&username, &email, &password).await?;
            let note = app.auth.warning().unwrap_or_default().to_string();
            Ok(format!("{note}\nLogged in as {}\n", session.user.username))
        }
        Command::Logout => {
            app.logout().await?;
            Ok("Logged out\n".to_string())
        }
        Command::Whoami => match app.current_session().await {
            Some(session) => Ok(format!(
                "{} <{}>\n",
                session.user.username, session.user.email
            )),
            None => Ok("Not logged in\n".to_string()),
        },
        Command::Tasks => {
            require_login(app)?;
            app.mount_home().await?;
            Ok(home_screen(app))
        }
        Command::Add {
            title,
            points,
            kind,
            description,
            due,
        } => {
            require_login(app)?;
            app.mount_home().await?;
            let task = NewResolution {
                title,
                description,
                points,
                kind: kind.into(),
                target_date: due,
            };
            app.create_task(&task).await?;
            Ok(home_screen(app))
        }
        Command::Complete { id } => {
            require_login(app)?;
            app.mount_home().await?;
            app.complete_task(id).await?;
            Ok(home_screen(app))
        }
        Command::Delete { id } => {
            require_login(app)?;
            app.mount_home().await?;
            app.delete_task(id).await?;
            Ok(home_screen(app))
        }
        Command::Score => {
            require_login(app)?;
            app.mount_home().await?;
            Ok(app
                .score
                .score()
                .map(ui::render_score)
                .unwrap_or_else(|| "Score unavailable\n".to_string()))
        }
        Command::Profile => {
            require_login(app)?;
            app.select_tab(Tab::Account);
            app.load_account().await?;
            Ok(account_screen(app))
        }
        Command::About { text } => {
            require_login(app)?;
            app.select_tab(Tab::Account);
            app.load_account().await?;
            if !app.save_about(&text).await? {
                return Ok("Could not save about text\n".to_string());
            }
            Ok(account_screen(app))
        }
        Command::Leaderboard => {
            require_login(app)?;
            app.select_tab(Tab::Leaderboard);
            let entries = app.leaderboard().await?;
            Ok(ui::render_leaderboard(&entries))
        }
        Command::Suggest {
            prompt,
            skip,
            dry_run,
        } => {
            require_login(app)?;
            app.select_tab(Tab::Chat);
            let message = app.suggest(&prompt).await?;
            for index in skip {
                app.chat.set_selected(CandidateKey { message, index }, false);
            }
            if !dry_run {
                app.add_suggestions(message).await?;
            }
            Ok(ui::render_chat(&app.chat))
        }
    }
}

fn require_login(app: &App) -> ClientResult<()> {
    if app.auth.screen() == AuthScreen::Authenticated {
        Ok(())
    } else {
        Err(ClientError::validation("Not logged in. Run `login` first."))
    }
}

fn home_screen(app: &App) -> String {
    let mut out = String::new();
    if let Some(score) = app.score.score() {
        out.push_str(&ui::render_score(score));
    }
    // An unloaded board has nothing to say about the server's list.
    if app.board.is_loaded() {
        out.push_str(&ui::render_tasks(app.board.tasks()));
    }
    if let Some(status) = app.board.status() {
        out.push_str(&format!("! {status}\n"));
    }
    out
}

fn account_screen(app: &App) -> String {
    app.account
        .profile()
        .map(ui::render_profile)
        .unwrap_or_else(|| "Could not load profile\n".to_string())
}
