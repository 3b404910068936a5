use clap::Parser;
use resolutions::config::{log_filter, normalize_base_url};
use resolutions::{App, ClientError, Config, handlers};
use std::{path::PathBuf, process::ExitCode};
use tracing::info;
use tracing_subscriber::fmt;

#[derive(Debug, Parser)]
#[command(name = "resolutions")]
#[command(about = "Track resolutions, points and streaks from the terminal")]
#[command(version)]
struct Args {
    /// Backend base URL [default: $RESOLUTIONS_API_BASE or http://localhost:8000]
    #[arg(long)]
    base_url: Option<String>,

    /// Where the login session is kept [default: $RESOLUTIONS_SESSION_PATH or data/session.json]
    #[arg(long)]
    session_path: Option<PathBuf>,

    #[command(subcommand)]
    command: handlers::Command,
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok().as_deref()))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut config = Config::from_env();
    if let Some(url) = args.base_url {
        config.base_url = normalize_base_url(&url);
    }
    if let Some(path) = args.session_path {
        config.session_path = path;
    }
    info!(base_url = %config.base_url, "starting");

    let mut app = App::open(&config).await;
    match handlers::run(&mut app, args.command).await {
        Ok(output) => {
            print!("{output}");
            Ok(ExitCode::SUCCESS)
        }
        Err(ClientError::Unauthorized) => {
            eprintln!("Session expired. Please log in again.");
            Ok(ExitCode::from(2))
        }
        Err(err) => {
            // Auth failures read the same as the login screen's warning.
            let message = match app.auth.warning() {
                Some(warning) => warning.to_string(),
                None => err.user_message(),
            };
            eprintln!("{message}");
            Ok(ExitCode::FAILURE)
        }
    }
}
