pub mod account;
pub mod api;
pub mod app;
pub mod auth;
pub mod chat;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod stats;
pub mod storage;
pub mod tasks;
pub mod ui;

pub use api::ApiClient;
pub use app::App;
pub use config::Config;
pub use errors::{ClientError, ClientResult};
pub use storage::SessionStore;
