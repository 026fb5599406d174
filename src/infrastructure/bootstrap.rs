use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use actix_web::web;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use crate::infrastructure::config::AppConfig;
use crate::interfaces::http::{add_log, HttpState, LogEntry};

/// Read `.env` from the working directory if present
pub fn load_environment() -> Option<PathBuf> {
    match dotenvy::dotenv() {
        Ok(path) => Some(path),
        Err(err) if err.not_found() => None,
        Err(err) => {
            // Logging is not up yet
            eprintln!("Ignoring unreadable .env file: {}", err);
            None
        }
    }
}

/// `RUST_LOG` wins; otherwise `info`
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Build the state shared by every worker
pub fn setup(config: &AppConfig) -> web::Data<HttpState> {
    let logs: Arc<Mutex<Vec<LogEntry>>> = Arc::new(Mutex::new(Vec::new()));

    add_log(
        &logs,
        "INFO",
        "Bootstrap",
        &format!("Browsing {}", config.root.display()),
    );
    if config.show_hidden {
        warn!("Hidden files and directories are listed");
    }

    web::Data::new(HttpState::new(config, logs))
}
