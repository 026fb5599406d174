use std::io;

use tracing::{error, info, warn};

use crate::infrastructure::bootstrap;
use crate::infrastructure::config::AppConfig;
use crate::interfaces::http::start_server;

pub fn run() -> io::Result<()> {
    let env_file = bootstrap::load_environment();
    bootstrap::init_tracing();
    if let Some(path) = env_file {
        info!(path = %path.display(), "Loaded environment file");
    }

    let config = AppConfig::load().map_err(|err| {
        error!(error = %err, "Failed to load configuration");
        io::Error::new(io::ErrorKind::InvalidInput, err.to_string())
    })?;

    actix_web::rt::System::new().block_on(serve(config))
}

async fn serve(config: AppConfig) -> io::Result<()> {
    let state = bootstrap::setup(&config);

    let server = start_server(state, &config.host, config.port).map_err(|err| {
        error!(error = %err, host = %config.host, port = config.port, "Failed to bind server");
        err
    })?;

    let url = config.base_url();
    info!(url = %url, root = %config.root.display(), "Serving directory");

    if config.open_browser {
        if let Err(err) = open::that(&url) {
            warn!(error = %err, url = %url, "Could not open browser");
        }
    }

    server.await
}
