use tracing::{error, info};

use courier::{Config, WebServer};

#[tokio::main]
async fn main() {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    // Load configuration
    let mut config = match Config::load(&path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load {path}: {e}");
            eprintln!("Using default configuration.");
            Config::default()
        }
    };

    // Initialize logging
    if let Err(e) = courier::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        courier::logging::init_console_only(&config.logging.level);
    }

    if let Err(e) = config.apply_env_overrides().and_then(|()| config.validate()) {
        error!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    info!("Courier - email delivery and image hosting");
    info!(
        smtp_host = %config.smtp.host,
        smtp_port = config.smtp.port,
        asset_host = config.asset_host.is_enabled(),
        "Components configured"
    );

    let server = match WebServer::new(&config) {
        Ok(server) => server,
        Err(e) => {
            error!("Failed to create web server: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run().await {
        error!("Web server error: {}", e);
        std::process::exit(1);
    }
}
