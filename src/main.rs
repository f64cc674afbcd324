use tracing::info;

use aula::{Config, Database, WebServer};

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::load_with_env("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {e}");
        std::process::exit(1);
    }

    // Initialize logging
    if let Err(e) = aula::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        aula::logging::init_console_only(&config.logging.level);
    }

    info!("Aula student portal");

    let db = match Database::open(&config.database.path).await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("Failed to open database: {e}");
            std::process::exit(1);
        }
    };

    let server = match WebServer::new(&config, db) {
        Ok(server) => server,
        Err(e) => {
            eprintln!("Failed to configure server: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run().await {
        eprintln!("Server error: {e}");
        std::process::exit(1);
    }
}
