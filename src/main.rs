//! CloudVault server entry point.

use cloudvault::{logging, Config, Database, WebServer};

const CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match Config::load(CONFIG_PATH) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("No config loaded from {CONFIG_PATH} ({e}), using defaults");
            Config::default()
        }
    };

    if let Err(e) = logging::init(&config.logging) {
        eprintln!("Failed to initialize file logging ({e}), falling back to console");
        logging::init_console_only(&config.logging.level);
    }

    tracing::info!("Starting CloudVault");

    let db =
        Database::open_with_pool_size(&config.database.path, config.database.max_connections)
            .await?;
    tracing::info!("Database ready at {}", config.database.path);

    let server = WebServer::new(&config.server, db)?;
    tracing::info!("Listening on {}", server.addr());
    server.run().await?;

    Ok(())
}
