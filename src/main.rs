use tracing::{error, info, warn};

use agora::forum::ForumService;
use agora::web::WebServer;
use agora::{Config, Database};

#[tokio::main]
async fn main() {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    let (mut config, config_error) = match Config::load(&config_path) {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };
    config.apply_env_overrides();

    if let Err(e) = agora::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        agora::logging::init_console_only(&config.logging.level);
    }

    info!("Agora - discussion forum");
    if let Some(e) = config_error {
        warn!("Failed to load {}: {}. Using default configuration.", config_path, e);
    }

    if let Err(e) = config.validate() {
        error!("{}", e);
        std::process::exit(1);
    }

    let db = match Database::open(&config.database.path).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to open database: {}", e);
            std::process::exit(1);
        }
    };

    match ForumService::new(&db, config.forum)
        .seed_boards(&config.boards)
        .await
    {
        Ok(0) => {}
        Ok(created) => info!(created = created, "Seeded boards from configuration"),
        Err(e) => {
            error!("Failed to seed boards: {}", e);
            std::process::exit(1);
        }
    }

    let server = match WebServer::new(&config, db) {
        Ok(server) => server,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    info!("Server configured on {}", server.addr());
    if let Err(e) = server.run().await {
        error!("Web server error: {}", e);
        std::process::exit(1);
    }
}
