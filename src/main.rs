use domain::chat::ChatService;
use log::{error, info, warn};
use migration::{Migrator, MigratorTrait};
use service::{config::Config, logging::Logger};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let config = Config::new();
    Logger::init_logger(&config as &Config);

    info!("Connecting to database [{}]...", config.database_url());

    let db = match service::init_database(&config).await {
        Ok(db) => Arc::new(db),
        Err(e) => {
            error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = Migrator::up(db.as_ref(), None).await {
        error!("Failed to run database migrations: {e}");
        std::process::exit(1);
    }

    // The encryption key is resolved once at startup and handed to the web
    // layer explicitly. Without a configured key, vaulted API keys written
    // during this run become unreadable after restart.
    let encryption_key = match config.encryption_key() {
        Some(key) => key,
        None if config.is_production() => {
            error!("ENCRYPTION_KEY must be set when the runtime environment is production");
            std::process::exit(1);
        }
        None => {
            let key = domain::encryption::generate_key();
            warn!("ENCRYPTION_KEY is not set; generated an ephemeral key for this run: {key}");
            warn!("Set ENCRYPTION_KEY to this value to keep stored API keys readable across restarts");
            key
        }
    };

    let service_state = service::AppState::new(config, &db);
    let chat_service = Arc::new(ChatService::in_memory());

    let app_state = web::AppState::new(service_state, chat_service, encryption_key);

    if let Err(e) = web::init_server(app_state).await {
        error!("Server error: {e}");
        std::process::exit(1);
    }
}
