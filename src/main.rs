use std::sync::Arc;

use tracing::{error, info, warn};

use ctf_site::config::StorageBackend;
use ctf_site::{
    hash_password, Config, ContentService, Database, SqliteRepository, UploadStore, WebServer,
};

const CONFIG_PATH: &str = "config.toml";

async fn build_content(config: &Config) -> ctf_site::Result<ContentService> {
    let uploads = UploadStore::from_config(&config.uploads);

    let content = match config.database.backend {
        StorageBackend::Memory => {
            warn!("Using in-memory content store; changes are lost on restart");
            ContentService::in_memory(uploads)
        }
        StorageBackend::Sqlite => {
            let db = Database::open(&config.database.path).await?;
            info!("Database opened at {}", config.database.path);
            let pool = db.pool().clone();
            ContentService::new(
                Arc::new(SqliteRepository::new(pool.clone())),
                Arc::new(SqliteRepository::new(pool.clone())),
                Arc::new(SqliteRepository::new(pool)),
                uploads,
            )
        }
    };

    if config.database.seed_defaults && content.seed_defaults().await? {
        info!("Inserted default content into empty store");
    }

    Ok(content)
}

#[tokio::main]
async fn main() {
    let args: Vec<String> = std::env::args().collect();
    if args.get(1).map(String::as_str) == Some("hash-password") {
        let Some(password) = args.get(2) else {
            eprintln!("Usage: ctf-site hash-password <password>");
            std::process::exit(2);
        };
        match hash_password(password) {
            Ok(hash) => println!("{hash}"),
            Err(e) => {
                eprintln!("Failed to hash password: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    let config = match Config::load_with_env(CONFIG_PATH) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load {CONFIG_PATH}: {e}");
            eprintln!("Using default configuration.");
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    };

    if let Err(e) = ctf_site::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        ctf_site::logging::init_console_only(&config.logging.level);
    }

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {e}");
        std::process::exit(1);
    }
    if config.admin.password_hash.is_empty() {
        warn!("No admin password hash configured; admin login is disabled");
    }

    let content = match build_content(&config).await {
        Ok(content) => content,
        Err(e) => {
            error!("Failed to initialize content store: {e}");
            std::process::exit(1);
        }
    };

    let server = match WebServer::new(&config, content) {
        Ok(server) => server,
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    };

    info!(
        "CTF site backend starting on {}:{}",
        config.web.host, config.web.port
    );
    if let Err(e) = server.run().await {
        error!("Web server error: {e}");
        std::process::exit(1);
    }
}
