use clap::Parser;
use forms_rs::api::ApiServer;
use forms_rs::config::{Config, LoggingConfig, StorageBackend};
use forms_rs::forms::FormManager;
use forms_rs::storage::{MemoryOptionStore, OptionFormRepository, OptionStore, SqliteOptionStore};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_CONFIG_FILE: &str = "forms.toml";

#[derive(Parser)]
#[command(name = "forms-rs")]
#[command(about = "Form definitions REST API", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file (defaults to ./forms.toml if present)
    config: Option<PathBuf>,
}

fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("forms_rs={},tower_http=info", logging.level).into());
    let registry = tracing_subscriber::registry().with(filter);

    match logging.format.as_str() {
        "json" => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        "compact" => registry.with(tracing_subscriber::fmt::layer().compact()).init(),
        _ => registry.with(tracing_subscriber::fmt::layer().pretty()).init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match cli.config {
        Some(path) => Config::from_file(&path)?,
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => Config::from_file(DEFAULT_CONFIG_FILE)?,
        None => Config::default(),
    };

    init_logging(&config.logging);
    info!("Starting forms-rs v{}", env!("CARGO_PKG_VERSION"));

    let store: Arc<dyn OptionStore> = match config.storage.backend {
        StorageBackend::Sqlite => {
            info!("Using SQLite option store at {}", config.storage.database_url);
            Arc::new(SqliteOptionStore::connect(&config.storage.database_url).await?)
        }
        StorageBackend::Memory => {
            warn!("Using in-memory option store; forms are lost on restart");
            Arc::new(MemoryOptionStore::new())
        }
    };

    info!("Form collection stored under option '{}'", config.storage.option_key);
    let repo = OptionFormRepository::new(store, config.storage.option_key.clone());
    let manager = FormManager::new(Arc::new(repo));

    let server = ApiServer::new(manager, config.server.listen_addr.clone());
    server.run().await?;

    Ok(())
}
