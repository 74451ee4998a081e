//! `regdeskd`: the registration desk server.
//!
//! Usage:
//!   regdeskd -c <context-name-or-path> [--listen <addr>]
//!
//! The context name resolves to `/etc/regdesk/<name>.toml`.
//! If a path with `/` or `.` is given, it's used directly.

mod auth_middleware;
mod bootstrap;
mod config;
mod login;
mod routes;

use std::sync::Arc;

use clap::Parser;
use regdesk_core::Module;
use tracing::info;

use auth_middleware::JwtState;
use config::ServerConfig;
use registration::RegistrationModule;
use registration::service::RegistrationService;
use registration::store::SqlRecordStore;
use routes::AppState;

/// Registration desk server.
#[derive(Parser, Debug)]
#[command(name = "regdeskd", about = "Student registration desk server")]
struct Cli {
    /// Context name or path to config file.
    #[arg(short = 'c', long = "config", required = true)]
    config: String,

    /// Listen address.
    #[arg(long = "listen", default_value = "0.0.0.0:8080")]
    listen: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    let config_path = ServerConfig::resolve_path(&cli.config);
    info!("Loading configuration from {}", config_path.display());
    let server_config = ServerConfig::load(&config_path)?;

    bootstrap::verify_config(&server_config)?;

    let data_dir = std::path::PathBuf::from(&server_config.storage.data_dir);
    std::fs::create_dir_all(&data_dir)?;

    let core_config = regdesk_core::ServiceConfig {
        data_dir: Some(data_dir),
        listen: cli.listen.clone(),
        ..Default::default()
    };

    let sqlite_path = core_config.resolve_sqlite_path();
    let sql: Arc<dyn regdesk_sql::SQLStore> = Arc::new(
        regdesk_sql::SqliteStore::open(&sqlite_path)
            .map_err(|e| anyhow::anyhow!("failed to open SQL store: {}", e))?,
    );
    info!("SQL store opened at {}", sqlite_path.display());

    let store = SqlRecordStore::new(sql)
        .map_err(|e| anyhow::anyhow!("failed to initialize record store: {}", e))?;
    let registration_module = RegistrationModule::new(RegistrationService::new(
        Arc::new(store),
        server_config.registration(),
    ));
    info!("Registration module initialized");

    let module_routes = vec![(registration_module.name(), registration_module.routes())];

    let state = AppState {
        jwt_state: Arc::new(JwtState::from_secret(&server_config.jwt.secret)),
        server_config: Arc::new(server_config),
    };
    let app = routes::build_router(state, module_routes);

    let listener = tokio::net::TcpListener::bind(&core_config.listen).await?;
    info!("regdeskd listening on {}", core_config.listen);
    axum::serve(listener, app).await?;

    Ok(())
}
