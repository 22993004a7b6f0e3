pub mod api;
pub mod config;
pub mod db;
pub mod entities;
pub mod services;
pub mod state;

use std::sync::Arc;

use anyhow::Context;
pub use config::Config;
use db::Store;
use entities::users::Role;
use state::SharedState;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::load()?;
    config.validate()?;

    let prometheus_handle = if config.observability.metrics_enabled {
        use metrics_exporter_prometheus::PrometheusBuilder;
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("Failed to install Prometheus recorder")?;
        Some(handle)
    } else {
        None
    };

    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    let fmt_layer = tracing_subscriber::fmt::layer();

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer);

    if config.observability.loki_enabled {
        let url =
            url::Url::parse(&config.observability.loki_url).context("Invalid Loki URL")?;

        let (layer, task) = tracing_loki::builder()
            .label("app", "agritrack")?
            .build_url(url)?;

        tokio::spawn(task);

        registry.with(layer).init();
        info!(
            "Loki logging initialized at {}",
            config.observability.loki_url
        );
    } else {
        registry.init();
    }

    let args: Vec<String> = std::env::args().collect();

    match args.get(1).map(String::as_str) {
        None | Some("serve" | "-d" | "--daemon") => run_server(config, prometheus_handle).await,

        Some("create-admin") => {
            if args.len() < 5 {
                println!("Usage: agritrack create-admin <email> <username> <password>");
                return Ok(());
            }
            cmd_create_admin(&config, &args[2], &args[3], &args[4]).await
        }

        Some("init" | "--init") => {
            Config::create_default_if_missing()?;
            println!("✓ Config file created. Edit config.toml and run again.");
            Ok(())
        }

        Some("help" | "-h" | "--help") => {
            print_help();
            Ok(())
        }

        Some(other) => {
            println!("Unknown command: {}", other);
            println!();
            print_help();
            Ok(())
        }
    }
}

fn print_help() {
    println!("AgriTrack - Agricultural records backend");
    println!("Role-based crop tracking for admins and farmers");
    println!();
    println!("USAGE:");
    println!("  agritrack [COMMAND]");
    println!();
    println!("COMMANDS:");
    println!("  serve             Run the API server (default)");
    println!("  create-admin <email> <username> <password>");
    println!("                    Provision an Admin account (farmers sign up via the API)");
    println!("  init              Create default config file");
    println!("  help              Show this help message");
    println!();
    println!("CONFIG:");
    println!("  Edit config.toml to configure database, server, and security settings.");
    println!("  Set AGRITRACK_JWT_SECRET to override the signing secret.");
}

async fn run_server(
    config: Config,
    prometheus_handle: Option<metrics_exporter_prometheus::PrometheusHandle>,
) -> anyhow::Result<()> {
    info!(
        "AgriTrack v{} starting in server mode...",
        env!("CARGO_PKG_VERSION")
    );

    let shared = Arc::new(SharedState::new(config.clone()).await?);

    match shared
        .store
        .purge_expired_tokens(chrono::Utc::now().timestamp())
        .await
    {
        Ok(purged) if purged > 0 => {
            info!("Purged {} expired entries from the token blacklist", purged);
        }
        Ok(_) => {}
        Err(e) => error!("Token blacklist purge failed: {}", e),
    }

    let state = api::create_app_state(shared, prometheus_handle);
    let app = api::router(state);

    let addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("🌐 API server running at http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Error listening for shutdown: {}", e);
            }
            info!("Shutdown signal received");
        })
        .await?;

    info!("Server stopped");

    Ok(())
}

/// Out-of-band Admin provisioning. The public signup path always produces
/// Farmer accounts; this is the only way to mint an Admin.
async fn cmd_create_admin(
    config: &Config,
    email: &str,
    username: &str,
    password: &str,
) -> anyhow::Result<()> {
    if !email.contains('@') {
        println!("Invalid email address: {}", email);
        return Ok(());
    }
    if password.len() < config.security.min_password_length {
        println!(
            "Password must be at least {} characters.",
            config.security.min_password_length
        );
        return Ok(());
    }

    let store = Store::with_pool_options(
        &config.general.database_path,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await?;

    if store
        .email_exists(email)
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
    {
        println!("Admin user already exists.");
        return Ok(());
    }

    let admin = store
        .create_user(username, email, password, Role::Admin, &config.security)
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;

    println!("✓ Admin user created: {} <{}>", admin.username, admin.email);

    Ok(())
}
