use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use ripe_tomatoes::cli::{Cli, Commands};
use ripe_tomatoes::config::Config;
use ripe_tomatoes::db::{seed, MemoryStore, PgStore, Repository, UserRepository};
use ripe_tomatoes::models::{Actor, Movie};
use ripe_tomatoes::services::{PasswordHasher, TokenService};
use ripe_tomatoes::{routes, ApiDoc, AppState};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ripe_tomatoes=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config).await,
        Commands::Create => {
            connect(&config).await?.create_tables().await?;
            println!("Tables created");
            Ok(())
        }
        Commands::Seed => {
            let store = connect(&config).await?;
            seed::seed(&app_state(&config, Arc::new(store))?).await?;
            println!("Tables seeded");
            Ok(())
        }
        Commands::Drop => {
            connect(&config).await?.drop_tables().await?;
            println!("Tables dropped");
            Ok(())
        }
    }
}

async fn connect(config: &Config) -> anyhow::Result<PgStore> {
    let url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL must be set for this command")?;
    let store = PgStore::connect(url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to PostgreSQL");
    Ok(store)
}

fn app_state<S>(config: &Config, store: Arc<S>) -> anyhow::Result<AppState>
where
    S: Repository<Movie> + Repository<Actor> + UserRepository + 'static,
{
    let hasher = PasswordHasher::with_cost(config.hash_memory_kib, config.hash_iterations)?;
    let tokens = TokenService::new(&config.jwt_secret);
    Ok(AppState::new(store, tokens, hasher))
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let state = if config.database_url.is_some() {
        let store = connect(&config).await?;
        store
            .create_tables()
            .await
            .context("Failed to run migrations")?;
        app_state(&config, Arc::new(store))?
    } else {
        tracing::warn!("DATABASE_URL not set, serving seeded in-memory store");
        let state = app_state(&config, Arc::new(MemoryStore::new()))?;
        seed::seed(&state).await?;
        state
    };

    let app = routes::api_router(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(config.cors_layer())
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.listen_addr))?;
    tracing::info!("Listening on {}", config.listen_addr);
    tracing::info!("Swagger UI at http://{}/docs/", config.listen_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
