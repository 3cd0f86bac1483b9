//! PrintCraft Commerce - print storefront backend

use std::sync::Arc;

use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use printcraft_commerce::config::Config;
use printcraft_commerce::routes;
use printcraft_commerce::services::overlay::OverlayClient;
use printcraft_commerce::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let db = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await?;
    sqlx::migrate!("./migrations").run(&db).await?;

    let nats = match &config.nats_url {
        Some(url) => match async_nats::connect(url).await {
            Ok(client) => Some(client),
            Err(err) => {
                tracing::warn!(%err, "NATS unavailable, order events disabled");
                None
            }
        },
        None => None,
    };

    let overlay = OverlayClient::new(config.overlay_url.clone());
    let port = config.port;
    let state = AppState {
        db,
        nats,
        config: Arc::new(config),
        overlay,
    };

    let app = routes::app(state);

    tracing::info!("PrintCraft Commerce listening on 0.0.0.0:{}", port);
    axum::serve(
        tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?,
        app,
    )
    .await?;
    Ok(())
}
