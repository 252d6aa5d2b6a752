use anyhow::Context;
use tracing::info;

use baby_tracker::config::AppConfig;
use baby_tracker::logging::init_logging;
use baby_tracker::{create_router, initialize_backend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = AppConfig::load()?;
    let app_state = initialize_backend(&config)?;
    let app = create_router(app_state);

    let listener = tokio::net::TcpListener::bind(config.bind_address.as_str())
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address))?;
    info!("Baby tracker listening on http://{}", config.bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
