mod payload;
mod routes;

use astro_chart::ephemeris::SwissEphemerisAdapter;
use astro_chart::ChartEngine;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = chart_config::load_server_settings()?;
    let adapter = SwissEphemerisAdapter::new(settings.ephemeris_path.clone())?;
    let engine = ChartEngine::new(Arc::new(adapter))
        .with_bodies(settings.bodies.clone())
        .with_aspect_settings(settings.aspect_settings.clone());

    let app = routes::router(routes::AppState::new(engine, settings.default_house_system));

    let address = settings.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind {address}: {e}"))?;
    log::info!("Chart server listening on {}", address);

    axum::serve(listener, app).await?;
    Ok(())
}
