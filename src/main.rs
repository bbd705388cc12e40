use anyhow::Context;
use dotenvy::dotenv;
use tracing::info;

use gradebook::gradebook_config::{DatabaseConfig, ServerConfig};
use gradebook::logging::{init_tracing, shutdown_tracer};
use gradebook::metrics::{init_metrics, metrics_app};
use gradebook::router::init_router;
use gradebook::state::init_app_state;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    init_tracing().context("failed to initialize logging")?;
    let metrics_handle = init_metrics().context("failed to install metrics recorder")?;

    let server = ServerConfig::from_env();
    let database = DatabaseConfig::from_env();

    let state = init_app_state(&database).await;
    let mut app = init_router(state);
    if let Some(handle) = metrics_handle {
        app = app.merge(metrics_app(handle));
    }

    let address = server.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {}", address))?;

    info!("🚀 Server running on http://{}", address);
    info!("📚 Swagger UI available at http://{}/swagger-ui", address);
    info!("📖 Scalar UI available at http://{}/scalar", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    shutdown_tracer();
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
