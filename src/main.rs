use anyhow::Context;
use flatchat::{AppState, Config, Db, JsonFileStore};
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flatchat=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;
    let store = JsonFileStore::open(&config.data_path)
        .with_context(|| format!("opening {}", config.data_path.display()))?;
    let app_state = AppState::new(Db::new(store), config.cookie_policy());

    let app = flatchat::app(app_state)
        .fallback_service(ServeDir::new(&config.public_dir))
        .layer(config.cors_layer()?)
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(config.bind_addr())
        .await
        .with_context(|| format!("binding {}", config.bind_addr()))?;
    info!("listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutting down");
    }
}
