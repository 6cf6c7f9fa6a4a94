use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use dataset_publishing_controller::clients::collection::CollectionClient;
use dataset_publishing_controller::clients::registry::RegistryClient;
use dataset_publishing_controller::clients::taxonomy::TaxonomyClient;
use dataset_publishing_controller::handlers::AppState;
use dataset_publishing_controller::routes::create_router;
use dataset_publishing_controller::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "dataset_publishing_controller=info,tower_http=debug".into()
            }),
        )
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    info!(?config, "config on startup");

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()?;

    let state = AppState {
        registry: Arc::new(RegistryClient::new(http.clone(), config.dataset_api_url.clone())),
        collection: Arc::new(CollectionClient::new(
            http.clone(),
            config.collection_api_url.clone(),
        )),
        taxonomy: Arc::new(TaxonomyClient::new(http, config.topics_api_url.clone())),
        batch_size: config.datasets_batch_size,
        batch_workers: config.datasets_batch_workers,
    };

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %config.bind_addr, "starting server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(config.graceful_shutdown_timeout))
        .await?;

    info!("graceful shutdown complete");
    Ok(())
}

/// Resolve when SIGINT or SIGTERM arrives; in-flight requests then get the
/// configured grace period before the process exits.
async fn shutdown_signal(grace: Duration) {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    info!(timeout_secs = grace.as_secs(), "os signal received, shutting down");
}
