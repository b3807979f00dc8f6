use backend::{config::Config, routes::app, service::TaskService, store::TaskStore};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .compact()
        .init();

    let config = Config::load();

    let store = TaskStore::connect(&config.database_url)
        .await
        .expect("Failed to open task database");
    let service = TaskService::new(store);

    let app = app(service, &config.static_dir);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .expect("Failed to bind port");
    info!("Server running on http://localhost:{}", config.port);
    info!("Database URL: {}", config.database_url);
    axum::serve(listener, app).await.expect("Server error");
}
