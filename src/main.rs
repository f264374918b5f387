use std::sync::Arc;

use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use news_board::bootstrap::{bootstrap, http_client};
use news_board::config::{Config, DATA_SOURCE_ENV};
use news_board::routes::{self, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "news_board=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::load_or_default("board.toml")?
        .with_data_source_override(std::env::var(DATA_SOURCE_ENV).ok());
    let source = config.data_source();

    // Load the document once; a failure is served as the error page
    let client = http_client(config.fetch_timeout())?;
    let board = bootstrap(&source, &client).await;

    let state = Arc::new(AppState {
        board: Arc::new(board),
        tooltip: config.tooltip(),
    });

    // Build router
    let app = routes::router(state)
        .nest_service("/static", ServeDir::new(&config.static_dir))
        .layer(TraceLayer::new_for_http());

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind).await?;
    info!("Server starting on http://{}", config.bind);

    axum::serve(listener, app).await?;

    Ok(())
}
