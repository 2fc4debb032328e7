use dailytrac::config::Config;
use dailytrac::storage::JsonFileBackend;
use dailytrac::summarizer::{DisabledSummarizer, GeminiSummarizer, Summarizer};
use dailytrac::{AppState, DayStore, router};
use std::{net::SocketAddr, sync::Arc};
use tokio::fs;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env();
    if let Some(parent) = config.data_path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let store = DayStore::open(Arc::new(JsonFileBackend::new(&config.data_path))).await;
    let summarizer: Arc<dyn Summarizer> = match &config.ai {
        Some(ai) => {
            info!(model = %ai.model, "AI summaries enabled");
            Arc::new(GeminiSummarizer::new(&ai.base_url, &ai.model, &ai.api_key))
        }
        None => {
            warn!("no GEMINI_API_KEY or GOOGLE_API_KEY set; AI summaries are disabled");
            Arc::new(DisabledSummarizer)
        }
    };

    let app = router(AppState::new(store, summarizer));
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            info!("shutting down");
        })
        .await?;

    Ok(())
}
