use std::sync::Arc;

use scrawl_room::{Registry, RoomConfig, WordList, WordSource};
use scrawl_server::{ScrawlServer, ServerError};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let addr = std::env::var("SCRAWL_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:8080".to_string());

    // SCRAWL_WORDS points at a one-word-per-line file; without it the
    // bundled list is used.
    let words: Arc<dyn WordSource> = match std::env::var("SCRAWL_WORDS") {
        Ok(path) => {
            tracing::info!(path = %path, "loading word list");
            Arc::new(WordList::from_file(&path)?)
        }
        Err(_) => Arc::new(WordList::default()),
    };

    let registry = Registry::new(RoomConfig::default(), words);
    let server = ScrawlServer::bind(&addr, registry).await?;
    server.run().await
}
