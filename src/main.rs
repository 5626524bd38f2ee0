use std::sync::Arc;

use flickswipe::{AppState, config::Config, routes, tmdb::TmdbClient};
use wreq::header::{HeaderMap, HeaderValue, USER_AGENT};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,flickswipe=debug".to_string()),
        )
        .init();

    let config = Config::from_env()?;

    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static("flickswipe/0.1"));
    let mut http = wreq::Client::builder().default_headers(headers);
    if let Some(timeout) = config.http_timeout {
        http = http.timeout(timeout);
    }
    let http = http.build()?;

    let tmdb = TmdbClient::new(
        http,
        config.tmdb_api_key.clone(),
        config.tmdb_base_url.clone(),
        config.tmdb_image_base_url.clone(),
        config.tmdb_rps,
    );

    let state = Arc::new(AppState { tmdb: Arc::new(tmdb) });
    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
