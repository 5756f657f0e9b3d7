use carhub_server::api::app_router;
use carhub_server::config::Config;
use carhub_server::{build_state, init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();
    init_tracing();
    let state = build_state(&config)?;

    let router = app_router(state);
    tracing::info!("Listening on {}", config.listen_addr);
    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}
