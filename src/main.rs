mod app_state;
mod env;
mod providers;
mod resolver;
mod routes;
mod schema;
mod ui;
mod utils;

use app_state::AppState;
use env::Env;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // a missing .env file is fine, the process environment still applies
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let env = Env::new()?;
    let addr = format!("{}:{}", env.host, env.port);
    let app = Arc::new(AppState::new(env)?);

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, routes::router(app)).await?;
    Ok(())
}
