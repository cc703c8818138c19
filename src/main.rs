use anyhow::Result;
use std::sync::Arc;

mod config;
mod error;
mod logging;
mod routes;
mod services;
pub mod models;

use services::auth::{Authenticator, StaticCredentials};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    logging::init_logging()?;
    
    // Load configuration
    let config = config::load_config()?;
    let addr = config.bind_addr;
    
    // Build our application state
    let state = Arc::new(AppState::new(config, Arc::new(StaticCredentials::default())));
    
    // Build our application with a route
    let app = routes::app(state);

    // Run it
    tracing::info!("listening on {}", addr);
    
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// Application state
#[derive(Clone)]
pub struct AppState {
    config: config::Config,
    authenticator: Arc<dyn Authenticator>,
}

impl AppState {
    fn new(config: config::Config, authenticator: Arc<dyn Authenticator>) -> Self {
        Self { config, authenticator }
    }
}
