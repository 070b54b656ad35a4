//! Main HTTP server for the receipt-scanner gateway.

use anyhow::Result;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{info, instrument};

use crate::routes::router;
use crate::state::AppState;

/// Starts the Axum HTTP server for the gateway.
#[instrument(skip(state))]
pub async fn start_server(addr: SocketAddr, state: AppState) -> Result<()> {
    let app = router(state);

    info!("Receipt-scanner HTTP server listening on {}", addr);
    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
