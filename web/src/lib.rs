use log::*;
use std::net::SocketAddr;
use tokio::net::TcpListener;

pub use error::{Error, Result};
pub use service::AppState;

mod controller;
mod error;
pub mod router;

/// Binds the configured interface and port and serves the relay until the process ends.
pub async fn init_server(app_state: AppState) -> std::io::Result<()> {
    let host = app_state
        .config
        .interface
        .clone()
        .unwrap_or_else(|| "127.0.0.1".to_string());
    let port = app_state.config.port;

    let listener = TcpListener::bind((host.as_str(), port)).await?;
    let local_addr: SocketAddr = listener.local_addr()?;
    info!("Booking relay listening on {local_addr}");

    if !app_state.settings_handle().snapshot().is_complete() {
        warn!("Signing secret or Slack webhook URL not set; webhooks will be answered with 503");
    }

    axum::serve(listener, router::define_routes(app_state)).await
}
