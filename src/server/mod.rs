//! Local proxy server in front of a marketplace instance
//!
//! Forwards GraphQL and sync requests to a [`Gateway`], reports which
//! instance it talks to on `/info`, and serves the pre-built GUI assets.
//! The gateway and all settings are passed in through [`ServerConfig`] and
//! [`serve`]; nothing is read from the process environment here.

use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::PathBuf,
    sync::Arc,
};

use anyhow::Result;
use tokio::net::TcpListener;
use tracing::{debug, error};

use crate::constants::{DEFAULT_GUI_DIR, DEFAULT_PORT};
use crate::gateway::Gateway;

pub mod error;
pub mod routes;

pub use error::{BindError, ErrorStatusPolicy, ServerError};
pub use routes::{create_router, AppState};

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Directory holding `editor/public` and `graphql/public`.
    pub gui_dir: PathBuf,
    /// URL reported by `/info`.
    pub marketplace_url: Option<String>,
    pub error_status: ErrorStatusPolicy,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
            gui_dir: PathBuf::from(DEFAULT_GUI_DIR),
            marketplace_url: None,
            error_status: ErrorStatusPolicy::default(),
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Open the listening socket.
///
/// # Errors
/// [`BindError::AddrInUse`] when the port is taken, [`BindError::Other`]
/// for anything else.
pub async fn bind(addr: SocketAddr) -> Result<TcpListener, BindError> {
    TcpListener::bind(addr)
        .await
        .map_err(|e| BindError::from_io(addr, e))
}

/// Bind and run the server until it stops.
///
/// A port that is already in use is reported with a hint and is not treated
/// as a failure: the call returns `Ok(())`. Any other bind or serve error
/// is returned.
pub async fn serve(config: ServerConfig, gateway: Arc<dyn Gateway>) -> Result<()> {
    let listener = match bind(config.socket_addr()).await {
        Ok(listener) => listener,
        Err(BindError::AddrInUse { port }) => {
            error!(port, "address in use");
            eprintln!("❌ Port {port} is already in use.");
            eprintln!();
            eprintln!("⚠️  Please use -p <port> to run server on a different port.");
            eprintln!("⚠️  Example: pos-cli gui serve staging -p 31337");
            return Ok(());
        }
        Err(e) => {
            error!(error = %e, "failed to bind");
            return Err(e.into());
        }
    };

    let port = listener.local_addr()?.port();
    debug!(port, "Server is listening");
    match &config.marketplace_url {
        Some(url) => println!("✅ Connected to {url}"),
        None => println!("⚠️  No instance configured; set MARKETPLACE_URL or pass an environment"),
    }
    println!("✅ Resources Editor: http://localhost:{port}/gui/editor");
    println!("✅ GraphQL Browser: http://localhost:{port}/gui/graphql");

    let state = AppState {
        gateway,
        marketplace_url: config.marketplace_url.clone(),
        error_status: config.error_status,
    };
    let app = create_router(state, &config.gui_dir);

    axum::serve(listener, app).await?;
    Ok(())
}
