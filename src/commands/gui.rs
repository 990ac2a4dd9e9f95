use anyhow::Result;
use clap::Subcommand;
use std::{net::IpAddr, path::PathBuf, sync::Arc};

use crate::{
    config::{resolve_environment, Environment},
    constants::{DEFAULT_GUI_DIR, DEFAULT_PORT},
    gateway::GatewayClient,
    server::{self, ErrorStatusPolicy, ServerConfig},
};

#[derive(Subcommand, Debug)]
pub enum GuiCommands {
    /// Start the local proxy serving the Resources Editor and GraphQL Browser
    Serve {
        /// Name of the environment. Falls back to MARKETPLACE_* variables when omitted
        environment: Option<String>,
        /// Port to listen on
        #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
        port: u16,
        /// Address to listen on
        #[arg(long, default_value = "127.0.0.1")]
        host: IpAddr,
        /// Directory with the pre-built editor/ and graphql/ assets
        #[arg(long, default_value = DEFAULT_GUI_DIR)]
        gui_dir: PathBuf,
        /// Relay the instance's HTTP status on failed calls instead of 200
        #[arg(long)]
        upstream_status: bool,
    },
}

pub async fn run(cmd: GuiCommands) -> Result<()> {
    match cmd {
        GuiCommands::Serve {
            environment,
            port,
            host,
            gui_dir,
            upstream_status,
        } => {
            // Without a name the server still starts; /info then reports null.
            let env = match environment.as_deref() {
                Some(name) => Some(resolve_environment(Some(name))?),
                None => Environment::from_process_env(),
            };
            let marketplace_url = env.as_ref().map(|e| e.url.clone());
            let gateway = GatewayClient::new(env.unwrap_or_default())?;

            let config = ServerConfig {
                host,
                port,
                gui_dir,
                marketplace_url,
                error_status: if upstream_status {
                    ErrorStatusPolicy::Upstream
                } else {
                    ErrorStatusPolicy::Ok
                },
            };
            server::serve(config, Arc::new(gateway)).await
        }
    }
}
