use anyhow::{Context, Result};
use clap::Subcommand;

use crate::{
    clean::confirm_cleanup, config::resolve_environment, gateway::GatewayClient,
    prompt::TerminalPrompter,
};

#[derive(Subcommand, Debug)]
pub enum DataCommands {
    /// Remove all data from an instance. Asks for confirmation first.
    Clean {
        /// Name of the environment. Example: staging
        environment: Option<String>,
        /// Auto confirm instance clean without prompt
        #[arg(long)]
        auto_confirm: bool,
    },
}

pub async fn run(cmd: DataCommands) -> Result<()> {
    match cmd {
        DataCommands::Clean {
            environment,
            auto_confirm,
        } => {
            let env = resolve_environment(environment.as_deref())?;
            let gateway = GatewayClient::new(env)?;
            let outcome = confirm_cleanup(&gateway, auto_confirm, &mut TerminalPrompter)
                .await
                .context("cleaning instance data")?;
            tracing::debug!(?outcome, "data clean finished");
        }
    }
    Ok(())
}
