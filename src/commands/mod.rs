use anyhow::Result;
use clap::Subcommand;

pub mod completions;
pub mod data;
pub mod env;
pub mod gui;

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(about = "Manage instance data (destructive)")]
    Data {
        #[command(subcommand)]
        cmd: data::DataCommands,
    },
    #[command(about = "Run the local GraphQL and sync proxy with the GUI")]
    Gui {
        #[command(subcommand)]
        cmd: gui::GuiCommands,
    },
    #[command(about = "Manage named environments in the settings file (add/list/remove)")]
    Env {
        #[command(subcommand)]
        cmd: env::EnvCommands,
    },
    #[command(about = "Emit shell completion scripts (bash/zsh/fish)")]
    Completions { shell: String },
}

pub async fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Data { cmd } => data::run(cmd).await,
        Commands::Gui { cmd } => gui::run(cmd).await,
        Commands::Env { cmd } => env::run(cmd),
        Commands::Completions { shell } => completions::run(shell),
    }
}
