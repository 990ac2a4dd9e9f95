use crate::config::{load_settings_unexpanded, save_settings, settings_path, Environment};
use anyhow::{anyhow, Result};
use clap::Subcommand;
use dialoguer::{Input, Password};

#[derive(Subcommand, Debug)]
pub enum EnvCommands {
    /// List environments in the settings file
    List,
    /// Add (or replace) an environment
    Add {
        /// Name of the environment. Example: staging
        name: String,
        /// Instance URL; prompted for when omitted
        #[arg(long)]
        url: Option<String>,
        /// Account email; prompted for when omitted
        #[arg(long)]
        email: Option<String>,
        /// API token; read with a hidden prompt when omitted
        #[arg(long, env = "MARKETPLACE_TOKEN", hide_env_values = true)]
        token: Option<String>,
    },
    /// Remove an environment by name
    Remove { name: String },
}

pub fn run(cmd: EnvCommands) -> Result<()> {
    let path = settings_path();
    let mut settings = load_settings_unexpanded(&path)?;

    match cmd {
        EnvCommands::List => {
            if settings.environments.is_empty() {
                println!("(no environments defined in {})", path.display());
            } else {
                for (name, env) in &settings.environments {
                    println!(" - {} → {} ({})", name, env.url, env.email);
                }
            }
        }
        EnvCommands::Add {
            name,
            url,
            email,
            token,
        } => {
            let url = match url {
                Some(url) => url,
                None => Input::<String>::new()
                    .with_prompt("Instance URL")
                    .interact_text()?,
            };
            if url.trim().is_empty() {
                return Err(anyhow!("Instance URL cannot be empty"));
            }
            let email = match email {
                Some(email) => email,
                None => Input::<String>::new()
                    .with_prompt("Email")
                    .allow_empty(true)
                    .interact_text()?,
            };
            let token = match token {
                Some(token) => token,
                None => Password::new().with_prompt("Token").interact()?,
            };

            let replaced = settings
                .environments
                .insert(name.clone(), Environment::new(url, token, email))
                .is_some();
            save_settings(&settings, &path)?;
            if replaced {
                println!("✅ Updated environment '{name}' in {}", path.display());
            } else {
                println!("✅ Added environment '{name}' to {}", path.display());
            }
        }
        EnvCommands::Remove { name } => {
            if settings.environments.remove(&name).is_none() {
                println!("no such environment '{name}'");
            } else {
                save_settings(&settings, &path)?;
                println!("removed '{name}'");
            }
        }
    }

    Ok(())
}
