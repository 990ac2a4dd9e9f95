use crate::Cli;
use anyhow::{bail, Result};
use clap::CommandFactory;
use clap_complete::{
    generate,
    shells::{Bash, Fish, Zsh},
};
use std::io;

pub fn run(shell: String) -> Result<()> {
    let mut cmd = Cli::command();
    let out = &mut io::stdout();
    match shell.as_str() {
        "bash" => generate(Bash, &mut cmd, "pos-cli", out),
        "zsh" => generate(Zsh, &mut cmd, "pos-cli", out),
        "fish" => generate(Fish, &mut cmd, "pos-cli", out),
        other => bail!("unsupported shell '{other}', choose: bash, zsh, fish"),
    }
    Ok(())
}
