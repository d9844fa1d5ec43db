//! Completions command - shell completion scripts

use clap::{Args, CommandFactory};
use clap_complete::Shell;
use miette::Result;

use crate::cli::args::{Cli, GlobalOpts};

/// Generate shell completions
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}

impl CompletionsArgs {
    pub fn run(&self, _global: &GlobalOpts) -> Result<()> {
        let mut command = Cli::command();
        clap_complete::generate(self.shell, &mut command, "docuhub", &mut std::io::stdout());
        Ok(())
    }
}
