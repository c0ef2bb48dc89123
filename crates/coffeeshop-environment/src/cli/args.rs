use crate::cli::{commands::Commands, handlers};
use crate::error::Result;
use clap::Parser;
use clap_verbosity_flag::{OffLevel, Verbosity};
use std::path::PathBuf;

/// Inspect and render the Coffee Shop client environment
#[derive(Parser, Debug)]
#[command(name = "coffeeshop-env", version, about)]
pub struct Args {
    /// Environment file; `environment.toml` when omitted
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub verbosity: Verbosity<OffLevel>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Args {
    /// Execute the command and return what should be printed
    pub fn run(self) -> Result<String> {
        let env = handlers::load(self.config)?;

        match self.command {
            Commands::Check => Ok(handlers::handle_check(&env)),
            Commands::Render { format } => handlers::handle_render(&env, format),
            Commands::Get { key } => handlers::handle_get(&env, &key),
            Commands::LoginLink { callback_path } => {
                handlers::handle_login_link(&env, &callback_path)
            }
            Commands::LogoutLink => handlers::handle_logout_link(&env),
        }
    }
}
