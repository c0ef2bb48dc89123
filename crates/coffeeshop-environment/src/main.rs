//! Main entry point for the Coffee Shop environment tool

use anyhow::Result;
use clap::Parser;
use coffeeshop_environment::cli::Args;

fn main() -> Result<()> {
    let args = Args::parse();

    coffeeshop_common::logging::init_cli_logging(&args.verbosity, "coffeeshop_environment=info")?;

    let output = args.run()?;
    println!("{}", output.trim_end());
    Ok(())
}
