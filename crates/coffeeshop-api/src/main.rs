//! Main entry point for the Coffee Shop drinks API

use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use coffeeshop_api::{config::Config, server::Server, Result};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "coffeeshop-api", about = "Coffee Shop drinks API", version, author)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Generate example configuration file
    #[arg(long)]
    gen_config: bool,

    /// Drop and recreate the drink table before serving
    #[arg(long)]
    reset_db: bool,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_filter = format!(
        "{}=info,tower_http=info",
        env!("CARGO_BIN_NAME").replace('-', "_")
    );
    coffeeshop_common::logging::init_logging(&args.verbosity, &log_filter)?;

    info!("Starting Coffee Shop API v{}", coffeeshop_api::VERSION);

    // Handle config generation
    if args.gen_config {
        let example_config = Config::generate_example()?;
        println!("{example_config}");
        return Ok(());
    }

    let mut config = Config::load(args.config.as_deref())?;
    if args.reset_db {
        config.database.reset_on_startup = true;
    }
    info!(
        "Configuration loaded, binding to {}",
        config.server.bind_address
    );

    let server = Server::new(config).await?;

    match server.run().await {
        Ok(()) => {
            info!("Coffee Shop API shut down gracefully");
            Ok(())
        }
        Err(e) => {
            error!("Coffee Shop API error: {}", e);
            Err(e)
        }
    }
}
