//! Folio CLI binary.

use std::process;

use clap::Parser;
use folio::cli::{args::*, commands::*};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let args = FolioArgs::parse();

    // RUST_LOG wins over the verbosity flags.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_directive()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = execute_command(args).await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
