#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Entry point for the city watch API server.
//!
//! Runs the server with configuration taken from the environment, or in
//! interactive mode (`city_watch_server interactive`) with prompts for
//! the bind address, port, and AI provider.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "city_watch_server", about = "API server for the city watch dashboard")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Prompt for configuration before starting the server
    Interactive,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Interactive) => city_watch_server::interactive::run().await,
        None => city_watch_server::run_server().await,
    }
}
