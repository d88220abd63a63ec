// SPDX-FileCopyrightText: 2026 Burrow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Burrow - control-plane gateway for the Burrow tunnel service.
//!
//! This is the binary entry point for the gateway.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use clap::{Parser, Subcommand};

mod serve;

/// Burrow - control-plane gateway for the Burrow tunnel service.
#[derive(Parser, Debug)]
#[command(name = "burrow", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the gateway server.
    Serve,
    /// Print the resolved configuration (secrets redacted).
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup; refuse to run otherwise.
    let config = match burrow_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            burrow_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Serve) | None => {
            if let Err(e) = serve::run(config).await {
                eprintln!("burrow: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Config) => {
            print_config_summary(&config);
        }
    }
}

/// Print the resolved configuration without echoing token material.
fn print_config_summary(config: &burrow_config::BurrowConfig) {
    println!("gateway.host = {}", config.gateway.host);
    println!("gateway.port = {}", config.gateway.port);
    println!("auth.mode = {:?}", config.auth.mode);
    println!("auth.tokens = <{} entries>", config.auth.tokens.len());
    if let Some(url) = &config.auth.verify_url {
        println!("auth.verify_url = {url}");
    }
    println!("log.level = {}", config.log.level);
}
