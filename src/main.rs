mod cli;

use clap::Parser;
use dotenv::dotenv;
use healthcheck::checks::plugin_manager::PluginManager;
use healthcheck::config::CONFIG;
use healthcheck::server::Server;
use healthcheck::{client, default_registry};
use log::{debug, error, info};
use std::process::ExitCode;
use tokio::signal;

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();
    env_logger::init();

    debug!("Config: {:?}", *CONFIG);

    // Parse the CLI arguments.
    let args = cli::Cli::parse();
    debug!("Parsed args: {:?}", args);

    match args.command {
        Some(cli::Commands::Check) => check().await,
        Some(cli::Commands::Server { command }) => match command {
            Some(cli::ServerCommands::Start) => serve().await,
            Some(cli::ServerCommands::Status) => status().await,
            Some(cli::ServerCommands::Down) => set_manual_status(false).await,
            Some(cli::ServerCommands::Up) => set_manual_status(true).await,
            None => ExitCode::SUCCESS,
        },
        None => ExitCode::SUCCESS,
    }
}

/// Runs every configured check once.
async fn check() -> ExitCode {
    let status = PluginManager::new(&CONFIG).quick_check().await;
    if status.healthy {
        println!("ok");
        ExitCode::SUCCESS
    } else {
        println!("error: {}", status);
        ExitCode::FAILURE
    }
}

/// Monitors the configured checks and serves their status until Ctrl+C.
async fn serve() -> ExitCode {
    let registry = default_registry();
    let mut plugins = PluginManager::new(&CONFIG);
    plugins.monitor(&registry);

    let mut server = Server::new(registry);
    if server.start().await.is_err() {
        plugins.stop();
        return ExitCode::FAILURE;
    }

    if let Err(e) = signal::ctrl_c().await {
        error!("Failed to listen for Ctrl+C: {}", e);
    }
    info!("Received SIGINT, shutting down.");
    server.stop().await;
    plugins.stop();
    ExitCode::SUCCESS
}

async fn status() -> ExitCode {
    match client::get_status().await {
        Ok(status) => {
            println!("{}", status);
            if status.healthy {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            eprintln!("Failed to get status: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn set_manual_status(up: bool) -> ExitCode {
    match client::set_manual_status(up).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Failed to set status: {}", e);
            ExitCode::FAILURE
        }
    }
}
