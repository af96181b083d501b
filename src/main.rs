// src/main.rs
mod catalog;
mod cli;
mod config;
mod error;
mod models;
mod pages;
mod session;
mod storage;
mod tui;

use clap::Parser;

fn main() -> Result<(), error::AppError> {
    env_logger::init();
    log::info!("Starting Reelnote");

    let cli_args = cli::Cli::parse();
    let config = config::load_config();

    match cli::handle_cli_command(&cli_args, &config) {
        Ok(should_run_tui) => {
            if should_run_tui {
                let data_dir = cli_args
                    .data_dir
                    .clone()
                    .unwrap_or_else(|| config.resolve_data_dir());
                if let Err(e) = tui::run_tui(&data_dir, config) {
                    log::error!("Application TUI error: {:#?}", e);
                    eprintln!("Error: {}", e);
                    return Err(e);
                }
            } else {
                log::info!("CLI command processed.");
            }
        }
        Err(e) => {
            log::error!("Application failed: {:#?}", e);
            eprintln!("Error: {}", e);
            return Err(e);
        }
    }

    log::info!("Reelnote finished successfully.");
    Ok(())
}
