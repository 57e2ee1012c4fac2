//! Grantdeck operator CLI.

#![forbid(unsafe_code)]

mod cli_args;
mod client_config;
mod commands;
mod console_notifier;
mod display_text;

use std::process::ExitCode;

use clap::Parser;

use crate::cli_args::GrantdeckCli;
use crate::client_config::init_tracing;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = GrantdeckCli::parse();
    match commands::run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(error) => {
            tracing::error!(error = %error, "command failed");
            eprintln!("error: {error}");
            ExitCode::FAILURE
        }
    }
}
