mod api;
mod cli;
mod collab;
mod commands;
mod config;
mod error;
mod generator;
mod logging;
mod store;
mod strength;
mod widget;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Command::Init {
            api_url,
            project_ref,
        } => commands::init::run(api_url, project_ref)?,
        Command::Status { project_ref } => commands::status::run(project_ref).await?,
        Command::Reset(args) => commands::reset::run(args).await?,
        Command::Generate { length } => commands::generate::run(length)?,
    }

    Ok(())
}
