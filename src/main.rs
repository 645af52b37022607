use crate::api::HttpApi;
use crate::config::Config;
use crate::table::StudentTable;
use clap::{Parser, Subcommand};
use eyre::Error;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod api;
mod checks;
mod config;
mod console;
mod display;
mod error;
mod model;
mod routes;
mod server;
mod stats;
mod store;
mod table;

#[derive(Parser)]
#[clap(version, author, about)]
struct Options {
    #[clap(short, long)]
    /// Use FILE instead of gradebook.toml
    config: Option<PathBuf>,
    #[clap(short, action = clap::ArgAction::Count)]
    /// Set verbosity level
    verbose: u8,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the student records service
    Serve,
    /// Edit scores interactively against a running service
    Table {
        #[clap(short, long)]
        /// Service base URL instead of the configured one
        url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    color_eyre::install()?;
    let options = Options::parse();
    let level = match options.verbose {
        0 => "error",
        1 => "warn",
        2 => "info",
        3 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("gradebook={level},tower_http={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    let config = Config::discover(options.config.as_deref())?;
    match options.command {
        Command::Serve => server::serve(&config).await,
        Command::Table { url } => {
            let api = HttpApi::new(url.as_deref().unwrap_or(&config.client.server_url))?;
            console::run(StudentTable::new(api)).await
        }
    }
}
