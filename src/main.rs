mod api;
mod cmds;
mod error;
mod filter;
mod output;
mod repository;

#[macro_use]
extern crate log;
#[macro_use]
extern crate simple_error;

use clap::{Parser, Subcommand};
use env_logger::{Env, DEFAULT_FILTER_ENV};

#[derive(Parser, Debug)]
#[clap(name = "octo", version, about, long_about = None)]
struct Args {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List releases by project.
    ListReleases(cmds::list_releases::Args),
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr, so `--output-format json` stays parseable on stdout.
    let env = Env::default().filter_or(DEFAULT_FILTER_ENV, "octo=info");
    env_logger::init_from_env(env);

    let args = Args::parse();

    match args.command {
        Commands::ListReleases(cmd_args) => cmds::list_releases::command(cmd_args).await,
    }
}
