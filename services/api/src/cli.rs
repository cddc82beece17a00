use crate::commands::{run_check, run_list, run_report, CheckArgs, ListArgs, ReportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use crime_risk::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Neighbourhood Crime Risk",
    about = "Serve and inspect neighbourhood crime-risk reports",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// List the neighbourhoods currently available
    List(ListArgs),
    /// Print the risk report for one neighbourhood
    Report(ReportArgs),
    /// Validate the dataset file without falling back to the built-in catalog
    Check(CheckArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Override the configured dataset path
    #[arg(long)]
    pub(crate) dataset: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::List(args) => run_list(args),
        Command::Report(args) => run_report(args),
        Command::Check(args) => run_check(args),
    }
}
