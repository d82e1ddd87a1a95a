use crate::commands::{run_pipeline, run_qualify, show_icp, QualifyArgs, RunArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use leadgen::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "B2B Lead Generation System",
    about = "Discover, enrich, qualify and draft outreach for B2B leads",
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
    /// Run the full pipeline for one or more company domains
    Run(RunArgs),
    /// Score a JSON file of enriched leads against the ICP rubric
    Qualify(QualifyArgs),
    /// Print the active ICP rubric
    Icp,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Run(args) => run_pipeline(args).await,
        Command::Qualify(args) => run_qualify(args),
        Command::Icp => show_icp(),
    }
}
