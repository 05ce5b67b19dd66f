use crate::commands::{run_entity, run_import_tracking, run_locker, CodeArgs, ImportTrackingArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use dossier::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Dossier",
    about = "Personnel file tracking service and lookup tools",
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
    /// Print the locker holding an employee's file
    Locker(CodeArgs),
    /// Print the legal entity an employee code belongs to
    Entity(CodeArgs),
    /// Dry-run a file tracking CSV export against an employee roster
    ImportTracking(ImportTrackingArgs),
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
        Command::Locker(args) => run_locker(args),
        Command::Entity(args) => run_entity(args),
        Command::ImportTracking(args) => run_import_tracking(args),
    }
}
