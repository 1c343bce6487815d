use crate::commands::{run_send, run_validate, SendArgs, ValidateArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use imwera_enquiry::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Imwera Enquiries",
    about = "Serve and exercise the Imwera Coffee enquiry intake from the command line",
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
    /// Check an enquiry JSON file against its form without sending it
    Validate(ValidateArgs),
    /// Validate and deliver an enquiry JSON file through EmailJS
    Send(SendArgs),
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
        Command::Validate(args) => run_validate(args),
        Command::Send(args) => run_send(args).await,
    }
}
