use crate::demo::{run_demo, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use jobworks::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "JobWorks",
    about = "Run and demonstrate the JobWorks job board from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the job board API (default when no subcommand is given)
    Serve(ServeArgs),
    /// Run an end-to-end CLI demo covering the hiring pipeline
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Bind host, overriding JOBWORKS_HOST
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Bind port, overriding JOBWORKS_PORT
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    match Cli::parse().command {
        Some(Command::Serve(args)) => server::run(args).await,
        Some(Command::Demo(args)) => run_demo(args),
        None => server::run(ServeArgs::default()).await,
    }
}
