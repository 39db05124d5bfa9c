use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cert;
mod der;
mod error;
mod output;
mod utils;

use error::Result;

use cert::CertCommands;
use der::DerCommands;

#[derive(Parser)]
#[command(name = "certkit")]
#[command(about = "X.509 certificate inspection toolkit", long_about = None)]
struct Cli {
    /// Log decode details to stderr (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Certificate operations
    Cert {
        #[command(subcommand)]
        command: CertCommands,
    },
    /// DER encoding operations
    Der {
        #[command(subcommand)]
        command: DerCommands,
    },
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Cert { command } => match command {
            CertCommands::Inspect { config } => {
                cert::inspect::execute(config)?;
            }
            CertCommands::Reencode { config } => {
                cert::reencode::execute(config)?;
            }
        },
        Commands::Der { command } => match command {
            DerCommands::Dump { config } => {
                der::dump::execute(config)?;
            }
        },
    }

    Ok(())
}
