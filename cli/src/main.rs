use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod args;
mod cert;
mod error;
mod output;
mod profile;
mod utils;

use error::Result;

use cert::CertCommands;
use profile::ProfileCommands;

#[derive(Parser)]
#[command(name = "kensa")]
#[command(about = "PKCS#12 certificate extraction and signed profile verification", long_about = None)]
struct Cli {
    /// Log diagnostics to stderr (-v info, -vv debug, -vvv trace). RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// PKCS#12 certificate operations
    Cert {
        #[command(subcommand)]
        command: CertCommands,
    },
    /// Signed configuration profile operations
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Cert { command } => match command {
            CertCommands::Decode { config } => {
                cert::decode::execute(config)?;
            }
        },
        Commands::Profile { command } => match command {
            ProfileCommands::Decode { config } => {
                profile::decode::execute(config)?;
            }
            ProfileCommands::Inspect { config } => {
                profile::inspect::execute(config)?;
            }
        },
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "command failed");
            let response = err.response();
            match serde_json::to_string(&response) {
                Ok(body) => println!("{}", body),
                Err(_) => println!(r#"{{"error":"{}"}}"#, response.error),
            }
            ExitCode::FAILURE
        }
    }
}
