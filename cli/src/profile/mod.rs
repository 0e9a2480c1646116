pub(crate) mod decode;
pub(crate) mod inspect;

use clap::Subcommand;

#[derive(Subcommand)]
pub(crate) enum ProfileCommands {
    /// Verify a signed profile and print its property list
    Decode {
        #[command(flatten)]
        config: decode::Config,
    },
    /// Verify a signed profile and summarize signers and certificates
    Inspect {
        #[command(flatten)]
        config: inspect::Config,
    },
}
