pub(crate) mod decode;

use clap::Subcommand;

#[derive(Subcommand)]
pub(crate) enum CertCommands {
    /// Extract the certificates of a PKCS#12 container (empty passphrase)
    Decode {
        #[command(flatten)]
        config: decode::Config,
    },
}
