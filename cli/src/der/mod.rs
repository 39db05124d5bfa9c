pub(crate) mod dump;

use clap::Subcommand;

#[derive(Subcommand)]
pub(crate) enum DerCommands {
    /// Print the TLV structure of DER data
    Dump {
        #[command(flatten)]
        config: dump::Config,
    },
}
