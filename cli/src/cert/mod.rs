pub(crate) mod inspect;
pub(crate) mod reencode;

use clap::Subcommand;

#[derive(Subcommand)]
pub(crate) enum CertCommands {
    /// Inspect and display a certificate
    Inspect {
        #[command(flatten)]
        config: inspect::Config,
    },
    /// Write the canonical DER re-encoding of a certificate
    Reencode {
        #[command(flatten)]
        config: reencode::Config,
    },
}
