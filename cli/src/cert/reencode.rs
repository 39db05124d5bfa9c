use std::io::{self, Write};

use certkit_pem::{Label, Pem};
use certkit_x509::Certificate;
use clap::Args;

use crate::error::Result;
use crate::utils::{certificate_der, read_input};

#[derive(Args)]
pub(crate) struct Config {
    /// Path to the certificate file (PEM or DER format). Reads stdin if omitted or `-`
    file: Option<String>,

    /// Write PEM instead of binary DER
    #[arg(long)]
    pem: bool,
}

pub(crate) fn execute(config: Config) -> Result<()> {
    let der = certificate_der(read_input(config.file.as_deref())?)?;
    let cert = Certificate::from_der(&der)?;
    let reencoded = cert.reencoded()?;
    if reencoded != cert.data() {
        tracing::info!(
            original = cert.len(),
            reencoded = reencoded.len(),
            "input was not canonical DER"
        );
    }

    if config.pem {
        print!("{}", Pem::from_der(Label::Certificate, &reencoded));
    } else {
        io::stdout().write_all(&reencoded)?;
    }
    Ok(())
}
