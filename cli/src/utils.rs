use std::fs;
use std::io::{self, Read};

use crate::error::{Error, Result};

/// Reads `file`, or stdin when it is `None` or `-`.
pub(crate) fn read_input(file: Option<&str>) -> Result<Vec<u8>> {
    match file {
        Some(path) if path != "-" => Ok(fs::read(path)?),
        _ => {
            let mut buffer = Vec::new();
            io::stdin().read_to_end(&mut buffer)?;
            Ok(buffer)
        }
    }
}

/// DER bytes of the first certificate in `input`, which may be PEM or DER.
pub(crate) fn certificate_der(input: Vec<u8>) -> Result<Vec<u8>> {
    if !certkit_pem::is_pem(&input) {
        return Ok(input);
    }
    let text = String::from_utf8_lossy(&input);
    let mut certificates = certkit_pem::certificates(&text)?;
    if certificates.is_empty() {
        return Err(Error::NoCertificate);
    }
    if certificates.len() > 1 {
        tracing::warn!(count = certificates.len(), "using the first of several certificates");
    }
    Ok(certificates.swap_remove(0))
}
