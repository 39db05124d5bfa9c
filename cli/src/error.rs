use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PEM decode error: {0}")]
    Pem(#[from] certkit_pem::Error),

    #[error("DER decode error: {0}")]
    Der(#[from] certkit_der::Error),

    #[error("certificate error ({kind}): {0}", kind = .0.kind())]
    X509(#[from] certkit_x509::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yml::Error),

    #[error("no certificate found in PEM input")]
    NoCertificate,
}

pub type Result<T> = std::result::Result<T, Error>;
