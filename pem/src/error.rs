use base64::DecodeError;
use thiserror::Error;

/// Errors raised while reading PEM armor (RFC 7468).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("no -----BEGIN----- line found")]
    MissingBeginBoundary,

    #[error("-----BEGIN {0}----- is never closed")]
    MissingEndBoundary(String),

    #[error("-----END {found}----- closes -----BEGIN {expected}-----")]
    LabelMismatch { expected: String, found: String },

    #[error("-----BEGIN {0}----- block has no data")]
    MissingData(String),

    #[error("invalid base64 text on line {0}")]
    InvalidBase64Line(usize),

    #[error("base64 decode: {0}")]
    Base64Decode(#[from] DecodeError),

    #[error("boundary pattern: {0}")]
    Pattern(String),
}
