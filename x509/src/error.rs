use thiserror::Error;

use crate::extensions;

pub type Result<T> = std::result::Result<T, Error>;

/// Broad failure classes, stable across releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Truncated or otherwise invalid DER framing.
    MalformedInput,
    /// Well-formed DER that does not follow the certificate schema.
    SchemaViolation,
    /// A well-formed certificate lacks the queried attribute.
    AttributeNotFound,
    /// An already-decoded certificate could not be processed further.
    InternalFault,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedInput => write!(f, "malformed input"),
            Self::SchemaViolation => write!(f, "schema violation"),
            Self::AttributeNotFound => write!(f, "attribute not found"),
            Self::InternalFault => write!(f, "internal fault"),
        }
    }
}

/// Numeric status codes reported at the API boundary.
///
/// The values follow the Security framework's `OSStatus` codes so callers
/// that bridge into that world can pass them through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum Status {
    Success = 0,
    Param = -50,
    NoSuchAttribute = -25303,
    Decode = -26265,
    Internal = -26276,
}

impl Status {
    pub const INVALID_CERTIFICATE: Status = Status::Decode;

    pub fn code(self) -> i32 {
        self as i32
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid DER: {0}")]
    InvalidDer(#[from] certkit_der::Error),
    #[error("invalid ASN.1: {0}")]
    InvalidASN1(#[from] certkit_asn1::error::Error),
    #[error("PKIX types error: {0}")]
    PKIXTypesError(#[from] certkit_pkix_types::Error),
    #[error("extension error: {0}")]
    ExtensionError(#[from] extensions::error::Error),

    #[error("certificate: expected SEQUENCE")]
    CertificateExpectedSequence,
    #[error("certificate: expected 3 elements, got {0}")]
    CertificateInvalidElementCount(usize),
    #[error("certificate: signatureValue must be BIT STRING")]
    SignatureExpectedBitString,

    #[error("TBSCertificate: expected SEQUENCE")]
    TbsExpectedSequence,
    #[error("TBSCertificate: missing {0}")]
    TbsMissingField(&'static str),
    #[error("TBSCertificate: unexpected element after {0}")]
    TbsUnexpectedElement(&'static str),

    #[error("invalid version: {0}")]
    InvalidVersion(String),
    #[error("validity: expected SEQUENCE")]
    ValidityExpectedSequence,
    #[error("validity: expected 2 elements, got {0}")]
    ValidityInvalidElementCount(usize),
    #[error("validity: expected UTCTime or GeneralizedTime, got {0}")]
    ValidityExpectedTime(&'static str),
    #[error("unique identifier [{0}]: expected IMPLICIT BIT STRING")]
    UniqueIdentifierExpectedBitString(u8),

    #[error("extensions: expected [3] EXPLICIT SEQUENCE")]
    ExtensionsExpectedSequence,
    #[error("extensions: at least one extension required")]
    ExtensionsEmpty,
    #[error("extensions: {0} appears more than once")]
    DuplicateExtension(String),

    #[error("{0} not found")]
    AttributeNotFound(&'static str),
    #[error("re-encoding failed: {0}")]
    ReencodeFailed(#[source] Box<Error>),
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidDer(certkit_der::Error::TrailingData(_)) => ErrorKind::SchemaViolation,
            Error::InvalidDer(_) | Error::InvalidASN1(_) => ErrorKind::MalformedInput,
            Error::AttributeNotFound(_) => ErrorKind::AttributeNotFound,
            Error::ReencodeFailed(_) | Error::SerializationError(_) => ErrorKind::InternalFault,
            _ => ErrorKind::SchemaViolation,
        }
    }

    pub fn status(&self) -> Status {
        match self.kind() {
            ErrorKind::MalformedInput | ErrorKind::SchemaViolation => Status::INVALID_CERTIFICATE,
            ErrorKind::AttributeNotFound => Status::NoSuchAttribute,
            ErrorKind::InternalFault => Status::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest(error, kind, status,
        case(Error::InvalidDer(certkit_der::Error::TruncatedInput { needed: 4, available: 1 }), ErrorKind::MalformedInput, Status::Decode),
        case(Error::InvalidDer(certkit_der::Error::TrailingData(2)), ErrorKind::SchemaViolation, Status::Decode),
        case(Error::TbsMissingField("subject"), ErrorKind::SchemaViolation, Status::Decode),
        case(Error::AttributeNotFound("common name"), ErrorKind::AttributeNotFound, Status::NoSuchAttribute),
        case(Error::ReencodeFailed(Box::new(Error::ExtensionsEmpty)), ErrorKind::InternalFault, Status::Internal),
    )]
    fn test_error_kind_and_status(error: Error, kind: ErrorKind, status: Status) {
        assert_eq!(kind, error.kind());
        assert_eq!(status, error.status());
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(0, Status::Success.code());
        assert_eq!(-50, Status::Param.code());
        assert_eq!(-26265, Status::INVALID_CERTIFICATE.code());
        assert_eq!(-26276, Status::Internal.code());
    }
}
