//! Errors raised while decoding the payload of a recognized extension.

use thiserror::Error;

/// Which extension was being decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    BasicConstraints,
    KeyUsage,
    SubjectKeyIdentifier,
    AuthorityKeyIdentifier,
    SubjectAltName,
    IssuerAltName,
    GeneralName,
    ExtendedKeyUsage,
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BasicConstraints => write!(f, "BasicConstraints"),
            Self::KeyUsage => write!(f, "KeyUsage"),
            Self::SubjectKeyIdentifier => write!(f, "SubjectKeyIdentifier"),
            Self::AuthorityKeyIdentifier => write!(f, "AuthorityKeyIdentifier"),
            Self::SubjectAltName => write!(f, "SubjectAltName"),
            Self::IssuerAltName => write!(f, "IssuerAltName"),
            Self::GeneralName => write!(f, "GeneralName"),
            Self::ExtendedKeyUsage => write!(f, "ExtendedKeyUsage"),
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}: expected SEQUENCE")]
    ExpectedSequence(Kind),

    #[error("{0}: expected BIT STRING")]
    ExpectedBitString(Kind),

    #[error("{0}: expected OCTET STRING")]
    ExpectedOctetString(Kind),

    #[error("{0}: expected OBJECT IDENTIFIER")]
    ExpectedOid(Kind),

    #[error("{kind}: expected context-specific tag [{expected}]")]
    ExpectedContextTag { kind: Kind, expected: u8 },

    #[error("{0}: unexpected element type")]
    UnexpectedElementType(Kind),

    #[error("BasicConstraints: pathLenConstraint out of range for u32")]
    PathLenConstraintOutOfRange,

    #[error("BasicConstraints: unexpected element after pathLenConstraint")]
    BasicConstraintsTrailingElement,

    #[error("GeneralName: unknown context-specific tag [{0}]")]
    UnknownGeneralNameTag(u8),

    #[error("GeneralName: IA5String must be valid ASCII")]
    GeneralNameInvalidAscii,

    #[error("GeneralName: otherName requires exactly 2 elements, got {0}")]
    OtherNameInvalidElementCount(usize),

    #[error("GeneralName: otherName type-id must be OBJECT IDENTIFIER")]
    OtherNameExpectedOid,

    #[error("GeneralName: otherName value must be [0] EXPLICIT")]
    OtherNameExpectedExplicitTag,

    #[error("GeneralName: ediPartyName missing required partyName [1]")]
    EdiPartyNameMissingPartyName,

    #[error("GeneralName: invalid nameAssigner in ediPartyName")]
    EdiPartyNameInvalidNameAssigner,

    #[error("GeneralName: invalid partyName in ediPartyName")]
    EdiPartyNameInvalidPartyName,

    #[error("{0}: at least one GeneralName required")]
    AtLeastOneGeneralNameRequired(Kind),

    #[error("AuthorityKeyIdentifier: authorityCertIssuer must be [1] IMPLICIT GeneralNames")]
    AkiAuthorityCertIssuerNotSequence,

    #[error("AuthorityKeyIdentifier: authorityCertSerialNumber is not a valid INTEGER")]
    AkiSerialNumberInvalid,

    #[error("ExtendedKeyUsage: at least one KeyPurposeId required")]
    ExtendedKeyUsageEmpty,

    #[error("invalid ASN.1: {0}")]
    InvalidAsn1(#[source] certkit_asn1::error::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
