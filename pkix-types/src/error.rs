//! Error types for PKIX types

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("DirectoryString: expected a character string, got {0}")]
    DirectoryStringExpectedStringType(&'static str),

    #[error("Name: expected SEQUENCE")]
    NameExpectedSequence,
    #[error("RelativeDistinguishedName: expected SET")]
    RdnExpectedSet,
    #[error("RelativeDistinguishedName: empty SET")]
    RdnEmpty,
    #[error("AttributeTypeAndValue: expected SEQUENCE")]
    AttributeTypeAndValueExpectedSequence,
    #[error("AttributeTypeAndValue: expected OBJECT IDENTIFIER for attribute type")]
    AttributeTypeAndValueExpectedOid,
    #[error("AttributeTypeAndValue: expected 2 elements, got {0}")]
    AttributeTypeAndValueInvalidElementCount(usize),

    #[error("AlgorithmIdentifier: expected SEQUENCE")]
    AlgorithmIdentifierExpectedSequence,
    #[error("AlgorithmIdentifier: expected OBJECT IDENTIFIER for algorithm")]
    AlgorithmIdentifierExpectedOid,
    #[error("AlgorithmIdentifier: expected 1 or 2 elements, got {0}")]
    AlgorithmIdentifierInvalidElementCount(usize),

    #[error("SubjectPublicKeyInfo: expected SEQUENCE")]
    SubjectPublicKeyInfoExpectedSequence,
    #[error("SubjectPublicKeyInfo: expected BIT STRING for subject public key")]
    SubjectPublicKeyInfoExpectedBitString,
    #[error("SubjectPublicKeyInfo: expected 2 elements, got {0}")]
    SubjectPublicKeyInfoInvalidElementCount(usize),

    #[error("CertificateSerialNumber: expected INTEGER")]
    CertificateSerialNumberExpectedInteger,

    #[error("Extension: expected SEQUENCE")]
    ExtensionExpectedSequence,
    #[error("Extension: expected 2 or 3 elements, got {0}")]
    ExtensionInvalidElementCount(usize),
    #[error("Extension: expected OBJECT IDENTIFIER for extnID")]
    ExtensionExpectedOidForExtnId,
    #[error("Extension: expected BOOLEAN for critical")]
    ExtensionExpectedBoolean,
    #[error("Extension: expected OCTET STRING for extnValue")]
    ExtensionExpectedOctetString,

    #[error("ASN.1 error: {0}")]
    ASN1Error(#[from] certkit_asn1::error::Error),
}
