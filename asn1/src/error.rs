//! Error types for ASN.1 parsing and encoding.

use thiserror::Error;

/// Errors that can occur during ASN.1 parsing and encoding operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid boolean")]
    InvalidBoolean,

    #[error("INTEGER: no data")]
    IntegerNoData,

    #[error("OBJECT IDENTIFIER: no data")]
    ObjectIdentifierNoData,
    #[error("OBJECT IDENTIFIER: incomplete encoding")]
    ObjectIdentifierIncompleteEncoding,
    #[error("OBJECT IDENTIFIER: subidentifier has leading 0x80 padding")]
    ObjectIdentifierNonMinimal,
    #[error("OBJECT IDENTIFIER: arc does not fit in 64 bits")]
    ObjectIdentifierArcOverflow,
    #[error("OBJECT IDENTIFIER: too few components (need at least 2)")]
    ObjectIdentifierTooFewComponents,
    #[error("OBJECT IDENTIFIER: first arc {0} out of range")]
    ObjectIdentifierInvalidFirstArc(u64),
    #[error("OBJECT IDENTIFIER: invalid component '{0}'")]
    ObjectIdentifierInvalidComponent(String),

    #[error("BIT STRING: no data")]
    BitStringNoData,
    #[error("BIT STRING: unused bits {0} out of range (must be 0-7)")]
    BitStringUnusedBitsOutOfRange(u8),

    #[error("UTF8String: invalid UTF-8")]
    Utf8StringInvalidUtf8,
    #[error("{0}: contains non-ASCII bytes")]
    NonAsciiString(&'static str),
    #[error("BMPString: odd byte length {0}")]
    BmpStringOddLength(usize),
    #[error("BMPString: unpaired surrogate 0x{0:04X}")]
    BmpStringUnpairedSurrogate(u16),
    #[error("UniversalString: byte length {0} is not a multiple of 4")]
    UniversalStringInvalidLength(usize),
    #[error("UniversalString: invalid code point 0x{0:08X}")]
    UniversalStringInvalidCodePoint(u32),
    #[error("TeletexString: character '{0}' cannot be encoded")]
    TeletexStringUnencodable(char),

    #[error("UTCTime: invalid format")]
    UtcTimeInvalidFormat,
    #[error("UTCTime: year {0} outside 1950-2049")]
    UtcTimeYearOutOfRange(i32),
    #[error("GeneralizedTime: invalid format")]
    GeneralizedTimeInvalidFormat,

    #[error("expected exactly one element, found {0}")]
    ExpectedSingleElement(usize),

    #[error("invalid DER encoding: {0}")]
    FailedToDecodeDer(#[from] certkit_der::Error),
}
