use thiserror::Error;

use crate::Tag;

/// Why a length field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthError {
    /// `0x80`: the BER indefinite form, never valid in DER.
    Indefinite,
    /// More length octets than this reader supports.
    TooManyOctets(u8),
    /// Long form used where the short form fits, or leading zero octets.
    NonMinimal,
}

impl std::fmt::Display for LengthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Indefinite => write!(f, "indefinite length"),
            Self::TooManyOctets(n) => write!(f, "{n} length octets"),
            Self::NonMinimal => write!(f, "non-minimal length encoding"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("truncated input: need {needed} bytes, {available} available")]
    TruncatedInput { needed: usize, available: usize },
    #[error("invalid length: {0}")]
    InvalidLength(LengthError),
    #[error("unsupported tag: identifier octet 0x{0:02x}")]
    UnsupportedTag(u8),
    #[error("nesting deeper than {0} levels")]
    NestingTooDeep(usize),
    #[error("{0} trailing bytes after the last element")]
    TrailingData(usize),
    #[error("expected a constructed element, found {0}")]
    NotConstructed(Tag),
}
