//! Certificate Serial Number
//!
//! Defined in RFC 5280 Section 4.1.2.2
//!
//! ```asn1
//! CertificateSerialNumber ::= INTEGER
//! ```

use std::ops::Deref;

use certkit::decoder::{DecodableFrom, Decoder};
use certkit::encoder::{EncodableTo, Encoder};
use certkit_asn1::{Element, Integer};
use serde::Serialize;

use crate::error::{Error, Result};

/// Certificate Serial Number
///
/// Serials are often 20 random octets, so the value is held as an
/// arbitrary-precision integer and shown as colon-separated hex.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct CertificateSerialNumber {
    inner: Integer,
}

impl Serialize for CertificateSerialNumber {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.format_hex())
    }
}

impl CertificateSerialNumber {
    /// Interprets `bytes` as a big-endian two's-complement integer.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(Integer::try_from(bytes)?.into())
    }

    /// The INTEGER content octets, including any leading zero that keeps
    /// a value with its high bit set positive.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.inner.to_signed_bytes_be()
    }

    /// Lowercase hex with colon separators, e.g. `00:8a:1b`.
    pub fn format_hex(&self) -> String {
        self.to_bytes()
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect::<Vec<_>>()
            .join(":")
    }
}

impl From<Integer> for CertificateSerialNumber {
    fn from(inner: Integer) -> Self {
        Self { inner }
    }
}

impl AsRef<Integer> for CertificateSerialNumber {
    fn as_ref(&self) -> &Integer {
        &self.inner
    }
}

impl std::fmt::Display for CertificateSerialNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.format_hex())
    }
}

impl Deref for CertificateSerialNumber {
    type Target = Integer;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DecodableFrom<Element> for CertificateSerialNumber {}

impl Decoder<Element, CertificateSerialNumber> for Element {
    type Error = Error;

    fn decode(&self) -> Result<CertificateSerialNumber> {
        match self {
            Element::Integer(i) => Ok(CertificateSerialNumber { inner: i.clone() }),
            _ => Err(Error::CertificateSerialNumberExpectedInteger),
        }
    }
}

impl EncodableTo<CertificateSerialNumber> for Element {}

impl Encoder<CertificateSerialNumber, Element> for CertificateSerialNumber {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        Ok(Element::Integer(self.inner.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest(
        input,
        expected,
        case(vec![0x01], "01"),
        case(vec![0x12, 0x34], "12:34"),
        case(vec![0x00, 0x8a, 0x1b, 0x2c], "00:8a:1b:2c"),
    )]
    fn test_format_hex(input: Vec<u8>, expected: &str) {
        let serial = CertificateSerialNumber::from_bytes(&input).unwrap();
        assert_eq!(expected, serial.format_hex());
        assert_eq!(input, serial.to_bytes());
        assert_eq!(
            format!(r#""{expected}""#),
            serde_json::to_string(&serial).unwrap()
        );
    }

    #[test]
    fn test_decode_requires_integer() {
        let result: Result<CertificateSerialNumber> = Element::Null.decode();
        assert!(matches!(
            result,
            Err(Error::CertificateSerialNumberExpectedInteger)
        ));
        assert!(CertificateSerialNumber::from_bytes(&[]).is_err());
    }
}
