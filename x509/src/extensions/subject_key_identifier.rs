use std::fmt;

use certkit::decoder::{DecodableFrom, Decoder};
use certkit::encoder::{EncodableTo, Encoder};
use certkit_asn1::{Element, OctetString};
use certkit_pkix_types::OidName;
use serde::{Serialize, Serializer};

use super::error;
use super::{Extension, ExtensionValue};
use crate::error::Error;

/*
RFC 5280 Section 4.2.1.2
SubjectKeyIdentifier ::= KeyIdentifier
KeyIdentifier ::= OCTET STRING
*/

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectKeyIdentifier {
    /// Typically a SHA-1 hash of the subject's public key (20 bytes)
    pub key_identifier: OctetString,
}

impl SubjectKeyIdentifier {
    pub fn as_bytes(&self) -> &[u8] {
        self.key_identifier.as_bytes()
    }
}

/// Colon separated upper-case hex, as key identifiers are usually shown.
pub(crate) fn format_key_id(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(":")
}

impl Serialize for SubjectKeyIdentifier {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format_key_id(self.as_bytes()))
    }
}

impl DecodableFrom<Element> for SubjectKeyIdentifier {}

impl Decoder<Element, SubjectKeyIdentifier> for Element {
    type Error = Error;

    fn decode(&self) -> Result<SubjectKeyIdentifier, Self::Error> {
        match self {
            Element::OctetString(os) => Ok(SubjectKeyIdentifier {
                key_identifier: os.clone(),
            }),
            _ => Err(error::Error::ExpectedOctetString(error::Kind::SubjectKeyIdentifier).into()),
        }
    }
}

impl EncodableTo<SubjectKeyIdentifier> for Element {}

impl Encoder<SubjectKeyIdentifier, Element> for SubjectKeyIdentifier {
    type Error = Error;

    fn encode(&self) -> Result<Element, Self::Error> {
        Ok(Element::OctetString(self.key_identifier.clone()))
    }
}

impl Extension for SubjectKeyIdentifier {
    /// OID for SubjectKeyIdentifier extension (2.5.29.14)
    const OID: &'static str = "2.5.29.14";

    fn parse(value: &OctetString) -> Result<Self, Error> {
        super::parse_value(value)
    }

    fn to_value(&self) -> Result<OctetString, Error> {
        super::encode_value(self)
    }

    fn from_value(value: &ExtensionValue) -> Option<&Self> {
        match value {
            ExtensionValue::SubjectKeyIdentifier(ski) => Some(ski),
            _ => None,
        }
    }
}

impl OidName for SubjectKeyIdentifier {
    fn oid_name(&self) -> Option<&'static str> {
        Some("subjectKeyIdentifier")
    }
}

impl fmt::Display for SubjectKeyIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_key_id(self.as_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest(
        input,
        expected,
        case(vec![0x04, 0x02, 0xeb, 0x51], vec![0xeb, 0x51]),
        case(vec![0x04, 0x00], vec![]),
    )]
    fn test_subject_key_identifier_parse(input: Vec<u8>, expected: Vec<u8>) {
        let ski = SubjectKeyIdentifier::parse(&OctetString::from(input.clone())).unwrap();
        assert_eq!(expected, ski.as_bytes());
        assert_eq!(input, ski.to_value().unwrap().as_bytes());
    }

    #[test]
    fn test_subject_key_identifier_wrong_type() {
        let result = SubjectKeyIdentifier::parse(&OctetString::from(vec![0x02, 0x01, 0x01]));
        let err = result.unwrap_err().to_string();
        assert!(err.contains("expected OCTET STRING"), "{err}");
    }

    #[test]
    fn test_subject_key_identifier_display() {
        let ski = SubjectKeyIdentifier {
            key_identifier: OctetString::from(vec![0xeb, 0x51, 0xdf, 0x00]),
        };
        assert_eq!("EB:51:DF:00", ski.to_string());
        assert_eq!(
            "\"EB:51:DF:00\"",
            serde_json::to_string(&ski).unwrap()
        );
    }
}
