//! PKIX Extension envelope
//!
//! RFC 5280 Section 4.1.2.9
//!
//! ```asn1
//! Extension  ::=  SEQUENCE  {
//!     extnID      OBJECT IDENTIFIER,
//!     critical    BOOLEAN DEFAULT FALSE,
//!     extnValue   OCTET STRING
//! }
//! ```
//!
//! `extnValue` holds the DER encoding of a value whose type depends on
//! `extnID`; interpreting it is left to the certificate crate.

use certkit::decoder::{DecodableFrom, Decoder};
use certkit::encoder::{EncodableTo, Encoder};
use certkit_asn1::{Element, ObjectIdentifier, OctetString};
use serde::Serialize;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Extension {
    id: ObjectIdentifier,
    critical: bool,
    value: OctetString,
}

impl Extension {
    /// Create a new Extension
    pub fn new(id: ObjectIdentifier, critical: bool, value: OctetString) -> Self {
        Self {
            id,
            critical,
            value,
        }
    }

    /// Get the extension OID
    pub fn oid(&self) -> &ObjectIdentifier {
        &self.id
    }

    /// Get the criticality flag
    pub fn is_critical(&self) -> bool {
        self.critical
    }

    /// The raw `extnValue` octets.
    pub fn value(&self) -> &OctetString {
        &self.value
    }
}

impl DecodableFrom<Element> for Extension {}

impl Decoder<Element, Extension> for Element {
    type Error = Error;

    fn decode(&self) -> Result<Extension> {
        let Element::Sequence(elements) = self else {
            return Err(Error::ExtensionExpectedSequence);
        };

        let (id, critical, value) = match elements.as_slice() {
            [id, value] => (id, None, value),
            [id, critical, value] => (id, Some(critical), value),
            other => return Err(Error::ExtensionInvalidElementCount(other.len())),
        };

        let Element::ObjectIdentifier(id) = id else {
            return Err(Error::ExtensionExpectedOidForExtnId);
        };
        // An explicit FALSE is accepted and dropped on re-encoding.
        let critical = match critical {
            None => false,
            Some(Element::Boolean(b)) => *b,
            Some(_) => return Err(Error::ExtensionExpectedBoolean),
        };
        let Element::OctetString(value) = value else {
            return Err(Error::ExtensionExpectedOctetString);
        };

        Ok(Extension::new(id.clone(), critical, value.clone()))
    }
}

impl EncodableTo<Extension> for Element {}

impl Encoder<Extension, Element> for Extension {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        let mut elements = vec![Element::ObjectIdentifier(self.id.clone())];
        if self.critical {
            elements.push(Element::Boolean(true));
        }
        elements.push(Element::OctetString(self.value.clone()));
        Ok(Element::Sequence(elements))
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;
    use rstest::rstest;

    fn oid(s: &str) -> ObjectIdentifier {
        ObjectIdentifier::from_str(s).unwrap()
    }

    #[rstest(
        critical,
        expected_len,
        case(true, 3),
        // DEFAULT FALSE is omitted
        case(false, 2),
    )]
    fn test_extension_encode(critical: bool, expected_len: usize) {
        let ext = Extension::new(
            oid("2.5.29.15"),
            critical,
            OctetString::from(vec![0x03, 0x02, 0x05, 0xa0]),
        );
        let Element::Sequence(elements) = ext.encode().unwrap() else {
            panic!("expected Sequence");
        };
        assert_eq!(expected_len, elements.len());

        let decoded: Extension = Element::Sequence(elements).decode().unwrap();
        assert_eq!(ext, decoded);
    }

    #[test]
    fn test_extension_explicit_false_is_normalized() {
        let element = Element::Sequence(vec![
            Element::ObjectIdentifier(oid("2.5.29.19")),
            Element::Boolean(false),
            Element::OctetString(OctetString::from(vec![0x30, 0x00])),
        ]);
        let ext: Extension = element.decode().unwrap();
        assert!(!ext.is_critical());
        let Element::Sequence(encoded) = ext.encode().unwrap() else {
            panic!("expected Sequence");
        };
        assert_eq!(2, encoded.len());
    }

    #[rstest(
        element,
        case(Element::Null),
        case(Element::Sequence(vec![Element::ObjectIdentifier(oid("2.5.29.15"))])),
        case(Element::Sequence(vec![Element::Null, Element::OctetString(OctetString::from(vec![]))])),
        case(Element::Sequence(vec![
            Element::ObjectIdentifier(oid("2.5.29.15")),
            Element::Null,
            Element::OctetString(OctetString::from(vec![])),
        ])),
        case(Element::Sequence(vec![Element::ObjectIdentifier(oid("2.5.29.15")), Element::Null])),
    )]
    fn test_extension_invalid(element: Element) {
        let result: Result<Extension> = element.decode();
        assert!(result.is_err());
    }
}
