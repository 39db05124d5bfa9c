use std::fmt;

use certkit::decoder::{DecodableFrom, Decoder};
use certkit::encoder::{EncodableTo, Encoder};
use certkit_asn1::{Element, OctetString};
use certkit_pkix_types::OidName;
use serde::Serialize;

use super::error;
use super::general_name::GeneralName;
use super::{Extension, ExtensionValue};
use crate::error::Error;

/*
RFC 5280 Section 4.2.1.7
IssuerAltName ::= GeneralNames
*/

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct IssuerAltName {
    pub names: Vec<GeneralName>,
}

impl DecodableFrom<Element> for IssuerAltName {}

impl Decoder<Element, IssuerAltName> for Element {
    type Error = Error;

    fn decode(&self) -> Result<IssuerAltName, Self::Error> {
        let Element::Sequence(elements) = self else {
            return Err(error::Error::ExpectedSequence(error::Kind::IssuerAltName).into());
        };
        if elements.is_empty() {
            return Err(
                error::Error::AtLeastOneGeneralNameRequired(error::Kind::IssuerAltName).into(),
            );
        }

        let names = elements
            .iter()
            .map(|elem| elem.decode())
            .collect::<Result<Vec<GeneralName>, _>>()?;

        Ok(IssuerAltName { names })
    }
}

impl EncodableTo<IssuerAltName> for Element {}

impl Encoder<IssuerAltName, Element> for IssuerAltName {
    type Error = Error;

    fn encode(&self) -> Result<Element, Self::Error> {
        if self.names.is_empty() {
            return Err(
                error::Error::AtLeastOneGeneralNameRequired(error::Kind::IssuerAltName).into(),
            );
        }

        let elements = self
            .names
            .iter()
            .map(|name| name.encode())
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Element::Sequence(elements))
    }
}

impl Extension for IssuerAltName {
    /// OID for IssuerAltName extension (2.5.29.18)
    const OID: &'static str = "2.5.29.18";

    fn parse(value: &OctetString) -> Result<Self, Error> {
        super::parse_value(value)
    }

    fn to_value(&self) -> Result<OctetString, Error> {
        super::encode_value(self)
    }

    fn from_value(value: &ExtensionValue) -> Option<&Self> {
        match value {
            ExtensionValue::IssuerAltName(ian) => Some(ian),
            _ => None,
        }
    }
}

impl OidName for IssuerAltName {
    fn oid_name(&self) -> Option<&'static str> {
        Some("issuerAltName")
    }
}

impl fmt::Display for IssuerAltName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = self.names.iter().map(ToString::to_string).collect::<Vec<_>>();
        write!(f, "{}", names.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issuer_alt_name_decode() {
        let input = Element::Sequence(vec![
            Element::implicit_primitive(6, b"https://ca.example/".to_vec()),
            Element::implicit_primitive(1, b"ca@example.com".to_vec()),
        ]);
        let ian: IssuerAltName = input.decode().unwrap();
        assert_eq!(
            vec![
                GeneralName::Uri("https://ca.example/".to_string()),
                GeneralName::Rfc822Name("ca@example.com".to_string()),
            ],
            ian.names
        );
        assert_eq!("URI:https://ca.example/, email:ca@example.com", ian.to_string());

        let encoded: Element = ian.encode().unwrap();
        assert_eq!(input, encoded);
    }

    #[test]
    fn test_issuer_alt_name_empty() {
        let result: Result<IssuerAltName, Error> = Element::Sequence(vec![]).decode();
        let err = result.unwrap_err().to_string();
        assert!(err.contains("IssuerAltName: at least one GeneralName"), "{err}");
    }
}
