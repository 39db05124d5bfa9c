use std::fmt;
use std::net::IpAddr;

use certkit::decoder::{DecodableFrom, Decoder};
use certkit::encoder::{EncodableTo, Encoder};
use certkit_asn1::{Element, OctetString};
use certkit_pkix_types::OidName;
use serde::Serialize;

use super::error;
use super::general_name::{GeneralName, OtherName};
use super::{Extension, ExtensionValue};
use crate::error::Error;

/*
RFC 5280 Section 4.2.1.6
SubjectAltName ::= GeneralNames
GeneralNames ::= SEQUENCE SIZE (1..MAX) OF GeneralName
*/

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SubjectAltName {
    pub names: Vec<GeneralName>,
}

impl SubjectAltName {
    pub fn iter(&self) -> impl Iterator<Item = &GeneralName> {
        self.names.iter()
    }

    pub fn rfc822_names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().filter_map(|name| match name {
            GeneralName::Rfc822Name(email) => Some(email.as_str()),
            _ => None,
        })
    }

    pub fn dns_names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().filter_map(|name| match name {
            GeneralName::DnsName(dns) => Some(dns.as_str()),
            _ => None,
        })
    }

    /// Raw octets of every `iPAddress` entry, in order.
    pub fn ip_address_octets(&self) -> impl Iterator<Item = &[u8]> {
        self.names.iter().filter_map(|name| match name {
            GeneralName::IpAddress(bytes) => Some(bytes.as_slice()),
            _ => None,
        })
    }

    /// `iPAddress` entries of 4 or 16 octets; other lengths are skipped.
    pub fn ip_addresses(&self) -> impl Iterator<Item = IpAddr> + '_ {
        self.names.iter().filter_map(GeneralName::ip_address)
    }

    pub fn other_names(&self) -> impl Iterator<Item = &OtherName> {
        self.names.iter().filter_map(|name| match name {
            GeneralName::OtherName(other) => Some(other),
            _ => None,
        })
    }
}

impl DecodableFrom<Element> for SubjectAltName {}

impl Decoder<Element, SubjectAltName> for Element {
    type Error = Error;

    fn decode(&self) -> Result<SubjectAltName, Self::Error> {
        let Element::Sequence(elements) = self else {
            return Err(error::Error::ExpectedSequence(error::Kind::SubjectAltName).into());
        };
        if elements.is_empty() {
            return Err(
                error::Error::AtLeastOneGeneralNameRequired(error::Kind::SubjectAltName).into(),
            );
        }

        let names = elements
            .iter()
            .map(|elem| elem.decode())
            .collect::<Result<Vec<GeneralName>, _>>()?;

        Ok(SubjectAltName { names })
    }
}

impl EncodableTo<SubjectAltName> for Element {}

impl Encoder<SubjectAltName, Element> for SubjectAltName {
    type Error = Error;

    fn encode(&self) -> Result<Element, Self::Error> {
        if self.names.is_empty() {
            return Err(
                error::Error::AtLeastOneGeneralNameRequired(error::Kind::SubjectAltName).into(),
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

impl Extension for SubjectAltName {
    /// OID for SubjectAltName extension (2.5.29.17)
    const OID: &'static str = "2.5.29.17";

    fn parse(value: &OctetString) -> Result<Self, Error> {
        super::parse_value(value)
    }

    fn to_value(&self) -> Result<OctetString, Error> {
        super::encode_value(self)
    }

    fn from_value(value: &ExtensionValue) -> Option<&Self> {
        match value {
            ExtensionValue::SubjectAltName(san) => Some(san),
            _ => None,
        }
    }
}

impl OidName for SubjectAltName {
    fn oid_name(&self) -> Option<&'static str> {
        Some("subjectAltName")
    }
}

impl fmt::Display for SubjectAltName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = self.names.iter().map(ToString::to_string).collect::<Vec<_>>();
        write!(f, "{}", names.join(", "))
    }
}
