use std::fmt;

use certkit::decoder::{DecodableFrom, Decoder};
use certkit::encoder::{EncodableTo, Encoder};
use certkit_asn1::{Element, Integer, OctetString};
use certkit_pkix_types::OidName;
use serde::Serialize;

use super::error;
use super::{Extension, ExtensionValue};
use crate::error::Error;

/*
RFC 5280 Section 4.2.1.9
BasicConstraints ::= SEQUENCE {
    cA                      BOOLEAN DEFAULT FALSE,
    pathLenConstraint       INTEGER (0..MAX) OPTIONAL
}
*/

/// Basic Constraints extension ([RFC 5280 Section 4.2.1.9](https://datatracker.ietf.org/doc/html/rfc5280#section-4.2.1.9)).
///
/// Identifies whether the subject of the certificate is a CA and the maximum
/// depth of valid certification paths that include this certificate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BasicConstraints {
    /// Whether this certificate represents a CA
    pub ca: bool,
    /// Optional maximum path length for certificate chains
    pub path_len_constraint: Option<u32>,
}

impl Extension for BasicConstraints {
    /// OID for BasicConstraints extension (2.5.29.19)
    const OID: &'static str = "2.5.29.19";

    fn parse(value: &OctetString) -> Result<Self, Error> {
        super::parse_value(value)
    }

    fn to_value(&self) -> Result<OctetString, Error> {
        super::encode_value(self)
    }

    fn from_value(value: &ExtensionValue) -> Option<&Self> {
        match value {
            ExtensionValue::BasicConstraints(bc) => Some(bc),
            _ => None,
        }
    }
}

impl DecodableFrom<Element> for BasicConstraints {}

impl Decoder<Element, BasicConstraints> for Element {
    type Error = Error;

    fn decode(&self) -> Result<BasicConstraints, Self::Error> {
        let Element::Sequence(elements) = self else {
            return Err(error::Error::ExpectedSequence(error::Kind::BasicConstraints).into());
        };

        let mut iter = elements.iter().peekable();
        let ca = match iter.next_if(|elem| matches!(elem, Element::Boolean(_))) {
            Some(Element::Boolean(b)) => *b,
            _ => false,
        };
        let path_len_constraint = match iter.next() {
            Some(Element::Integer(i)) => Some(
                i.to_u32()
                    .ok_or(error::Error::PathLenConstraintOutOfRange)?,
            ),
            Some(_) => {
                return Err(
                    error::Error::UnexpectedElementType(error::Kind::BasicConstraints).into(),
                );
            }
            None => None,
        };
        if iter.next().is_some() {
            return Err(error::Error::BasicConstraintsTrailingElement.into());
        }

        Ok(BasicConstraints {
            ca,
            path_len_constraint,
        })
    }
}

impl OidName for BasicConstraints {
    fn oid_name(&self) -> Option<&'static str> {
        Some("basicConstraints")
    }
}

impl fmt::Display for BasicConstraints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ca {
            write!(f, "CA:TRUE")?;
            if let Some(pathlen) = self.path_len_constraint {
                write!(f, ", pathlen:{}", pathlen)?;
            }
            Ok(())
        } else {
            write!(f, "CA:FALSE")
        }
    }
}

impl EncodableTo<BasicConstraints> for Element {}

impl Encoder<BasicConstraints, Element> for BasicConstraints {
    type Error = Error;

    fn encode(&self) -> Result<Element, Self::Error> {
        // cA is DEFAULT FALSE and omitted when false
        let ca = self.ca.then_some(Element::Boolean(true));
        let path_len = self
            .path_len_constraint
            .map(|len| Element::Integer(Integer::from(i64::from(len))));

        let elements = ca.into_iter().chain(path_len).collect();
        Ok(Element::Sequence(elements))
    }
}
