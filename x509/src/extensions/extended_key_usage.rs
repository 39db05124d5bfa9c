use std::fmt;

use certkit::decoder::{DecodableFrom, Decoder};
use certkit::encoder::{EncodableTo, Encoder};
use certkit_asn1::{Element, ObjectIdentifier, OctetString};
use certkit_pkix_types::OidName;
use serde::Serialize;

use super::error;
use super::{Extension, ExtensionValue};
use crate::error::Error;

/*
RFC 5280 Section 4.2.1.12
ExtendedKeyUsage ::= SEQUENCE SIZE (1..MAX) OF KeyPurposeId
KeyPurposeId ::= OBJECT IDENTIFIER
*/

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ExtendedKeyUsage {
    pub purposes: Vec<ObjectIdentifier>,
}

impl ExtendedKeyUsage {
    /// TLS WWW server authentication (1.3.6.1.5.5.7.3.1)
    pub const SERVER_AUTH: &'static str = "1.3.6.1.5.5.7.3.1";
    /// TLS WWW client authentication (1.3.6.1.5.5.7.3.2)
    pub const CLIENT_AUTH: &'static str = "1.3.6.1.5.5.7.3.2";
    /// Code signing (1.3.6.1.5.5.7.3.3)
    pub const CODE_SIGNING: &'static str = "1.3.6.1.5.5.7.3.3";
    /// Email protection (1.3.6.1.5.5.7.3.4)
    pub const EMAIL_PROTECTION: &'static str = "1.3.6.1.5.5.7.3.4";
    /// Time stamping (1.3.6.1.5.5.7.3.8)
    pub const TIME_STAMPING: &'static str = "1.3.6.1.5.5.7.3.8";
    /// OCSP signing (1.3.6.1.5.5.7.3.9)
    pub const OCSP_SIGNING: &'static str = "1.3.6.1.5.5.7.3.9";
    /// Any extended key usage (2.5.29.37.0)
    pub const ANY: &'static str = "2.5.29.37.0";

    pub fn contains(&self, purpose: &str) -> bool {
        self.purposes.iter().any(|oid| *oid == purpose)
    }

    /// Short name of a KeyPurposeId.
    pub fn purpose_name(oid: &ObjectIdentifier) -> Option<&'static str> {
        match oid.to_string().as_str() {
            Self::SERVER_AUTH => Some("serverAuth"),
            Self::CLIENT_AUTH => Some("clientAuth"),
            Self::CODE_SIGNING => Some("codeSigning"),
            Self::EMAIL_PROTECTION => Some("emailProtection"),
            Self::TIME_STAMPING => Some("timeStamping"),
            Self::OCSP_SIGNING => Some("OCSPSigning"),
            Self::ANY => Some("anyExtendedKeyUsage"),
            _ => None,
        }
    }
}

impl DecodableFrom<Element> for ExtendedKeyUsage {}

impl Decoder<Element, ExtendedKeyUsage> for Element {
    type Error = Error;

    fn decode(&self) -> Result<ExtendedKeyUsage, Self::Error> {
        let Element::Sequence(elements) = self else {
            return Err(error::Error::ExpectedSequence(error::Kind::ExtendedKeyUsage).into());
        };
        if elements.is_empty() {
            return Err(error::Error::ExtendedKeyUsageEmpty.into());
        }

        let purposes = elements
            .iter()
            .map(|elem| match elem {
                Element::ObjectIdentifier(oid) => Ok(oid.clone()),
                _ => Err(error::Error::ExpectedOid(error::Kind::ExtendedKeyUsage)),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ExtendedKeyUsage { purposes })
    }
}

impl EncodableTo<ExtendedKeyUsage> for Element {}

impl Encoder<ExtendedKeyUsage, Element> for ExtendedKeyUsage {
    type Error = Error;

    fn encode(&self) -> Result<Element, Self::Error> {
        if self.purposes.is_empty() {
            return Err(error::Error::ExtendedKeyUsageEmpty.into());
        }

        let elements = self
            .purposes
            .iter()
            .map(|oid| Element::ObjectIdentifier(oid.clone()))
            .collect();

        Ok(Element::Sequence(elements))
    }
}

impl Extension for ExtendedKeyUsage {
    /// OID for ExtendedKeyUsage extension (2.5.29.37)
    const OID: &'static str = "2.5.29.37";

    fn parse(value: &OctetString) -> Result<Self, Error> {
        super::parse_value(value)
    }

    fn to_value(&self) -> Result<OctetString, Error> {
        super::encode_value(self)
    }

    fn from_value(value: &ExtensionValue) -> Option<&Self> {
        match value {
            ExtensionValue::ExtendedKeyUsage(eku) => Some(eku),
            _ => None,
        }
    }
}

impl OidName for ExtendedKeyUsage {
    fn oid_name(&self) -> Option<&'static str> {
        Some("extendedKeyUsage")
    }
}

impl fmt::Display for ExtendedKeyUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let purposes = self
            .purposes
            .iter()
            .map(|oid| match Self::purpose_name(oid) {
                Some(name) => name.to_string(),
                None => oid.to_string(),
            })
            .collect::<Vec<_>>();
        write!(f, "{}", purposes.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rstest::rstest;

    use super::*;

    fn oid(s: &str) -> ObjectIdentifier {
        ObjectIdentifier::from_str(s).unwrap()
    }

    #[test]
    fn test_extended_key_usage_decode() {
        let input = Element::Sequence(vec![
            Element::ObjectIdentifier(oid(ExtendedKeyUsage::SERVER_AUTH)),
            Element::ObjectIdentifier(oid(ExtendedKeyUsage::CLIENT_AUTH)),
            Element::ObjectIdentifier(oid("1.2.3.4")),
        ]);
        let eku: ExtendedKeyUsage = input.decode().unwrap();

        assert!(eku.contains(ExtendedKeyUsage::SERVER_AUTH));
        assert!(!eku.contains(ExtendedKeyUsage::CODE_SIGNING));
        assert_eq!("serverAuth, clientAuth, 1.2.3.4", eku.to_string());

        let encoded: Element = eku.encode().unwrap();
        assert_eq!(input, encoded);
    }

    #[rstest(
        input,
        expected_error_msg,
        case(Element::Sequence(vec![]), "at least one KeyPurposeId"),
        case(Element::Null, "expected SEQUENCE"),
        case(Element::Sequence(vec![Element::Null]), "expected OBJECT IDENTIFIER"),
    )]
    fn test_extended_key_usage_decode_failure(input: Element, expected_error_msg: &str) {
        let result: Result<ExtendedKeyUsage, Error> = input.decode();
        let err = result.unwrap_err().to_string();
        assert!(err.contains(expected_error_msg), "{err}");
    }
}
