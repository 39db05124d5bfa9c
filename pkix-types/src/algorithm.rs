//! AlgorithmIdentifier type
//!
//! Defined in RFC 5280 Section 4.1.1.2
//!
//! ```asn1
//! AlgorithmIdentifier ::= SEQUENCE {
//!     algorithm   OBJECT IDENTIFIER,
//!     parameters  ANY DEFINED BY algorithm OPTIONAL
//! }
//! ```

use std::fmt;

use certkit::decoder::{DecodableFrom, Decoder};
use certkit::encoder::{EncodableTo, Encoder};
use certkit_asn1::{Element, ObjectIdentifier, to_hex};
use serde::{Serialize, ser::SerializeStruct};

use crate::OidName;
use crate::error::{Error, Result};

/// The parameters field when present.
///
/// An absent field is `None` on [`AlgorithmIdentifier::parameters`]; an
/// explicit `NULL` (RSA) is kept apart so that it re-encodes as `05 00`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlgorithmParameters {
    Null,
    /// Any other element, e.g. a named curve OID or DSA domain parameters
    Elm(Element),
}

impl fmt::Display for AlgorithmParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlgorithmParameters::Null => write!(f, "NULL"),
            AlgorithmParameters::Elm(Element::ObjectIdentifier(oid)) => {
                match curve_name(&oid.to_string()) {
                    Some(name) => write!(f, "{}", name),
                    None => write!(f, "{}", oid),
                }
            }
            AlgorithmParameters::Elm(elm) => match elm.to_der() {
                Ok(der) => write!(f, "{}", to_hex(&der)),
                Err(_) => Err(fmt::Error),
            },
        }
    }
}

impl Serialize for AlgorithmParameters {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

fn curve_name(oid: &str) -> Option<&'static str> {
    match oid {
        "1.2.840.10045.3.1.1" => Some("secp192r1"),
        "1.3.132.0.33" => Some("secp224r1"),
        "1.2.840.10045.3.1.7" => Some("secp256r1"),
        "1.3.132.0.34" => Some("secp384r1"),
        "1.3.132.0.35" => Some("secp521r1"),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlgorithmIdentifier {
    pub algorithm: ObjectIdentifier,
    pub parameters: Option<AlgorithmParameters>,
}

impl AlgorithmIdentifier {
    pub const OID_RSA_ENCRYPTION: &'static str = "1.2.840.113549.1.1.1";
    pub const OID_MD5_WITH_RSA_ENCRYPTION: &'static str = "1.2.840.113549.1.1.4";
    pub const OID_SHA1_WITH_RSA_ENCRYPTION: &'static str = "1.2.840.113549.1.1.5";
    pub const OID_RSASSA_PSS: &'static str = "1.2.840.113549.1.1.10";
    pub const OID_SHA256_WITH_RSA_ENCRYPTION: &'static str = "1.2.840.113549.1.1.11";
    pub const OID_SHA384_WITH_RSA_ENCRYPTION: &'static str = "1.2.840.113549.1.1.12";
    pub const OID_SHA512_WITH_RSA_ENCRYPTION: &'static str = "1.2.840.113549.1.1.13";
    pub const OID_ID_DSA: &'static str = "1.2.840.10040.4.1";
    pub const OID_EC_PUBLIC_KEY: &'static str = "1.2.840.10045.2.1";
    pub const OID_ECDSA_WITH_SHA1: &'static str = "1.2.840.10045.4.1";
    pub const OID_ECDSA_WITH_SHA256: &'static str = "1.2.840.10045.4.3.2";
    pub const OID_ECDSA_WITH_SHA384: &'static str = "1.2.840.10045.4.3.3";
    pub const OID_ECDSA_WITH_SHA512: &'static str = "1.2.840.10045.4.3.4";
    pub const OID_ED25519: &'static str = "1.3.101.112";
    pub const OID_ED448: &'static str = "1.3.101.113";

    /// Create a new AlgorithmIdentifier without parameters
    pub fn new(algorithm: ObjectIdentifier) -> Self {
        Self {
            algorithm,
            parameters: None,
        }
    }

    /// Create a new AlgorithmIdentifier with parameters
    pub fn new_with_params(algorithm: ObjectIdentifier, parameters: AlgorithmParameters) -> Self {
        Self {
            algorithm,
            parameters: Some(parameters),
        }
    }

    /// Get the algorithm OID
    pub fn algorithm(&self) -> &ObjectIdentifier {
        &self.algorithm
    }

    /// Get the parameters
    pub fn parameters(&self) -> Option<&AlgorithmParameters> {
        self.parameters.as_ref()
    }

    /// Short name when known, otherwise the dotted OID.
    pub fn algorithm_label(&self) -> String {
        self.oid_name()
            .map(str::to_string)
            .unwrap_or_else(|| self.algorithm.to_string())
    }
}

impl OidName for AlgorithmIdentifier {
    fn oid_name(&self) -> Option<&'static str> {
        match self.algorithm.to_string().as_str() {
            Self::OID_RSA_ENCRYPTION => Some("rsaEncryption"),
            Self::OID_MD5_WITH_RSA_ENCRYPTION => Some("md5WithRSAEncryption"),
            Self::OID_SHA1_WITH_RSA_ENCRYPTION => Some("sha1WithRSAEncryption"),
            Self::OID_RSASSA_PSS => Some("rsassaPss"),
            Self::OID_SHA256_WITH_RSA_ENCRYPTION => Some("sha256WithRSAEncryption"),
            Self::OID_SHA384_WITH_RSA_ENCRYPTION => Some("sha384WithRSAEncryption"),
            Self::OID_SHA512_WITH_RSA_ENCRYPTION => Some("sha512WithRSAEncryption"),
            Self::OID_ID_DSA => Some("id-dsa"),
            Self::OID_EC_PUBLIC_KEY => Some("ecPublicKey"),
            Self::OID_ECDSA_WITH_SHA1 => Some("ecdsa-with-SHA1"),
            Self::OID_ECDSA_WITH_SHA256 => Some("ecdsa-with-SHA256"),
            Self::OID_ECDSA_WITH_SHA384 => Some("ecdsa-with-SHA384"),
            Self::OID_ECDSA_WITH_SHA512 => Some("ecdsa-with-SHA512"),
            Self::OID_ED25519 => Some("ED25519"),
            Self::OID_ED448 => Some("ED448"),
            _ => None,
        }
    }
}

impl Serialize for AlgorithmIdentifier {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let len = if self.parameters.is_some() { 2 } else { 1 };
        let mut state = serializer.serialize_struct("AlgorithmIdentifier", len)?;
        state.serialize_field("algorithm", &self.algorithm)?;
        if let Some(params) = &self.parameters {
            state.serialize_field("parameters", params)?;
        }
        state.end()
    }
}

impl DecodableFrom<Element> for AlgorithmIdentifier {}

impl Decoder<Element, AlgorithmIdentifier> for Element {
    type Error = Error;

    fn decode(&self) -> Result<AlgorithmIdentifier> {
        let Element::Sequence(elements) = self else {
            return Err(Error::AlgorithmIdentifierExpectedSequence);
        };
        match elements.as_slice() {
            [Element::ObjectIdentifier(oid)] => Ok(AlgorithmIdentifier::new(oid.clone())),
            [Element::ObjectIdentifier(oid), Element::Null] => Ok(
                AlgorithmIdentifier::new_with_params(oid.clone(), AlgorithmParameters::Null),
            ),
            [Element::ObjectIdentifier(oid), params] => Ok(AlgorithmIdentifier::new_with_params(
                oid.clone(),
                AlgorithmParameters::Elm(params.clone()),
            )),
            [_] | [_, _] => Err(Error::AlgorithmIdentifierExpectedOid),
            other => Err(Error::AlgorithmIdentifierInvalidElementCount(other.len())),
        }
    }
}

impl EncodableTo<AlgorithmIdentifier> for Element {}

impl Encoder<AlgorithmIdentifier, Element> for AlgorithmIdentifier {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        let mut elements = vec![Element::ObjectIdentifier(self.algorithm.clone())];
        match &self.parameters {
            Some(AlgorithmParameters::Null) => elements.push(Element::Null),
            Some(AlgorithmParameters::Elm(elm)) => elements.push(elm.clone()),
            None => {}
        }
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
        element,
        expected,
        case(
            Element::Sequence(vec![Element::ObjectIdentifier(oid("1.2.840.113549.1.1.11")), Element::Null]),
            AlgorithmIdentifier::new_with_params(oid("1.2.840.113549.1.1.11"), AlgorithmParameters::Null)
        ),
        case(
            Element::Sequence(vec![Element::ObjectIdentifier(oid("1.2.840.10045.4.3.2"))]),
            AlgorithmIdentifier::new(oid("1.2.840.10045.4.3.2"))
        ),
        case(
            Element::Sequence(vec![
                Element::ObjectIdentifier(oid("1.2.840.10045.2.1")),
                Element::ObjectIdentifier(oid("1.2.840.10045.3.1.7")),
            ]),
            AlgorithmIdentifier::new_with_params(
                oid("1.2.840.10045.2.1"),
                AlgorithmParameters::Elm(Element::ObjectIdentifier(oid("1.2.840.10045.3.1.7")))
            )
        ),
    )]
    fn test_algorithm_identifier_decode(element: Element, expected: AlgorithmIdentifier) {
        let decoded: AlgorithmIdentifier = element.decode().unwrap();
        assert_eq!(expected, decoded);
        assert_eq!(element, decoded.encode().unwrap());
    }

    #[rstest(
        element,
        case(Element::Null),
        case(Element::Sequence(vec![])),
        case(Element::Sequence(vec![Element::Null])),
        case(Element::Sequence(vec![Element::Null, Element::Null, Element::Null])),
    )]
    fn test_algorithm_identifier_invalid(element: Element) {
        let result: Result<AlgorithmIdentifier> = element.decode();
        assert!(result.is_err());
    }

    #[rstest(
        params,
        expected,
        case(AlgorithmParameters::Null, "NULL"),
        case(AlgorithmParameters::Elm(Element::ObjectIdentifier(oid("1.3.132.0.34"))), "secp384r1"),
        case(AlgorithmParameters::Elm(Element::ObjectIdentifier(oid("1.2.3"))), "1.2.3"),
        case(AlgorithmParameters::Elm(Element::Sequence(vec![])), "3000"),
    )]
    fn test_parameters_display(params: AlgorithmParameters, expected: &str) {
        assert_eq!(expected, params.to_string());
    }

    #[test]
    fn test_algorithm_label() {
        let known = AlgorithmIdentifier::new(oid("1.2.840.113549.1.1.5"));
        assert_eq!("sha1WithRSAEncryption", known.algorithm_label());
        let unknown = AlgorithmIdentifier::new(oid("1.2.3.4"));
        assert_eq!("1.2.3.4", unknown.algorithm_label());
    }

    #[test]
    fn test_serialize_omits_absent_parameters() {
        let alg = AlgorithmIdentifier::new(oid("1.3.101.112"));
        let json = serde_json::to_string(&alg).unwrap();
        assert_eq!(r#"{"algorithm":"1.3.101.112"}"#, json);
    }
}
