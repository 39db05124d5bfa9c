//! Name and related types
//!
//! Defined in RFC 5280 Section 4.1.2.4
//!
//! ```asn1
//! Name ::= CHOICE { -- only one possibility for now --
//!     rdnSequence  RDNSequence
//! }
//!
//! RDNSequence ::= SEQUENCE OF RelativeDistinguishedName
//!
//! RelativeDistinguishedName ::= SET OF AttributeTypeAndValue
//!
//! AttributeTypeAndValue ::= SEQUENCE {
//!     type     AttributeType,
//!     value    AttributeValue
//! }
//!
//! AttributeType ::= OBJECT IDENTIFIER
//! AttributeValue ::= ANY -- DEFINED BY AttributeType
//! ```

use std::fmt;

use certkit::decoder::{DecodableFrom, Decoder};
use certkit::encoder::{EncodableTo, Encoder};
use certkit_asn1::{Element, ObjectIdentifier, to_hex};
use serde::{Serialize, ser::SerializeStruct};

use crate::OidName;
use crate::directory_string::DirectoryString;
use crate::error::{Error, Result};

/// X.509 Distinguished Name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Name {
    pub rdn_sequence: Vec<RelativeDistinguishedName>,
}

impl Name {
    /// Create a new Name from RDNs
    pub fn new(rdn_sequence: Vec<RelativeDistinguishedName>) -> Self {
        Self { rdn_sequence }
    }

    /// Get the RDN sequence
    pub fn rdn_sequence(&self) -> &[RelativeDistinguishedName] {
        &self.rdn_sequence
    }

    /// Whether the name has no RDNs
    pub fn is_empty(&self) -> bool {
        self.rdn_sequence.is_empty()
    }

    /// Every attribute in encoded order.
    pub fn attributes(&self) -> impl Iterator<Item = &AttributeTypeAndValue> {
        self.rdn_sequence.iter().flat_map(|rdn| rdn.attributes.iter())
    }

    /// Text values of the attributes of type `oid`, in encoded order.
    pub fn values_of<'a>(&'a self, oid: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.attributes()
            .filter(move |attr| attr.attribute_type == oid)
            .filter_map(AttributeTypeAndValue::value_str)
    }

    /// OpenSSL's one-line form, e.g. `/C=JP/O=JPKI`.
    pub fn to_slash_string(&self) -> String {
        self.rdn_sequence
            .iter()
            .map(|rdn| format!("/{}", rdn.joined("+")))
            .collect()
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let formatted = self
            .rdn_sequence
            .iter()
            .map(|rdn| rdn.joined("+"))
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{}", formatted)
    }
}

impl DecodableFrom<Element> for Name {}

impl Decoder<Element, Name> for Element {
    type Error = Error;

    fn decode(&self) -> Result<Name> {
        match self {
            Element::Sequence(elements) => {
                let rdn_sequence = elements
                    .iter()
                    .map(|elem| elem.decode())
                    .collect::<Result<Vec<RelativeDistinguishedName>>>()?;
                Ok(Name { rdn_sequence })
            }
            _ => Err(Error::NameExpectedSequence),
        }
    }
}

impl EncodableTo<Name> for Element {}

impl Encoder<Name, Element> for Name {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        let rdn_elements = self
            .rdn_sequence
            .iter()
            .map(|rdn| rdn.encode())
            .collect::<Result<Vec<Element>>>()?;
        Ok(Element::Sequence(rdn_elements))
    }
}

/// Relative Distinguished Name (RDN)
///
/// Usually one attribute; multi-valued RDNs hold several. Members of a SET
/// are unordered, so two RDNs compare equal regardless of member order.
#[derive(Debug, Clone, Serialize)]
pub struct RelativeDistinguishedName {
    pub attributes: Vec<AttributeTypeAndValue>,
}

impl RelativeDistinguishedName {
    /// Create a new single-valued RDN
    pub fn new_single(attribute: AttributeTypeAndValue) -> Self {
        Self {
            attributes: vec![attribute],
        }
    }

    /// Create a new RDN
    pub fn new(attributes: Vec<AttributeTypeAndValue>) -> Self {
        Self { attributes }
    }

    fn joined(&self, separator: &str) -> String {
        self.attributes
            .iter()
            .map(|attr| attr.to_string())
            .collect::<Vec<_>>()
            .join(separator)
    }
}

impl PartialEq for RelativeDistinguishedName {
    fn eq(&self, other: &Self) -> bool {
        if self.attributes.len() != other.attributes.len() {
            return false;
        }
        let mut matched = vec![false; other.attributes.len()];
        self.attributes.iter().all(|attr| {
            let found = other
                .attributes
                .iter()
                .enumerate()
                .position(|(i, candidate)| !matched[i] && candidate == attr);
            match found {
                Some(i) => {
                    matched[i] = true;
                    true
                }
                None => false,
            }
        })
    }
}

impl Eq for RelativeDistinguishedName {}

impl DecodableFrom<Element> for RelativeDistinguishedName {}

impl Decoder<Element, RelativeDistinguishedName> for Element {
    type Error = Error;

    fn decode(&self) -> Result<RelativeDistinguishedName> {
        match self {
            Element::Set(elements) if elements.is_empty() => Err(Error::RdnEmpty),
            Element::Set(elements) => {
                let attributes = elements
                    .iter()
                    .map(|elem| elem.decode())
                    .collect::<Result<Vec<AttributeTypeAndValue>>>()?;
                Ok(RelativeDistinguishedName { attributes })
            }
            _ => Err(Error::RdnExpectedSet),
        }
    }
}

impl EncodableTo<RelativeDistinguishedName> for Element {}

impl Encoder<RelativeDistinguishedName, Element> for RelativeDistinguishedName {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        let attr_elements = self
            .attributes
            .iter()
            .map(|attr| attr.encode())
            .collect::<Result<Vec<Element>>>()?;
        Ok(Element::Set(attr_elements))
    }
}

/// An attribute value: a character string, or any other element kept as is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    String(DirectoryString),
    Other(Element),
}

impl AttributeValue {
    /// Get the value as text, `None` for non-string values
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s.as_str()),
            AttributeValue::Other(_) => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::String(s) => write!(f, "{}", s),
            // RFC 4514 hexstring form
            AttributeValue::Other(element) => match element.to_der() {
                Ok(der) => write!(f, "#{}", to_hex(&der)),
                Err(_) => Err(fmt::Error),
            },
        }
    }
}

impl Serialize for AttributeValue {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl From<DirectoryString> for AttributeValue {
    fn from(value: DirectoryString) -> Self {
        AttributeValue::String(value)
    }
}

/// Attribute Type and Value pair, such as CN=example.com
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeTypeAndValue {
    pub attribute_type: ObjectIdentifier,
    pub attribute_value: AttributeValue,
}

impl AttributeTypeAndValue {
    pub const OID_COMMON_NAME: &'static str = "2.5.4.3";
    pub const OID_SURNAME: &'static str = "2.5.4.4";
    pub const OID_SERIAL_NUMBER: &'static str = "2.5.4.5";
    pub const OID_COUNTRY_NAME: &'static str = "2.5.4.6";
    pub const OID_LOCALITY_NAME: &'static str = "2.5.4.7";
    pub const OID_STATE_OR_PROVINCE_NAME: &'static str = "2.5.4.8";
    pub const OID_STREET_ADDRESS: &'static str = "2.5.4.9";
    pub const OID_ORGANIZATION_NAME: &'static str = "2.5.4.10";
    pub const OID_ORGANIZATIONAL_UNIT_NAME: &'static str = "2.5.4.11";
    pub const OID_TITLE: &'static str = "2.5.4.12";
    pub const OID_GIVEN_NAME: &'static str = "2.5.4.42";
    pub const OID_INITIALS: &'static str = "2.5.4.43";
    pub const OID_GENERATION_QUALIFIER: &'static str = "2.5.4.44";
    pub const OID_DN_QUALIFIER: &'static str = "2.5.4.46";
    pub const OID_PSEUDONYM: &'static str = "2.5.4.65";
    pub const OID_USER_ID: &'static str = "0.9.2342.19200300.100.1.1";
    pub const OID_DOMAIN_COMPONENT: &'static str = "0.9.2342.19200300.100.1.25";
    pub const OID_EMAIL_ADDRESS: &'static str = "1.2.840.113549.1.9.1";

    /// Create a new AttributeTypeAndValue
    pub fn new(attribute_type: ObjectIdentifier, attribute_value: impl Into<DirectoryString>) -> Self {
        Self {
            attribute_type,
            attribute_value: AttributeValue::String(attribute_value.into()),
        }
    }

    /// The text of a string-valued attribute.
    pub fn value_str(&self) -> Option<&str> {
        self.attribute_value.as_str()
    }

    /// Short name when known, otherwise the dotted OID.
    pub fn type_label(&self) -> String {
        self.oid_name()
            .map(str::to_string)
            .unwrap_or_else(|| self.attribute_type.to_string())
    }
}

impl OidName for AttributeTypeAndValue {
    fn oid_name(&self) -> Option<&'static str> {
        match self.attribute_type.to_string().as_str() {
            Self::OID_COMMON_NAME => Some("CN"),
            Self::OID_SURNAME => Some("SN"),
            Self::OID_SERIAL_NUMBER => Some("serialNumber"),
            Self::OID_COUNTRY_NAME => Some("C"),
            Self::OID_LOCALITY_NAME => Some("L"),
            Self::OID_STATE_OR_PROVINCE_NAME => Some("ST"),
            Self::OID_STREET_ADDRESS => Some("street"),
            Self::OID_ORGANIZATION_NAME => Some("O"),
            Self::OID_ORGANIZATIONAL_UNIT_NAME => Some("OU"),
            Self::OID_TITLE => Some("title"),
            Self::OID_GIVEN_NAME => Some("GN"),
            Self::OID_INITIALS => Some("initials"),
            Self::OID_GENERATION_QUALIFIER => Some("generationQualifier"),
            Self::OID_DN_QUALIFIER => Some("dnQualifier"),
            Self::OID_PSEUDONYM => Some("pseudonym"),
            Self::OID_USER_ID => Some("UID"),
            Self::OID_DOMAIN_COMPONENT => Some("DC"),
            Self::OID_EMAIL_ADDRESS => Some("emailAddress"),
            _ => None,
        }
    }
}

impl fmt::Display for AttributeTypeAndValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.type_label(), self.attribute_value)
    }
}

impl Serialize for AttributeTypeAndValue {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("AttributeTypeAndValue", 2)?;
        state.serialize_field("attribute_type", &self.type_label())?;
        state.serialize_field("attribute_value", &self.attribute_value)?;
        state.end()
    }
}

impl DecodableFrom<Element> for AttributeTypeAndValue {}

impl Decoder<Element, AttributeTypeAndValue> for Element {
    type Error = Error;

    fn decode(&self) -> Result<AttributeTypeAndValue> {
        let Element::Sequence(seq) = self else {
            return Err(Error::AttributeTypeAndValueExpectedSequence);
        };

        let (attribute_type, value) = match seq.as_slice() {
            [Element::ObjectIdentifier(oid), value] => (oid.clone(), value),
            [_, _] => return Err(Error::AttributeTypeAndValueExpectedOid),
            other => return Err(Error::AttributeTypeAndValueInvalidElementCount(other.len())),
        };

        // Non-string values (rare, e.g. private attributes) are carried through.
        let attribute_value = match DirectoryString::try_from(value) {
            Ok(s) => AttributeValue::String(s),
            Err(_) => AttributeValue::Other(value.clone()),
        };

        Ok(AttributeTypeAndValue {
            attribute_type,
            attribute_value,
        })
    }
}

impl EncodableTo<AttributeTypeAndValue> for Element {}

impl Encoder<AttributeTypeAndValue, Element> for AttributeTypeAndValue {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        let oid_elm = Element::ObjectIdentifier(self.attribute_type.clone());
        let value_elm = match &self.attribute_value {
            AttributeValue::String(s) => s.encode()?,
            AttributeValue::Other(element) => element.clone(),
        };
        Ok(Element::Sequence(vec![oid_elm, value_elm]))
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;
    use crate::directory_string::StringKind;
    use certkit_asn1::Integer;
    use rstest::rstest;

    fn attr(oid: &str, value: &str) -> AttributeTypeAndValue {
        AttributeTypeAndValue::new(ObjectIdentifier::from_str(oid).unwrap(), value)
    }

    fn jpki() -> Name {
        Name::new(vec![
            RelativeDistinguishedName::new_single(attr("2.5.4.6", "JP")),
            RelativeDistinguishedName::new_single(attr("2.5.4.10", "JPKI")),
            RelativeDistinguishedName::new(vec![attr("2.5.4.11", "Unit"), attr("2.5.4.10", "Org")]),
        ])
    }

    #[test]
    fn test_name_display() {
        assert_eq!("C=JP, O=JPKI, OU=Unit+O=Org", jpki().to_string());
        assert_eq!("/C=JP/O=JPKI/OU=Unit+O=Org", jpki().to_slash_string());
    }

    #[test]
    fn test_name_values_of() {
        let name = jpki();
        let orgs = name.values_of("2.5.4.10").collect::<Vec<_>>();
        assert_eq!(vec!["JPKI", "Org"], orgs);
        assert_eq!(None, name.values_of("2.5.4.3").next());
    }

    #[rstest]
    #[case("2.5.4.3", Some("CN"))]
    #[case("2.5.4.6", Some("C"))]
    #[case("1.2.840.113549.1.9.1", Some("emailAddress"))]
    #[case("1.2.3.4", None)]
    fn test_oid_name(#[case] oid_str: &str, #[case] expected: Option<&str>) {
        assert_eq!(expected, attr(oid_str, "value").oid_name());
    }

    #[test]
    fn test_unknown_type_displays_dotted_oid() {
        assert_eq!("1.2.3.4=x", attr("1.2.3.4", "x").to_string());
    }

    #[test]
    fn test_rdn_equality_ignores_member_order() {
        let a = RelativeDistinguishedName::new(vec![attr("2.5.4.11", "Unit"), attr("2.5.4.10", "Org")]);
        let b = RelativeDistinguishedName::new(vec![attr("2.5.4.10", "Org"), attr("2.5.4.11", "Unit")]);
        let c = RelativeDistinguishedName::new(vec![attr("2.5.4.10", "Org"), attr("2.5.4.10", "Org")]);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(c, a);
    }

    #[test]
    fn test_attribute_keeps_string_kind() {
        let element = Element::Sequence(vec![
            Element::ObjectIdentifier(ObjectIdentifier::from_str("2.5.4.10").unwrap()),
            Element::UTF8String("JPKI".to_string()),
        ]);
        let decoded: AttributeTypeAndValue = element.decode().unwrap();
        match &decoded.attribute_value {
            AttributeValue::String(s) => assert_eq!(StringKind::Utf8, s.kind()),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(element, decoded.encode().unwrap());
    }

    #[test]
    fn test_attribute_non_string_value() {
        let element = Element::Sequence(vec![
            Element::ObjectIdentifier(ObjectIdentifier::from_str("1.2.3.4").unwrap()),
            Element::Integer(Integer::from(5)),
        ]);
        let decoded: AttributeTypeAndValue = element.decode().unwrap();
        assert_eq!(None, decoded.value_str());
        assert_eq!("1.2.3.4=#020105", decoded.to_string());
        assert_eq!(element, decoded.encode().unwrap());
    }

    #[rstest(
        element,
        case(Element::Null),
        case(Element::Sequence(vec![Element::Null])),
        case(Element::Sequence(vec![Element::Null, Element::Null])),
    )]
    fn test_attribute_invalid(element: Element) {
        let result: Result<AttributeTypeAndValue> = element.decode();
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_rdn_is_rejected() {
        let result: Result<RelativeDistinguishedName> = Element::Set(vec![]).decode();
        assert!(matches!(result, Err(Error::RdnEmpty)));
    }

    #[test]
    fn test_name_round_trip() {
        let name = jpki();
        let element = name.encode().unwrap();
        let decoded: Name = element.decode().unwrap();
        assert_eq!(name, decoded);
    }
}
