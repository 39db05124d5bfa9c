use std::fmt;
use std::str::FromStr;

use certkit::decoder::{DecodableFrom, Decoder};
use certkit::encoder::{EncodableTo, Encoder};
use certkit_asn1::{ASN1Object, Element, ObjectIdentifier, OctetString, to_hex};
use certkit_pkix_types::OidName;
use serde::Serialize;

use crate::error::Error;

mod authority_key_identifier;
mod basic_constraints;
pub mod error;
mod extended_key_usage;
mod general_name;
mod issuer_alt_name;
mod key_usage;
mod subject_alt_name;
mod subject_key_identifier;

pub use authority_key_identifier::AuthorityKeyIdentifier;
pub use basic_constraints::BasicConstraints;
pub use extended_key_usage::ExtendedKeyUsage;
pub use general_name::{EdiPartyName, GeneralName, OtherName, ip_address_from_octets};
pub use issuer_alt_name::IssuerAltName;
pub use key_usage::KeyUsage;
pub use subject_alt_name::SubjectAltName;
pub use subject_key_identifier::SubjectKeyIdentifier;

/// Trait for typed X.509 extensions.
///
/// Implementors represent a specific extension and convert between the
/// DER carried in `extnValue` and a typed value.
pub trait Extension: Sized {
    /// The OID of this extension type as a string (e.g., "2.5.29.19" for BasicConstraints)
    const OID: &'static str;

    fn oid() -> Result<ObjectIdentifier, Error> {
        ObjectIdentifier::from_str(Self::OID).map_err(Error::InvalidASN1)
    }

    /// Parses the extension from the content of its `extnValue` OCTET STRING.
    ///
    /// # Errors
    /// Returns an error if the value is not valid DER or does not follow the
    /// extension's schema.
    fn parse(value: &OctetString) -> Result<Self, Error>;

    /// Produces the DER for `extnValue`.
    fn to_value(&self) -> Result<OctetString, Error>;

    /// Picks this extension's typed value out of an [`ExtensionValue`].
    fn from_value(value: &ExtensionValue) -> Option<&Self>;
}

/// Decodes the single DER element held by an `extnValue`.
pub(crate) fn parse_single(value: &OctetString) -> Result<Element, error::Error> {
    ASN1Object::try_from(value)
        .and_then(ASN1Object::into_single)
        .map_err(error::Error::InvalidAsn1)
}

pub(crate) fn parse_value<T>(value: &OctetString) -> Result<T, Error>
where
    T: DecodableFrom<Element>,
    Element: Decoder<Element, T, Error = Error>,
{
    parse_single(value)?.decode()
}

pub(crate) fn encode_value<T>(value: &T) -> Result<OctetString, Error>
where
    Element: EncodableTo<T>,
    T: Encoder<T, Element, Error = Error>,
{
    let element = value.encode()?;
    Ok(OctetString::from(element.to_der()?))
}

/// Typed payload of an extension, keyed by `extnID`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtensionValue {
    KeyUsage(KeyUsage),
    SubjectAltName(SubjectAltName),
    IssuerAltName(IssuerAltName),
    SubjectKeyIdentifier(SubjectKeyIdentifier),
    AuthorityKeyIdentifier(AuthorityKeyIdentifier),
    BasicConstraints(BasicConstraints),
    ExtendedKeyUsage(ExtendedKeyUsage),
    /// Unrecognized `extnID`; the raw `extnValue` is kept as is.
    Unknown(OctetString),
}

impl ExtensionValue {
    pub fn parse(oid: &ObjectIdentifier, value: &OctetString) -> Result<Self, Error> {
        let parsed = match oid.to_string().as_str() {
            KeyUsage::OID => ExtensionValue::KeyUsage(KeyUsage::parse(value)?),
            SubjectAltName::OID => ExtensionValue::SubjectAltName(SubjectAltName::parse(value)?),
            IssuerAltName::OID => ExtensionValue::IssuerAltName(IssuerAltName::parse(value)?),
            SubjectKeyIdentifier::OID => {
                ExtensionValue::SubjectKeyIdentifier(SubjectKeyIdentifier::parse(value)?)
            }
            AuthorityKeyIdentifier::OID => {
                ExtensionValue::AuthorityKeyIdentifier(AuthorityKeyIdentifier::parse(value)?)
            }
            BasicConstraints::OID => {
                ExtensionValue::BasicConstraints(BasicConstraints::parse(value)?)
            }
            ExtendedKeyUsage::OID => {
                ExtensionValue::ExtendedKeyUsage(ExtendedKeyUsage::parse(value)?)
            }
            _ => ExtensionValue::Unknown(value.clone()),
        };
        Ok(parsed)
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, ExtensionValue::Unknown(_))
    }

    /// DER for `extnValue`, regenerated from the typed value.
    pub fn to_octet_string(&self) -> Result<OctetString, Error> {
        match self {
            ExtensionValue::KeyUsage(v) => v.to_value(),
            ExtensionValue::SubjectAltName(v) => v.to_value(),
            ExtensionValue::IssuerAltName(v) => v.to_value(),
            ExtensionValue::SubjectKeyIdentifier(v) => v.to_value(),
            ExtensionValue::AuthorityKeyIdentifier(v) => v.to_value(),
            ExtensionValue::BasicConstraints(v) => v.to_value(),
            ExtensionValue::ExtendedKeyUsage(v) => v.to_value(),
            ExtensionValue::Unknown(raw) => Ok(raw.clone()),
        }
    }
}

impl fmt::Display for ExtensionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtensionValue::KeyUsage(v) => write!(f, "{v}"),
            ExtensionValue::SubjectAltName(v) => write!(f, "{v}"),
            ExtensionValue::IssuerAltName(v) => write!(f, "{v}"),
            ExtensionValue::SubjectKeyIdentifier(v) => write!(f, "{v}"),
            ExtensionValue::AuthorityKeyIdentifier(v) => write!(f, "{v}"),
            ExtensionValue::BasicConstraints(v) => write!(f, "{v}"),
            ExtensionValue::ExtendedKeyUsage(v) => write!(f, "{v}"),
            ExtensionValue::Unknown(raw) => write!(f, "{}", to_hex(raw.as_bytes())),
        }
    }
}

/*
RFC 5280 Section 4.1.2.9

Extension  ::=  SEQUENCE  {
    extnID      OBJECT IDENTIFIER,
    critical    BOOLEAN DEFAULT FALSE,
    extnValue   OCTET STRING
}
*/

/// One extension of a certificate with its payload decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CertificateExtension {
    oid: ObjectIdentifier,
    critical: bool,
    value: ExtensionValue,
}

impl CertificateExtension {
    pub fn new(oid: ObjectIdentifier, critical: bool, value: ExtensionValue) -> Self {
        Self {
            oid,
            critical,
            value,
        }
    }

    pub fn oid(&self) -> &ObjectIdentifier {
        &self.oid
    }

    pub fn is_critical(&self) -> bool {
        self.critical
    }

    pub fn value(&self) -> &ExtensionValue {
        &self.value
    }
}

impl OidName for CertificateExtension {
    fn oid_name(&self) -> Option<&'static str> {
        match self.oid.to_string().as_str() {
            SubjectKeyIdentifier::OID => Some("subjectKeyIdentifier"),
            KeyUsage::OID => Some("keyUsage"),
            SubjectAltName::OID => Some("subjectAltName"),
            IssuerAltName::OID => Some("issuerAltName"),
            BasicConstraints::OID => Some("basicConstraints"),
            AuthorityKeyIdentifier::OID => Some("authorityKeyIdentifier"),
            ExtendedKeyUsage::OID => Some("extendedKeyUsage"),
            // kept raw, named for display only
            "2.5.29.30" => Some("nameConstraints"),
            "2.5.29.31" => Some("cRLDistributionPoints"),
            "2.5.29.32" => Some("certificatePolicies"),
            "2.5.29.33" => Some("policyMappings"),
            "2.5.29.36" => Some("policyConstraints"),
            "2.5.29.46" => Some("freshestCRL"),
            "2.5.29.54" => Some("inhibitAnyPolicy"),
            "1.3.6.1.5.5.7.1.1" => Some("authorityInfoAccess"),
            "1.3.6.1.5.5.7.1.11" => Some("subjectInfoAccess"),
            _ => None,
        }
    }
}

impl DecodableFrom<Element> for CertificateExtension {}

impl Decoder<Element, CertificateExtension> for Element {
    type Error = Error;

    fn decode(&self) -> Result<CertificateExtension, Self::Error> {
        let raw: certkit_pkix_types::Extension = self.decode()?;
        let value = ExtensionValue::parse(raw.oid(), raw.value())?;
        if raw.is_critical() && !value.is_known() {
            tracing::warn!(oid = %raw.oid(), "critical extension is not recognized, keeping raw value");
        }
        Ok(CertificateExtension::new(
            raw.oid().clone(),
            raw.is_critical(),
            value,
        ))
    }
}

impl EncodableTo<CertificateExtension> for Element {}

impl Encoder<CertificateExtension, Element> for CertificateExtension {
    type Error = Error;

    fn encode(&self) -> Result<Element, Self::Error> {
        let raw = certkit_pkix_types::Extension::new(
            self.oid.clone(),
            self.critical,
            self.value.to_octet_string()?,
        );
        Ok(raw.encode()?)
    }
}

/// `[3] EXPLICIT Extensions` of a TBSCertificate.
///
/// ```text
/// Extensions ::= SEQUENCE SIZE (1..MAX) OF Extension
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Extensions {
    extensions: Vec<CertificateExtension>,
}

impl Extensions {
    pub fn new(extensions: Vec<CertificateExtension>) -> Self {
        Self { extensions }
    }

    pub fn extensions(&self) -> &[CertificateExtension] {
        &self.extensions
    }

    pub fn iter(&self) -> impl Iterator<Item = &CertificateExtension> {
        self.extensions.iter()
    }

    /// Finds an extension by dotted OID.
    pub fn get(&self, oid: &str) -> Option<&CertificateExtension> {
        self.extensions.iter().find(|ext| ext.oid() == &oid)
    }

    /// Typed access to a known extension.
    pub fn extension<T: Extension>(&self) -> Option<&T> {
        self.get(T::OID).and_then(|ext| T::from_value(ext.value()))
    }

    pub fn is_critical<T: Extension>(&self) -> bool {
        self.get(T::OID).is_some_and(CertificateExtension::is_critical)
    }
}

impl DecodableFrom<Element> for Extensions {}

impl Decoder<Element, Extensions> for Element {
    type Error = Error;

    fn decode(&self) -> Result<Extensions, Self::Error> {
        let Some(Element::Sequence(elements)) = self.as_explicit(3) else {
            return Err(Error::ExtensionsExpectedSequence);
        };
        if elements.is_empty() {
            return Err(Error::ExtensionsEmpty);
        }

        let mut extensions: Vec<CertificateExtension> = Vec::with_capacity(elements.len());
        for element in elements {
            let extension: CertificateExtension = element.decode()?;
            if extensions.iter().any(|ext| ext.oid() == extension.oid()) {
                return Err(Error::DuplicateExtension(extension.oid().to_string()));
            }
            extensions.push(extension);
        }
        Ok(Extensions { extensions })
    }
}

impl EncodableTo<Extensions> for Element {}

impl Encoder<Extensions, Element> for Extensions {
    type Error = Error;

    fn encode(&self) -> Result<Element, Self::Error> {
        if self.extensions.is_empty() {
            return Err(Error::ExtensionsEmpty);
        }
        let elements = self
            .extensions
            .iter()
            .map(|ext| ext.encode())
            .collect::<Result<Vec<Element>, Error>>()?;
        Ok(Element::explicit(3, Element::Sequence(elements)))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::error::ErrorKind;

    fn oid(s: &str) -> ObjectIdentifier {
        ObjectIdentifier::from_str(s).unwrap()
    }

    fn raw_extension(id: &str, critical: Option<bool>, value: &[u8]) -> Element {
        let mut elements = vec![Element::ObjectIdentifier(oid(id))];
        if let Some(critical) = critical {
            elements.push(Element::Boolean(critical));
        }
        elements.push(Element::OctetString(OctetString::from(value)));
        Element::Sequence(elements)
    }

    #[test]
    fn test_known_extension_is_typed() {
        // keyUsage: digitalSignature, keyCertSign
        let element = raw_extension(KeyUsage::OID, Some(true), &[0x03, 0x02, 0x02, 0x84]);
        let ext: CertificateExtension = element.decode().unwrap();
        assert!(ext.is_critical());
        assert_eq!(Some("keyUsage"), ext.oid_name());
        let ExtensionValue::KeyUsage(ku) = ext.value() else {
            panic!("expected KeyUsage, got {:?}", ext.value());
        };
        assert!(ku.digital_signature);
        assert!(ku.key_cert_sign);
        assert!(!ku.crl_sign);
    }

    #[test]
    fn test_unknown_extension_is_kept_raw() {
        let raw = [0x30, 0x03, 0x02, 0x01, 0x05];
        let element = raw_extension("1.2.3.4.5", None, &raw);
        let ext: CertificateExtension = element.decode().unwrap();
        assert!(!ext.is_critical());
        assert_eq!(None, ext.oid_name());
        assert_eq!(&ExtensionValue::Unknown(OctetString::from(&raw[..])), ext.value());

        let encoded: Element = ext.encode().unwrap();
        assert_eq!(element, encoded);
    }

    #[test]
    fn test_explicit_false_is_dropped_on_encode() {
        let element = raw_extension(SubjectKeyIdentifier::OID, Some(false), &[0x04, 0x01, 0xaa]);
        let ext: CertificateExtension = element.decode().unwrap();
        let encoded: Element = ext.encode().unwrap();
        assert_eq!(
            raw_extension(SubjectKeyIdentifier::OID, None, &[0x04, 0x01, 0xaa]),
            encoded
        );
    }

    #[rstest(value,
        // not DER at all
        case(vec![0x03]),
        // wrong type for keyUsage
        case(vec![0x04, 0x01, 0x00]),
        // trailing element
        case(vec![0x03, 0x02, 0x07, 0x80, 0x05, 0x00]),
    )]
    fn test_malformed_known_extension(value: Vec<u8>) {
        let element = raw_extension(KeyUsage::OID, None, &value);
        let result: Result<CertificateExtension, Error> = element.decode();
        let err = result.unwrap_err();
        assert_eq!(ErrorKind::SchemaViolation, err.kind());
    }

    #[test]
    fn test_extensions_lookup() {
        let element = Element::explicit(
            3,
            Element::Sequence(vec![
                raw_extension(BasicConstraints::OID, Some(true), &[0x30, 0x03, 0x01, 0x01, 0xff]),
                raw_extension(SubjectKeyIdentifier::OID, None, &[0x04, 0x02, 0x01, 0x02]),
            ]),
        );
        let extensions: Extensions = element.decode().unwrap();
        assert_eq!(2, extensions.extensions().len());

        let bc = extensions.extension::<BasicConstraints>().unwrap();
        assert!(bc.ca);
        assert!(extensions.is_critical::<BasicConstraints>());
        assert!(!extensions.is_critical::<SubjectKeyIdentifier>());
        assert!(extensions.extension::<KeyUsage>().is_none());
        assert!(extensions.get(SubjectKeyIdentifier::OID).is_some());

        let encoded: Element = extensions.encode().unwrap();
        assert_eq!(element, encoded);
    }

    #[rstest(element, expected,
        case(Element::explicit(3, Element::Sequence(vec![])), "at least one extension"),
        case(Element::explicit(2, Element::Sequence(vec![])), "expected [3] EXPLICIT"),
        case(Element::Sequence(vec![]), "expected [3] EXPLICIT"),
        case(Element::explicit(3, Element::Sequence(vec![
            raw_extension(SubjectKeyIdentifier::OID, None, &[0x04, 0x01, 0x01]),
            raw_extension(SubjectKeyIdentifier::OID, None, &[0x04, 0x01, 0x02]),
        ])), "appears more than once"),
    )]
    fn test_extensions_decode_failure(element: Element, expected: &str) {
        let result: Result<Extensions, Error> = element.decode();
        let err = result.unwrap_err().to_string();
        assert!(err.contains(expected), "{err}");
    }
}
