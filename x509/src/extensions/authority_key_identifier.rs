use std::fmt;

use certkit::decoder::{DecodableFrom, Decoder};
use certkit::encoder::{EncodableTo, Encoder};
use certkit_asn1::{ContextContent, Element, OctetString};
use certkit_pkix_types::{CertificateSerialNumber, OidName};
use serde::{Serialize, Serializer};

use super::error;
use super::general_name::GeneralName;
use super::subject_key_identifier::format_key_id;
use super::{Extension, ExtensionValue};
use crate::error::Error;

/*
RFC 5280 Section 4.2.1.1
AuthorityKeyIdentifier ::= SEQUENCE {
    keyIdentifier             [0] KeyIdentifier           OPTIONAL,
    authorityCertIssuer       [1] GeneralNames            OPTIONAL,
    authorityCertSerialNumber [2] CertificateSerialNumber OPTIONAL
}

KeyIdentifier ::= OCTET STRING
CertificateSerialNumber ::= INTEGER
*/

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorityKeyIdentifier {
    /// KeyIdentifier: typically a SHA-1 hash of the CA's public key
    pub key_identifier: Option<OctetString>,
    /// GeneralNames: issuer name(s) of the CA certificate
    pub authority_cert_issuer: Option<Vec<GeneralName>>,
    /// CertificateSerialNumber: serial number of the CA certificate
    pub authority_cert_serial_number: Option<CertificateSerialNumber>,
}

impl Serialize for AuthorityKeyIdentifier {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("AuthorityKeyIdentifier", 3)?;
        match &self.key_identifier {
            Some(key_id) => {
                state.serialize_field("key_identifier", &format_key_id(key_id.as_bytes()))?
            }
            None => state.skip_field("key_identifier")?,
        }
        match &self.authority_cert_issuer {
            Some(issuer) => state.serialize_field("authority_cert_issuer", issuer)?,
            None => state.skip_field("authority_cert_issuer")?,
        }
        match &self.authority_cert_serial_number {
            Some(serial) => state.serialize_field("authority_cert_serial_number", serial)?,
            None => state.skip_field("authority_cert_serial_number")?,
        }
        state.end()
    }
}

impl Extension for AuthorityKeyIdentifier {
    /// OID for AuthorityKeyIdentifier extension (2.5.29.35)
    const OID: &'static str = "2.5.29.35";

    fn parse(value: &OctetString) -> Result<Self, Error> {
        super::parse_value(value)
    }

    fn to_value(&self) -> Result<OctetString, Error> {
        super::encode_value(self)
    }

    fn from_value(value: &ExtensionValue) -> Option<&Self> {
        match value {
            ExtensionValue::AuthorityKeyIdentifier(aki) => Some(aki),
            _ => None,
        }
    }
}

impl DecodableFrom<Element> for AuthorityKeyIdentifier {}

impl Decoder<Element, AuthorityKeyIdentifier> for Element {
    type Error = Error;

    fn decode(&self) -> Result<AuthorityKeyIdentifier, Self::Error> {
        let Element::Sequence(elements) = self else {
            return Err(error::Error::ExpectedSequence(error::Kind::AuthorityKeyIdentifier).into());
        };

        let mut aki = AuthorityKeyIdentifier::default();
        let mut last_slot = None;
        for elem in elements {
            let Element::ContextSpecific { slot, content } = elem else {
                return Err(
                    error::Error::UnexpectedElementType(error::Kind::AuthorityKeyIdentifier).into(),
                );
            };
            // fields are ordered and appear at most once
            if last_slot.is_some_and(|last| *slot <= last) {
                return Err(
                    error::Error::UnexpectedElementType(error::Kind::AuthorityKeyIdentifier).into(),
                );
            }
            last_slot = Some(*slot);

            match (slot, content) {
                // [0] IMPLICIT KeyIdentifier (OCTET STRING)
                (0, ContextContent::Primitive(data)) => {
                    aki.key_identifier = Some(OctetString::from(data.clone()));
                }
                // [1] IMPLICIT GeneralNames (SEQUENCE OF GeneralName)
                (1, ContextContent::Constructed(names)) => {
                    if names.is_empty() {
                        return Err(error::Error::AtLeastOneGeneralNameRequired(
                            error::Kind::AuthorityKeyIdentifier,
                        )
                        .into());
                    }
                    let names = names
                        .iter()
                        .map(|name| name.decode())
                        .collect::<Result<Vec<GeneralName>, _>>()?;
                    aki.authority_cert_issuer = Some(names);
                }
                (1, ContextContent::Primitive(_)) => {
                    return Err(error::Error::AkiAuthorityCertIssuerNotSequence.into());
                }
                // [2] IMPLICIT CertificateSerialNumber (INTEGER)
                (2, ContextContent::Primitive(data)) => {
                    let serial = CertificateSerialNumber::from_bytes(data)
                        .map_err(|_| error::Error::AkiSerialNumberInvalid)?;
                    aki.authority_cert_serial_number = Some(serial);
                }
                (2, ContextContent::Constructed(_)) => {
                    return Err(error::Error::AkiSerialNumberInvalid.into());
                }
                (slot, _) => {
                    return Err(error::Error::ExpectedContextTag {
                        kind: error::Kind::AuthorityKeyIdentifier,
                        expected: (*slot).min(2),
                    }
                    .into());
                }
            }
        }

        Ok(aki)
    }
}

impl EncodableTo<AuthorityKeyIdentifier> for Element {}

impl Encoder<AuthorityKeyIdentifier, Element> for AuthorityKeyIdentifier {
    type Error = Error;

    fn encode(&self) -> Result<Element, Self::Error> {
        let key_identifier = self
            .key_identifier
            .as_ref()
            .map(|key_id| Element::implicit_primitive(0, key_id.as_bytes().to_vec()));
        let issuer = self
            .authority_cert_issuer
            .as_ref()
            .map(|names| {
                names
                    .iter()
                    .map(|name| name.encode())
                    .collect::<Result<Vec<_>, _>>()
                    .map(|names| Element::implicit_constructed(1, names))
            })
            .transpose()?;
        let serial = self
            .authority_cert_serial_number
            .as_ref()
            .map(|serial| Element::implicit_primitive(2, serial.to_bytes()));

        let elements = key_identifier.into_iter().chain(issuer).chain(serial).collect();
        Ok(Element::Sequence(elements))
    }
}

impl OidName for AuthorityKeyIdentifier {
    fn oid_name(&self) -> Option<&'static str> {
        Some("authorityKeyIdentifier")
    }
}

impl fmt::Display for AuthorityKeyIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(key_id) = &self.key_identifier {
            parts.push(format!("keyid:{}", format_key_id(key_id.as_bytes())));
        }
        if let Some(issuer) = &self.authority_cert_issuer {
            parts.extend(issuer.iter().map(ToString::to_string));
        }
        if let Some(serial) = &self.authority_cert_serial_number {
            parts.push(format!("serial:{}", serial));
        }
        write!(f, "{}", parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn test_authority_key_identifier_key_id_only() {
        let der = vec![0x30, 0x06, 0x80, 0x04, 0x63, 0x16, 0xa7, 0x76];
        let aki = AuthorityKeyIdentifier::parse(&OctetString::from(der.clone())).unwrap();

        assert_eq!(
            Some(&[0x63, 0x16, 0xa7, 0x76][..]),
            aki.key_identifier.as_ref().map(OctetString::as_bytes)
        );
        assert!(aki.authority_cert_issuer.is_none());
        assert!(aki.authority_cert_serial_number.is_none());
        assert_eq!("keyid:63:16:A7:76", aki.to_string());
        assert_eq!(
            "{\"key_identifier\":\"63:16:A7:76\"}",
            serde_json::to_string(&aki).unwrap()
        );
        assert_eq!(der, aki.to_value().unwrap().as_bytes());
    }

    #[test]
    fn test_authority_key_identifier_all_fields() {
        // keyid 01, issuer DNS:ca, serial 0x0080
        let der = vec![
            0x30, 0x0d, 0x80, 0x01, 0x01, 0xa1, 0x04, 0x82, 0x02, b'c', b'a', 0x82, 0x02, 0x00,
            0x80,
        ];
        let aki = AuthorityKeyIdentifier::parse(&OctetString::from(der.clone())).unwrap();

        assert_eq!(
            Some(vec![GeneralName::DnsName("ca".to_string())]),
            aki.authority_cert_issuer
        );
        assert_eq!(
            Some("00:80".to_string()),
            aki.authority_cert_serial_number.as_ref().map(|s| s.format_hex())
        );
        assert_eq!("keyid:01, DNS:ca, serial:00:80", aki.to_string());
        assert_eq!(der, aki.to_value().unwrap().as_bytes());
    }

    #[rstest(
        input,
        expected_error_msg,
        case(Element::Null, "expected SEQUENCE"),
        case(Element::Sequence(vec![Element::Null]), "unexpected element type"),
        case(
            Element::Sequence(vec![Element::implicit_primitive(1, vec![0x01])]),
            "must be [1] IMPLICIT GeneralNames"
        ),
        case(
            Element::Sequence(vec![Element::implicit_constructed(1, vec![])]),
            "at least one GeneralName"
        ),
        case(
            Element::Sequence(vec![Element::implicit_primitive(3, vec![0x01])]),
            "context-specific tag [2]"
        ),
        case(
            Element::Sequence(vec![
                Element::implicit_primitive(2, vec![0x01]),
                Element::implicit_primitive(0, vec![0x01]),
            ]),
            "unexpected element type"
        ),
    )]
    fn test_authority_key_identifier_decode_failure(input: Element, expected_error_msg: &str) {
        let result: Result<AuthorityKeyIdentifier, Error> = input.decode();
        let err = result.unwrap_err().to_string();
        assert!(err.contains(expected_error_msg), "{err}");
    }
}
