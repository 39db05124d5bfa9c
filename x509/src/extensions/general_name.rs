use std::fmt;
use std::net::IpAddr;

use certkit::decoder::{DecodableFrom, Decoder};
use certkit::encoder::{EncodableTo, Encoder};
use certkit_asn1::{ContextContent, Element, ObjectIdentifier, to_hex};
use certkit_der::Value;
use certkit_pkix_types::{DirectoryString, Name, OidName};
use serde::{Serialize, Serializer};

use super::error;
use crate::error::Error;

/// Address held by `iPAddress` octets.
///
/// Only 4 (IPv4) and 16 (IPv6) octets name an address. The 8 and 32 octet
/// address-plus-mask forms belong to name constraints and are rejected here.
pub fn ip_address_from_octets(bytes: &[u8]) -> Option<IpAddr> {
    match bytes.len() {
        4 => {
            let octets: [u8; 4] = bytes.try_into().ok()?;
            Some(IpAddr::from(octets))
        }
        16 => {
            let octets: [u8; 16] = bytes.try_into().ok()?;
            Some(IpAddr::from(octets))
        }
        _ => None,
    }
}

/*
RFC 5280 Section 4.2.1.6
GeneralName ::= CHOICE {
    otherName                 [0] OtherName,
    rfc822Name                [1] IA5String,
    dNSName                   [2] IA5String,
    x400Address               [3] ORAddress,
    directoryName             [4] Name,
    ediPartyName              [5] EDIPartyName,
    uniformResourceIdentifier [6] IA5String,
    iPAddress                 [7] OCTET STRING,
    registeredID              [8] OBJECT IDENTIFIER
}

OtherName ::= SEQUENCE {
    type-id    OBJECT IDENTIFIER,
    value      [0] EXPLICIT ANY DEFINED BY type-id
}

EDIPartyName ::= SEQUENCE {
    nameAssigner [0] DirectoryString OPTIONAL,
    partyName    [1] DirectoryString
}

Name and DirectoryString are CHOICE types, so their tags are always EXPLICIT.
*/

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneralName {
    OtherName(OtherName),
    Rfc822Name(String),
    DnsName(String),
    /// ORAddress is rarely used and kept undecoded
    X400Address(Vec<Element>),
    DirectoryName(Name),
    EdiPartyName(EdiPartyName),
    Uri(String),
    /// Raw `iPAddress` octets; see [`GeneralName::ip_address`]
    IpAddress(Vec<u8>),
    RegisteredId(ObjectIdentifier),
}

impl GeneralName {
    /// The CHOICE arm name.
    pub fn type_name(&self) -> &'static str {
        match self {
            GeneralName::OtherName(_) => "otherName",
            GeneralName::Rfc822Name(_) => "rfc822Name",
            GeneralName::DnsName(_) => "dNSName",
            GeneralName::X400Address(_) => "x400Address",
            GeneralName::DirectoryName(_) => "directoryName",
            GeneralName::EdiPartyName(_) => "ediPartyName",
            GeneralName::Uri(_) => "uniformResourceIdentifier",
            GeneralName::IpAddress(_) => "iPAddress",
            GeneralName::RegisteredId(_) => "registeredID",
        }
    }

    /// The address of an `iPAddress` entry, if its length is meaningful.
    pub fn ip_address(&self) -> Option<IpAddr> {
        match self {
            GeneralName::IpAddress(bytes) => ip_address_from_octets(bytes),
            _ => None,
        }
    }

    fn parse_context(slot: u8, content: &ContextContent) -> Result<GeneralName, Error> {
        let name = match (slot, content) {
            (0, ContextContent::Constructed(elements)) => {
                GeneralName::OtherName(OtherName::from_elements(elements)?)
            }
            (1, ContextContent::Primitive(data)) => GeneralName::Rfc822Name(parse_ia5(data)?),
            (2, ContextContent::Primitive(data)) => GeneralName::DnsName(parse_ia5(data)?),
            (3, ContextContent::Constructed(elements)) => GeneralName::X400Address(elements.clone()),
            (4, ContextContent::Constructed(elements)) => match elements.as_slice() {
                [name @ Element::Sequence(_)] => GeneralName::DirectoryName(name.decode()?),
                _ => {
                    return Err(error::Error::ExpectedSequence(error::Kind::GeneralName).into());
                }
            },
            (5, ContextContent::Constructed(elements)) => {
                GeneralName::EdiPartyName(EdiPartyName::from_elements(elements)?)
            }
            (6, ContextContent::Primitive(data)) => GeneralName::Uri(parse_ia5(data)?),
            (7, ContextContent::Primitive(data)) => GeneralName::IpAddress(data.clone()),
            (8, ContextContent::Primitive(data)) => {
                GeneralName::RegisteredId(ObjectIdentifier::try_from(data.as_slice())?)
            }
            (0..=8, _) => {
                return Err(error::Error::UnexpectedElementType(error::Kind::GeneralName).into());
            }
            (slot, _) => return Err(error::Error::UnknownGeneralNameTag(slot).into()),
        };
        Ok(name)
    }
}

/// IMPLICIT IA5String content
fn parse_ia5(data: &[u8]) -> Result<String, error::Error> {
    match std::str::from_utf8(data) {
        Ok(s) if s.is_ascii() => Ok(s.to_string()),
        _ => Err(error::Error::GeneralNameInvalidAscii),
    }
}

impl fmt::Display for GeneralName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeneralName::OtherName(other) => write!(f, "OtherName:{}", other),
            GeneralName::Rfc822Name(email) => write!(f, "email:{}", email),
            GeneralName::DnsName(dns) => write!(f, "DNS:{}", dns),
            GeneralName::X400Address(elements) => {
                let der = elements
                    .iter()
                    .filter_map(|elem| elem.to_der().ok())
                    .collect::<Vec<_>>()
                    .concat();
                write!(f, "X400Address:{}", to_hex(&der))
            }
            GeneralName::DirectoryName(name) => write!(f, "DirName:{}", name.to_slash_string()),
            GeneralName::EdiPartyName(edi) => write!(f, "EdiPartyName:{}", edi),
            GeneralName::Uri(uri) => write!(f, "URI:{}", uri),
            GeneralName::IpAddress(_) => match self.ip_address() {
                Some(ip) => write!(f, "IP Address:{}", ip),
                None => write!(f, "IP Address:<unknown>"),
            },
            GeneralName::RegisteredId(oid) => write!(f, "RID:{}", oid),
        }
    }
}

impl Serialize for GeneralName {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl DecodableFrom<Element> for GeneralName {}

impl Decoder<Element, GeneralName> for Element {
    type Error = Error;

    fn decode(&self) -> Result<GeneralName, Self::Error> {
        match self {
            Element::ContextSpecific { slot, content } => GeneralName::parse_context(*slot, content),
            _ => Err(error::Error::UnexpectedElementType(error::Kind::GeneralName).into()),
        }
    }
}

impl EncodableTo<GeneralName> for Element {}

impl Encoder<GeneralName, Element> for GeneralName {
    type Error = Error;

    fn encode(&self) -> Result<Element, Self::Error> {
        let element = match self {
            GeneralName::OtherName(other) => Element::implicit_constructed(
                0,
                vec![
                    Element::ObjectIdentifier(other.type_id.clone()),
                    Element::explicit(0, other.value.clone()),
                ],
            ),
            GeneralName::Rfc822Name(s) => Element::implicit_primitive(1, s.as_bytes().to_vec()),
            GeneralName::DnsName(s) => Element::implicit_primitive(2, s.as_bytes().to_vec()),
            GeneralName::X400Address(elements) => Element::implicit_constructed(3, elements.clone()),
            GeneralName::DirectoryName(name) => Element::explicit(4, name.encode()?),
            GeneralName::EdiPartyName(edi) => {
                let elements = edi
                    .name_assigner
                    .iter()
                    .map(|assigner| Element::explicit(0, Element::from(assigner)))
                    .chain(std::iter::once(Element::explicit(
                        1,
                        Element::from(&edi.party_name),
                    )))
                    .collect();
                Element::implicit_constructed(5, elements)
            }
            GeneralName::Uri(s) => Element::implicit_primitive(6, s.as_bytes().to_vec()),
            GeneralName::IpAddress(bytes) => Element::implicit_primitive(7, bytes.clone()),
            GeneralName::RegisteredId(oid) => Element::implicit_primitive(8, Vec::try_from(oid)?),
        };
        Ok(element)
    }
}

/// OtherName structure for [0] IMPLICIT OtherName
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtherName {
    /// type-id: OBJECT IDENTIFIER identifying the type
    pub type_id: ObjectIdentifier,
    /// The element inside `[0] EXPLICIT`, interpreted according to type-id
    pub value: Element,
}

impl OtherName {
    /// Microsoft user principal name, a UTF8String.
    pub const OID_MS_UPN: &'static str = "1.3.6.1.4.1.311.20.2.3";
    /// Kerberos principal name from RFC 4556, a KRB5PrincipalName.
    pub const OID_PKINIT_SAN: &'static str = "1.3.6.1.5.2.2";

    fn from_elements(elements: &[Element]) -> Result<Self, error::Error> {
        let [type_id, value] = elements else {
            return Err(error::Error::OtherNameInvalidElementCount(elements.len()));
        };
        let Element::ObjectIdentifier(type_id) = type_id else {
            return Err(error::Error::OtherNameExpectedOid);
        };
        let value = value
            .as_explicit(0)
            .ok_or(error::Error::OtherNameExpectedExplicitTag)?;
        Ok(OtherName {
            type_id: type_id.clone(),
            value: value.clone(),
        })
    }

    pub fn is_principal_name(&self) -> bool {
        self.type_id == Self::OID_MS_UPN || self.type_id == Self::OID_PKINIT_SAN
    }

    /// Text form of the value.
    ///
    /// Character strings are returned as is and a KRB5PrincipalName becomes
    /// `name/instance@REALM`. Anything else is shown as DER hex.
    pub fn value_text(&self) -> String {
        if let Some(s) = self.value.as_str() {
            return s.to_string();
        }
        if let Some(principal) = krb5_principal_name(&self.value) {
            return principal;
        }
        self.value
            .to_der()
            .map(|der| to_hex(&der))
            .unwrap_or_default()
    }
}

/*
RFC 4556 Section 3.2.2
KRB5PrincipalName ::= SEQUENCE {
    realm                   [0] Realm,
    principalName           [1] PrincipalName
}
PrincipalName ::= SEQUENCE {
    name-type               [0] Int32,
    name-string             [1] SEQUENCE OF KerberosString
}
Realm and KerberosString are GeneralString.
*/
fn krb5_principal_name(element: &Element) -> Option<String> {
    let Element::Sequence(fields) = element else {
        return None;
    };
    let [realm, principal] = fields.as_slice() else {
        return None;
    };
    let realm = kerberos_string(realm.as_explicit(0)?)?;
    let Element::Sequence(principal) = principal.as_explicit(1)? else {
        return None;
    };
    let Element::Sequence(components) = principal.get(1)?.as_explicit(1)? else {
        return None;
    };
    let components = components
        .iter()
        .map(kerberos_string)
        .collect::<Option<Vec<_>>>()?;
    Some(format!("{}@{}", components.join("/"), realm))
}

fn kerberos_string(element: &Element) -> Option<String> {
    match element {
        // GeneralString has no dedicated element variant
        Element::Unimplemented(tlv) => match tlv.value() {
            Value::Data(data) => String::from_utf8(data.clone()).ok(),
            Value::Tlv(_) => None,
        },
        other => other.as_str().map(str::to_string),
    }
}

impl OidName for OtherName {
    fn oid_name(&self) -> Option<&'static str> {
        match self.type_id.to_string().as_str() {
            Self::OID_MS_UPN => Some("msUPN"),
            Self::OID_PKINIT_SAN => Some("id-pkinit-san"),
            _ => None,
        }
    }
}

impl fmt::Display for OtherName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.oid_name() {
            Some(name) => write!(f, "{}={{{}}}", name, self.value_text()),
            None => write!(f, "{}={{{}}}", self.type_id, self.value_text()),
        }
    }
}

/// EDIPartyName structure for [5] IMPLICIT EDIPartyName
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdiPartyName {
    /// nameAssigner [0] OPTIONAL
    pub name_assigner: Option<DirectoryString>,
    /// partyName [1]
    pub party_name: DirectoryString,
}

impl EdiPartyName {
    fn from_elements(elements: &[Element]) -> Result<Self, error::Error> {
        let (name_assigner, party_name) = match elements {
            [assigner, party] => (Some(assigner), party),
            [party] => (None, party),
            _ => return Err(error::Error::EdiPartyNameMissingPartyName),
        };

        let name_assigner = name_assigner
            .map(|elem| {
                elem.as_explicit(0)
                    .and_then(|inner| DirectoryString::try_from(inner).ok())
                    .ok_or(error::Error::EdiPartyNameInvalidNameAssigner)
            })
            .transpose()?;
        let party_name = party_name
            .as_explicit(1)
            .and_then(|inner| DirectoryString::try_from(inner).ok())
            .ok_or(error::Error::EdiPartyNameInvalidPartyName)?;

        Ok(EdiPartyName {
            name_assigner,
            party_name,
        })
    }
}

impl fmt::Display for EdiPartyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name_assigner {
            Some(assigner) => write!(f, "{}/{}", assigner, self.party_name),
            None => write!(f, "{}", self.party_name),
        }
    }
}
