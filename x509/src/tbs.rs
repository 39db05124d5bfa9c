use std::fmt;

use certkit::decoder::{DecodableFrom, Decoder};
use certkit::encoder::{EncodableTo, Encoder};
use certkit_asn1::{BitString, ContextContent, Element, Integer};
use certkit_pkix_types::{AlgorithmIdentifier, CertificateSerialNumber, Name, SubjectPublicKeyInfo};
use chrono::{NaiveDateTime, SecondsFormat};
use serde::{Serialize, Serializer};

use crate::error::Error;
use crate::extensions::Extensions;

/*
https://datatracker.ietf.org/doc/html/rfc5280#section-4.1

TBSCertificate  ::=  SEQUENCE  {
     version         [0]  EXPLICIT Version DEFAULT v1,
     serialNumber         CertificateSerialNumber,
     signature            AlgorithmIdentifier,
     issuer               Name,
     validity             Validity,
     subject              Name,
     subjectPublicKeyInfo SubjectPublicKeyInfo,
     issuerUniqueID  [1]  IMPLICIT UniqueIdentifier OPTIONAL,
                          -- If present, version MUST be v2 or v3
     subjectUniqueID [2]  IMPLICIT UniqueIdentifier OPTIONAL,
                          -- If present, version MUST be v2 or v3
     extensions      [3]  EXPLICIT Extensions OPTIONAL
                          -- If present, version MUST be v3
}
 */

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TbsCertificate {
    version: Version,
    serial_number: CertificateSerialNumber,
    signature: AlgorithmIdentifier,
    issuer: Name,
    validity: Validity,
    subject: Name,
    subject_public_key_info: SubjectPublicKeyInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    issuer_unique_id: Option<UniqueIdentifier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    subject_unique_id: Option<UniqueIdentifier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    extensions: Option<Extensions>,
}

impl TbsCertificate {
    /// Get the version
    pub fn version(&self) -> Version {
        self.version
    }

    /// Get the serial number
    pub fn serial_number(&self) -> &CertificateSerialNumber {
        &self.serial_number
    }

    /// The signature algorithm as stated inside the signed body.
    pub fn signature(&self) -> &AlgorithmIdentifier {
        &self.signature
    }

    /// Get the issuer name
    pub fn issuer(&self) -> &Name {
        &self.issuer
    }

    /// Get the validity period
    pub fn validity(&self) -> &Validity {
        &self.validity
    }

    /// Get the subject name
    pub fn subject(&self) -> &Name {
        &self.subject
    }

    /// Get the subject public key info
    pub fn subject_public_key_info(&self) -> &SubjectPublicKeyInfo {
        &self.subject_public_key_info
    }

    /// Get the issuer unique identifier
    pub fn issuer_unique_id(&self) -> Option<&UniqueIdentifier> {
        self.issuer_unique_id.as_ref()
    }

    /// Get the subject unique identifier
    pub fn subject_unique_id(&self) -> Option<&UniqueIdentifier> {
        self.subject_unique_id.as_ref()
    }

    /// Get the extensions
    pub fn extensions(&self) -> Option<&Extensions> {
        self.extensions.as_ref()
    }
}

impl DecodableFrom<Element> for TbsCertificate {}

impl Decoder<Element, TbsCertificate> for Element {
    type Error = Error;

    fn decode(&self) -> Result<TbsCertificate, Self::Error> {
        let Element::Sequence(elements) = self else {
            return Err(Error::TbsExpectedSequence);
        };
        let mut iter = elements.iter().peekable();

        let version: Version = match iter.next_if(|elem| elem.context_slot() == Some(0)) {
            Some(elem) => elem
                .as_explicit(0)
                .ok_or_else(|| Error::InvalidVersion("expected [0] EXPLICIT".to_string()))?
                .decode()?,
            None => Version::V1,
        };

        let serial_number: CertificateSerialNumber = iter
            .next()
            .ok_or(Error::TbsMissingField("serialNumber"))?
            .decode()?;
        let signature: AlgorithmIdentifier = iter
            .next()
            .ok_or(Error::TbsMissingField("signature"))?
            .decode()?;
        let issuer: Name = iter
            .next()
            .ok_or(Error::TbsMissingField("issuer"))?
            .decode()?;
        let validity: Validity = iter
            .next()
            .ok_or(Error::TbsMissingField("validity"))?
            .decode()?;
        let subject: Name = iter
            .next()
            .ok_or(Error::TbsMissingField("subject"))?
            .decode()?;
        let subject_public_key_info: SubjectPublicKeyInfo = iter
            .next()
            .ok_or(Error::TbsMissingField("subjectPublicKeyInfo"))?
            .decode()?;

        let mut last_field = "subjectPublicKeyInfo";
        let issuer_unique_id = iter
            .next_if(|elem| elem.context_slot() == Some(1))
            .map(|elem| UniqueIdentifier::from_element(elem, 1))
            .transpose()?;
        if issuer_unique_id.is_some() {
            last_field = "issuerUniqueID";
        }
        let subject_unique_id = iter
            .next_if(|elem| elem.context_slot() == Some(2))
            .map(|elem| UniqueIdentifier::from_element(elem, 2))
            .transpose()?;
        if subject_unique_id.is_some() {
            last_field = "subjectUniqueID";
        }
        let extensions: Option<Extensions> = iter
            .next_if(|elem| elem.context_slot() == Some(3))
            .map(|elem| elem.decode())
            .transpose()?;
        if extensions.is_some() {
            last_field = "extensions";
        }

        if iter.next().is_some() {
            return Err(Error::TbsUnexpectedElement(last_field));
        }

        Ok(TbsCertificate {
            version,
            serial_number,
            signature,
            issuer,
            validity,
            subject,
            subject_public_key_info,
            issuer_unique_id,
            subject_unique_id,
            extensions,
        })
    }
}

impl EncodableTo<TbsCertificate> for Element {}

impl Encoder<TbsCertificate, Element> for TbsCertificate {
    type Error = Error;

    fn encode(&self) -> Result<Element, Self::Error> {
        let mut elements = Vec::new();
        // DEFAULT v1 is never encoded
        if self.version != Version::V1 {
            elements.push(Element::explicit(0, self.version.encode()?));
        }
        elements.push(self.serial_number.encode()?);
        elements.push(self.signature.encode()?);
        elements.push(self.issuer.encode()?);
        elements.push(self.validity.encode()?);
        elements.push(self.subject.encode()?);
        elements.push(self.subject_public_key_info.encode()?);
        if let Some(id) = &self.issuer_unique_id {
            elements.push(id.to_element(1));
        }
        if let Some(id) = &self.subject_unique_id {
            elements.push(id.to_element(2));
        }
        if let Some(extensions) = &self.extensions {
            elements.push(extensions.encode()?);
        }
        Ok(Element::Sequence(elements))
    }
}

// https://datatracker.ietf.org/doc/html/rfc5280#section-4.1.2.1
// Version  ::=  INTEGER  {  v1(0), v2(1), v3(2)  }
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Version {
    V1 = 0,
    V2 = 1,
    V3 = 2,
}

impl Version {
    /// The version as people count it, e.g. 3 for v3.
    pub fn number(self) -> u8 {
        self as u8 + 1
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

impl Serialize for Version {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.number())
    }
}

impl DecodableFrom<Element> for Version {}

impl Decoder<Element, Version> for Element {
    type Error = Error;

    fn decode(&self) -> Result<Version, Self::Error> {
        match self {
            Element::Integer(i) => match i.to_i64() {
                Some(0) => Ok(Version::V1),
                Some(1) => Ok(Version::V2),
                Some(2) => Ok(Version::V3),
                _ => Err(Error::InvalidVersion(format!("unknown version value: {}", i))),
            },
            other => Err(Error::InvalidVersion(format!(
                "expected INTEGER, got {}",
                other.type_name()
            ))),
        }
    }
}

impl EncodableTo<Version> for Element {}

impl Encoder<Version, Element> for Version {
    type Error = Error;

    fn encode(&self) -> Result<Element, Self::Error> {
        Ok(Element::Integer(Integer::from(*self as i64)))
    }
}

/*
Time ::= CHOICE {
    utcTime        UTCTime,
    generalTime    GeneralizedTime
}
*/

/// A validity bound. The CHOICE arm is kept so the bound re-encodes with
/// the same tag it was read with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Time {
    Utc(NaiveDateTime),
    Generalized(NaiveDateTime),
}

impl Time {
    /// Get the time as a naive UTC datetime
    pub fn datetime(&self) -> NaiveDateTime {
        match self {
            Time::Utc(dt) | Time::Generalized(dt) => *dt,
        }
    }

    /// RFC 3339 form, e.g. `2024-01-01T00:00:00Z`.
    pub fn to_rfc3339(&self) -> String {
        self.datetime()
            .and_utc()
            .to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} UTC", self.datetime().format("%Y-%m-%d %H:%M:%S"))
    }
}

impl Serialize for Time {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_rfc3339())
    }
}

impl DecodableFrom<Element> for Time {}

impl Decoder<Element, Time> for Element {
    type Error = Error;

    fn decode(&self) -> Result<Time, Self::Error> {
        match self {
            Element::UTCTime(dt) => Ok(Time::Utc(*dt)),
            Element::GeneralizedTime(dt) => Ok(Time::Generalized(*dt)),
            other => Err(Error::ValidityExpectedTime(other.type_name())),
        }
    }
}

impl EncodableTo<Time> for Element {}

impl Encoder<Time, Element> for Time {
    type Error = Error;

    fn encode(&self) -> Result<Element, Self::Error> {
        Ok(match self {
            Time::Utc(dt) => Element::UTCTime(*dt),
            Time::Generalized(dt) => Element::GeneralizedTime(*dt),
        })
    }
}

/*
Validity ::= SEQUENCE {
    notBefore      Time,
    notAfter       Time
}
*/

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Validity {
    pub not_before: Time,
    pub not_after: Time,
}

impl DecodableFrom<Element> for Validity {}

impl Decoder<Element, Validity> for Element {
    type Error = Error;

    fn decode(&self) -> Result<Validity, Self::Error> {
        let Element::Sequence(elements) = self else {
            return Err(Error::ValidityExpectedSequence);
        };
        let [not_before, not_after] = elements.as_slice() else {
            return Err(Error::ValidityInvalidElementCount(elements.len()));
        };
        Ok(Validity {
            not_before: not_before.decode()?,
            not_after: not_after.decode()?,
        })
    }
}

impl EncodableTo<Validity> for Element {}

impl Encoder<Validity, Element> for Validity {
    type Error = Error;

    fn encode(&self) -> Result<Element, Self::Error> {
        Ok(Element::Sequence(vec![
            self.not_before.encode()?,
            self.not_after.encode()?,
        ]))
    }
}

// UniqueIdentifier  ::=  BIT STRING
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct UniqueIdentifier(BitString);

impl UniqueIdentifier {
    /// Get the underlying BIT STRING
    pub fn as_bit_string(&self) -> &BitString {
        &self.0
    }

    fn from_element(element: &Element, slot: u8) -> Result<Self, Error> {
        match element {
            Element::ContextSpecific {
                content: ContextContent::Primitive(data),
                ..
            } => BitString::try_from(data.as_slice())
                .map(UniqueIdentifier)
                .map_err(|_| Error::UniqueIdentifierExpectedBitString(slot)),
            _ => Err(Error::UniqueIdentifierExpectedBitString(slot)),
        }
    }

    fn to_element(&self, slot: u8) -> Element {
        Element::implicit_primitive(slot, Vec::from(self.0.clone()))
    }
}
