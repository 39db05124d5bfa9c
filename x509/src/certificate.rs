use std::any::Any;
use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use certkit::decoder::{DecodableFrom, Decoder};
use certkit::encoder::{EncodableTo, Encoder};
use certkit_asn1::{BitString, Element};
use certkit_der::{Mode, Reader};
use certkit_pkix_types::{AlgorithmIdentifier, CertificateSerialNumber, Name};
use serde::Serialize;

use crate::error::{Error, Result, Status};
use crate::extensions::Extensions;
use crate::tbs::{TbsCertificate, Validity, Version};

/*
https://datatracker.ietf.org/doc/html/rfc5280#section-4.1

Certificate  ::=  SEQUENCE  {
    tbsCertificate       TBSCertificate,
    signatureAlgorithm   AlgorithmIdentifier,
    signatureValue       BIT STRING
}
 */

/// The decoded form of a `Certificate` structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedCertificate {
    tbs_certificate: TbsCertificate,
    signature_algorithm: AlgorithmIdentifier,
    signature_value: BitString,
}

impl DecodedCertificate {
    /// Get the TBSCertificate
    pub fn tbs_certificate(&self) -> &TbsCertificate {
        &self.tbs_certificate
    }

    /// Get the outer signature algorithm
    pub fn signature_algorithm(&self) -> &AlgorithmIdentifier {
        &self.signature_algorithm
    }

    /// Get the signature value
    pub fn signature_value(&self) -> &BitString {
        &self.signature_value
    }
}

impl DecodableFrom<Element> for DecodedCertificate {}

impl Decoder<Element, DecodedCertificate> for Element {
    type Error = Error;

    fn decode(&self) -> Result<DecodedCertificate> {
        let Element::Sequence(elements) = self else {
            return Err(Error::CertificateExpectedSequence);
        };
        let [tbs, algorithm, signature] = elements.as_slice() else {
            return Err(Error::CertificateInvalidElementCount(elements.len()));
        };

        let tbs_certificate: TbsCertificate = tbs.decode()?;
        let signature_algorithm: AlgorithmIdentifier = algorithm.decode()?;
        let Element::BitString(signature_value) = signature else {
            return Err(Error::SignatureExpectedBitString);
        };

        Ok(DecodedCertificate {
            tbs_certificate,
            signature_algorithm,
            signature_value: signature_value.clone(),
        })
    }
}

impl EncodableTo<DecodedCertificate> for Element {}

impl Encoder<DecodedCertificate, Element> for DecodedCertificate {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        Ok(Element::Sequence(vec![
            self.tbs_certificate.encode()?,
            self.signature_algorithm.encode()?,
            Element::BitString(self.signature_value.clone()),
        ]))
    }
}

/// Opaque handle to an externally owned credential-store entry.
///
/// The certificate only keeps the association; the referenced resource is
/// owned and managed by whoever created the handle.
#[derive(Clone)]
pub struct KeychainItem(Arc<dyn Any + Send + Sync>);

impl KeychainItem {
    /// Create a new handle wrapping `item`.
    pub fn new<T: Any + Send + Sync>(item: T) -> Self {
        KeychainItem(Arc::new(item))
    }

    /// Get the wrapped value if it is a `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }
}

impl fmt::Debug for KeychainItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("KeychainItem").finish_non_exhaustive()
    }
}

/// A decoded X.509 certificate together with the bytes it was decoded from.
///
/// The decoded view never changes after construction. The only mutable
/// part is the attached [`KeychainItem`], which is replaced with a single
/// atomic swap so a `Certificate` can be shared across threads as is.
#[derive(Debug)]
pub struct Certificate {
    raw: Vec<u8>,
    decoded: DecodedCertificate,
    keychain: ArcSwapOption<KeychainItem>,
}

impl Certificate {
    /// Decodes exactly one DER `Certificate` from `bytes`.
    ///
    /// Non-minimal length encodings are accepted here; [`Certificate::reencoded`]
    /// produces the canonical form.
    pub fn from_der(bytes: &[u8]) -> Result<Self> {
        let mut reader = Reader::with_mode(bytes, Mode::Lenient);
        let tlv = reader.read_tlv()?;
        reader.finish()?;

        let element = Element::try_from(&tlv)?;
        let decoded: DecodedCertificate = element.decode()?;

        Ok(Certificate {
            raw: bytes.to_vec(),
            decoded,
            keychain: ArcSwapOption::empty(),
        })
    }

    /// Like [`Certificate::from_der`], but reports failure as `None`.
    pub fn create_with_data(bytes: &[u8]) -> Option<Self> {
        match Self::from_der(bytes) {
            Ok(certificate) => Some(certificate),
            Err(err) => {
                tracing::debug!(kind = %err.kind(), error = %err, "failed to decode certificate");
                None
            }
        }
    }

    /// Like [`Certificate::create_with_data`], then attaches `item`.
    pub fn create_with_keychain_item(bytes: &[u8], item: KeychainItem) -> Option<Self> {
        let certificate = Self::create_with_data(bytes)?;
        certificate.set_keychain_item(item);
        Some(certificate)
    }

    /// Attaches `item`, replacing any handle attached earlier.
    pub fn set_keychain_item(&self, item: KeychainItem) -> Status {
        let previous = self.keychain.swap(Some(Arc::new(item)));
        tracing::trace!(replaced = previous.is_some(), "keychain item attached");
        Status::Success
    }

    /// Get the attached keychain handle, if any.
    pub fn keychain_item(&self) -> Option<KeychainItem> {
        self.keychain.load_full().map(|item| (*item).clone())
    }

    /// The bytes this certificate was decoded from, verbatim.
    pub fn data(&self) -> &[u8] {
        &self.raw
    }

    /// Length of the original encoding in bytes.
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Get the decoded certificate structure
    pub fn decoded(&self) -> &DecodedCertificate {
        &self.decoded
    }

    /// Get the TBSCertificate
    pub fn tbs_certificate(&self) -> &TbsCertificate {
        &self.decoded.tbs_certificate
    }

    /// Get the version
    pub fn version(&self) -> Version {
        self.tbs_certificate().version()
    }

    /// Get the serial number
    pub fn serial_number(&self) -> &CertificateSerialNumber {
        self.tbs_certificate().serial_number()
    }

    /// Get the issuer name
    pub fn issuer(&self) -> &Name {
        self.tbs_certificate().issuer()
    }

    /// Get the subject name
    pub fn subject(&self) -> &Name {
        self.tbs_certificate().subject()
    }

    /// Get the validity period
    pub fn validity(&self) -> &Validity {
        self.tbs_certificate().validity()
    }

    /// Get the extensions, `None` for certificates without any
    pub fn extensions(&self) -> Option<&Extensions> {
        self.tbs_certificate().extensions()
    }

    /// Get the outer signature algorithm
    pub fn signature_algorithm(&self) -> &AlgorithmIdentifier {
        &self.decoded.signature_algorithm
    }

    /// Get the signature value
    pub fn signature_value(&self) -> &BitString {
        &self.decoded.signature_value
    }

    /// Issuer and subject are the same name. The signature is not checked.
    pub fn is_self_issued(&self) -> bool {
        self.issuer() == self.subject()
    }

    /// Canonical DER regenerated from the decoded structure.
    pub fn reencoded(&self) -> Result<Vec<u8>> {
        self.encode_der()
            .map_err(|err| Error::ReencodeFailed(Box::new(err)))
    }

    fn encode_der(&self) -> Result<Vec<u8>> {
        let element = self.decoded.encode()?;
        Ok(element.to_der()?)
    }
}

impl TryFrom<&[u8]> for Certificate {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        Certificate::from_der(bytes)
    }
}

impl PartialEq for Certificate {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for Certificate {}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::error::ErrorKind;

    // Self-signed CN=test, P-256, critical keyUsage digitalSignature + keyCertSign
    const MINIMAL: &[u8] = include_bytes!("../../testdata/minimal.der");

    #[test]
    fn test_from_der_minimal() {
        let certificate = Certificate::from_der(MINIMAL).unwrap();
        assert_eq!(MINIMAL, certificate.data());
        assert_eq!(MINIMAL.len(), certificate.len());
        assert_eq!(Version::V3, certificate.version());
        assert_eq!("CN=test", certificate.subject().to_string());
        assert!(certificate.is_self_issued());
        assert_eq!(MINIMAL, certificate.reencoded().unwrap());
    }

    #[rstest(
        input,
        expected,
        case(vec![], ErrorKind::MalformedInput),
        case(vec![0x30, 0x05, 0x02, 0x01], ErrorKind::MalformedInput),
        case(vec![0x02, 0x01, 0x01], ErrorKind::SchemaViolation),
        case(vec![0x30, 0x00], ErrorKind::SchemaViolation),
        case(vec![0x30, 0x00, 0x00], ErrorKind::SchemaViolation),
    )]
    fn test_from_der_failure(input: Vec<u8>, expected: ErrorKind) {
        let err = Certificate::from_der(&input).unwrap_err();
        assert_eq!(expected, err.kind());
        assert_eq!(Status::INVALID_CERTIFICATE, err.status());
        assert!(Certificate::create_with_data(&input).is_none());
    }

    #[test]
    fn test_trailing_bytes_are_rejected() {
        let mut input = MINIMAL.to_vec();
        input.push(0x00);
        let err = Certificate::from_der(&input).unwrap_err();
        assert_eq!(ErrorKind::SchemaViolation, err.kind());
    }

    #[test]
    fn test_keychain_item_overwrite() {
        #[derive(Debug, PartialEq)]
        struct Handle(u32);

        let certificate =
            Certificate::create_with_keychain_item(MINIMAL, KeychainItem::new(Handle(1))).unwrap();
        assert_eq!(
            Some(&Handle(1)),
            certificate.keychain_item().as_ref().and_then(|i| i.downcast_ref())
        );

        assert_eq!(
            Status::Success,
            certificate.set_keychain_item(KeychainItem::new(Handle(2)))
        );
        let item = certificate.keychain_item().unwrap();
        assert_eq!(Some(&Handle(2)), item.downcast_ref::<Handle>());
        assert_eq!(None, item.downcast_ref::<String>());
    }

    #[test]
    fn test_certificate_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Certificate>();
    }
}
