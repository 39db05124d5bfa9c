use std::fmt;

use certkit::decoder::{DecodableFrom, Decoder};
use certkit::encoder::{EncodableTo, Encoder};
use certkit_asn1::{BitString, Element, OctetString};
use certkit_pkix_types::OidName;
use serde::Serialize;

use super::error;
use super::{Extension, ExtensionValue};
use crate::error::Error;

/*
RFC 5280 Section 4.2.1.3
KeyUsage ::= BIT STRING {
    digitalSignature        (0),
    nonRepudiation          (1), -- renamed to contentCommitment
    keyEncipherment         (2),
    dataEncipherment        (3),
    keyAgreement            (4),
    keyCertSign             (5),
    cRLSign                 (6),
    encipherOnly            (7),
    decipherOnly            (8)
}
*/

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KeyUsage {
    pub digital_signature: bool,
    /// Also known as nonRepudiation.
    pub content_commitment: bool,
    pub key_encipherment: bool,
    pub data_encipherment: bool,
    pub key_agreement: bool,
    pub key_cert_sign: bool,
    pub crl_sign: bool,
    pub encipher_only: bool,
    pub decipher_only: bool,
}

impl KeyUsage {
    /// Bits in named-bit order.
    pub fn bits(&self) -> [bool; 9] {
        [
            self.digital_signature,
            self.content_commitment,
            self.key_encipherment,
            self.data_encipherment,
            self.key_agreement,
            self.key_cert_sign,
            self.crl_sign,
            self.encipher_only,
            self.decipher_only,
        ]
    }

    /// Labels of the asserted bits.
    pub fn usages(&self) -> Vec<&'static str> {
        const LABELS: [&str; 9] = [
            "Digital Signature",
            "Non Repudiation",
            "Key Encipherment",
            "Data Encipherment",
            "Key Agreement",
            "Certificate Sign",
            "CRL Sign",
            "Encipher Only",
            "Decipher Only",
        ];
        self.bits()
            .iter()
            .zip(LABELS)
            .filter_map(|(set, label)| set.then_some(label))
            .collect()
    }
}

impl Extension for KeyUsage {
    const OID: &'static str = "2.5.29.15";

    fn parse(value: &OctetString) -> Result<Self, Error> {
        super::parse_value(value)
    }

    fn to_value(&self) -> Result<OctetString, Error> {
        super::encode_value(self)
    }

    fn from_value(value: &ExtensionValue) -> Option<&Self> {
        match value {
            ExtensionValue::KeyUsage(ku) => Some(ku),
            _ => None,
        }
    }
}

impl DecodableFrom<Element> for KeyUsage {}

impl Decoder<Element, KeyUsage> for Element {
    type Error = Error;

    fn decode(&self) -> Result<KeyUsage, Self::Error> {
        match self {
            Element::BitString(bs) => Ok(KeyUsage {
                digital_signature: bs.bit(0),
                content_commitment: bs.bit(1),
                key_encipherment: bs.bit(2),
                data_encipherment: bs.bit(3),
                key_agreement: bs.bit(4),
                key_cert_sign: bs.bit(5),
                crl_sign: bs.bit(6),
                encipher_only: bs.bit(7),
                decipher_only: bs.bit(8),
            }),
            _ => Err(error::Error::ExpectedBitString(error::Kind::KeyUsage).into()),
        }
    }
}

impl OidName for KeyUsage {
    fn oid_name(&self) -> Option<&'static str> {
        Some("keyUsage")
    }
}

impl fmt::Display for KeyUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.usages().join(", "))
    }
}

impl EncodableTo<KeyUsage> for Element {}

impl Encoder<KeyUsage, Element> for KeyUsage {
    type Error = Error;

    fn encode(&self) -> Result<Element, Self::Error> {
        let bits = self.bits();

        // DER drops trailing zero bits
        let last_bit = bits.iter().rposition(|&b| b).map_or(0, |p| p + 1);
        let num_bytes = last_bit.div_ceil(8);

        let bytes = (0..num_bytes)
            .map(|byte_idx| {
                (0..8)
                    .filter_map(|bit_idx| {
                        let bit_pos = byte_idx * 8 + bit_idx;
                        (bit_pos < last_bit && bits.get(bit_pos) == Some(&true))
                            .then_some(1u8 << (7 - bit_idx))
                    })
                    .sum()
            })
            .collect::<Vec<_>>();

        let unused_bits = (num_bytes * 8 - last_bit) as u8;
        Ok(Element::BitString(BitString::new(unused_bits, bytes)))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn bit_string(bytes: &[u8]) -> Element {
        Element::BitString(BitString::try_from(bytes).unwrap())
    }

    #[rstest(
        input,
        expected,
        // digitalSignature only
        case(
            bit_string(&[0x07, 0x80]),
            KeyUsage { digital_signature: true, ..Default::default() }
        ),
        // keyCertSign and cRLSign
        case(
            bit_string(&[0x01, 0x06]),
            KeyUsage { key_cert_sign: true, crl_sign: true, ..Default::default() }
        ),
        // digitalSignature, keyEncipherment, dataEncipherment
        case(
            bit_string(&[0x04, 0xb0]),
            KeyUsage {
                digital_signature: true,
                key_encipherment: true,
                data_encipherment: true,
                ..Default::default()
            }
        ),
        // nonRepudiation, keyAgreement, decipherOnly
        case(
            bit_string(&[0x07, 0x48, 0x80]),
            KeyUsage {
                content_commitment: true,
                key_agreement: true,
                decipher_only: true,
                ..Default::default()
            }
        ),
        // all bits set
        case(
            bit_string(&[0x07, 0xff, 0x80]),
            KeyUsage {
                digital_signature: true,
                content_commitment: true,
                key_encipherment: true,
                data_encipherment: true,
                key_agreement: true,
                key_cert_sign: true,
                crl_sign: true,
                encipher_only: true,
                decipher_only: true,
            }
        ),
        // present but empty
        case(bit_string(&[0x00]), KeyUsage::default()),
    )]
    fn test_key_usage_decode_success(input: Element, expected: KeyUsage) {
        let actual: KeyUsage = input.decode().unwrap();
        assert_eq!(expected, actual);
    }

    #[rstest(input, case(Element::Boolean(true)), case(Element::Sequence(vec![])))]
    fn test_key_usage_decode_failure(input: Element) {
        let result: Result<KeyUsage, Error> = input.decode();
        let err = result.unwrap_err().to_string();
        assert!(err.contains("expected BIT STRING"), "{err}");
    }

    #[rstest(
        input,
        expected,
        case(KeyUsage { digital_signature: true, key_cert_sign: true, ..Default::default() }, vec![0x03, 0x02, 0x02, 0x84]),
        case(KeyUsage { digital_signature: true, key_encipherment: true, ..Default::default() }, vec![0x03, 0x02, 0x05, 0xa0]),
        case(KeyUsage { key_cert_sign: true, crl_sign: true, ..Default::default() }, vec![0x03, 0x02, 0x01, 0x06]),
        case(KeyUsage { decipher_only: true, ..Default::default() }, vec![0x03, 0x03, 0x07, 0x00, 0x80]),
        case(KeyUsage::default(), vec![0x03, 0x01, 0x00]),
    )]
    fn test_key_usage_encode_minimal(input: KeyUsage, expected: Vec<u8>) {
        let element: Element = input.encode().unwrap();
        assert_eq!(expected, element.to_der().unwrap());
    }

    #[test]
    fn test_key_usage_display() {
        let ku = KeyUsage {
            digital_signature: true,
            key_cert_sign: true,
            ..Default::default()
        };
        assert_eq!("Digital Signature, Certificate Sign", ku.to_string());
    }
}
