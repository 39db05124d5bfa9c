//! ASN.1 DER framing.
//!
//! [`Reader`] walks a buffer one tag-length-value unit at a time with
//! definite lengths, bounded nesting and truncation checks. [`Der`] and
//! [`Tlv`] hold an owned tree of those units, and encoding a tree always
//! produces canonical DER: shortest-form lengths and sorted SET members.

use certkit::decoder::{DecodableFrom, Decoder};
use certkit::encoder::{EncodableTo, Encoder};

pub mod error;
mod reader;
mod tag;

pub use error::{Error, LengthError};
pub use reader::{Header, MAX_DEPTH, Mode, Reader};
pub use tag::{TAG_CONSTRUCTED, Tag, TagClass};

/// A sequence of top-level TLVs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Der {
    elements: Vec<Tlv>,
}

impl Der {
    pub fn new(elements: Vec<Tlv>) -> Self {
        Der { elements }
    }

    pub fn elements(&self) -> &[Tlv] {
        &self.elements
    }

    pub fn into_elements(self) -> Vec<Tlv> {
        self.elements
    }

    /// Parses every element in `input` under the given length rules.
    pub fn parse(input: &[u8], mode: Mode) -> Result<Der, Error> {
        let mut reader = Reader::with_mode(input, mode);
        let mut elements = Vec::new();
        while !reader.is_empty() {
            elements.push(reader.read_tlv()?);
        }
        Ok(Der { elements })
    }
}

impl DecodableFrom<Vec<u8>> for Der {}

impl Decoder<Vec<u8>, Der> for Vec<u8> {
    type Error = Error;

    fn decode(&self) -> Result<Der, Self::Error> {
        Der::parse(self, Mode::default())
    }
}

impl<'a> DecodableFrom<&'a [u8]> for Der {}

impl<'a> Decoder<&'a [u8], Der> for &'a [u8] {
    type Error = Error;

    fn decode(&self) -> Result<Der, Self::Error> {
        Der::parse(self, Mode::default())
    }
}

impl EncodableTo<Der> for Vec<u8> {}

impl Encoder<Der, Vec<u8>> for Der {
    type Error = Error;

    fn encode(&self) -> Result<Vec<u8>, Self::Error> {
        let mut out = Vec::new();
        for tlv in &self.elements {
            tlv.write(&mut out);
        }
        Ok(out)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tlv {
    tag: Tag,
    value: Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Tlv(Vec<Tlv>),
    Data(Vec<u8>),
}

impl Tlv {
    pub fn new_primitive(tag: Tag, data: Vec<u8>) -> Self {
        Tlv {
            tag,
            value: Value::Data(data),
        }
    }

    pub fn new_constructed(tag: Tag, tlvs: Vec<Tlv>) -> Self {
        Tlv {
            tag,
            value: Value::Tlv(tlvs),
        }
    }

    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn data(&self) -> Option<&[u8]> {
        match &self.value {
            Value::Data(data) => Some(data),
            Value::Tlv(_) => None,
        }
    }

    pub fn tlvs(&self) -> Option<&[Tlv]> {
        match &self.value {
            Value::Tlv(tlvs) => Some(tlvs),
            Value::Data(_) => None,
        }
    }

    /// Encodes this TLV and its children as DER.
    pub fn to_der_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.write(&mut out);
        out
    }

    fn write(&self, out: &mut Vec<u8>) {
        out.push(u8::from(self.tag));
        match &self.value {
            Value::Data(data) => {
                write_length(data.len(), out);
                out.extend_from_slice(data);
            }
            Value::Tlv(tlvs) => {
                let mut children = tlvs.iter().map(Tlv::to_der_bytes).collect::<Vec<_>>();
                // SET OF members are ordered by their encodings
                if self.tag == Tag::SET {
                    children.sort();
                }
                let content = children.concat();
                write_length(content.len(), out);
                out.extend_from_slice(&content);
            }
        }
    }
}

impl EncodableTo<Tlv> for Vec<u8> {}

impl Encoder<Tlv, Vec<u8>> for Tlv {
    type Error = Error;

    fn encode(&self) -> Result<Vec<u8>, Self::Error> {
        Ok(self.to_der_bytes())
    }
}

fn write_length(length: usize, out: &mut Vec<u8>) {
    if length < 0x80 {
        out.push(length as u8);
        return;
    }
    let bytes = length.to_be_bytes();
    let skip = bytes.iter().take_while(|&&b| b == 0).count();
    let significant = &bytes[skip..];
    out.push(0x80 | significant.len() as u8);
    out.extend_from_slice(significant);
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest(input, expected,
        case(vec![0x02, 0x01, 0x01], Tlv::new_primitive(Tag::INTEGER, vec![0x01])),
        case(vec![0x02, 0x09, 0x00, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01], Tlv::new_primitive(Tag::INTEGER, vec![0x00, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01])),
        case(vec![0x13, 0x02, 0x68, 0x69], Tlv::new_primitive(Tag::PRINTABLE_STRING, vec![0x68, 0x69])),
        case(vec![0x16, 0x02, 0x68, 0x69], Tlv::new_primitive(Tag::IA5_STRING, vec![0x68, 0x69])),
        case(vec![0x0c, 0x04, 0xf0, 0x9f, 0x98, 0x8e], Tlv::new_primitive(Tag::UTF8_STRING, vec![0xf0, 0x9f, 0x98, 0x8e])),
        case(vec![
            0x18, 0x0f, 0x32, 0x30, 0x31, 0x39, 0x31, 0x32, 0x31, 0x36, 0x30, 0x33, 0x30, 0x32, 0x31,
            0x30, 0x5a,
        ], Tlv::new_primitive(Tag::GENERALIZED_TIME, vec![
            0x32, 0x30, 0x31, 0x39, 0x31, 0x32, 0x31, 0x36, 0x30, 0x33, 0x30, 0x32, 0x31, 0x30, 0x5a,
        ])),
        case(vec![0x06, 0x09, 0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x01, 0x0b], Tlv::new_primitive(Tag::OBJECT_IDENTIFIER, vec![0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x01, 0x0b])),
        case(vec![0x05, 0x00], Tlv::new_primitive(Tag::NULL, vec![])),
        case(vec![0x04, 0x04, 0x03, 0x02, 0x06, 0xa0], Tlv::new_primitive(Tag::OCTET_STRING, vec![0x03, 0x02, 0x06, 0xa0])),
        case(vec![0x03, 0x04, 0x06, 0x6e, 0x5d, 0xc0], Tlv::new_primitive(Tag::BIT_STRING, vec![0x06, 0x6e, 0x5d, 0xc0])),
        case(vec![0x80, 0x01, 0xff], Tlv::new_primitive(Tag::context(0, false), vec![0xff])),
    )]
    fn test_tlv_parse_primitive(input: Vec<u8>, expected: Tlv) {
        let der: Der = input.decode().unwrap();
        assert_eq!(&[expected], der.elements());
    }

    #[rstest(input, expected,
        case(vec![0x30, 0x09, 0x02, 0x01, 0x07, 0x02, 0x01, 0x08, 0x02, 0x01, 0x09], Tlv::new_constructed(Tag::SEQUENCE, vec![
            Tlv::new_primitive(Tag::INTEGER, vec![0x07]),
            Tlv::new_primitive(Tag::INTEGER, vec![0x08]),
            Tlv::new_primitive(Tag::INTEGER, vec![0x09]),
        ])),
        case(vec![0xa0, 0x03, 0x02, 0x01, 0x02], Tlv::new_constructed(Tag::context(0, true), vec![
            Tlv::new_primitive(Tag::INTEGER, vec![0x02]),
        ])),
        case(vec![0x30, 0x00], Tlv::new_constructed(Tag::SEQUENCE, vec![])),
    )]
    fn test_tlv_parse_structured(input: Vec<u8>, expected: Tlv) {
        let der: Der = input.decode().unwrap();
        assert_eq!(&[expected], der.elements());

        let encoded: Vec<u8> = der.encode().unwrap();
        assert_eq!(input, encoded);
    }

    #[rstest(length, expected,
        case(0, vec![0x00]),
        case(0x7f, vec![0x7f]),
        case(0x80, vec![0x81, 0x80]),
        case(0xff, vec![0x81, 0xff]),
        case(0x100, vec![0x82, 0x01, 0x00]),
        case(0x1_0000, vec![0x83, 0x01, 0x00, 0x00]),
    )]
    fn test_write_length(length: usize, expected: Vec<u8>) {
        let mut out = Vec::new();
        write_length(length, &mut out);
        assert_eq!(expected, out);
    }

    #[test]
    fn test_non_canonical_length_is_normalized() {
        let input = vec![0x30, 0x81, 0x03, 0x02, 0x01, 0x05];
        assert_eq!(
            Error::InvalidLength(LengthError::NonMinimal),
            Der::parse(&input, Mode::Strict).unwrap_err()
        );

        let der = Der::parse(&input, Mode::Lenient).unwrap();
        let encoded: Vec<u8> = der.encode().unwrap();
        assert_eq!(vec![0x30, 0x03, 0x02, 0x01, 0x05], encoded);
        assert!(Der::parse(&encoded, Mode::Strict).is_ok());
    }

    #[test]
    fn test_set_members_are_sorted() {
        let set = Tlv::new_constructed(
            Tag::SET,
            vec![
                Tlv::new_primitive(Tag::INTEGER, vec![0x02]),
                Tlv::new_primitive(Tag::BOOLEAN, vec![0xff]),
                Tlv::new_primitive(Tag::INTEGER, vec![0x01]),
            ],
        );
        assert_eq!(
            vec![
                0x31, 0x09, 0x01, 0x01, 0xff, 0x02, 0x01, 0x01, 0x02, 0x01, 0x02
            ],
            set.to_der_bytes()
        );

        // SEQUENCE keeps its order
        let seq = Tlv::new_constructed(
            Tag::SEQUENCE,
            vec![
                Tlv::new_primitive(Tag::INTEGER, vec![0x02]),
                Tlv::new_primitive(Tag::INTEGER, vec![0x01]),
            ],
        );
        assert_eq!(
            vec![0x30, 0x06, 0x02, 0x01, 0x02, 0x02, 0x01, 0x01],
            seq.to_der_bytes()
        );
    }

    #[test]
    fn test_truncation_at_every_boundary() {
        let input = vec![
            0x30, 0x0b, 0x02, 0x01, 0x07, 0x30, 0x06, 0x0c, 0x04, 0x74, 0x65, 0x73, 0x74,
        ];
        assert!(Der::parse(&input, Mode::Strict).is_ok());
        for cut in 1..input.len() {
            let err = Der::parse(&input[..cut], Mode::Lenient).unwrap_err();
            assert!(
                matches!(err, Error::TruncatedInput { .. }),
                "cut at {cut}: {err:?}"
            );
        }
    }

    #[test]
    fn test_decode_from_slice() {
        let input: &[u8] = &[0x05, 0x00, 0x05, 0x00];
        let der: Der = input.decode().unwrap();
        assert_eq!(2, der.elements().len());
    }
}
