use std::{fmt::Display, str::FromStr};

use certkit::decoder::{DecodableFrom, Decoder};
use certkit::encoder::{EncodableTo, Encoder};
use certkit_der::{Der, Mode, Tag, TagClass, Tlv, Value};
use chrono::NaiveDateTime;
use error::Error;
use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub mod error;
mod string;
mod time;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ASN1Object {
    elements: Vec<Element>,
}

impl ASN1Object {
    pub fn new(elements: Vec<Element>) -> Self {
        ASN1Object { elements }
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Returns the only element, failing on empty input or trailing elements.
    pub fn into_single(self) -> Result<Element, Error> {
        let count = self.elements.len();
        let mut elements = self.elements.into_iter();
        match (elements.next(), count) {
            (Some(element), 1) => Ok(element),
            _ => Err(Error::ExpectedSingleElement(count)),
        }
    }
}

impl DecodableFrom<Der> for ASN1Object {}

impl Decoder<Der, ASN1Object> for Der {
    type Error = Error;

    fn decode(&self) -> Result<ASN1Object, Error> {
        let elements = self
            .elements()
            .iter()
            .map(Element::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ASN1Object { elements })
    }
}

impl EncodableTo<ASN1Object> for Der {}

impl Encoder<ASN1Object, Der> for ASN1Object {
    type Error = Error;

    fn encode(&self) -> Result<Der, Self::Error> {
        let tlvs = self
            .elements
            .iter()
            .map(Tlv::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Der::new(tlvs))
    }
}

/// Content of a context-specific tag.
///
/// EXPLICIT tagging and IMPLICIT tagging of a constructed type both arrive
/// as `Constructed`; IMPLICIT tagging of a primitive type keeps the raw
/// content octets for the schema layer to interpret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ContextContent {
    #[serde(serialize_with = "serialize_hex")]
    Primitive(Vec<u8>),
    Constructed(Vec<Element>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Element {
    Boolean(bool),
    Integer(Integer),
    BitString(BitString),
    OctetString(OctetString),
    Null,
    ObjectIdentifier(ObjectIdentifier),
    UTF8String(String),
    PrintableString(String),
    TeletexString(String),
    IA5String(String),
    VisibleString(String),
    UniversalString(String),
    BMPString(String),
    UTCTime(NaiveDateTime),
    GeneralizedTime(NaiveDateTime),
    Sequence(Vec<Element>),
    Set(Vec<Element>),
    ContextSpecific {
        slot: u8,
        content: ContextContent,
    },
    /// Any other tag, carried through untouched.
    #[serde(serialize_with = "serialize_tlv")]
    Unimplemented(Tlv),
}

impl Element {
    /// `[slot] EXPLICIT` wrapping of `element`.
    pub fn explicit(slot: u8, element: Element) -> Self {
        Element::ContextSpecific {
            slot,
            content: ContextContent::Constructed(vec![element]),
        }
    }

    /// `[slot] IMPLICIT` replacing the tag of a primitive value.
    pub fn implicit_primitive(slot: u8, data: Vec<u8>) -> Self {
        Element::ContextSpecific {
            slot,
            content: ContextContent::Primitive(data),
        }
    }

    /// `[slot] IMPLICIT` replacing the tag of a SEQUENCE.
    pub fn implicit_constructed(slot: u8, elements: Vec<Element>) -> Self {
        Element::ContextSpecific {
            slot,
            content: ContextContent::Constructed(elements),
        }
    }

    pub fn context_slot(&self) -> Option<u8> {
        match self {
            Element::ContextSpecific { slot, .. } => Some(*slot),
            _ => None,
        }
    }

    /// Unwraps `[slot] EXPLICIT` and returns the inner element.
    pub fn as_explicit(&self, expected: u8) -> Option<&Element> {
        match self {
            Element::ContextSpecific {
                slot,
                content: ContextContent::Constructed(inner),
            } if *slot == expected && inner.len() == 1 => inner.first(),
            _ => None,
        }
    }

    /// Returns the text of any character string variant.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Element::UTF8String(s)
            | Element::PrintableString(s)
            | Element::TeletexString(s)
            | Element::IA5String(s)
            | Element::VisibleString(s)
            | Element::UniversalString(s)
            | Element::BMPString(s) => Some(s),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Element::Boolean(_) => "BOOLEAN",
            Element::Integer(_) => "INTEGER",
            Element::BitString(_) => "BIT STRING",
            Element::OctetString(_) => "OCTET STRING",
            Element::Null => "NULL",
            Element::ObjectIdentifier(_) => "OBJECT IDENTIFIER",
            Element::UTF8String(_) => "UTF8String",
            Element::PrintableString(_) => "PrintableString",
            Element::TeletexString(_) => "TeletexString",
            Element::IA5String(_) => "IA5String",
            Element::VisibleString(_) => "VisibleString",
            Element::UniversalString(_) => "UniversalString",
            Element::BMPString(_) => "BMPString",
            Element::UTCTime(_) => "UTCTime",
            Element::GeneralizedTime(_) => "GeneralizedTime",
            Element::Sequence(_) => "SEQUENCE",
            Element::Set(_) => "SET",
            Element::ContextSpecific { .. } => "context-specific",
            Element::Unimplemented(_) => "unimplemented",
        }
    }

    /// Decodes exactly one element from DER bytes.
    pub fn from_der(bytes: &[u8]) -> Result<Element, Error> {
        let der = Der::parse(bytes, Mode::Lenient)?;
        let obj: ASN1Object = der.decode()?;
        obj.into_single()
    }

    pub fn to_der(&self) -> Result<Vec<u8>, Error> {
        Ok(Tlv::try_from(self)?.to_der_bytes())
    }
}

impl TryFrom<&Tlv> for Element {
    type Error = Error;

    fn try_from(tlv: &Tlv) -> Result<Self, Self::Error> {
        let tag = *tlv.tag();
        match (tag.class(), tlv.value()) {
            (TagClass::ContextSpecific, Value::Data(data)) => {
                Ok(Element::implicit_primitive(tag.number(), data.clone()))
            }
            (TagClass::ContextSpecific, Value::Tlv(tlvs)) => {
                let elements = tlvs
                    .iter()
                    .map(Element::try_from)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Element::implicit_constructed(tag.number(), elements))
            }
            (TagClass::Universal, Value::Tlv(tlvs)) if tag == Tag::SEQUENCE || tag == Tag::SET => {
                let elements = tlvs
                    .iter()
                    .map(Element::try_from)
                    .collect::<Result<Vec<_>, _>>()?;
                if tag == Tag::SET {
                    Ok(Element::Set(elements))
                } else {
                    Ok(Element::Sequence(elements))
                }
            }
            (TagClass::Universal, Value::Data(data)) => decode_primitive(tlv, tag, data),
            _ => Ok(Element::Unimplemented(tlv.clone())),
        }
    }
}

fn decode_primitive(tlv: &Tlv, tag: Tag, data: &[u8]) -> Result<Element, Error> {
    let element = match tag {
        Tag::BOOLEAN => match data {
            [0x00] => Element::Boolean(false),
            [0xff] => Element::Boolean(true),
            _ => return Err(Error::InvalidBoolean),
        },
        Tag::INTEGER => Element::Integer(Integer::try_from(data)?),
        Tag::BIT_STRING => Element::BitString(BitString::try_from(data)?),
        Tag::OCTET_STRING => Element::OctetString(OctetString::from(data)),
        Tag::NULL => Element::Null,
        Tag::OBJECT_IDENTIFIER => Element::ObjectIdentifier(ObjectIdentifier::try_from(data)?),
        Tag::UTF8_STRING => Element::UTF8String(string::decode_utf8(data)?),
        Tag::PRINTABLE_STRING => {
            Element::PrintableString(string::decode_ascii(data, "PrintableString")?)
        }
        Tag::TELETEX_STRING => Element::TeletexString(string::decode_teletex(data)),
        Tag::IA5_STRING => Element::IA5String(string::decode_ascii(data, "IA5String")?),
        Tag::VISIBLE_STRING => Element::VisibleString(string::decode_ascii(data, "VisibleString")?),
        Tag::UNIVERSAL_STRING => Element::UniversalString(string::decode_universal(data)?),
        Tag::BMP_STRING => Element::BMPString(string::decode_bmp(data)?),
        Tag::UTC_TIME => Element::UTCTime(time::parse_utc_time(data)?),
        Tag::GENERALIZED_TIME => Element::GeneralizedTime(time::parse_generalized_time(data)?),
        _ => Element::Unimplemented(tlv.clone()),
    };
    Ok(element)
}

impl TryFrom<&Element> for Tlv {
    type Error = Error;

    fn try_from(element: &Element) -> Result<Self, Self::Error> {
        let tlv = match element {
            Element::Boolean(b) => {
                Tlv::new_primitive(Tag::BOOLEAN, vec![if *b { 0xff } else { 0x00 }])
            }
            Element::Integer(i) => Tlv::new_primitive(Tag::INTEGER, i.to_signed_bytes_be()),
            Element::BitString(bs) => Tlv::new_primitive(Tag::BIT_STRING, Vec::from(bs.clone())),
            Element::OctetString(os) => Tlv::new_primitive(Tag::OCTET_STRING, os.as_bytes().to_vec()),
            Element::Null => Tlv::new_primitive(Tag::NULL, vec![]),
            Element::ObjectIdentifier(oid) => {
                Tlv::new_primitive(Tag::OBJECT_IDENTIFIER, Vec::try_from(oid)?)
            }
            Element::UTF8String(s) => Tlv::new_primitive(Tag::UTF8_STRING, s.as_bytes().to_vec()),
            Element::PrintableString(s) => Tlv::new_primitive(
                Tag::PRINTABLE_STRING,
                string::encode_ascii(s, "PrintableString")?,
            ),
            Element::TeletexString(s) => {
                Tlv::new_primitive(Tag::TELETEX_STRING, string::encode_teletex(s)?)
            }
            Element::IA5String(s) => {
                Tlv::new_primitive(Tag::IA5_STRING, string::encode_ascii(s, "IA5String")?)
            }
            Element::VisibleString(s) => Tlv::new_primitive(
                Tag::VISIBLE_STRING,
                string::encode_ascii(s, "VisibleString")?,
            ),
            Element::UniversalString(s) => {
                Tlv::new_primitive(Tag::UNIVERSAL_STRING, string::encode_universal(s))
            }
            Element::BMPString(s) => Tlv::new_primitive(Tag::BMP_STRING, string::encode_bmp(s)),
            Element::UTCTime(dt) => Tlv::new_primitive(Tag::UTC_TIME, time::format_utc_time(dt)?),
            Element::GeneralizedTime(dt) => {
                Tlv::new_primitive(Tag::GENERALIZED_TIME, time::format_generalized_time(dt))
            }
            Element::Sequence(elements) => Tlv::new_constructed(Tag::SEQUENCE, encode_all(elements)?),
            Element::Set(elements) => Tlv::new_constructed(Tag::SET, encode_all(elements)?),
            Element::ContextSpecific { slot, content } => match content {
                ContextContent::Primitive(data) => {
                    Tlv::new_primitive(Tag::context(*slot, false), data.clone())
                }
                ContextContent::Constructed(elements) => {
                    Tlv::new_constructed(Tag::context(*slot, true), encode_all(elements)?)
                }
            },
            Element::Unimplemented(tlv) => tlv.clone(),
        };
        Ok(tlv)
    }
}

fn encode_all(elements: &[Element]) -> Result<Vec<Tlv>, Error> {
    elements.iter().map(Tlv::try_from).collect()
}

impl DecodableFrom<Tlv> for Element {}

impl Decoder<Tlv, Element> for Tlv {
    type Error = Error;

    fn decode(&self) -> Result<Element, Self::Error> {
        Element::try_from(self)
    }
}

impl EncodableTo<Element> for Tlv {}

impl Encoder<Element, Tlv> for Element {
    type Error = Error;

    fn encode(&self) -> Result<Tlv, Self::Error> {
        Tlv::try_from(self)
    }
}

fn serialize_hex<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&to_hex(data))
}

fn serialize_tlv<S: Serializer>(tlv: &Tlv, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&to_hex(&tlv.to_der_bytes()))
}

/// Lowercase hex without separators.
pub fn to_hex(data: &[u8]) -> String {
    data.iter().map(|b| format!("{:02x}", b)).collect()
}

// ASN1 integer can be a positive or negative value of arbitrary size.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Integer {
    inner: BigInt,
}

impl Integer {
    pub fn as_bigint(&self) -> &BigInt {
        &self.inner
    }

    pub fn is_negative(&self) -> bool {
        self.inner.is_negative()
    }

    pub fn to_u32(&self) -> Option<u32> {
        self.inner.to_u32()
    }

    pub fn to_i64(&self) -> Option<i64> {
        self.inner.to_i64()
    }

    pub fn to_u64(&self) -> Option<u64> {
        self.inner.to_u64()
    }

    /// Minimal big-endian two's-complement content octets.
    pub fn to_signed_bytes_be(&self) -> Vec<u8> {
        self.inner.to_signed_bytes_be()
    }
}

impl Serialize for Integer {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.inner.to_string())
    }
}

impl<'de> Deserialize<'de> for Integer {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let inner = s.parse::<BigInt>().map_err(serde::de::Error::custom)?;
        Ok(Integer { inner })
    }
}

impl TryFrom<&[u8]> for Integer {
    type Error = Error;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        if value.is_empty() {
            return Err(Error::IntegerNoData);
        }
        Ok(Integer {
            inner: BigInt::from_signed_bytes_be(value),
        })
    }
}

impl From<i64> for Integer {
    fn from(value: i64) -> Self {
        Integer {
            inner: BigInt::from(value),
        }
    }
}

impl From<BigInt> for Integer {
    fn from(inner: BigInt) -> Self {
        Integer { inner }
    }
}

impl Display for Integer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectIdentifier {
    inner: Vec<u64>,
}

impl ObjectIdentifier {
    pub fn arcs(&self) -> &[u64] {
        &self.inner
    }
}

impl Serialize for ObjectIdentifier {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ObjectIdentifier {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ObjectIdentifier::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl TryFrom<&[u8]> for ObjectIdentifier {
    type Error = Error;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        if value.is_empty() {
            return Err(Error::ObjectIdentifierNoData);
        }

        // Base-128 subidentifiers, high bit marks continuation.
        let mut subidentifiers = Vec::new();
        let mut val = 0u64;
        let mut pending = false;
        for &b in value {
            // a subidentifier may not start with 0x80 (X.690 8.19.2)
            if !pending && b == 0x80 {
                return Err(Error::ObjectIdentifierNonMinimal);
            }
            if val > (u64::MAX >> 7) {
                return Err(Error::ObjectIdentifierArcOverflow);
            }
            val = (val << 7) | u64::from(b & 0x7f);
            pending = b & 0x80 != 0;
            if !pending {
                subidentifiers.push(val);
                val = 0;
            }
        }
        if pending {
            return Err(Error::ObjectIdentifierIncompleteEncoding);
        }

        // The first subidentifier packs the first two arcs.
        let mut values = Vec::with_capacity(subidentifiers.len() + 1);
        let mut subidentifiers = subidentifiers.into_iter();
        match subidentifiers.next() {
            Some(first) if first < 80 => {
                values.push(first / 40);
                values.push(first % 40);
            }
            Some(first) => {
                values.push(2);
                values.push(first - 80);
            }
            None => return Err(Error::ObjectIdentifierNoData),
        }
        values.extend(subidentifiers);

        Ok(ObjectIdentifier { inner: values })
    }
}

impl TryFrom<&ObjectIdentifier> for Vec<u8> {
    type Error = Error;

    fn try_from(oid: &ObjectIdentifier) -> Result<Self, Self::Error> {
        let (first, second, rest) = match oid.inner.as_slice() {
            [first, second, rest @ ..] => (*first, *second, rest),
            _ => return Err(Error::ObjectIdentifierTooFewComponents),
        };
        if first > 2 || (first < 2 && second >= 40) {
            return Err(Error::ObjectIdentifierInvalidFirstArc(first));
        }
        let head = (first * 40)
            .checked_add(second)
            .ok_or(Error::ObjectIdentifierArcOverflow)?;

        let mut result = Vec::new();
        for value in std::iter::once(head).chain(rest.iter().copied()) {
            let mut encoded = vec![(value & 0x7f) as u8];
            let mut value = value >> 7;
            while value > 0 {
                encoded.push((value & 0x7f) as u8 | 0x80);
                value >>= 7;
            }
            result.extend(encoded.iter().rev());
        }
        Ok(result)
    }
}

impl Display for ObjectIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = self
            .inner
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(".");
        write!(f, "{}", s)
    }
}

impl FromStr for ObjectIdentifier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = s
            .split('.')
            .map(|c| {
                c.parse::<u64>()
                    .map_err(|_| Error::ObjectIdentifierInvalidComponent(c.to_string()))
            })
            .collect::<Result<Vec<u64>, Error>>()?;
        if values.len() < 2 {
            return Err(Error::ObjectIdentifierTooFewComponents);
        }
        Ok(ObjectIdentifier { inner: values })
    }
}

impl PartialEq<&str> for ObjectIdentifier {
    fn eq(&self, other: &&str) -> bool {
        self.to_string() == *other
    }
}

impl PartialEq<ObjectIdentifier> for &str {
    fn eq(&self, other: &ObjectIdentifier) -> bool {
        *self == other.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitString {
    unused: u8,
    data: Vec<u8>,
}

impl Serialize for BitString {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("BitString", 2)?;
        state.serialize_field("bit_length", &self.bit_len())?;
        state.serialize_field("bits", &to_hex(&self.data))?;
        state.end()
    }
}

impl BitString {
    pub fn new(unused: u8, data: Vec<u8>) -> Self {
        BitString { unused, data }
    }

    pub fn unused_bits(&self) -> u8 {
        self.unused
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Returns the total number of bits (excluding unused bits)
    pub fn bit_len(&self) -> usize {
        (self.data.len() * 8).saturating_sub(self.unused as usize)
    }

    /// Bit `index` counted from the most significant bit of the first byte.
    pub fn bit(&self, index: usize) -> bool {
        if index >= self.bit_len() {
            return false;
        }
        self.data
            .get(index / 8)
            .is_some_and(|byte| byte & (0x80 >> (index % 8)) != 0)
    }
}

impl AsRef<[u8]> for BitString {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl TryFrom<&[u8]> for BitString {
    type Error = Error;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        match value.split_first() {
            Some((&unused, data)) => {
                if unused > 7 || (data.is_empty() && unused != 0) {
                    return Err(Error::BitStringUnusedBitsOutOfRange(unused));
                }
                Ok(BitString {
                    unused,
                    data: data.to_vec(),
                })
            }
            None => Err(Error::BitStringNoData),
        }
    }
}

impl From<BitString> for Vec<u8> {
    fn from(value: BitString) -> Self {
        let mut result = Vec::with_capacity(value.data.len() + 1);
        result.push(value.unused);
        result.extend(value.data);
        result
    }
}

impl Display for BitString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let bits = (0..self.bit_len())
            .map(|i| if self.bit(i) { '1' } else { '0' })
            .collect::<String>();
        write!(f, "{}", bits)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OctetString {
    inner: Vec<u8>,
}

impl Serialize for OctetString {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if serializer.is_human_readable() {
            serializer.serialize_str(&to_hex(&self.inner))
        } else {
            self.inner.serialize(serializer)
        }
    }
}

impl OctetString {
    pub fn as_bytes(&self) -> &[u8] {
        &self.inner
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.inner
    }
}

impl TryFrom<&OctetString> for ASN1Object {
    type Error = Error;

    fn try_from(value: &OctetString) -> Result<Self, Self::Error> {
        let der = Der::parse(value.as_bytes(), Mode::Lenient)?;
        der.decode()
    }
}

impl AsRef<[u8]> for OctetString {
    fn as_ref(&self) -> &[u8] {
        &self.inner
    }
}

impl From<Vec<u8>> for OctetString {
    fn from(value: Vec<u8>) -> Self {
        OctetString { inner: value }
    }
}

impl From<&[u8]> for OctetString {
    fn from(value: &[u8]) -> Self {
        OctetString {
            inner: value.to_vec(),
        }
    }
}

impl Display for OctetString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", to_hex(&self.inner))
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use chrono::NaiveDateTime;
    use num_bigint::BigInt;
    use rstest::rstest;

    use super::*;

    #[rstest(input, expected,
        case(vec![0x01], "1"),
        case(vec![0x00, 0x80], "128"),
        case(vec![0xff], "-1"),
        case(vec![0x03, 0xd4, 0x15, 0x31, 0x8e, 0x2c, 0x57, 0x1d, 0x29, 0x05, 0xfc, 0x3e, 0x05, 0x27, 0x68, 0x9d, 0x0d, 0x09], "333504890676592408951587385614406537514249"),
    )]
    fn test_parse_integer(input: Vec<u8>, expected: &str) {
        let expected = Integer {
            inner: BigInt::from_str(expected).unwrap(),
        };
        let actual = Integer::try_from(input.as_slice()).unwrap();
        assert_eq!(expected, actual);
        assert_eq!(input, actual.to_signed_bytes_be());
    }

    #[test]
    fn test_integer_requires_content() {
        assert!(matches!(
            Integer::try_from(&[][..]),
            Err(Error::IntegerNoData)
        ));
    }

    #[rstest(
        input,
        expected_json,
        case(Integer::from(0), r#""0""#),
        case(Integer::from(255), r#""255""#),
        case(Integer::from(-1), r#""-1""#),
    )]
    fn test_integer_serialize(input: Integer, expected_json: &str) {
        let json = serde_json::to_string(&input).unwrap();
        assert_eq!(expected_json, json);
    }

    #[rstest(input, expected,
        // 1.2
        case(vec![0x2a], vec![1, 2]),
        // 1.3.6.1.4.1
        case(vec![0x2b, 0x06, 0x01, 0x04, 0x01], vec![1, 3, 6, 1, 4, 1]),
        // 0.9.2342.19200300.100.1.1
        case(vec![0x09, 0x92, 0x26, 0x89, 0x93, 0xf2, 0x2c, 0x64, 0x01, 0x01], vec![0, 9, 2342, 19200300, 100, 1, 1]),
        // 1.2.840.113549.1.1.5
        case(vec![0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x01, 0x05], vec![1, 2, 840, 113549, 1, 1, 5]),
        // 2.5.4.0 has a zero arc
        case(vec![0x55, 0x04, 0x00], vec![2, 5, 4, 0]),
        // 2.999.3 has a first subidentifier above 127
        case(vec![0x88, 0x37, 0x03], vec![2, 999, 3]),
    )]
    fn test_object_identifier_bytes(input: Vec<u8>, expected: Vec<u64>) {
        let actual = ObjectIdentifier::try_from(input.as_slice()).unwrap();
        assert_eq!(expected, actual.arcs());
        assert_eq!(input, Vec::<u8>::try_from(&actual).unwrap());
    }

    #[rstest(input,
        case(vec![]),
        case(vec![0x2a, 0x86]),
        case(vec![0x2a, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x7f]),
    )]
    fn test_object_identifier_invalid(input: Vec<u8>) {
        assert!(ObjectIdentifier::try_from(input.as_slice()).is_err());
    }

    #[rstest(input,
        // 2.5.29.17 with the last arc padded
        case(vec![0x55, 0x1d, 0x80, 0x11]),
        case(vec![0x80, 0x2a]),
        case(vec![0x2a, 0x86, 0x48, 0x80, 0x86, 0xf7, 0x0d]),
    )]
    fn test_object_identifier_non_minimal(input: Vec<u8>) {
        assert!(matches!(
            ObjectIdentifier::try_from(input.as_slice()),
            Err(Error::ObjectIdentifierNonMinimal)
        ));
    }

    #[rstest(input, ok,
        case("1.2.840.113549", true),
        case("2.5.29.17", true),
        case("1", false),
        case("1..2", false),
        case("1.x", false),
    )]
    fn test_object_identifier_from_str(input: &str, ok: bool) {
        let result = ObjectIdentifier::from_str(input);
        assert_eq!(ok, result.is_ok());
        if let Ok(oid) = result {
            assert_eq!(input, oid.to_string());
            assert!(oid == input);
        }
    }

    #[test]
    fn test_object_identifier_serialize() {
        let oid = ObjectIdentifier::from_str("1.2.840.113549.1.1.11").unwrap();
        let json = serde_json::to_string(&oid).unwrap();
        assert_eq!(r#""1.2.840.113549.1.1.11""#, json);
        let back: ObjectIdentifier = serde_json::from_str(&json).unwrap();
        assert_eq!(oid, back);
    }

    #[rstest(input, expected,
        case(BitString::new(0, vec![0b10101010]), "10101010"),
        case(BitString::new(2, vec![0b10101010, 0b11001100]), "10101010110011"),
        case(BitString::new(0, vec![]), ""),
        case(BitString::new(4, vec![0b10100000]), "1010"),
    )]
    fn test_bitstring_to_string(input: BitString, expected: &str) {
        assert_eq!(expected, input.to_string());
    }

    #[rstest(input, ok,
        case(vec![0x00], true),
        case(vec![0x07, 0x80], true),
        case(vec![], false),
        case(vec![0x08, 0x00], false),
        case(vec![0x01], false),
    )]
    fn test_bitstring_from_bytes(input: Vec<u8>, ok: bool) {
        assert_eq!(ok, BitString::try_from(input.as_slice()).is_ok());
    }

    #[rstest(input, expected,
        case(OctetString::from(vec![0x01]), "01"),
        case(OctetString::from(vec![]), ""),
        case(OctetString::from(vec![0xff, 0xab, 0xcd]), "ffabcd"),
    )]
    fn test_octetstring_to_string(input: OctetString, expected: &str) {
        assert_eq!(expected, input.to_string());
        assert_eq!(format!(r#""{expected}""#), serde_json::to_string(&input).unwrap());
    }

    #[rstest(
        element,
        expected,
        case(Element::Boolean(true), vec![0x01, 0x01, 0xff]),
        case(Element::Boolean(false), vec![0x01, 0x01, 0x00]),
        case(Element::Integer(Integer::from(0)), vec![0x02, 0x01, 0x00]),
        case(Element::Integer(Integer::from(128)), vec![0x02, 0x02, 0x00, 0x80]),
        case(Element::Integer(Integer::from(-129)), vec![0x02, 0x02, 0xff, 0x7f]),
        case(Element::Null, vec![0x05, 0x00]),
        case(Element::OctetString(OctetString::from(vec![0x01, 0x02])), vec![0x04, 0x02, 0x01, 0x02]),
        case(Element::BitString(BitString::new(1, vec![0x06])), vec![0x03, 0x02, 0x01, 0x06]),
        case(Element::UTF8String("test".to_string()), vec![0x0c, 0x04, 0x74, 0x65, 0x73, 0x74]),
        case(Element::PrintableString("JP".to_string()), vec![0x13, 0x02, 0x4a, 0x50]),
        case(Element::IA5String("a@b".to_string()), vec![0x16, 0x03, 0x61, 0x40, 0x62]),
        case(Element::BMPString("A".to_string()), vec![0x1e, 0x02, 0x00, 0x41]),
        case(Element::ObjectIdentifier(ObjectIdentifier::from_str("2.5.4.3").unwrap()), vec![0x06, 0x03, 0x55, 0x04, 0x03]),
        case(Element::explicit(0, Element::Integer(Integer::from(2))), vec![0xa0, 0x03, 0x02, 0x01, 0x02]),
        case(Element::implicit_primitive(2, b"a.b".to_vec()), vec![0x82, 0x03, 0x61, 0x2e, 0x62]),
        case(Element::Sequence(vec![Element::Null, Element::Boolean(true)]), vec![0x30, 0x05, 0x05, 0x00, 0x01, 0x01, 0xff]),
        case(Element::Unimplemented(Tlv::new_primitive(Tag::universal(0x0a, false), vec![0x01])), vec![0x0a, 0x01, 0x01]),
    )]
    fn test_element_der_round_trip(element: Element, expected: Vec<u8>) {
        let encoded = element.to_der().unwrap();
        assert_eq!(expected, encoded);
        assert_eq!(element, Element::from_der(&encoded).unwrap());
    }

    #[test]
    fn test_times_round_trip() {
        let dt = NaiveDateTime::parse_from_str("2019-03-22 22:25:25", "%Y-%m-%d %H:%M:%S").unwrap();
        for element in [Element::UTCTime(dt), Element::GeneralizedTime(dt)] {
            let encoded = element.to_der().unwrap();
            assert_eq!(element, Element::from_der(&encoded).unwrap());
        }
    }

    #[rstest(input,
        case(vec![0x01, 0x01, 0x01]),
        case(vec![0x01, 0x02, 0xff, 0xff]),
        case(vec![0x02, 0x00]),
        case(vec![0x03, 0x00]),
        case(vec![0x0c, 0x01, 0xff]),
        case(vec![0x17, 0x03, 0x31, 0x32, 0x33]),
    )]
    fn test_invalid_primitive(input: Vec<u8>) {
        assert!(Element::from_der(&input).is_err());
    }

    #[test]
    fn test_from_der_rejects_extra_elements() {
        let input = [0x05, 0x00, 0x05, 0x00];
        assert!(matches!(
            Element::from_der(&input),
            Err(Error::ExpectedSingleElement(2))
        ));
    }

    #[test]
    fn test_context_specific_shapes() {
        // [0] IMPLICIT SEQUENCE with two members
        let input = [0xa0, 0x05, 0x06, 0x01, 0x2a, 0x05, 0x00];
        let element = Element::from_der(&input).unwrap();
        assert_eq!(Some(0), element.context_slot());
        assert_eq!(None, element.as_explicit(0));
        assert_eq!(input.to_vec(), element.to_der().unwrap());

        let input = [0xa3, 0x02, 0x30, 0x00];
        let element = Element::from_der(&input).unwrap();
        assert_eq!(Some(&Element::Sequence(vec![])), element.as_explicit(3));
        assert_eq!(None, element.as_explicit(2));
    }

    #[test]
    fn test_set_is_reencoded_sorted() {
        let input = [0x31, 0x06, 0x02, 0x01, 0x02, 0x02, 0x01, 0x01];
        let element = Element::from_der(&input).unwrap();
        assert_eq!(
            vec![0x31, 0x06, 0x02, 0x01, 0x01, 0x02, 0x01, 0x02],
            element.to_der().unwrap()
        );
    }
}
