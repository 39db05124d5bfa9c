//! DirectoryString as defined in RFC 5280 Section 4.1.2.4
//!
//! ```asn1
//! DirectoryString ::= CHOICE {
//!   teletexString     TeletexString (SIZE (1..MAX)),
//!   printableString   PrintableString (SIZE (1..MAX)),
//!   universalString   UniversalString (SIZE (1..MAX)),
//!   utf8String        UTF8String (SIZE (1..MAX)),
//!   bmpString         BMPString (SIZE (1..MAX))
//! }
//! ```
//!
//! Attribute values such as `emailAddress` and `domainComponent` are
//! IA5String, so those are accepted here as well.

use std::fmt;
use std::ops::Deref;

use certkit::decoder::{DecodableFrom, Decoder};
use certkit::encoder::{EncodableTo, Encoder};
use certkit_asn1::Element;
use serde::Serialize;

use crate::error::{Error, Result};

/// The ASN.1 string type a value was encoded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StringKind {
    Utf8,
    Printable,
    Teletex,
    Ia5,
    Visible,
    Universal,
    Bmp,
}

/// Text together with its original string type, so that re-encoding
/// reproduces the same tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DirectoryString {
    kind: StringKind,
    inner: String,
}

impl DirectoryString {
    /// Create a new DirectoryString of the given kind
    pub fn new(kind: StringKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            inner: value.into(),
        }
    }

    /// A UTF8String, or a PrintableString when the text fits its alphabet.
    pub fn preferred(value: impl Into<String>) -> Self {
        let inner = value.into();
        let kind = if is_printable_string(&inner) {
            StringKind::Printable
        } else {
            StringKind::Utf8
        };
        Self { kind, inner }
    }

    /// Get the string kind
    pub fn kind(&self) -> StringKind {
        self.kind
    }

    /// Get the string value
    pub fn as_str(&self) -> &str {
        &self.inner
    }
}

impl Serialize for DirectoryString {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.inner.serialize(serializer)
    }
}

impl AsRef<str> for DirectoryString {
    fn as_ref(&self) -> &str {
        &self.inner
    }
}

impl Deref for DirectoryString {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl From<&str> for DirectoryString {
    fn from(value: &str) -> Self {
        Self::preferred(value)
    }
}

impl From<DirectoryString> for String {
    fn from(ds: DirectoryString) -> Self {
        ds.inner
    }
}

impl TryFrom<&Element> for DirectoryString {
    type Error = Error;

    fn try_from(element: &Element) -> Result<Self> {
        let kind = match element {
            Element::UTF8String(_) => StringKind::Utf8,
            Element::PrintableString(_) => StringKind::Printable,
            Element::TeletexString(_) => StringKind::Teletex,
            Element::IA5String(_) => StringKind::Ia5,
            Element::VisibleString(_) => StringKind::Visible,
            Element::UniversalString(_) => StringKind::Universal,
            Element::BMPString(_) => StringKind::Bmp,
            other => return Err(Error::DirectoryStringExpectedStringType(other.type_name())),
        };
        let inner = element.as_str().unwrap_or_default().to_string();
        Ok(Self { kind, inner })
    }
}

impl From<&DirectoryString> for Element {
    fn from(ds: &DirectoryString) -> Self {
        let text = ds.inner.clone();
        match ds.kind {
            StringKind::Utf8 => Element::UTF8String(text),
            StringKind::Printable => Element::PrintableString(text),
            StringKind::Teletex => Element::TeletexString(text),
            StringKind::Ia5 => Element::IA5String(text),
            StringKind::Visible => Element::VisibleString(text),
            StringKind::Universal => Element::UniversalString(text),
            StringKind::Bmp => Element::BMPString(text),
        }
    }
}

impl fmt::Display for DirectoryString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl DecodableFrom<Element> for DirectoryString {}

impl Decoder<Element, DirectoryString> for Element {
    type Error = Error;

    fn decode(&self) -> Result<DirectoryString> {
        DirectoryString::try_from(self)
    }
}

impl EncodableTo<DirectoryString> for Element {}

impl Encoder<DirectoryString, Element> for DirectoryString {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        Ok(self.into())
    }
}

/// PrintableString allows: A-Z, a-z, 0-9, space, and ' ( ) + , - . / : = ?
fn is_printable_string(s: &str) -> bool {
    s.chars()
        .all(|c| c.is_ascii_alphanumeric() || " '()+,-./:=?".contains(c))
}
