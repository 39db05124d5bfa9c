use std::fmt;

use crate::error::Error;

pub const TAG_CONSTRUCTED: u8 = 0x20;
const TAG_NUMBER_MASK: u8 = 0x1f;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TagClass {
    Universal,
    Application,
    ContextSpecific,
    Private,
}

impl TagClass {
    fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0b00 => TagClass::Universal,
            0b01 => TagClass::Application,
            0b10 => TagClass::ContextSpecific,
            _ => TagClass::Private,
        }
    }

    fn bits(self) -> u8 {
        match self {
            TagClass::Universal => 0b00,
            TagClass::Application => 0b01,
            TagClass::ContextSpecific => 0b10,
            TagClass::Private => 0b11,
        }
    }
}

/// An identifier octet in low-tag-number form.
///
/// Tag numbers of 31 and above need the multi-octet high-tag-number form,
/// which X.509 never uses; those are rejected with [`Error::UnsupportedTag`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tag {
    class: TagClass,
    constructed: bool,
    number: u8,
}

impl Tag {
    pub const BOOLEAN: Tag = Tag::universal(0x01, false);
    pub const INTEGER: Tag = Tag::universal(0x02, false);
    pub const BIT_STRING: Tag = Tag::universal(0x03, false);
    pub const OCTET_STRING: Tag = Tag::universal(0x04, false);
    pub const NULL: Tag = Tag::universal(0x05, false);
    pub const OBJECT_IDENTIFIER: Tag = Tag::universal(0x06, false);
    pub const UTF8_STRING: Tag = Tag::universal(0x0c, false);
    pub const SEQUENCE: Tag = Tag::universal(0x10, true);
    pub const SET: Tag = Tag::universal(0x11, true);
    pub const PRINTABLE_STRING: Tag = Tag::universal(0x13, false);
    pub const TELETEX_STRING: Tag = Tag::universal(0x14, false);
    pub const IA5_STRING: Tag = Tag::universal(0x16, false);
    pub const UTC_TIME: Tag = Tag::universal(0x17, false);
    pub const GENERALIZED_TIME: Tag = Tag::universal(0x18, false);
    pub const VISIBLE_STRING: Tag = Tag::universal(0x1a, false);
    pub const UNIVERSAL_STRING: Tag = Tag::universal(0x1c, false);
    pub const BMP_STRING: Tag = Tag::universal(0x1e, false);

    pub const fn universal(number: u8, constructed: bool) -> Self {
        Tag {
            class: TagClass::Universal,
            constructed,
            number: number & TAG_NUMBER_MASK,
        }
    }

    /// A context-specific tag `[slot]`.
    pub const fn context(slot: u8, constructed: bool) -> Self {
        Tag {
            class: TagClass::ContextSpecific,
            constructed,
            number: slot & TAG_NUMBER_MASK,
        }
    }

    pub fn class(&self) -> TagClass {
        self.class
    }

    pub fn is_constructed(&self) -> bool {
        self.constructed
    }

    pub fn number(&self) -> u8 {
        self.number
    }

    /// Returns the slot number when this is a context-specific tag.
    pub fn context_slot(&self) -> Option<u8> {
        (self.class == TagClass::ContextSpecific).then_some(self.number)
    }

    pub fn name(&self) -> Option<&'static str> {
        if self.class != TagClass::Universal {
            return None;
        }
        let name = match self.number {
            0x01 => "BOOLEAN",
            0x02 => "INTEGER",
            0x03 => "BIT STRING",
            0x04 => "OCTET STRING",
            0x05 => "NULL",
            0x06 => "OBJECT IDENTIFIER",
            0x0a => "ENUMERATED",
            0x0c => "UTF8String",
            0x10 => "SEQUENCE",
            0x11 => "SET",
            0x12 => "NumericString",
            0x13 => "PrintableString",
            0x14 => "TeletexString",
            0x16 => "IA5String",
            0x17 => "UTCTime",
            0x18 => "GeneralizedTime",
            0x1a => "VisibleString",
            0x1c => "UniversalString",
            0x1e => "BMPString",
            _ => return None,
        };
        Some(name)
    }
}

impl TryFrom<u8> for Tag {
    type Error = Error;

    fn try_from(octet: u8) -> Result<Self, Self::Error> {
        let number = octet & TAG_NUMBER_MASK;
        if number == TAG_NUMBER_MASK {
            return Err(Error::UnsupportedTag(octet));
        }
        Ok(Tag {
            class: TagClass::from_bits(octet >> 6),
            constructed: octet & TAG_CONSTRUCTED == TAG_CONSTRUCTED,
            number,
        })
    }
}

impl From<Tag> for u8 {
    fn from(tag: Tag) -> Self {
        let constructed = if tag.constructed { TAG_CONSTRUCTED } else { 0 };
        (tag.class.bits() << 6) | constructed | tag.number
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.class, self.name()) {
            (TagClass::Universal, Some(name)) => write!(f, "{name}"),
            (TagClass::Universal, None) => write!(f, "[UNIVERSAL {}]", self.number),
            (TagClass::Application, _) => write!(f, "[APPLICATION {}]", self.number),
            (TagClass::ContextSpecific, _) => write!(f, "[{}]", self.number),
            (TagClass::Private, _) => write!(f, "[PRIVATE {}]", self.number),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest(input, expected,
        case(0x02, Tag::INTEGER),
        case(0x30, Tag::SEQUENCE),
        case(0x31, Tag::SET),
        case(0x0c, Tag::UTF8_STRING),
        case(0xa0, Tag::context(0, true)),
        case(0xa3, Tag::context(3, true)),
        case(0x81, Tag::context(1, false)),
        case(0x87, Tag::context(7, false)),
    )]
    fn test_tag_from_octet(input: u8, expected: Tag) {
        let actual = Tag::try_from(input).unwrap();
        assert_eq!(expected, actual);
        assert_eq!(input, u8::from(actual));
    }

    #[rstest(input, case(0x1f), case(0x3f), case(0xbf), case(0xff))]
    fn test_high_tag_number_form_is_unsupported(input: u8) {
        assert_eq!(Tag::try_from(input), Err(Error::UnsupportedTag(input)));
    }

    #[rstest(input, expected,
        case(Tag::SEQUENCE, "SEQUENCE"),
        case(Tag::context(3, true), "[3]"),
        case(Tag::universal(0x08, true), "[UNIVERSAL 8]"),
    )]
    fn test_tag_display(input: Tag, expected: &str) {
        assert_eq!(expected, input.to_string());
    }

    #[test]
    fn test_application_class() {
        let tag = Tag::try_from(0x61).unwrap();
        assert_eq!(TagClass::Application, tag.class());
        assert!(tag.is_constructed());
        assert_eq!(1, tag.number());
        assert_eq!(None, tag.context_slot());
    }
}
