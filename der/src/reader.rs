use nom::{IResult, Parser};

use crate::error::{Error, LengthError};
use crate::{Tag, Tlv};

/// Maximum number of nested constructed values a [`Reader`] will enter.
pub const MAX_DEPTH: usize = 64;

const MAX_LENGTH_OCTETS: u8 = 4;

/// Length-encoding rules applied while reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Only shortest-form lengths are accepted.
    Strict,
    /// Definite long-form lengths with redundant octets are accepted.
    #[default]
    Lenient,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub tag: Tag,
    pub length: usize,
    pub header_len: usize,
}

impl Header {
    pub fn total_len(&self) -> usize {
        self.header_len + self.length
    }
}

fn truncated(needed: usize, available: usize) -> Error {
    Error::TruncatedInput { needed, available }
}

fn octet(input: &[u8]) -> IResult<&[u8], u8> {
    nom::number::be_u8().parse(input)
}

fn octets(input: &[u8], count: usize) -> IResult<&[u8], &[u8]> {
    nom::bytes::complete::take(count).parse(input)
}

pub(crate) fn parse_tag(input: &[u8]) -> Result<(&[u8], Tag), Error> {
    let (rest, identifier) = octet(input).map_err(|_| truncated(1, input.len()))?;
    Ok((rest, Tag::try_from(identifier)?))
}

pub(crate) fn parse_length(input: &[u8], mode: Mode) -> Result<(&[u8], usize), Error> {
    let (rest, first) = octet(input).map_err(|_| truncated(1, input.len()))?;
    if first & 0x80 == 0 {
        // short form: 0-127
        return Ok((rest, first as usize));
    }

    // long form: low 7 bits count the length octets that follow
    let count = first & 0x7f;
    if count == 0 {
        return Err(Error::InvalidLength(LengthError::Indefinite));
    }
    if count > MAX_LENGTH_OCTETS {
        return Err(Error::InvalidLength(LengthError::TooManyOctets(count)));
    }
    let (rest, bytes) =
        octets(rest, count as usize).map_err(|_| truncated(count as usize, rest.len()))?;
    let length = bytes.iter().fold(0usize, |n, &b| (n << 8) | b as usize);

    if mode == Mode::Strict && (bytes.first() == Some(&0) || length < 0x80) {
        return Err(Error::InvalidLength(LengthError::NonMinimal));
    }
    Ok((rest, length))
}

pub(crate) fn parse_header(input: &[u8], mode: Mode) -> Result<Header, Error> {
    let (rest, tag) = parse_tag(input)?;
    let (rest, length) = parse_length(rest, mode)?;
    Ok(Header {
        tag,
        length,
        header_len: input.len() - rest.len(),
    })
}

/// A cursor over a DER buffer.
///
/// Each call consumes one tag-length-value unit. Constructed values are
/// opened with [`Reader::enter`], which hands back a reader scoped to the
/// value's content so that a nested element can never read past its parent.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    input: &'a [u8],
    position: usize,
    depth: usize,
    mode: Mode,
}

impl<'a> Reader<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self::with_mode(input, Mode::default())
    }

    pub fn with_mode(input: &'a [u8], mode: Mode) -> Self {
        Reader {
            input,
            position: 0,
            depth: 0,
            mode,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn remaining(&self) -> &'a [u8] {
        self.input.get(self.position..).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.remaining().is_empty()
    }

    pub fn peek_tag(&self) -> Result<Tag, Error> {
        parse_tag(self.remaining()).map(|(_, tag)| tag)
    }

    /// Parses the next header and checks that its value fits in the buffer.
    pub fn peek_header(&self) -> Result<Header, Error> {
        let rest = self.remaining();
        let header = parse_header(rest, self.mode)?;
        let available = rest.len() - header.header_len;
        if header.length > available {
            return Err(truncated(header.length, available));
        }
        Ok(header)
    }

    /// Reads the next element and returns its tag and value bytes.
    pub fn read_value(&mut self) -> Result<(Tag, &'a [u8]), Error> {
        let header = self.peek_header()?;
        let start = self.position + header.header_len;
        let end = start + header.length;
        let value = self
            .input
            .get(start..end)
            .ok_or_else(|| truncated(header.length, self.input.len().saturating_sub(start)))?;
        self.position = end;
        Ok((header.tag, value))
    }

    /// Steps into the next constructed element.
    pub fn enter(&mut self) -> Result<(Tag, Reader<'a>), Error> {
        let header = self.peek_header()?;
        if !header.tag.is_constructed() {
            return Err(Error::NotConstructed(header.tag));
        }
        if self.depth >= MAX_DEPTH {
            return Err(Error::NestingTooDeep(MAX_DEPTH));
        }
        let (tag, content) = self.read_value()?;
        let nested = Reader {
            input: content,
            position: 0,
            depth: self.depth + 1,
            mode: self.mode,
        };
        Ok((tag, nested))
    }

    pub fn skip(&mut self) -> Result<(), Error> {
        self.read_value().map(|_| ())
    }

    /// Reads the next element as an owned TLV tree.
    pub fn read_tlv(&mut self) -> Result<Tlv, Error> {
        if self.peek_header()?.tag.is_constructed() {
            let (tag, mut nested) = self.enter()?;
            let mut tlvs = Vec::new();
            while !nested.is_empty() {
                tlvs.push(nested.read_tlv()?);
            }
            Ok(Tlv::new_constructed(tag, tlvs))
        } else {
            let (tag, value) = self.read_value()?;
            Ok(Tlv::new_primitive(tag, value.to_vec()))
        }
    }

    /// Fails if any bytes are left unread.
    pub fn finish(&self) -> Result<(), Error> {
        match self.remaining().len() {
            0 => Ok(()),
            n => Err(Error::TrailingData(n)),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest(input, expected,
        case(vec![0x02], 0x02),
        case(vec![0x30, 0x01], 0x30),
        case(vec![0x7f], 0x7f),
        case(vec![0x81, 0x80], 0x80),
        case(vec![0x82, 0x02, 0x10], 256 * 0x02 + 0x10),
        case(vec![0x83, 0x01, 0x00, 0x00], 256 * 256),
        case(vec![0x82, 0xff, 0xff], 256 * 0xff + 0xff),
    )]
    fn test_parse_length(input: Vec<u8>, expected: usize) {
        let (_, actual) = parse_length(&input, Mode::Strict).unwrap();
        assert_eq!(expected, actual);
    }

    #[rstest(input, expected,
        case(vec![0x81, 0x05], 5),
        case(vec![0x82, 0x00, 0x90], 0x90),
    )]
    fn test_parse_length_non_minimal(input: Vec<u8>, expected: usize) {
        let (_, actual) = parse_length(&input, Mode::Lenient).unwrap();
        assert_eq!(expected, actual);

        let err = parse_length(&input, Mode::Strict).unwrap_err();
        assert_eq!(Error::InvalidLength(LengthError::NonMinimal), err);
    }

    #[rstest(input, expected,
        case(vec![0x80], Error::InvalidLength(LengthError::Indefinite)),
        case(vec![0x85, 0x01, 0x00, 0x00, 0x00, 0x00], Error::InvalidLength(LengthError::TooManyOctets(5))),
        case(vec![0xff], Error::InvalidLength(LengthError::TooManyOctets(0x7f))),
        case(vec![], Error::TruncatedInput { needed: 1, available: 0 }),
        case(vec![0x82, 0x01], Error::TruncatedInput { needed: 2, available: 1 }),
    )]
    fn test_parse_length_error(input: Vec<u8>, expected: Error) {
        let err = parse_length(&input, Mode::Lenient).unwrap_err();
        assert_eq!(expected, err);
    }

    #[test]
    fn test_reader_walks_sequence() {
        // SEQUENCE { INTEGER 7, SEQUENCE { BOOLEAN TRUE }, NULL }
        let input = [
            0x30, 0x0a, 0x02, 0x01, 0x07, 0x30, 0x03, 0x01, 0x01, 0xff, 0x05, 0x00,
        ];
        let mut reader = Reader::new(&input);
        assert_eq!(Tag::SEQUENCE, reader.peek_tag().unwrap());

        let (tag, mut seq) = reader.enter().unwrap();
        assert_eq!(Tag::SEQUENCE, tag);
        assert_eq!(1, seq.depth());
        assert!(reader.finish().is_ok());

        assert_eq!((Tag::INTEGER, &[0x07][..]), seq.read_value().unwrap());
        seq.skip().unwrap();
        assert_eq!(Tag::NULL, seq.peek_tag().unwrap());
        assert_eq!((Tag::NULL, &[][..]), seq.read_value().unwrap());
        assert!(seq.is_empty());
        assert_eq!(
            Error::TruncatedInput {
                needed: 1,
                available: 0
            },
            seq.peek_tag().unwrap_err()
        );
    }

    #[test]
    fn test_enter_primitive_fails() {
        let input = [0x02, 0x01, 0x01];
        let mut reader = Reader::new(&input);
        assert_eq!(
            Error::NotConstructed(Tag::INTEGER),
            reader.enter().unwrap_err()
        );
        // the cursor does not move on failure
        assert_eq!(0, reader.position());
    }

    #[test]
    fn test_value_longer_than_input() {
        let input = [0x30, 0x05, 0x02, 0x01];
        let reader = Reader::new(&input);
        assert_eq!(
            Error::TruncatedInput {
                needed: 5,
                available: 2
            },
            reader.peek_header().unwrap_err()
        );
    }

    #[test]
    fn test_nested_value_cannot_escape_parent() {
        // The inner INTEGER claims 3 bytes but its parent only holds 2.
        let input = [0x30, 0x03, 0x02, 0x03, 0x01, 0x02, 0x03];
        let mut reader = Reader::new(&input);
        let (_, mut seq) = reader.enter().unwrap();
        assert!(matches!(
            seq.read_value(),
            Err(Error::TruncatedInput { .. })
        ));
    }

    #[test]
    fn test_finish_reports_trailing_data() {
        let input = [0x05, 0x00, 0xde, 0xad];
        let mut reader = Reader::new(&input);
        reader.skip().unwrap();
        assert_eq!(Error::TrailingData(2), reader.finish().unwrap_err());
    }

    fn nested_sequences(levels: usize) -> Vec<u8> {
        let mut encoded = Vec::new();
        for _ in 0..levels {
            encoded = Tlv::new_primitive(Tag::SEQUENCE, encoded).to_der_bytes();
        }
        encoded
    }

    #[rstest(levels, ok, case(1, true), case(MAX_DEPTH, true), case(MAX_DEPTH + 1, false))]
    fn test_nesting_limit(levels: usize, ok: bool) {
        let input = nested_sequences(levels);
        let result = Reader::new(&input).read_tlv();
        if ok {
            assert!(result.is_ok());
        } else {
            assert_eq!(Error::NestingTooDeep(MAX_DEPTH), result.unwrap_err());
        }
    }
}
