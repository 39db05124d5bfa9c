//! Character string codecs for the universal string types X.509 names use.

use crate::error::Error;

pub(crate) fn decode_utf8(data: &[u8]) -> Result<String, Error> {
    String::from_utf8(data.to_vec()).map_err(|_| Error::Utf8StringInvalidUtf8)
}

/// PrintableString, IA5String and VisibleString.
///
/// Only the 7-bit range is enforced. PrintableString in the wild regularly
/// carries `*`, `@` or `&`, so its narrower alphabet is not checked.
pub(crate) fn decode_ascii(data: &[u8], kind: &'static str) -> Result<String, Error> {
    if !data.is_ascii() {
        return Err(Error::NonAsciiString(kind));
    }
    Ok(data.iter().map(|&b| b as char).collect())
}

pub(crate) fn encode_ascii(s: &str, kind: &'static str) -> Result<Vec<u8>, Error> {
    if !s.is_ascii() {
        return Err(Error::NonAsciiString(kind));
    }
    Ok(s.as_bytes().to_vec())
}

// T.61 is decoded octet-for-octet as Latin-1, which keeps every byte
// recoverable on the way back out.
pub(crate) fn decode_teletex(data: &[u8]) -> String {
    data.iter().map(|&b| b as char).collect()
}

pub(crate) fn encode_teletex(s: &str) -> Result<Vec<u8>, Error> {
    s.chars()
        .map(|c| u8::try_from(u32::from(c)).map_err(|_| Error::TeletexStringUnencodable(c)))
        .collect()
}

pub(crate) fn decode_bmp(data: &[u8]) -> Result<String, Error> {
    if data.len() % 2 != 0 {
        return Err(Error::BmpStringOddLength(data.len()));
    }
    let units = data
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]));
    char::decode_utf16(units)
        .map(|r| r.map_err(|e| Error::BmpStringUnpairedSurrogate(e.unpaired_surrogate())))
        .collect()
}

pub(crate) fn encode_bmp(s: &str) -> Vec<u8> {
    s.encode_utf16().flat_map(u16::to_be_bytes).collect()
}

pub(crate) fn decode_universal(data: &[u8]) -> Result<String, Error> {
    if data.len() % 4 != 0 {
        return Err(Error::UniversalStringInvalidLength(data.len()));
    }
    data.chunks_exact(4)
        .map(|quad| {
            let code = u32::from_be_bytes([quad[0], quad[1], quad[2], quad[3]]);
            char::from_u32(code).ok_or(Error::UniversalStringInvalidCodePoint(code))
        })
        .collect()
}

pub(crate) fn encode_universal(s: &str) -> Vec<u8> {
    s.chars().flat_map(|c| u32::from(c).to_be_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest(input, expected,
        case(vec![0x00, 0x41, 0x00, 0x42], "AB"),
        case(vec![0x30, 0x42, 0x30, 0x44], "あい"),
        case(vec![0xd8, 0x3d, 0xde, 0x0e], "😎"),
        case(vec![], ""),
    )]
    fn test_bmp_string(input: Vec<u8>, expected: &str) {
        assert_eq!(expected, decode_bmp(&input).unwrap());
        assert_eq!(input, encode_bmp(expected));
    }

    #[rstest(input, expected,
        case(vec![0x00, 0x41, 0x00], Error::BmpStringOddLength(3)),
        case(vec![0xd8, 0x3d], Error::BmpStringUnpairedSurrogate(0xd83d)),
    )]
    fn test_bmp_string_invalid(input: Vec<u8>, expected: Error) {
        let err = decode_bmp(&input).unwrap_err();
        assert_eq!(expected.to_string(), err.to_string());
    }

    #[rstest(input, expected,
        case(vec![0x00, 0x00, 0x00, 0x41], "A"),
        case(vec![0x00, 0x01, 0xf6, 0x0e], "😎"),
    )]
    fn test_universal_string(input: Vec<u8>, expected: &str) {
        assert_eq!(expected, decode_universal(&input).unwrap());
        assert_eq!(input, encode_universal(expected));
    }

    #[test]
    fn test_teletex_keeps_every_octet() {
        let input = vec![0x41, 0xe9, 0xff];
        let decoded = decode_teletex(&input);
        assert_eq!("Aéÿ", decoded);
        assert_eq!(input, encode_teletex(&decoded).unwrap());
        assert!(encode_teletex("あ").is_err());
    }

    #[rstest(input, ok, case(b"Example *.test".to_vec(), true), case(vec![0x41, 0xc3, 0xa9], false))]
    fn test_ascii(input: Vec<u8>, ok: bool) {
        assert_eq!(ok, decode_ascii(&input, "PrintableString").is_ok());
    }
}
