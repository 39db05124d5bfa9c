use chrono::{Datelike, NaiveDateTime};

use crate::error::Error;

const DIGITS_FORMAT: &str = "%Y%m%d%H%M%S";

fn digits_with_zulu(data: &[u8], len: usize) -> Option<&str> {
    let (digits, zulu) = data.split_at_checked(len)?;
    if zulu != b"Z" || !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }
    std::str::from_utf8(digits).ok()
}

/// Parses `YYMMDDHHMMSSZ`. Years 50-99 fall in the 1900s, 00-49 in the 2000s.
pub(crate) fn parse_utc_time(data: &[u8]) -> Result<NaiveDateTime, Error> {
    let digits = digits_with_zulu(data, 12).ok_or(Error::UtcTimeInvalidFormat)?;
    let century = if digits < "50" { "20" } else { "19" };
    NaiveDateTime::parse_from_str(&format!("{century}{digits}"), DIGITS_FORMAT)
        .map_err(|_| Error::UtcTimeInvalidFormat)
}

/// Parses `YYYYMMDDHHMMSSZ`.
pub(crate) fn parse_generalized_time(data: &[u8]) -> Result<NaiveDateTime, Error> {
    let digits = digits_with_zulu(data, 14).ok_or(Error::GeneralizedTimeInvalidFormat)?;
    NaiveDateTime::parse_from_str(digits, DIGITS_FORMAT)
        .map_err(|_| Error::GeneralizedTimeInvalidFormat)
}

pub(crate) fn format_utc_time(dt: &NaiveDateTime) -> Result<Vec<u8>, Error> {
    if !(1950..2050).contains(&dt.year()) {
        return Err(Error::UtcTimeYearOutOfRange(dt.year()));
    }
    Ok(dt.format("%y%m%d%H%M%SZ").to_string().into_bytes())
}

pub(crate) fn format_generalized_time(dt: &NaiveDateTime) -> Vec<u8> {
    dt.format("%Y%m%d%H%M%SZ").to_string().into_bytes()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    #[rstest(input, expected,
        case(b"191216030210Z".to_vec(), "2019-12-16 03:02:10"),
        case(b"031227050815Z".to_vec(), "2003-12-27 05:08:15"),
        case(b"491231235959Z".to_vec(), "2049-12-31 23:59:59"),
        case(b"500101000000Z".to_vec(), "1950-01-01 00:00:00"),
        case(b"991231235959Z".to_vec(), "1999-12-31 23:59:59"),
    )]
    fn test_parse_utc_time(input: Vec<u8>, expected: &str) {
        let expected = NaiveDateTime::parse_from_str(expected, FORMAT).unwrap();
        let actual = parse_utc_time(&input).unwrap();
        assert_eq!(expected, actual);
        assert_eq!(input, format_utc_time(&actual).unwrap());
    }

    #[rstest(input,
        case(b"1912160302Z".to_vec()),
        case(b"191216030210".to_vec()),
        case(b"191216030210+0900".to_vec()),
        case(b"191316030210Z".to_vec()),
        case(b"19121603021 Z".to_vec()),
    )]
    fn test_parse_utc_time_invalid(input: Vec<u8>) {
        assert!(parse_utc_time(&input).is_err());
    }

    #[rstest(input, expected,
        case(b"20191216030210Z".to_vec(), "2019-12-16 03:02:10"),
        case(b"25181121222525Z".to_vec(), "2518-11-21 22:25:25"),
        case(b"99991231235959Z".to_vec(), "9999-12-31 23:59:59"),
    )]
    fn test_parse_generalized_time(input: Vec<u8>, expected: &str) {
        let expected = NaiveDateTime::parse_from_str(expected, FORMAT).unwrap();
        let actual = parse_generalized_time(&input).unwrap();
        assert_eq!(expected, actual);
        assert_eq!(input, format_generalized_time(&actual));
    }

    #[test]
    fn test_utc_time_out_of_range() {
        let dt = NaiveDateTime::parse_from_str("2518-11-21 22:25:25", FORMAT).unwrap();
        assert!(matches!(
            format_utc_time(&dt),
            Err(Error::UtcTimeYearOutOfRange(2518))
        ));
    }
}
