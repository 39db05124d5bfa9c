//! PEM armor (RFC 7468) around DER-encoded certificates.
//!
//! Parsing is lax in the RFC 7468 sense: text before, between and after
//! blocks is ignored, and trailing whitespace on any line is accepted.

pub mod error;

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use base64::{Engine, engine::general_purpose::STANDARD};
use certkit::decoder::{DecodableFrom, Decoder};
use regex::Regex;

pub use error::Error;

const CERTIFICATE_LABEL: &str = "CERTIFICATE";
const TRUSTED_CERTIFICATE_LABEL: &str = "TRUSTED CERTIFICATE";

const BOUNDARY_PATTERN: &str = r"^-----(BEGIN|END) ([\x21-\x2C\x2E-\x7E]+(?:[- ][\x21-\x2C\x2E-\x7E]+)*)?-----[ \t]*$";

/// Width of base64 lines written by [`Pem`]'s `Display`.
pub const LINE_WIDTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Label {
    /// X.509 Certificate
    Certificate,
    /// OpenSSL certificate with trust settings appended
    TrustedCertificate,
    /// Any other label, kept verbatim
    Other(String),
}

impl Label {
    pub fn is_certificate(&self) -> bool {
        matches!(self, Label::Certificate | Label::TrustedCertificate)
    }
}

impl Display for Label {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Label::Certificate => write!(f, "{}", CERTIFICATE_LABEL),
            Label::TrustedCertificate => write!(f, "{}", TRUSTED_CERTIFICATE_LABEL),
            Label::Other(label) => write!(f, "{}", label),
        }
    }
}

impl From<&str> for Label {
    fn from(s: &str) -> Self {
        match s {
            CERTIFICATE_LABEL => Label::Certificate,
            TRUSTED_CERTIFICATE_LABEL => Label::TrustedCertificate,
            other => Label::Other(other.to_string()),
        }
    }
}

/*
ref: https://www.rfc-editor.org/rfc/rfc7468.html#section-3

stricttextualmsg = preeb eol strictbase64text postebeol
*/

/// One PEM block: a label and its base64 payload with line breaks removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pem {
    label: Label,
    base64_data: String,
}

impl Pem {
    pub fn new(label: Label, base64_data: String) -> Self {
        Pem { label, base64_data }
    }

    pub fn from_der(label: Label, der: &[u8]) -> Self {
        Pem {
            label,
            base64_data: STANDARD.encode(der),
        }
    }

    pub fn label(&self) -> &Label {
        &self.label
    }

    pub fn data(&self) -> &str {
        &self.base64_data
    }
}

impl Display for Pem {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "-----BEGIN {}-----", self.label)?;
        for chunk in self.base64_data.as_bytes().chunks(LINE_WIDTH) {
            let line = std::str::from_utf8(chunk).map_err(|_| std::fmt::Error)?;
            writeln!(f, "{}", line)?;
        }
        writeln!(f, "-----END {}-----", self.label)
    }
}

impl DecodableFrom<Pem> for Vec<u8> {}

impl Decoder<Pem, Vec<u8>> for Pem {
    type Error = Error;

    fn decode(&self) -> Result<Vec<u8>, Self::Error> {
        Ok(STANDARD.decode(self.data())?)
    }
}

impl DecodableFrom<&str> for Pem {}

impl Decoder<&str, Pem> for &str {
    type Error = Error;

    fn decode(&self) -> Result<Pem, Self::Error> {
        Pem::from_str(self)
    }
}

/// The first block in `s`.
impl FromStr for Pem {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_many(s)?
            .into_iter()
            .next()
            .ok_or(Error::MissingBeginBoundary)
    }
}

enum Boundary<'a> {
    Begin(&'a str),
    End(&'a str),
}

fn boundary<'a>(re: &Regex, line: &'a str) -> Option<Boundary<'a>> {
    let captures = re.captures(line)?;
    let label = captures.get(2).map_or("", |m| m.as_str());
    match captures.get(1)?.as_str() {
        "BEGIN" => Some(Boundary::Begin(label)),
        _ => Some(Boundary::End(label)),
    }
}

fn is_base64_text(line: &str) -> bool {
    line.bytes()
        .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'/' | b'='))
}

/// Every PEM block in `s`, in order.
///
/// Fails if there is no block at all or if any block is malformed.
pub fn parse_many(s: &str) -> Result<Vec<Pem>, Error> {
    let re = Regex::new(BOUNDARY_PATTERN).map_err(|e| Error::Pattern(e.to_string()))?;

    let mut pems = Vec::new();
    let mut current: Option<(&str, String)> = None;

    for (index, line) in s.lines().enumerate() {
        let line = line.trim_end();
        match (boundary(&re, line), current.take()) {
            (Some(Boundary::Begin(label)), None) => current = Some((label, String::new())),
            (Some(Boundary::Begin(_)), Some((open, _))) => {
                return Err(Error::MissingEndBoundary(open.to_string()));
            }
            (Some(Boundary::End(label)), Some((open, data))) => {
                if label != open {
                    return Err(Error::LabelMismatch {
                        expected: open.to_string(),
                        found: label.to_string(),
                    });
                }
                if data.is_empty() {
                    return Err(Error::MissingData(open.to_string()));
                }
                pems.push(Pem::new(Label::from(open), data));
            }
            // explanatory text outside a block
            (Some(Boundary::End(_)), None) | (None, None) => {}
            (None, Some((open, mut data))) => {
                let text = line.trim_start();
                if !text.is_empty() {
                    if !is_base64_text(text) {
                        return Err(Error::InvalidBase64Line(index + 1));
                    }
                    data.push_str(text);
                }
                current = Some((open, data));
            }
        }
    }

    if let Some((open, _)) = current {
        return Err(Error::MissingEndBoundary(open.to_string()));
    }
    if pems.is_empty() {
        return Err(Error::MissingBeginBoundary);
    }
    Ok(pems)
}

/// DER bytes of every certificate block in `s`; other blocks are skipped.
pub fn certificates(s: &str) -> Result<Vec<Vec<u8>>, Error> {
    parse_many(s)?
        .iter()
        .filter(|pem| pem.label().is_certificate())
        .map(|pem| pem.decode())
        .collect()
}

/// Whether `bytes` look like PEM text rather than binary DER.
pub fn is_pem(bytes: &[u8]) -> bool {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    bytes[start..].starts_with(b"-----BEGIN ")
        || std::str::from_utf8(bytes).is_ok_and(|s| s.contains("\n-----BEGIN "))
}
