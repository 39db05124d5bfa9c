use certkit_asn1::{ObjectIdentifier, to_hex};
use certkit_der::{Mode, Reader, Tag, TagClass};
use clap::Args;

use crate::error::Result;
use crate::utils::{certificate_der, read_input};

/// Primitive values longer than this are shown as a byte count.
const MAX_PREVIEW_BYTES: usize = 32;

#[derive(Args)]
pub(crate) struct Config {
    /// Path to the DER or PEM file. Reads stdin if omitted or `-`
    file: Option<String>,

    /// Reject non-minimal length encodings
    #[arg(long)]
    strict: bool,
}

pub(crate) fn execute(config: Config) -> Result<()> {
    let der = certificate_der(read_input(config.file.as_deref())?)?;
    let mode = if config.strict { Mode::Strict } else { Mode::Lenient };

    let mut output = String::new();
    let mut reader = Reader::with_mode(&der, mode);
    dump(&mut reader, 0, 0, &mut output)?;
    print!("{output}");
    Ok(())
}

/// One line per TLV in the style of `openssl asn1parse`:
/// `offset:d=depth hl=header l=length cons|prim: TAG value`.
fn dump(reader: &mut Reader<'_>, base: usize, depth: usize, output: &mut String) -> Result<()> {
    while !reader.is_empty() {
        let offset = base + reader.position();
        let header = reader.peek_header()?;
        let kind = if header.tag.is_constructed() { "cons" } else { "prim" };
        output.push_str(&format!(
            "{:5}:d={:<2} hl={} l={:4} {}: {}{}",
            offset,
            depth,
            header.header_len,
            header.length,
            kind,
            "  ".repeat(depth),
            header.tag,
        ));

        if header.tag.is_constructed() {
            output.push('\n');
            let (_, mut inner) = reader.enter()?;
            dump(&mut inner, offset + header.header_len, depth + 1, output)?;
        } else {
            let (tag, value) = reader.read_value()?;
            match preview(&tag, value) {
                Some(text) => output.push_str(&format!(" :{text}\n")),
                None => output.push('\n'),
            }
        }
    }
    Ok(())
}

fn preview(tag: &Tag, value: &[u8]) -> Option<String> {
    if tag.class() != TagClass::Universal {
        return short_hex(value);
    }
    match *tag {
        Tag::OBJECT_IDENTIFIER => ObjectIdentifier::try_from(value)
            .ok()
            .map(|oid| oid.to_string()),
        Tag::BOOLEAN => value.first().map(|b| (*b != 0).to_string().to_uppercase()),
        Tag::NULL => None,
        Tag::UTF8_STRING
        | Tag::PRINTABLE_STRING
        | Tag::IA5_STRING
        | Tag::VISIBLE_STRING
        | Tag::UTC_TIME
        | Tag::GENERALIZED_TIME => std::str::from_utf8(value).ok().map(str::to_string),
        _ => short_hex(value),
    }
}

fn short_hex(value: &[u8]) -> Option<String> {
    match value.len() {
        0 => None,
        len if len > MAX_PREVIEW_BYTES => Some(format!("[{len} bytes]")),
        _ => Some(to_hex(value)),
    }
}
