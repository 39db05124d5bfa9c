use certkit_x509::{Certificate, Property, PropertyValue};
use clap::Args;

use crate::error::Result;
use crate::output::OutputFormat;
use crate::utils::{certificate_der, read_input};

const DATA_BYTES_PER_LINE: usize = 16;

#[derive(Args)]
pub(crate) struct Config {
    /// Path to the certificate file (PEM or DER format). Reads stdin if omitted or `-`
    file: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    output: OutputFormat,

    /// Show only the subject
    #[arg(long)]
    show_subject: bool,

    /// Show only the issuer
    #[arg(long)]
    show_issuer: bool,

    /// Show only the subject alternative names
    #[arg(long)]
    show_san: bool,

    /// Show only email addresses from the subject and SAN
    #[arg(long)]
    show_emails: bool,

    /// Show only the key usage
    #[arg(long)]
    show_key_usage: bool,

    /// Show only the serial number
    #[arg(long)]
    show_serial: bool,
}

impl Config {
    fn should_show_specific_fields(&self) -> bool {
        self.show_subject
            || self.show_issuer
            || self.show_san
            || self.show_emails
            || self.show_key_usage
            || self.show_serial
    }
}

pub(crate) fn execute(config: Config) -> Result<()> {
    let der = certificate_der(read_input(config.file.as_deref())?)?;
    let cert = Certificate::from_der(&der)?;

    if config.should_show_specific_fields() {
        print!("{}", specific_fields(&config, &cert));
        return Ok(());
    }

    match config.output {
        OutputFormat::Text => {
            print!("{}", format_properties(&cert.component_attributes()));
        }
        OutputFormat::Json => {
            println!("{}", cert.json_description()?);
        }
        OutputFormat::Yaml => {
            let value: serde_json::Value = serde_json::from_str(&cert.json_description()?)?;
            print!("{}", serde_yml::to_string(&value)?);
        }
    }

    Ok(())
}

fn specific_fields(config: &Config, cert: &Certificate) -> String {
    let mut out = String::new();
    if config.show_subject {
        out.push_str(&format!("Subject: {}\n", cert.subject()));
        if let Some(summary) = cert.subject_summary() {
            out.push_str(&format!("Summary: {}\n", summary));
        }
    }
    if config.show_issuer {
        out.push_str(&format!("Issuer: {}\n", cert.issuer()));
    }
    if config.show_san {
        for description in cert.descriptions_from_san().unwrap_or_default() {
            out.push_str(&format!("SAN: {}\n", description));
        }
    }
    if config.show_emails {
        for email in cert.email_addresses().unwrap_or_default() {
            out.push_str(&format!("Email: {}\n", email));
        }
    }
    if config.show_key_usage {
        let flags = cert.key_usage();
        let usages = cert
            .key_usage_extension()
            .map(|usage| usage.usages().join(", "))
            .unwrap_or_else(|| "unspecified".to_string());
        let critical = if flags.is_critical() { " (critical)" } else { "" };
        out.push_str(&format!("Key Usage: {} [{}]{}\n", usages, flags, critical));
    }
    if config.show_serial {
        out.push_str(&format!("Serial Number: {}\n", cert.serial_number().format_hex()));
    }
    out
}

/// Indented listing of a property tree, two spaces per level.
fn format_properties(properties: &[Property]) -> String {
    let mut out = String::new();
    for property in properties {
        format_property(property, 0, &mut out);
    }
    out
}

fn format_property(property: &Property, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    match &property.value {
        PropertyValue::Section(children) => {
            out.push_str(&format!("{}{}:\n", indent, property.label));
            for child in children {
                format_property(child, depth + 1, out);
            }
        }
        PropertyValue::String(s) => {
            out.push_str(&format!("{}{}: {}\n", indent, property.label, s));
        }
        PropertyValue::Number(n) => {
            out.push_str(&format!("{}{}: {}\n", indent, property.label, n));
        }
        PropertyValue::Date(time) => {
            out.push_str(&format!("{}{}: {}\n", indent, property.label, time));
        }
        PropertyValue::Array(items) => {
            out.push_str(&format!("{}{}: {}\n", indent, property.label, items.join(", ")));
        }
        PropertyValue::Data(data) if data.len() <= DATA_BYTES_PER_LINE => {
            out.push_str(&format!("{}{}: {}\n", indent, property.label, colon_hex(data)));
        }
        PropertyValue::Data(data) => {
            out.push_str(&format!("{}{}:\n", indent, property.label));
            for chunk in data.chunks(DATA_BYTES_PER_LINE) {
                out.push_str(&format!("{}    {}\n", indent, colon_hex(chunk)));
            }
        }
    }
}

fn colon_hex(data: &[u8]) -> String {
    data.iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(":")
}
