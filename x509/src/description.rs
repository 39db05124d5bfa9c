//! Structured descriptions of a [`Certificate`] for display and logging.

use certkit_asn1::{BitString, ObjectIdentifier, to_hex};
use certkit_pkix_types::{
    AlgorithmIdentifier, AlgorithmParameters, CertificateSerialNumber, Name, OidName,
    SubjectPublicKeyInfo,
};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::certificate::Certificate;
use crate::error::Result;
use crate::extensions::{CertificateExtension, ExtendedKeyUsage, ExtensionValue};
use crate::tbs::{Time, Validity, Version};

/// One labelled entry of [`Certificate::component_attributes`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub label: String,
    pub value: PropertyValue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    Section(Vec<Property>),
    String(String),
    Data(Vec<u8>),
    Number(i64),
    Date(Time),
    Array(Vec<String>),
}

impl PropertyValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            PropertyValue::Section(_) => "section",
            PropertyValue::String(_) => "string",
            PropertyValue::Data(_) => "data",
            PropertyValue::Number(_) => "number",
            PropertyValue::Date(_) => "date",
            PropertyValue::Array(_) => "array",
        }
    }
}

impl Property {
    fn new(label: impl Into<String>, value: PropertyValue) -> Self {
        Property {
            label: label.into(),
            value,
        }
    }

    fn section(label: impl Into<String>, properties: Vec<Property>) -> Self {
        Self::new(label, PropertyValue::Section(properties))
    }

    fn string(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(label, PropertyValue::String(value.into()))
    }

    fn data(label: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self::new(label, PropertyValue::Data(value.into()))
    }

    /// Looks up a direct child of a section by label.
    pub fn get(&self, label: &str) -> Option<&Property> {
        match &self.value {
            PropertyValue::Section(children) => children.iter().find(|p| p.label == label),
            _ => None,
        }
    }
}

impl Serialize for Property {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("Property", 3)?;
        state.serialize_field("type", self.value.type_name())?;
        state.serialize_field("label", &self.label)?;
        match &self.value {
            PropertyValue::Section(children) => state.serialize_field("value", children)?,
            PropertyValue::String(s) => state.serialize_field("value", s)?,
            PropertyValue::Data(data) => state.serialize_field("value", &to_hex(data))?,
            PropertyValue::Number(n) => state.serialize_field("value", n)?,
            PropertyValue::Date(time) => state.serialize_field("value", time)?,
            PropertyValue::Array(items) => state.serialize_field("value", items)?,
        }
        state.end()
    }
}

/// One entry per attribute type, in order of first appearance. A type that
/// occurs more than once becomes an array.
fn name_properties(name: &Name) -> Vec<Property> {
    let mut grouped: Vec<(String, Vec<String>)> = Vec::new();
    for atv in name.attributes() {
        let label = atv.type_label();
        let value = atv.attribute_value.to_string();
        match grouped.iter_mut().find(|(l, _)| *l == label) {
            Some((_, values)) => values.push(value),
            None => grouped.push((label, vec![value])),
        }
    }
    grouped
        .into_iter()
        .map(|(label, mut values)| {
            if values.len() == 1 {
                Property::string(label, values.remove(0))
            } else {
                Property::new(label, PropertyValue::Array(values))
            }
        })
        .collect()
}

fn algorithm_properties(algorithm: &AlgorithmIdentifier) -> Vec<Property> {
    let mut properties = vec![Property::string("Algorithm", algorithm.algorithm_label())];
    match algorithm.parameters() {
        None | Some(AlgorithmParameters::Null) => {}
        Some(params) => properties.push(Property::string("Parameters", params.to_string())),
    }
    properties
}

fn extension_property(extension: &CertificateExtension) -> Property {
    let label = extension
        .oid_name()
        .map(str::to_string)
        .unwrap_or_else(|| extension.oid().to_string());
    let critical = if extension.is_critical() { "Yes" } else { "No" };

    let mut properties = vec![Property::string("Critical", critical)];
    match extension.value() {
        ExtensionValue::KeyUsage(usage) => properties.push(Property::new(
            "Usage",
            PropertyValue::Array(usage.usages().into_iter().map(str::to_string).collect()),
        )),
        ExtensionValue::SubjectAltName(san) => properties.push(Property::new(
            "Names",
            PropertyValue::Array(san.iter().map(ToString::to_string).collect()),
        )),
        ExtensionValue::IssuerAltName(ian) => properties.push(Property::new(
            "Names",
            PropertyValue::Array(ian.names.iter().map(ToString::to_string).collect()),
        )),
        ExtensionValue::SubjectKeyIdentifier(ski) => {
            properties.push(Property::data("Key Identifier", ski.as_bytes()))
        }
        ExtensionValue::BasicConstraints(bc) => {
            properties.push(Property::string(
                "Certificate Authority",
                if bc.ca { "Yes" } else { "No" },
            ));
            if let Some(pathlen) = bc.path_len_constraint {
                properties.push(Property::new(
                    "Path Length Constraint",
                    PropertyValue::Number(i64::from(pathlen)),
                ));
            }
        }
        ExtensionValue::ExtendedKeyUsage(eku) => properties.push(Property::new(
            "Purposes",
            PropertyValue::Array(eku.purposes.iter().map(eku_purpose_label).collect()),
        )),
        ExtensionValue::AuthorityKeyIdentifier(aki) => {
            properties.push(Property::string("Value", aki.to_string()))
        }
        ExtensionValue::Unknown(raw) => properties.push(Property::data("Data", raw.as_bytes())),
    }
    Property::section(label, properties)
}

fn eku_purpose_label(oid: &ObjectIdentifier) -> String {
    ExtendedKeyUsage::purpose_name(oid)
        .map(str::to_string)
        .unwrap_or_else(|| oid.to_string())
}

#[derive(Serialize)]
struct ExtensionDescription<'a> {
    oid: &'a ObjectIdentifier,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'static str>,
    critical: bool,
    value: &'a ExtensionValue,
}

#[derive(Serialize)]
struct Description<'a> {
    version: Version,
    serial_number: &'a CertificateSerialNumber,
    subject: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    subject_summary: Option<String>,
    issuer: String,
    validity: &'a Validity,
    subject_public_key_info: &'a SubjectPublicKeyInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    subject_alt_names: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email_addresses: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    key_usage: Option<Vec<&'static str>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    extensions: Vec<ExtensionDescription<'a>>,
    signature_algorithm: &'a AlgorithmIdentifier,
    signature_value: &'a BitString,
}

impl Certificate {
    /// Every decoded top-level component as a labelled property tree.
    ///
    /// Absent optional components are left out rather than rendered empty.
    pub fn component_attributes(&self) -> Vec<Property> {
        let tbs = self.tbs_certificate();
        let mut properties = vec![
            Property::section("Subject Name", name_properties(tbs.subject())),
            Property::section("Issuer Name", name_properties(tbs.issuer())),
            Property::string("Version", tbs.version().to_string()),
            Property::data("Serial Number", tbs.serial_number().to_bytes()),
            Property::section(
                "Validity Period",
                vec![
                    Property::new("Not Valid Before", PropertyValue::Date(tbs.validity().not_before)),
                    Property::new("Not Valid After", PropertyValue::Date(tbs.validity().not_after)),
                ],
            ),
        ];
        if let Some(id) = tbs.subject_unique_id() {
            properties.push(Property::data("Subject Unique ID", id.as_bit_string().as_bytes()));
        }
        if let Some(id) = tbs.issuer_unique_id() {
            properties.push(Property::data("Issuer Unique ID", id.as_bit_string().as_bytes()));
        }

        let spki = tbs.subject_public_key_info();
        properties.push(Property::section(
            "Public Key Info",
            vec![
                Property::section("Public Key Algorithm", algorithm_properties(spki.algorithm())),
                Property::data("Public Key Data", spki.subject_public_key().as_bytes()),
            ],
        ));
        properties.push(Property::section(
            "Signature",
            vec![
                Property::section(
                    "Signature Algorithm",
                    algorithm_properties(self.signature_algorithm()),
                ),
                Property::data("Signature Data", self.signature_value().as_bytes()),
            ],
        ));
        if let Some(extensions) = tbs.extensions() {
            properties.push(Property::section(
                "Extensions",
                extensions.iter().map(extension_property).collect(),
            ));
        }
        properties
    }

    /// Pretty-printed JSON describing the certificate.
    ///
    /// Optional parts the certificate does not carry are omitted.
    pub fn json_description(&self) -> Result<String> {
        let tbs = self.tbs_certificate();
        let extensions = tbs
            .extensions()
            .map(|exts| {
                exts.iter()
                    .map(|ext| ExtensionDescription {
                        oid: ext.oid(),
                        name: ext.oid_name(),
                        critical: ext.is_critical(),
                        value: ext.value(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        let description = Description {
            version: tbs.version(),
            serial_number: tbs.serial_number(),
            subject: tbs.subject().to_string(),
            subject_summary: self.subject_summary(),
            issuer: tbs.issuer().to_string(),
            validity: tbs.validity(),
            subject_public_key_info: tbs.subject_public_key_info(),
            subject_alt_names: self.descriptions_from_san(),
            email_addresses: self.email_addresses().ok(),
            key_usage: self.key_usage_extension().map(|usage| usage.usages()),
            extensions,
            signature_algorithm: self.signature_algorithm(),
            signature_value: self.signature_value(),
        };
        Ok(serde_json::to_string_pretty(&description)?)
    }
}
