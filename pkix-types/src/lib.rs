//! PKIX (Public Key Infrastructure using X.509) common types
//!
//! Structures from RFC 5280 that the certificate schema is built from:
//! distinguished names, algorithm identifiers, public key info, serial
//! numbers and the raw extension envelope.

pub mod algorithm;
pub mod directory_string;
pub mod error;
pub mod extension;
pub mod name;
pub mod oid_name;
pub mod serial_number;
pub mod subject_public_key_info;

pub use algorithm::{AlgorithmIdentifier, AlgorithmParameters};
pub use directory_string::{DirectoryString, StringKind};
pub use error::{Error, Result};
pub use extension::Extension;
pub use name::{AttributeTypeAndValue, AttributeValue, Name, RelativeDistinguishedName};
pub use oid_name::OidName;
pub use serial_number::CertificateSerialNumber;
pub use subject_public_key_info::SubjectPublicKeyInfo;
