//! X.509 certificate decoding and inspection.
//!
//! A [`Certificate`] is built from one DER-encoded certificate and keeps
//! both the original bytes and the decoded structure. On top of it sit
//! read-only attribute queries (names, emails, IP addresses, key usage),
//! canonical re-encoding, and structured descriptions.
//!
//! ```no_run
//! use certkit_x509::Certificate;
//!
//! # fn run(der: &[u8]) -> certkit_x509::Result<()> {
//! let cert = Certificate::from_der(der)?;
//! println!("{:?}", cert.subject_summary());
//! println!("{}", cert.key_usage());
//! # Ok(())
//! # }
//! ```

mod attributes;
mod certificate;
mod description;
pub mod error;
pub mod extensions;
mod tbs;

pub use attributes::{KeyUsageFlags, key_usage};
pub use certificate::{Certificate, DecodedCertificate, KeychainItem};
pub use description::{Property, PropertyValue};
pub use error::{Error, ErrorKind, Result, Status};
pub use tbs::{TbsCertificate, Time, UniqueIdentifier, Validity, Version};
