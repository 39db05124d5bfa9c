//! Read-only queries over a [`Certificate`].
//!
//! Queries for optional data return `Option`: `None` means the certificate
//! simply does not carry it. The name queries that report a status code
//! ([`Certificate::common_names`], [`Certificate::email_addresses`]) return
//! `Result` and fail with [`ErrorKind::AttributeNotFound`](crate::ErrorKind).

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

use certkit_pkix_types::{AttributeTypeAndValue, Name};
use serde::Serialize;

use crate::certificate::Certificate;
use crate::error::{Error, Result};
use crate::extensions::{KeyUsage, SubjectAltName, SubjectKeyIdentifier};

/// Key usage as a bit mask, with a synthetic bit for criticality.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct KeyUsageFlags(u32);

impl KeyUsageFlags {
    /// No keyUsage extension.
    pub const UNSPECIFIED: Self = Self(0);
    pub const DIGITAL_SIGNATURE: Self = Self(1 << 0);
    pub const NON_REPUDIATION: Self = Self(1 << 1);
    /// Same bit as [`KeyUsageFlags::NON_REPUDIATION`].
    pub const CONTENT_COMMITMENT: Self = Self(1 << 1);
    pub const KEY_ENCIPHERMENT: Self = Self(1 << 2);
    pub const DATA_ENCIPHERMENT: Self = Self(1 << 3);
    pub const KEY_AGREEMENT: Self = Self(1 << 4);
    pub const KEY_CERT_SIGN: Self = Self(1 << 5);
    pub const CRL_SIGN: Self = Self(1 << 6);
    pub const ENCIPHER_ONLY: Self = Self(1 << 7);
    pub const DECIPHER_ONLY: Self = Self(1 << 8);
    /// Set when the extension is marked critical.
    pub const CRITICAL: Self = Self(1 << 31);
    pub const ALL: Self = Self(0x7fff_ffff);

    /// Create flags from a raw mask.
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Get the raw mask.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Whether every bit of `other` is set.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Whether no bit is set, including the critical bit.
    pub const fn is_unspecified(self) -> bool {
        self.0 == 0
    }

    /// Whether the keyUsage extension was marked critical.
    pub fn is_critical(self) -> bool {
        self.contains(Self::CRITICAL)
    }

    fn from_extension(usage: &KeyUsage, critical: bool) -> Self {
        let mut flags = usage
            .bits()
            .iter()
            .enumerate()
            .filter(|(_, set)| **set)
            .fold(Self::UNSPECIFIED, |flags, (bit, _)| flags | Self(1 << bit));
        if critical {
            flags |= Self::CRITICAL;
        }
        flags
    }
}

impl BitOr for KeyUsageFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for KeyUsageFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for KeyUsageFlags {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl fmt::Display for KeyUsageFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

/// Key usage of `certificate`; `UNSPECIFIED` for `None` or when the
/// extension is absent.
///
/// An empty non-critical extension also yields `UNSPECIFIED`; see
/// [`Certificate::key_usage`].
pub fn key_usage(certificate: Option<&Certificate>) -> KeyUsageFlags {
    certificate.map_or(KeyUsageFlags::UNSPECIFIED, Certificate::key_usage)
}

fn summary_of(name: &Name) -> Option<String> {
    name.values_of(AttributeTypeAndValue::OID_COMMON_NAME)
        .next()
        .or_else(|| name.attributes().find_map(AttributeTypeAndValue::value_str))
        .map(str::to_string)
}

impl Certificate {
    /// Get the subjectAltName extension
    pub fn subject_alt_name(&self) -> Option<&SubjectAltName> {
        self.extensions()?.extension::<SubjectAltName>()
    }

    /// The best human-readable name of the subject.
    ///
    /// Tries the first common name, then the first string attribute of the
    /// subject, then the first SAN entry.
    pub fn subject_summary(&self) -> Option<String> {
        summary_of(self.subject()).or_else(|| {
            self.subject_alt_name()?
                .names
                .first()
                .map(ToString::to_string)
        })
    }

    /// The best human-readable name of the issuer, same rules as
    /// [`Certificate::subject_summary`] without the SAN fallback.
    pub fn issuer_summary(&self) -> Option<String> {
        summary_of(self.issuer())
    }

    /// First common name of the subject.
    pub fn common_name(&self) -> Result<String> {
        self.subject()
            .values_of(AttributeTypeAndValue::OID_COMMON_NAME)
            .next()
            .map(str::to_string)
            .ok_or(Error::AttributeNotFound("common name"))
    }

    /// Every common name of the subject, in encoded order.
    pub fn common_names(&self) -> Result<Vec<String>> {
        let names = self
            .subject()
            .values_of(AttributeTypeAndValue::OID_COMMON_NAME)
            .map(str::to_string)
            .collect::<Vec<_>>();
        if names.is_empty() {
            return Err(Error::AttributeNotFound("common name"));
        }
        Ok(names)
    }

    /// Subject `emailAddress` attributes followed by SAN rfc822Names,
    /// without duplicates.
    pub fn email_addresses(&self) -> Result<Vec<String>> {
        let from_dn = self.subject().values_of(AttributeTypeAndValue::OID_EMAIL_ADDRESS);
        let from_san = self
            .subject_alt_name()
            .into_iter()
            .flat_map(|san| san.rfc822_names());

        let mut addresses: Vec<String> = Vec::new();
        for address in from_dn.chain(from_san) {
            if !addresses.iter().any(|a| a == address) {
                addresses.push(address.to_string());
            }
        }
        if addresses.is_empty() {
            return Err(Error::AttributeNotFound("email address"));
        }
        Ok(addresses)
    }

    /// Minimal two's-complement octets of the serial number, including a
    /// leading zero that keeps a value with its high bit set positive.
    ///
    /// For DER input these are the INTEGER content octets. A serial with
    /// redundant leading octets is decoded leniently and returned in its
    /// minimal form, the same bytes [`Certificate::reencoded`] writes.
    pub fn serial_number_data(&self) -> Result<Vec<u8>> {
        let bytes = self.serial_number().to_bytes();
        if bytes.is_empty() {
            return Err(Error::AttributeNotFound("serial number"));
        }
        Ok(bytes)
    }

    /// Key usage bits, plus [`KeyUsageFlags::CRITICAL`] when the extension
    /// is critical.
    ///
    /// `UNSPECIFIED` both when the extension is absent and when it is
    /// present, non-critical and has no bits set. Use
    /// [`Certificate::key_usage_extension`] to tell those apart.
    pub fn key_usage(&self) -> KeyUsageFlags {
        let Some(extensions) = self.extensions() else {
            return KeyUsageFlags::UNSPECIFIED;
        };
        match extensions.extension::<KeyUsage>() {
            Some(usage) => {
                KeyUsageFlags::from_extension(usage, extensions.is_critical::<KeyUsage>())
            }
            None => KeyUsageFlags::UNSPECIFIED,
        }
    }

    /// The decoded keyUsage extension, `None` only when it is absent.
    pub fn key_usage_extension(&self) -> Option<&KeyUsage> {
        self.extensions()?.extension::<KeyUsage>()
    }

    /// Raw keyIdentifier of the subjectKeyIdentifier extension.
    pub fn subject_key_id(&self) -> Option<&[u8]> {
        self.extensions()?
            .extension::<SubjectKeyIdentifier>()
            .map(SubjectKeyIdentifier::as_bytes)
    }

    /// Textual form of the SAN iPAddress entries of 4 or 16 octets; entries
    /// of any other length are skipped.
    pub fn ip_addresses(&self) -> Option<Vec<String>> {
        let addresses = self
            .subject_alt_name()?
            .ip_addresses()
            .map(|ip| ip.to_string())
            .collect::<Vec<_>>();
        non_empty(addresses)
    }

    /// Raw SAN iPAddress octets.
    pub fn ip_address_datas(&self) -> Option<Vec<Vec<u8>>> {
        let addresses = self
            .subject_alt_name()?
            .ip_address_octets()
            .map(<[u8]>::to_vec)
            .collect::<Vec<_>>();
        non_empty(addresses)
    }

    /// SAN rfc822Names, or the subject's `emailAddress` attributes when the
    /// SAN has none.
    pub fn rfc822_names(&self) -> Option<Vec<String>> {
        self.rfc822_names_from_san().or_else(|| {
            let names = self
                .subject()
                .values_of(AttributeTypeAndValue::OID_EMAIL_ADDRESS)
                .map(str::to_string)
                .collect::<Vec<_>>();
            non_empty(names)
        })
    }

    /// SAN rfc822Names only, in encoded order.
    pub fn rfc822_names_from_san(&self) -> Option<Vec<String>> {
        let names = self
            .subject_alt_name()?
            .rfc822_names()
            .map(str::to_string)
            .collect::<Vec<_>>();
        non_empty(names)
    }

    /// SAN dNSNames, in encoded order.
    pub fn dns_names(&self) -> Option<Vec<String>> {
        let names = self
            .subject_alt_name()?
            .dns_names()
            .map(str::to_string)
            .collect::<Vec<_>>();
        non_empty(names)
    }

    /// Kerberos and Microsoft principal names carried as SAN otherNames.
    pub fn nt_principal_names(&self) -> Option<Vec<String>> {
        let names = self
            .subject_alt_name()?
            .other_names()
            .filter(|other| other.is_principal_name())
            .map(|other| other.value_text())
            .collect::<Vec<_>>();
        non_empty(names)
    }

    /// One description per SAN entry, e.g. `DNS:example.com`.
    pub fn descriptions_from_san(&self) -> Option<Vec<String>> {
        let descriptions = self
            .subject_alt_name()?
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>();
        non_empty(descriptions)
    }
}

fn non_empty<T>(items: Vec<T>) -> Option<Vec<T>> {
    (!items.is_empty()).then_some(items)
}
