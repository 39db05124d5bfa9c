//! Conventional names for well-known OIDs

/// Types whose OID has a conventional short name.
///
/// For example the attribute type `2.5.4.3` is `CN` and the algorithm
/// `1.2.840.10045.2.1` is `ecPublicKey`.
pub trait OidName {
    fn oid_name(&self) -> Option<&'static str>;
}
