//! Trait for types that have OIDs with conventional names

/// Trait for types that have OIDs with conventional/standard names
///
/// For example, an AlgorithmIdentifier with OID `1.2.840.113549.1.1.11` has
/// the conventional name `sha256WithRSAEncryption`.
pub trait OidName {
    /// Returns the conventional name for this type's OID, if it has one
    fn oid_name(&self) -> Option<&'static str>;
}
