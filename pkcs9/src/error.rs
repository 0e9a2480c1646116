//! Error types for PKCS#9

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Attribute: expected SEQUENCE of type and values")]
    AttributeExpectedSequence,
    #[error("Attribute: expected OBJECT IDENTIFIER for type")]
    AttributeExpectedOid,
    #[error("Attribute: expected SET for values")]
    AttributeExpectedSet,
    #[error("Attributes: expected SET OF Attribute")]
    AttributesExpectedSet,

    #[error("{0}: expected exactly one value, got {1}")]
    ExpectedSingleValue(&'static str, usize),
    #[error("OID mismatch: expected {expected}, got {actual}")]
    OidMismatch { expected: &'static str, actual: String },

    #[error("contentType: expected OBJECT IDENTIFIER")]
    InvalidContentType,
    #[error("messageDigest: expected OCTET STRING")]
    InvalidMessageDigest,
    #[error("signingTime: expected UTCTime or GeneralizedTime")]
    InvalidSigningTime,
    #[error("friendlyName: expected BMPString")]
    InvalidFriendlyName,
    #[error("localKeyId: expected OCTET STRING")]
    InvalidLocalKeyId,

    #[error("{0} cannot be empty")]
    EmptyValue(&'static str),

    #[error("ASN.1 error: {0}")]
    ASN1Error(#[from] kensa_asn1::error::Error),
}

impl kensa::error::Categorize for Error {
    fn kind(&self) -> kensa::error::ErrorKind {
        kensa::error::ErrorKind::Parse
    }
}
