use chrono::{DateTime, Utc};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Certificate: expected SEQUENCE")]
    CertificateExpectedSequence,
    #[error("Certificate: expected 3 elements, got {0}")]
    CertificateInvalidElementCount(usize),
    #[error("Certificate: expected BIT STRING for signatureValue")]
    CertificateExpectedBitString,

    #[error("TBSCertificate: expected SEQUENCE")]
    TbsCertificateExpectedSequence,
    #[error("TBSCertificate: missing {0}")]
    TbsCertificateMissingField(&'static str),
    #[error("TBSCertificate: unexpected element after subjectPublicKeyInfo")]
    TbsCertificateUnexpectedElement,

    #[error("Version: expected INTEGER")]
    VersionExpectedInteger,
    #[error("Version: unknown value {0}")]
    VersionUnknown(String),

    #[error("Validity: expected SEQUENCE of 2 elements")]
    ValidityExpectedSequence,
    #[error("Validity: expected UTCTime or GeneralizedTime")]
    ValidityExpectedTime,
    #[error("Validity: notBefore {not_before} is after notAfter {not_after}")]
    ValidityNotBeforeAfterNotAfter {
        not_before: DateTime<Utc>,
        not_after: DateTime<Utc>,
    },

    #[error("Extensions: expected non-empty SEQUENCE")]
    ExtensionsExpectedSequence,
    #[error("extension OID mismatch: expected {expected}, got {actual}")]
    OidMismatch { expected: &'static str, actual: String },
    #[error("extension {0}: {1}")]
    Extension(&'static str, #[source] crate::extensions::error::Error),

    #[error("IssuerAndSerialNumber: expected SEQUENCE of 2 elements")]
    IssuerAndSerialNumberExpectedSequence,

    #[error("unexpected PEM label: {0}")]
    UnexpectedPemLabel(kensa_pem::Label),

    #[error("invalid ASN.1: {0}")]
    InvalidASN1(#[from] kensa_asn1::error::Error),
    #[error("PKIX types error: {0}")]
    PKIXTypesError(#[from] kensa_pkix_types::Error),
    #[error("PEM error: {0}")]
    Pem(#[from] kensa_pem::error::Error),
}

impl kensa::error::Categorize for Error {
    fn kind(&self) -> kensa::error::ErrorKind {
        kensa::error::ErrorKind::Parse
    }
}
