//! Extension-specific error types

use thiserror::Error;

/// Where an extension error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    BasicConstraints,
    KeyUsage,
    SubjectKeyIdentifier,
    AuthorityKeyIdentifier,
    SubjectAltName,
    GeneralName,
    ExtendedKeyUsage,
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BasicConstraints => write!(f, "BasicConstraints"),
            Self::KeyUsage => write!(f, "KeyUsage"),
            Self::SubjectKeyIdentifier => write!(f, "SubjectKeyIdentifier"),
            Self::AuthorityKeyIdentifier => write!(f, "AuthorityKeyIdentifier"),
            Self::SubjectAltName => write!(f, "SubjectAltName"),
            Self::GeneralName => write!(f, "GeneralName"),
            Self::ExtendedKeyUsage => write!(f, "ExtendedKeyUsage"),
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}: expected SEQUENCE")]
    ExpectedSequence(Kind),
    #[error("{0}: expected BIT STRING")]
    ExpectedBitString(Kind),
    #[error("{0}: expected OCTET STRING")]
    ExpectedOctetString(Kind),
    #[error("{0}: unexpected element type")]
    UnexpectedElementType(Kind),

    #[error("BasicConstraints: pathLenConstraint out of range for u32")]
    PathLenConstraintOutOfRange,

    #[error("GeneralName: unknown context-specific tag [{0}]")]
    UnknownGeneralNameTag(u8),
    #[error("GeneralName: expected a context-specific element")]
    GeneralNameExpectedContextSpecific,
    #[error("GeneralName: IA5String must be valid ASCII")]
    GeneralNameInvalidAscii,
    #[error("GeneralName: iPAddress must be 4 or 16 bytes, got {0}")]
    InvalidIpAddressLength(usize),
    #[error("GeneralName: otherName must be SEQUENCE {{ OID, [0] EXPLICIT ANY }}")]
    OtherNameInvalidStructure,

    #[error("SubjectAltName: at least one GeneralName required")]
    SubjectAltNameEmpty,

    #[error("AuthorityKeyIdentifier: unknown context-specific tag [{0}]")]
    AkiUnknownTag(u8),

    #[error("ExtendedKeyUsage: at least one KeyPurposeId required")]
    ExtendedKeyUsageEmpty,
    #[error("ExtendedKeyUsage: all elements must be OBJECT IDENTIFIER")]
    ExtendedKeyUsageExpectedOid,

    #[error("invalid ASN.1: {0}")]
    InvalidAsn1(#[from] kensa_asn1::error::Error),
    #[error("PKIX types error: {0}")]
    PkixTypes(#[from] kensa_pkix_types::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
