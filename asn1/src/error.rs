//! Error types for ASN.1 element decoding.

use thiserror::Error;

/// Errors that can occur while turning TLVs into ASN.1 elements.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid boolean")]
    InvalidBoolean,

    #[error("INTEGER: no data")]
    IntegerNoData,

    #[error("OBJECT IDENTIFIER: no data")]
    ObjectIdentifierNoData,
    #[error("OBJECT IDENTIFIER: incomplete encoding")]
    ObjectIdentifierIncompleteEncoding,
    #[error("OBJECT IDENTIFIER: component overflows u64")]
    ObjectIdentifierOverflow,
    #[error("OBJECT IDENTIFIER: invalid component '{0}'")]
    ObjectIdentifierInvalidComponent(String),

    #[error("BIT STRING: no data")]
    BitStringNoData,
    #[error("BIT STRING: unused bits {0} out of range")]
    BitStringUnusedBitsOutOfRange(u8),

    #[error("UTF8String: invalid UTF-8")]
    Utf8StringInvalidUtf8,
    #[error("{0}: invalid encoding")]
    StringInvalidEncoding(&'static str),
    #[error("BMPString: odd byte length {0}")]
    BmpStringOddLength(usize),
    #[error("BMPString: invalid UTF-16")]
    BmpStringInvalidUtf16,

    #[error("UTCTime: invalid format")]
    UtcTimeInvalidFormat,
    #[error("GeneralizedTime: invalid format")]
    GeneralizedTimeInvalidFormat,

    #[error("{0}: expected a constructed encoding")]
    ExpectedConstructed(&'static str),

    #[error("context-specific [{slot}]: {msg}")]
    InvalidContextSpecific { slot: u8, msg: &'static str },
    #[error("expected a context-specific element")]
    ExpectedContextSpecific,

    #[error("expected exactly one top-level element, got {0}")]
    ExpectedSingleElement(usize),

    #[error("invalid DER encoding: {0}")]
    FailedToDecodeDer(#[from] kensa_der::error::Error),
}

impl kensa::error::Categorize for Error {
    fn kind(&self) -> kensa::error::ErrorKind {
        kensa::error::ErrorKind::Parse
    }
}
