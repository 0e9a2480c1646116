use base64::DecodeError;
use thiserror::Error;

/// Errors that can occur when parsing or decoding PEM data.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// Missing the opening boundary marker (e.g., `-----BEGIN PKCS7-----`)
    #[error("missing a pre encapsulation boundary")]
    MissingPreEncapsulationBoundary,

    /// Missing the closing boundary marker
    #[error("missing a post encapsulation boundary")]
    MissingPostEncapsulationBoundary,

    #[error("missing PEM data")]
    MissingData,

    /// The label in the boundary marker is not one kensa reads
    #[error("invalid label: {0}")]
    InvalidLabel(String),

    /// BEGIN and END labels differ
    #[error("label doesn't match")]
    LabelMissMatch,

    /// Malformed boundary marker
    #[error("invalid encapsulation boundary")]
    InvalidEncapsulationBoundary,

    #[error("base64 decode: {0}")]
    Base64Decode(DecodeError),
}

impl kensa::error::Categorize for Error {
    fn kind(&self) -> kensa::error::ErrorKind {
        kensa::error::ErrorKind::Parse
    }
}
