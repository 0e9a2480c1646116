//! Error categories shared by every kensa decoder.
//!
//! Each crate keeps its own detailed error enum for diagnostics. Those enums
//! implement [`Categorize`] so that a caller can turn any failure into one of
//! a handful of stable categories, and render it as
//! `{"error": "<message>"}` without leaking offsets or field names.

use std::fmt;

use serde::Serialize;

/// Coarse failure categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The input is not well formed (ASN.1, PEM or property list).
    Parse,
    /// A MAC did not verify or decrypted data did not unpad.
    Integrity,
    /// No signer of a signed message verified.
    SignatureInvalid,
    /// An algorithm identifier is recognized as valid but not implemented.
    UnsupportedAlgorithm,
    /// The outer content type is not the expected one.
    UnsupportedContentType,
}

impl ErrorKind {
    /// The stable, user-facing message for this category.
    pub fn message(&self) -> &'static str {
        match self {
            ErrorKind::Parse => "malformed input",
            ErrorKind::Integrity => "integrity check failed",
            ErrorKind::SignatureInvalid => "signature verification failed",
            ErrorKind::UnsupportedAlgorithm => "unsupported algorithm",
            ErrorKind::UnsupportedContentType => "unsupported content type",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Maps a detailed error onto its [`ErrorKind`].
pub trait Categorize {
    fn kind(&self) -> ErrorKind;
}

impl Categorize for ErrorKind {
    fn kind(&self) -> ErrorKind {
        *self
    }
}

/// The `{"error": "..."}` body returned for any failed decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
}

impl ErrorResponse {
    pub fn from_error<E: Categorize + ?Sized>(err: &E) -> Self {
        Self {
            error: err.kind().message(),
        }
    }
}

impl From<ErrorKind> for ErrorResponse {
    fn from(kind: ErrorKind) -> Self {
        Self {
            error: kind.message(),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::parse(ErrorKind::Parse, r#"{"error":"malformed input"}"#)]
    #[case::integrity(ErrorKind::Integrity, r#"{"error":"integrity check failed"}"#)]
    #[case::signature(
        ErrorKind::SignatureInvalid,
        r#"{"error":"signature verification failed"}"#
    )]
    #[case::algorithm(
        ErrorKind::UnsupportedAlgorithm,
        r#"{"error":"unsupported algorithm"}"#
    )]
    #[case::content_type(
        ErrorKind::UnsupportedContentType,
        r#"{"error":"unsupported content type"}"#
    )]
    fn test_error_response_json(#[case] kind: ErrorKind, #[case] expected: &str) {
        let response = ErrorResponse::from_error(&kind);
        assert_eq!(expected, serde_json::to_string(&response).unwrap());
    }

    #[test]
    fn test_display_matches_message() {
        assert_eq!("malformed input", ErrorKind::Parse.to_string());
    }
}
